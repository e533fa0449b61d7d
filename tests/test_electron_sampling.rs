// Integration tests for electron collision sampling: energy balance,
// secondary electron spectra and seeded reproducibility.

mod common;

use common::{ar_ibu_engine, pure_ar_engine, AR_ION_POT};
use swarm_mc::{sample_opal_beaty, CollisionType, FastRng, ProductKind};

#[test]
fn test_post_collision_energy_never_exceeds_primary() {
    let mut engine = ar_ibu_engine();
    let mut rng = FastRng::new(42);
    for i in 0..20_000 {
        let e = 0.5 + 39.0 * (i % 79) as f64 / 79.0;
        let mut dir = [0.0, 0.0, 1.0];
        let result = engine
            .sample_electron_collision(e, &mut dir, &mut rng)
            .unwrap();
        assert!(result.energy > 0.0);
        assert!(
            result.energy <= e,
            "e1 = {} exceeds e = {} for {:?}",
            result.energy,
            e,
            result.kind
        );
    }
}

#[test]
fn test_direction_stays_normalized() {
    let mut engine = ar_ibu_engine();
    let mut rng = FastRng::new(7);
    let mut dir = [0.0, 0.0, 1.0];
    for _ in 0..5_000 {
        engine
            .sample_electron_collision(12.0, &mut dir, &mut rng)
            .unwrap();
        let norm = dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2];
        assert!((norm - 1.0).abs() < 1e-6, "norm^2 drifted to {}", norm);
    }
}

#[test]
fn test_ionisation_products() {
    let mut engine = pure_ar_engine();
    let mut rng = FastRng::new(11);
    let e = 30.0;
    let mut seen = 0;
    for _ in 0..50_000 {
        let mut dir = [0.0, 0.0, 1.0];
        let result = engine
            .sample_electron_collision(e, &mut dir, &mut rng)
            .unwrap();
        if result.kind != CollisionType::Ionisation {
            continue;
        }
        seen += 1;
        assert_eq!(result.n_ionisation_products, 2);
        let products = engine.ionisation_products();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].kind, ProductKind::Electron);
        assert_eq!(products[1].kind, ProductKind::Ion);
        // The ejected electron takes at most half the available energy.
        assert!(products[0].energy > 0.0);
        // The threshold enters in rest-mass-scaled units, hence the
        // small tolerance.
        assert!(products[0].energy <= 0.5 * (e - AR_ION_POT) + 1e-3);
        assert_eq!(products[1].energy, 0.0);
    }
    assert!(seen > 100, "only {} ionising collisions sampled", seen);
}

#[test]
fn test_opal_beaty_splitting_bounds() {
    let mut rng = FastRng::new(3);
    let e = 15.0;
    let loss = 10.67;
    for _ in 0..10_000 {
        let esec = sample_opal_beaty(&mut rng, e, loss, 7.0);
        assert!(esec > 0.0);
        assert!(esec <= 0.5 * (e - loss));
    }
}

#[test]
fn test_seeded_reproducibility() {
    let mut engine_a = ar_ibu_engine();
    let mut engine_b = ar_ibu_engine();
    let mut rng_a = FastRng::new(1234);
    let mut rng_b = FastRng::new(1234);
    let mut dir_a = [0.0, 0.0, 1.0];
    let mut dir_b = [0.0, 0.0, 1.0];
    for i in 0..2_000 {
        let e = 1.0 + (i % 35) as f64;
        let a = engine_a
            .sample_electron_collision(e, &mut dir_a, &mut rng_a)
            .unwrap();
        let b = engine_b
            .sample_electron_collision(e, &mut dir_b, &mut rng_b)
            .unwrap();
        assert_eq!(a.level, b.level);
        assert_eq!(a.energy, b.energy);
        assert_eq!(dir_a, dir_b);
    }
}

#[test]
fn test_collision_counters() {
    let mut engine = ar_ibu_engine();
    let mut rng = FastRng::new(99);
    let n = 10_000;
    for _ in 0..n {
        let mut dir = [0.0, 0.0, 1.0];
        engine
            .sample_electron_collision(20.0, &mut dir, &mut rng)
            .unwrap();
    }
    assert_eq!(engine.n_electron_collisions(), n);
    let detailed: u64 = engine.n_collisions_detailed().iter().sum();
    assert_eq!(detailed, n);
    // Elastic scattering dominates at 20 eV.
    assert!(engine.n_electron_collisions_of(CollisionType::Elastic) > n / 2);

    engine.reset_collision_counters();
    assert_eq!(engine.n_electron_collisions(), 0);
    assert!(engine.n_collisions_detailed().iter().all(|&c| c == 0));
}

#[test]
fn test_sub_threshold_energy_has_no_ionisation() {
    let mut engine = pure_ar_engine();
    let mut rng = FastRng::new(5);
    for _ in 0..10_000 {
        let mut dir = [0.0, 0.0, 1.0];
        let result = engine
            .sample_electron_collision(10.0, &mut dir, &mut rng)
            .unwrap();
        assert_ne!(result.kind, CollisionType::Ionisation);
    }
}

#[test]
fn test_non_positive_energy_is_rejected() {
    let mut engine = ar_ibu_engine();
    let mut rng = FastRng::new(1);
    let mut dir = [0.0, 0.0, 1.0];
    assert!(engine
        .sample_electron_collision(0.0, &mut dir, &mut rng)
        .is_err());
    assert!(engine
        .sample_electron_collision(-1.0, &mut dir, &mut rng)
        .is_err());
}
