// Integration tests for the simplified Penning transfer model.

mod common;

use common::{ar_ibu_engine, IBU_ION_POT};
use swarm_mc::{CollisionType, FastRng, ProductKind};

#[test]
fn test_penning_transfer_ejects_electron() {
    let mut engine = ar_ibu_engine();
    // Every eligible excitation transfers: all argon levels lie above
    // the isobutane ionisation potential.
    engine.enable_penning_transfer(1.0, 0.0).unwrap();
    let rgas_ar = engine.rate_tables().unwrap().rgas[0];
    let mut rng = FastRng::new(19);
    let mut excitations: u64 = 0;
    for _ in 0..200_000 {
        let mut dir = [0.0, 0.0, 1.0];
        let result = engine
            .sample_electron_collision(13.0, &mut dir, &mut rng)
            .unwrap();
        if result.kind != CollisionType::Excitation {
            continue;
        }
        excitations += 1;
        assert_eq!(result.n_deexcitation_products, 1);
        let products = engine.deexcitation_products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].kind, ProductKind::Electron);
        let energy = products[0].energy;
        let offset = products[0].offset;
        let level = engine.level(result.level).unwrap();
        let expected = level.energy_loss * rgas_ar - IBU_ION_POT;
        assert!((energy - expected).abs() < 1e-9);
        assert_eq!(offset, 0.0);
    }
    assert!(excitations > 100, "too few excitations sampled");
    assert_eq!(engine.n_penning_transfers(), excitations);
}

#[test]
fn test_penning_probability_zero_transfers_nothing() {
    let mut engine = ar_ibu_engine();
    engine.enable_penning_transfer(0.0, 0.0).unwrap();
    let mut rng = FastRng::new(29);
    for _ in 0..50_000 {
        let mut dir = [0.0, 0.0, 1.0];
        let result = engine
            .sample_electron_collision(13.0, &mut dir, &mut rng)
            .unwrap();
        assert_eq!(result.n_deexcitation_products, 0);
    }
    assert_eq!(engine.n_penning_transfers(), 0);
}

#[test]
fn test_penning_displacement_radius() {
    let mut engine = ar_ibu_engine();
    let lambda = 1.5e-4;
    engine.enable_penning_transfer(1.0, lambda).unwrap();
    let mut rng = FastRng::new(37);
    let mut seen = 0;
    for _ in 0..100_000 {
        let mut dir = [0.0, 0.0, 1.0];
        let result = engine
            .sample_electron_collision(13.0, &mut dir, &mut rng)
            .unwrap();
        if result.kind != CollisionType::Excitation {
            continue;
        }
        seen += 1;
        let products = engine.deexcitation_products();
        assert!(products[0].offset > 0.0);
        assert!(products[0].offset <= lambda);
    }
    assert!(seen > 50);
}

#[test]
fn test_per_gas_penning_override() {
    let mut engine = ar_ibu_engine();
    engine.enable_penning_transfer(0.0, 0.0).unwrap();
    engine
        .enable_penning_transfer_for_gas("Ar", 0.7, 0.0)
        .unwrap();
    engine.rate_tables().unwrap();
    let n = {
        let tables = engine.rate_tables().unwrap();
        tables.n_terms()
    };
    for i in 0..n {
        let level = engine.level(i).unwrap();
        if level.kind == CollisionType::Excitation {
            assert_eq!(level.penning_r, 0.7);
        }
    }
}

#[test]
fn test_invalid_penning_probability_is_rejected() {
    let mut engine = ar_ibu_engine();
    assert!(engine.enable_penning_transfer(-0.1, 0.0).is_err());
    assert!(engine.enable_penning_transfer(1.5, 0.0).is_err());
}

#[test]
fn test_penning_and_deexcitation_are_exclusive() {
    let mut engine = ar_ibu_engine();
    engine.enable_deexcitation();
    engine.enable_penning_transfer(0.5, 0.0).unwrap();
    engine.rate_tables().unwrap();
    // Penning transfer replaced the cascade.
    assert!(engine.deexcitation_table().is_none());
}
