// Integration tests for the photon collision table, continuum
// photoabsorption and resonance line absorption.

mod common;

use common::{ar_ibu_engine, AR_ION_POT};
use swarm_mc::{FastRng, PhotonCollisionType};

#[test]
fn test_continuum_rate_is_positive_above_thresholds() {
    let mut engine = ar_ibu_engine();
    let low = engine.photon_collision_rate(5.0).unwrap();
    let high = engine.photon_collision_rate(18.0).unwrap();
    assert!(low > 0.0);
    // Above both ionisation potentials the absorption is much stronger.
    assert!(high > low);
}

#[test]
fn test_photon_rate_rejects_non_positive_energy() {
    let mut engine = ar_ibu_engine();
    assert!(engine.photon_collision_rate(0.0).is_err());
    assert!(engine.photon_collision_rate(-3.0).is_err());
}

#[test]
fn test_ionising_absorption_yields_photoelectron() {
    let mut engine = ar_ibu_engine();
    let mut rng = FastRng::new(31);
    let e = 18.0;
    let mut ionising = 0;
    for _ in 0..5_000 {
        let result = engine.sample_photon_collision(e, &mut rng).unwrap();
        assert!(result.ctheta >= -1.0 && result.ctheta <= 1.0);
        if result.kind == PhotonCollisionType::Ionisation {
            ionising += 1;
            let esec = result.secondary.expect("missing photoelectron");
            assert!(esec > 0.0);
            // The photoelectron carries the energy above the potential
            // of the absorbing gas; the argon threshold is the higher
            // of the two.
            assert!(esec <= e - AR_ION_POT + 1e-9 || esec <= e - common::IBU_ION_POT + 1e-9);
        }
    }
    assert!(ionising > 100, "only {} ionising absorptions", ionising);
    assert_eq!(
        engine.n_photon_collisions_of(PhotonCollisionType::Ionisation),
        ionising
    );
}

#[test]
fn test_resonance_line_dominates_at_line_centre() {
    let mut engine = ar_ibu_engine();
    engine.enable_deexcitation();
    engine.enable_radiation_trapping(true);
    let with_lines = engine.photon_collision_rate(11.624).unwrap();

    engine.enable_radiation_trapping(false);
    let continuum = engine.photon_collision_rate(11.624).unwrap();

    assert!(continuum > 0.0);
    assert!(
        with_lines > 100.0 * continuum,
        "line absorption ({}) does not dominate the continuum ({})",
        with_lines,
        continuum
    );
}

#[test]
fn test_line_absorption_is_truncated() {
    let mut engine = ar_ibu_engine();
    engine.enable_deexcitation();
    engine.enable_radiation_trapping(true);
    engine.rate_tables().unwrap();
    let width = engine
        .deexcitation_table()
        .and_then(|t| t.levels.iter().find(|l| l.label == "1S4"))
        .map(|l| l.width)
        .expect("1S4 missing");

    let inside = engine.photon_collision_rate(11.624).unwrap();
    let outside = engine.photon_collision_rate(11.624 + 2.0 * width).unwrap();
    assert!(inside > 10.0 * outside);
}

#[test]
fn test_line_photon_feeds_the_cascade() {
    let mut engine = ar_ibu_engine();
    engine.enable_deexcitation();
    engine.enable_radiation_trapping(true);
    let mut rng = FastRng::new(47);
    let mut absorbed = 0;
    for _ in 0..1_000 {
        let result = engine.sample_photon_collision(11.624, &mut rng).unwrap();
        if result.kind == PhotonCollisionType::Excitation {
            absorbed += 1;
            assert_eq!(
                result.n_deexcitation_products,
                engine.deexcitation_products().len()
            );
        }
    }
    // At the line centre nearly every absorption goes into the line.
    assert!(absorbed > 900, "only {} line absorptions", absorbed);
}

#[test]
fn test_photon_auto_adjust() {
    let mut engine = ar_ibu_engine();
    assert_eq!(engine.max_photon_energy(), 20.0);
    engine.photon_collision_rate(25.0).unwrap();
    assert!((engine.max_photon_energy() - 26.25).abs() < 1e-9);
}
