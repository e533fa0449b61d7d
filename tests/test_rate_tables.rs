// Integration tests for the mixed collision-rate tables of the
// 90% Ar / 10% iC4H10 reference mixture.

mod common;

use approx::assert_relative_eq;
use common::{ar_ibu_engine, AR_EXCITATIONS, AR_ION_POT, IBU_ION_POT};
use swarm_mc::CollisionType;

#[test]
fn test_term_count_and_layout() {
    let mut engine = ar_ibu_engine();
    // Ar: elastic + 1 shell + attachment + 9 excitations,
    // iC4H10: elastic + 1 shell + attachment + 1 vibrational term.
    assert_eq!(engine.n_terms().unwrap(), 16);

    // The first term of each gas block is elastic.
    assert_eq!(engine.level(0).unwrap().kind, CollisionType::Elastic);
    assert_eq!(engine.level(0).unwrap().gas, 0);
    assert_eq!(engine.level(12).unwrap().kind, CollisionType::Elastic);
    assert_eq!(engine.level(12).unwrap().gas, 1);
}

#[test]
fn test_min_ionisation_potential() {
    let mut engine = ar_ibu_engine();
    assert_relative_eq!(
        engine.min_ionisation_potential().unwrap(),
        IBU_ION_POT,
        epsilon = 1e-12
    );

    let tables = engine.rate_tables().unwrap();
    assert_relative_eq!(tables.ion_pot[0], AR_ION_POT, epsilon = 1e-12);
    assert_relative_eq!(tables.ion_pot[1], IBU_ION_POT, epsilon = 1e-12);
}

#[test]
fn test_cumulative_probabilities_are_monotonic() {
    let mut engine = ar_ibu_engine();
    let tables = engine.rate_tables().unwrap();
    for (i_e, row) in tables.cf.iter().enumerate() {
        let mut prev = 0.0;
        for &p in row {
            assert!(
                p >= prev - 1e-12,
                "cumulative probability decreases in bin {}",
                i_e
            );
            prev = p;
        }
        if tables.cf_tot[i_e] > 0.0 {
            assert_relative_eq!(row[row.len() - 1], 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_total_rates_are_positive() {
    let mut engine = ar_ibu_engine();
    let tables = engine.rate_tables().unwrap();
    for (i_e, &rate) in tables.cf_tot.iter().enumerate() {
        assert!(rate > 0.0, "vanishing total rate in bin {}", i_e);
    }
    let null = engine.null_collision_rate().unwrap();
    let max = engine
        .rate_tables()
        .unwrap()
        .cf_tot
        .iter()
        .cloned()
        .fold(0.0, f64::max);
    assert_relative_eq!(null, max);
}

#[test]
fn test_energy_losses_are_non_negative() {
    let mut engine = ar_ibu_engine();
    let n = engine.n_terms().unwrap();
    for i in 0..n {
        let level = engine.level(i).unwrap();
        assert!(
            level.energy_loss >= 0.0,
            "negative energy loss for {}",
            level.description
        );
    }
}

#[test]
fn test_excitation_labels_survive_mixing() {
    let mut engine = ar_ibu_engine();
    let n = engine.n_terms().unwrap();
    let labels: Vec<String> = (0..n)
        .filter(|&i| engine.level(i).unwrap().kind == CollisionType::Excitation)
        .map(|i| engine.level(i).unwrap().label.clone())
        .collect();
    assert_eq!(labels.len(), AR_EXCITATIONS.len());
    for (label, &(token, _, _)) in labels.iter().zip(AR_EXCITATIONS) {
        assert_eq!(label, token);
    }
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut engine = ar_ibu_engine();
    let first: Vec<f64> = engine.rate_tables().unwrap().cf_tot.clone();
    assert!(!engine.is_dirty());

    // Setting the same temperature again marks the tables dirty and
    // forces a rebuild; the result must not change.
    engine.set_temperature(engine.temperature()).unwrap();
    assert!(engine.is_dirty());
    let second = engine.rate_tables().unwrap();
    for (a, b) in first.iter().zip(&second.cf_tot) {
        assert_eq!(a, b);
    }
}

#[test]
fn test_rate_scales_with_pressure() {
    let mut engine = ar_ibu_engine();
    let r1 = engine.electron_collision_rate(5.0).unwrap();
    engine.set_pressure(2.0 * engine.pressure()).unwrap();
    let r2 = engine.electron_collision_rate(5.0).unwrap();
    assert_relative_eq!(r2 / r1, 2.0, epsilon = 1e-9);
}

#[test]
fn test_level_rates_sum_to_total() {
    let mut engine = ar_ibu_engine();
    let n = engine.n_terms().unwrap();
    let total = engine.electron_collision_rate(20.0).unwrap();
    let mut sum = 0.0;
    for i in 0..n {
        sum += engine.level_collision_rate(20.0, i).unwrap();
    }
    assert_relative_eq!(sum, total, epsilon = 1e-9);
}

#[test]
fn test_inelastic_scaling() {
    let mut engine = ar_ibu_engine();
    // The 16th term is the isobutane vibrational level; below the Ar
    // thresholds it carries the whole inelastic rate.
    let base = engine.level_collision_rate(5.0, 15).unwrap();
    engine.set_inelastic_scaling("iC4H10", 2.0).unwrap();
    let scaled = engine.level_collision_rate(5.0, 15).unwrap();
    assert_relative_eq!(scaled / base, 2.0, epsilon = 1e-6);
}
