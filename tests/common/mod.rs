// Shared synthetic cross-section and photoabsorption data for the
// integration tests: an argon-like noble gas with identified excitation
// levels, an isobutane-like quencher and a neon-like gas without
// de-excitation channel data.

#![allow(dead_code)]

use swarm_mc::{
    CollisionEngine, CrossSectionProvider, EngineError, EngineResult, GasCrossSections, GridSpec,
    InelasticKind, InelasticTerm, IonisationShell, OpticalData, ScatterModel, ELECTRON_MASS,
};

pub const AR_ION_POT: f64 = 15.76;
pub const IBU_ION_POT: f64 = 10.67;

/// Argon excitation levels used by the fixture: token, threshold [eV]
/// and cross-section magnitude [cm2].
pub const AR_EXCITATIONS: &[(&str, f64, f64)] = &[
    ("1S5", 11.548, 2.0e-18),
    ("1S4", 11.624, 1.6e-18),
    ("1S3", 11.723, 4.0e-19),
    ("1S2", 11.828, 1.2e-18),
    ("2P10", 12.907, 8.0e-19),
    ("2P5", 13.273, 6.0e-19),
    ("2P1", 13.480, 9.0e-19),
    ("2S5", 14.071, 2.0e-19),
    ("HIGH", 15.30, 5.0e-19),
];

pub struct TestProvider;

fn bin_energy(grid: &GridSpec, i: usize) -> f64 {
    (i as f64 + 0.5) * grid.e_step
}

/// Cross section rising from a threshold as `m (1 - thr/e)`.
fn shaped(grid: &GridSpec, threshold: f64, magnitude: f64) -> Vec<f64> {
    (0..grid.n_steps)
        .map(|i| {
            let e = bin_energy(grid, i);
            if e <= threshold {
                0.0
            } else {
                magnitude * (1.0 - threshold / e)
            }
        })
        .collect()
}

fn argon(grid: &GridSpec) -> GasCrossSections {
    let n = grid.n_steps;
    let elastic = (0..n)
        .map(|i| 6.0e-16 / (1.0 + 0.05 * bin_energy(grid, i)))
        .collect();
    let inelastic = AR_EXCITATIONS
        .iter()
        .map(|&(label, threshold, magnitude)| InelasticTerm {
            threshold,
            kind: InelasticKind::Excitation,
            label: label.to_string(),
            cross_section: shaped(grid, threshold, magnitude),
            parameter: vec![0.5; n],
            model: ScatterModel::Isotropic,
        })
        .collect();
    GasCrossSections {
        name: "Ar".into(),
        mass_term: 2.0 * ELECTRON_MASS / (39.948 * 931.494_028e6),
        elastic,
        elastic_parameter: vec![0.3; n],
        elastic_model: ScatterModel::Okhrimovskyy,
        gross_ionisation: vec![0.0; n],
        gross_parameter: vec![0.5; n],
        ionisation_threshold: AR_ION_POT,
        ionisation_model: ScatterModel::Isotropic,
        opal_beaty: 15.0,
        shells: vec![IonisationShell {
            threshold: AR_ION_POT,
            cross_section: shaped(grid, AR_ION_POT, 2.5e-16),
            parameter: vec![0.5; n],
            opal_beaty: 15.0,
        }],
        attachment: vec![0.0; n],
        inelastic,
    }
}

fn isobutane(grid: &GridSpec) -> GasCrossSections {
    let n = grid.n_steps;
    let elastic = (0..n)
        .map(|i| 1.2e-15 / (1.0 + 0.02 * bin_energy(grid, i)))
        .collect();
    GasCrossSections {
        name: "iC4H10".into(),
        mass_term: 2.0 * ELECTRON_MASS / (58.123 * 931.494_028e6),
        elastic,
        elastic_parameter: vec![0.5; n],
        elastic_model: ScatterModel::Isotropic,
        gross_ionisation: vec![0.0; n],
        gross_parameter: vec![0.5; n],
        ionisation_threshold: IBU_ION_POT,
        ionisation_model: ScatterModel::Isotropic,
        opal_beaty: 7.0,
        shells: vec![IonisationShell {
            threshold: IBU_ION_POT,
            cross_section: shaped(grid, IBU_ION_POT, 4.0e-16),
            parameter: vec![0.5; n],
            opal_beaty: 7.0,
        }],
        attachment: vec![5.0e-19; n],
        inelastic: vec![InelasticTerm {
            threshold: 0.52,
            kind: InelasticKind::Inelastic,
            label: String::new(),
            cross_section: shaped(grid, 0.52, 8.0e-17),
            parameter: vec![0.5; n],
            model: ScatterModel::Isotropic,
        }],
    }
}

fn neon(grid: &GridSpec) -> GasCrossSections {
    let n = grid.n_steps;
    GasCrossSections {
        name: "Ne".into(),
        mass_term: 2.0 * ELECTRON_MASS / (20.180 * 931.494_028e6),
        elastic: vec![2.0e-16; n],
        elastic_parameter: vec![0.5; n],
        elastic_model: ScatterModel::Isotropic,
        gross_ionisation: vec![0.0; n],
        gross_parameter: vec![0.5; n],
        ionisation_threshold: 21.56,
        ionisation_model: ScatterModel::Isotropic,
        opal_beaty: 20.0,
        shells: vec![IonisationShell {
            threshold: 21.56,
            cross_section: shaped(grid, 21.56, 1.5e-16),
            parameter: vec![0.5; n],
            opal_beaty: 20.0,
        }],
        attachment: vec![0.0; n],
        inelastic: vec![InelasticTerm {
            threshold: 16.62,
            kind: InelasticKind::Excitation,
            label: "1S5".to_string(),
            cross_section: shaped(grid, 16.62, 1.0e-19),
            parameter: vec![0.5; n],
            model: ScatterModel::Isotropic,
        }],
    }
}

impl CrossSectionProvider for TestProvider {
    fn cross_sections(&self, gas: &str, grid: &GridSpec) -> EngineResult<GasCrossSections> {
        match gas {
            "Ar" => Ok(argon(grid)),
            "iC4H10" => Ok(isobutane(grid)),
            "Ne" => Ok(neon(grid)),
            other => Err(EngineError::CrossSectionData(format!(
                "no table for {}",
                other
            ))),
        }
    }
}

pub struct TestOptical;

impl OpticalData for TestOptical {
    fn photoabsorption(&self, gas: &str, energy: f64) -> Option<(f64, f64)> {
        match gas {
            "Ar" => {
                if energy > AR_ION_POT {
                    Some((3.5e-17, 1.0))
                } else {
                    Some((8.0e-19, 0.0))
                }
            }
            "nC4H10" | "iC4H10" => {
                if energy > IBU_ION_POT {
                    Some((5.0e-17, 0.9))
                } else {
                    Some((2.0e-17, 0.0))
                }
            }
            "Ne" => {
                if energy > 21.56 {
                    Some((1.5e-17, 1.0))
                } else {
                    Some((1.0e-19, 0.0))
                }
            }
            _ => None,
        }
    }

    fn is_available(&self, gas: &str) -> bool {
        matches!(gas, "Ar" | "nC4H10" | "iC4H10" | "Ne")
    }
}

/// The 90% Ar / 10% iC4H10 mixture at 1 atm and room temperature.
pub fn ar_ibu_engine() -> CollisionEngine<TestProvider, TestOptical> {
    CollisionEngine::new(TestProvider, TestOptical, &["Ar", "iC4H10"], &[0.9, 0.1]).unwrap()
}

pub fn pure_ar_engine() -> CollisionEngine<TestProvider, TestOptical> {
    CollisionEngine::new(TestProvider, TestOptical, &["Ar"], &[1.0]).unwrap()
}
