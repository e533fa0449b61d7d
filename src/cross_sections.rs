//! Seam to the external cross-section database.
//!
//! The engine never computes raw cross sections itself. It asks a
//! [`CrossSectionProvider`] for the per-gas tables on a given energy grid
//! and turns them into collision rates. The provider can be backed by a
//! physics database, a file reader, or a synthetic model in tests.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::angular::ScatterModel;
use crate::error::{EngineError, EngineResult};

/// Energy grid on which cross sections are requested. Bin centres sit at
/// `(i + 0.5) * e_step` for `i` in `0..n_steps`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub n_steps: usize,
    pub e_step: f64,
    pub e_final: f64,
}

impl GridSpec {
    pub fn new(n_steps: usize, e_step: f64, e_final: f64) -> Self {
        Self {
            n_steps,
            e_step,
            e_final,
        }
    }
}

/// Classification of an inelastic cross-section term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InelasticKind {
    Excitation,
    Superelastic,
    Inelastic,
}

/// One ionisation shell with its own threshold and splitting parameter.
#[derive(Clone, Debug)]
pub struct IonisationShell {
    /// Threshold energy [eV].
    pub threshold: f64,
    /// Cross section per energy bin [cm^2].
    pub cross_section: Vec<f64>,
    /// Angular distribution fit parameter per energy bin.
    pub parameter: Vec<f64>,
    /// Opal-Beaty splitting parameter [eV].
    pub opal_beaty: f64,
}

/// One inelastic (or excitation/superelastic) cross-section term.
#[derive(Clone, Debug)]
pub struct InelasticTerm {
    /// Energy loss threshold [eV]; negative for superelastic terms.
    pub threshold: f64,
    pub kind: InelasticKind,
    /// Spectroscopic token for excitations with known level identities,
    /// e.g. "1S5" or "2P10" for argon, empty otherwise.
    pub label: String,
    /// Cross section per energy bin [cm^2].
    pub cross_section: Vec<f64>,
    /// Angular distribution fit parameter per energy bin.
    pub parameter: Vec<f64>,
    pub model: ScatterModel,
}

/// Full cross-section payload for one gas on one energy grid.
#[derive(Clone, Debug)]
pub struct GasCrossSections {
    /// Canonical gas name.
    pub name: String,
    /// Mass term `2 m_e / M` of the gas molecule (dimensionless).
    pub mass_term: f64,
    /// Elastic cross section per bin [cm^2].
    pub elastic: Vec<f64>,
    pub elastic_parameter: Vec<f64>,
    pub elastic_model: ScatterModel,
    /// Gross ionisation cross section per bin [cm^2], used when no shell
    /// structure is available.
    pub gross_ionisation: Vec<f64>,
    pub gross_parameter: Vec<f64>,
    /// Gross ionisation threshold [eV].
    pub ionisation_threshold: f64,
    pub ionisation_model: ScatterModel,
    /// Opal-Beaty parameter for the gross ionisation term [eV].
    pub opal_beaty: f64,
    /// Per-shell ionisation data; empty means fall back to the gross term.
    pub shells: Vec<IonisationShell>,
    /// Attachment cross section per bin [cm^2].
    pub attachment: Vec<f64>,
    /// Inelastic terms in database order.
    pub inelastic: Vec<InelasticTerm>,
}

impl GasCrossSections {
    /// Rest-mass scaling factor `r = 1 + m_e/M` used to convert thresholds
    /// into the gas's own scaled units.
    pub fn rgas(&self) -> f64 {
        1.0 + self.mass_term / 2.0
    }
}

/// External source of tabulated cross sections. Must tolerate repeated
/// queries with different (in particular, higher) grid ceilings; the
/// rate-table builder re-queries once per logarithmic bin.
pub trait CrossSectionProvider {
    fn cross_sections(&self, gas: &str, grid: &GridSpec) -> EngineResult<GasCrossSections>;
}

/// Registry of gas names understood by the cross-section database,
/// mapped to their database table numbers.
static GAS_NUMBERS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("CF4", 1);
    m.insert("Ar", 2);
    m.insert("He", 3);
    m.insert("He-3", 4);
    m.insert("Ne", 5);
    m.insert("Kr", 6);
    m.insert("Xe", 7);
    m.insert("CH4", 8);
    m.insert("C2H6", 9);
    m.insert("C3H8", 10);
    m.insert("iC4H10", 11);
    m.insert("CO2", 12);
    m.insert("neoC5H12", 13);
    m.insert("H2O", 14);
    m.insert("O2", 15);
    m.insert("N2", 16);
    m.insert("NO", 17);
    m.insert("N2O", 18);
    m.insert("C2H4", 19);
    m.insert("C2H2", 20);
    m.insert("H2", 21);
    m.insert("D2", 22);
    m.insert("CO", 23);
    m.insert("Methylal", 24);
    m.insert("DME", 25);
    m.insert("C2F6", 29);
    m.insert("SF6", 30);
    m.insert("NH3", 31);
    m.insert("C3H6", 32);
    m.insert("cC3H6", 33);
    m.insert("CH3OH", 34);
    m.insert("C2H5OH", 35);
    m.insert("C3H7OH", 36);
    m.insert("Cs", 37);
    m.insert("F2", 38);
    m.insert("CS2", 39);
    m.insert("COS", 40);
    m.insert("CD4", 41);
    m.insert("BF3", 42);
    m.insert("C2HF5", 43);
    m.insert("CHF3", 50);
    m.insert("CF3Br", 51);
    m.insert("C3F8", 52);
    m.insert("O3", 53);
    m.insert("Hg", 54);
    m.insert("H2S", 55);
    m.insert("nC4H10", 56);
    m.insert("nC5H12", 57);
    m.insert("GeH4", 59);
    m.insert("SiH4", 60);
    m
});

/// Aliases accepted on the user-facing composition API.
static GAS_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("He-4", "He");
    m.insert("helium", "He");
    m.insert("argon", "Ar");
    m.insert("neon", "Ne");
    m.insert("krypton", "Kr");
    m.insert("xenon", "Xe");
    m.insert("methane", "CH4");
    m.insert("ethane", "C2H6");
    m.insert("propane", "C3H8");
    m.insert("isobutane", "iC4H10");
    m.insert("iso", "iC4H10");
    m.insert("acetylene", "C2H2");
    m.insert("nbutane", "nC4H10");
    m.insert("n-butane", "nC4H10");
    m.insert("water", "H2O");
    m.insert("ammonia", "NH3");
    m
});

/// Resolve a user-supplied gas name to its canonical form, or fail if
/// the cross-section database has no entry for it.
pub fn canonical_gas_name(input: &str) -> EngineResult<String> {
    if GAS_NUMBERS.contains_key(input) {
        return Ok(input.to_string());
    }
    if let Some(&canon) = GAS_ALIASES.get(input) {
        return Ok(canon.to_string());
    }
    Err(EngineError::UnknownGas(input.to_string()))
}

/// Database table number for a canonical gas name.
pub fn gas_number(name: &str) -> EngineResult<u32> {
    GAS_NUMBERS
        .get(name)
        .copied()
        .ok_or_else(|| EngineError::UnknownGas(name.to_string()))
}
