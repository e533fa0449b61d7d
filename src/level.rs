//! Scattering terms ("levels") of the mixed collision-rate table.

use crate::angular::ScatterModel;

/// Collision type of a scattering term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionType {
    Elastic,
    Ionisation,
    Attachment,
    Inelastic,
    Excitation,
    Superelastic,
}

/// Number of electron collision types (array size for counters).
pub const N_CS_TYPES: usize = 6;

impl CollisionType {
    pub fn index(self) -> usize {
        match self {
            CollisionType::Elastic => 0,
            CollisionType::Ionisation => 1,
            CollisionType::Attachment => 2,
            CollisionType::Inelastic => 3,
            CollisionType::Excitation => 4,
            CollisionType::Superelastic => 5,
        }
    }
}

/// One scattering term: a (gas, process) pair with its threshold and
/// angular model. Terms are created once during mixing and indexed
/// contiguously in the order elastic, ionisation, attachment, inelastic,
/// per gas, gases in mixture order.
#[derive(Clone, Debug)]
pub struct Level {
    /// Index of the owning gas in the mixture.
    pub gas: usize,
    pub kind: CollisionType,
    /// Energy loss threshold in the gas's rest-mass-scaled units
    /// (divide-by-rgas applied); multiply by rgas for eV.
    pub energy_loss: f64,
    pub model: ScatterModel,
    /// Opal-Beaty splitting parameter [eV] (ionising terms).
    pub opal_beaty_w: f64,
    /// Physical description of the process.
    pub description: String,
    /// Spectroscopic token for identified excitations, empty otherwise.
    pub label: String,
    /// Index into the de-excitation level arena, if this excitation is
    /// part of a modeled cascade.
    pub deexcitation: Option<usize>,
    /// Penning transfer probability for this level.
    pub penning_r: f64,
    /// Radius of the sphere in which Penning electrons are displaced [cm].
    pub penning_lambda: f64,
}

impl Level {
    pub(crate) fn new(gas: usize, kind: CollisionType, energy_loss: f64) -> Self {
        Self {
            gas,
            kind,
            energy_loss,
            model: ScatterModel::Isotropic,
            opal_beaty_w: 1.0,
            description: String::new(),
            label: String::new(),
            deexcitation: None,
            penning_r: 0.0,
            penning_lambda: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_indices_are_distinct() {
        let all = [
            CollisionType::Elastic,
            CollisionType::Ionisation,
            CollisionType::Attachment,
            CollisionType::Inelastic,
            CollisionType::Excitation,
            CollisionType::Superelastic,
        ];
        let mut seen = [false; N_CS_TYPES];
        for t in all {
            assert!(!seen[t.index()]);
            seen[t.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
