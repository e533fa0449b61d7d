//! Transient per-collision output records.

use crate::level::CollisionType;

/// Kind of secondary particle created in a collision or cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductKind {
    Electron,
    Ion,
    Photon,
}

/// One secondary particle. Cleared and rebuilt on every sampling call;
/// consumed immediately by the caller.
#[derive(Clone, Copy, Debug)]
pub struct CollisionProduct {
    pub kind: ProductKind,
    /// Kinetic energy [eV].
    pub energy: f64,
    /// Delay relative to the primary collision [ns].
    pub delay: f64,
    /// Radial displacement from the collision point [cm].
    pub offset: f64,
}

impl CollisionProduct {
    pub(crate) fn new(kind: ProductKind, energy: f64) -> Self {
        Self {
            kind,
            energy,
            delay: 0.0,
            offset: 0.0,
        }
    }
}

/// Outcome of one sampled electron collision. Secondary particles are
/// available from the engine's product buffers until the next call.
#[derive(Clone, Copy, Debug)]
pub struct ElectronCollision {
    pub kind: CollisionType,
    /// Index of the sampled scattering term.
    pub level: usize,
    /// Post-collision electron energy [eV].
    pub energy: f64,
    /// Number of entries in the ionisation product buffer.
    pub n_ionisation_products: usize,
    /// Number of entries in the de-excitation product buffer.
    pub n_deexcitation_products: usize,
}

/// Photon collision types (array size for counters).
pub const N_CS_TYPES_GAMMA: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotonCollisionType {
    Elastic,
    Ionisation,
    Inelastic,
    Excitation,
}

impl PhotonCollisionType {
    pub fn index(self) -> usize {
        match self {
            PhotonCollisionType::Elastic => 0,
            PhotonCollisionType::Ionisation => 1,
            PhotonCollisionType::Inelastic => 2,
            PhotonCollisionType::Excitation => 3,
        }
    }

    pub(crate) fn from_index(i: usize) -> Self {
        match i {
            1 => PhotonCollisionType::Ionisation,
            2 => PhotonCollisionType::Inelastic,
            3 => PhotonCollisionType::Excitation,
            _ => PhotonCollisionType::Elastic,
        }
    }
}

/// Outcome of one sampled photon collision.
#[derive(Clone, Copy, Debug)]
pub struct PhotonCollision {
    pub kind: PhotonCollisionType,
    /// Index of the sampled photon term (0 for line absorption).
    pub level: usize,
    /// Photon energy after the collision [eV] (0 when absorbed).
    pub energy: f64,
    /// Cosine of the scattering angle.
    pub ctheta: f64,
    /// Photoelectron energy for ionising absorption [eV].
    pub secondary: Option<f64>,
    /// Number of entries in the de-excitation product buffer.
    pub n_deexcitation_products: usize,
}
