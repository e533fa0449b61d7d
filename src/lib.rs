//! Electron and photon collision-rate engine for microscopic Monte
//! Carlo transport in gas mixtures.
//!
//! The [`CollisionEngine`] turns tabulated cross sections, obtained
//! through the [`CrossSectionProvider`] seam, into collision-rate
//! tables for a gas mixture at a given temperature and pressure, and
//! samples individual electron and photon collisions from them. For
//! argon-based mixtures an optional de-excitation cascade resolves
//! excitation energy into VUV photons and Penning electrons.

mod angular;
mod argon;
mod constants;
mod cross_sections;
mod deexcitation;
mod engine;
mod error;
mod level;
mod mixer;
mod optical;
mod photon;
mod products;
mod rng;
mod split;

pub use angular::{angular_cut, ScatterModel};
pub use constants::{
    number_density, ATMOSPHERIC_PRESSURE, BOLTZMANN, ELECTRON_MASS, LOSCHMIDT, SMALL,
    SPEED_OF_LIGHT, ZERO_CELSIUS,
};
pub use cross_sections::{
    canonical_gas_name, gas_number, CrossSectionProvider, GasCrossSections, GridSpec,
    InelasticKind, InelasticTerm, IonisationShell,
};
pub use deexcitation::{DeexcitationFits, DxcChannel, DxcChannelKind, DxcLevel, DxcTable};
pub use engine::{CollisionEngine, TableState};
pub use error::{EngineError, EngineResult};
pub use level::{CollisionType, Level, N_CS_TYPES};
pub use mixer::RateTables;
pub use optical::OpticalData;
pub use photon::{voigt, PhotonTables};
pub use products::{
    CollisionProduct, ElectronCollision, PhotonCollision, PhotonCollisionType, ProductKind,
    N_CS_TYPES_GAMMA,
};
pub use rng::{random_voigt, uniform_pos, FastRng};
pub use split::{
    sample_flat, sample_green_sawada, sample_opal_beaty, GreenSawadaParams, SplittingFunction,
};
