//! Seam to the external photoabsorption database.

/// Source of photoabsorption cross sections and photoionisation yields.
/// Implementations are expected to answer queries for any photon energy
/// within the table range; `None` marks energies (or gases) without
/// data.
pub trait OpticalData {
    /// Photoabsorption cross section [cm^2] and photoionisation yield
    /// at the given photon energy [eV].
    fn photoabsorption(&self, gas: &str, energy: f64) -> Option<(f64, f64)>;

    /// Whether the database has any data for this gas.
    fn is_available(&self, gas: &str) -> bool;
}
