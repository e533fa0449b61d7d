// Physical constants in the eV-cm-ns unit system used throughout the
// engine. Masses are expressed as rest energies [eV], velocities as
// multiples of the speed of light times SPEED_OF_LIGHT [cm/ns].

/// Speed of light [cm/ns].
pub const SPEED_OF_LIGHT: f64 = 29.9792458;
/// Electron rest energy [eV].
pub const ELECTRON_MASS: f64 = 510_998.91;
/// Fine structure constant.
pub const FINE_STRUCTURE: f64 = 7.297_352_537_6e-3;
/// Reduced Planck constant times speed of light [eV cm].
pub const HBAR_C: f64 = 197.326_963_1e-7;
/// Boltzmann constant [eV/K].
pub const BOLTZMANN: f64 = 8.617_343e-5;
/// Rydberg energy [eV].
pub const RYDBERG: f64 = 13.605_692_3;
/// Bohr radius [cm].
pub const BOHR_RADIUS: f64 = 0.529_177_208_59e-8;
/// Atomic mass unit [eV].
pub const ATOMIC_MASS_EV: f64 = 931.494_028e6;
/// Number density of an ideal gas at 0 C, 1 atm [cm^-3].
pub const LOSCHMIDT: f64 = 2.686_777e19;
/// Zero degrees Celsius [K].
pub const ZERO_CELSIUS: f64 = 273.15;
/// Standard atmospheric pressure [Torr].
pub const ATMOSPHERIC_PRESSURE: f64 = 760.0;

/// Guard value for quantities that must stay positive.
pub const SMALL: f64 = 1e-20;

/// Number of bins in the linear electron energy grid.
pub const N_ENERGY_STEPS: usize = 4000;
/// Number of bins in the logarithmic electron energy grid.
pub const N_ENERGY_STEPS_LOG: usize = 200;
/// Number of bins in the photon energy grid.
pub const N_ENERGY_STEPS_GAMMA: usize = 5000;
/// Hard ceiling on the number of scattering terms in a mixture.
pub const N_MAX_LEVELS: usize = 512;

/// Gas number density [cm^-3] from the ideal gas law, with the
/// temperature in K and the pressure in Torr.
pub fn number_density(temperature: f64, pressure: f64) -> f64 {
    LOSCHMIDT * (pressure / ATMOSPHERIC_PRESSURE) * (ZERO_CELSIUS / temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_number_density_stp() {
        assert_relative_eq!(number_density(ZERO_CELSIUS, 760.0), LOSCHMIDT);
    }

    #[test]
    fn test_number_density_room_temperature() {
        // 1 atm at 293.15 K is about 2.5e19 molecules per cm3.
        let n = number_density(293.15, 760.0);
        assert!(n > 2.4e19 && n < 2.6e19);
    }
}
