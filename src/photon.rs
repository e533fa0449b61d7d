//! Photon collision-rate table and absorption line profiles.
//!
//! Continuum photoabsorption rates are tabulated on a linear photon
//! energy grid from the optical database. On top of the continuum,
//! resonant levels of the de-excitation arena carry discrete absorption
//! lines with Doppler and resonance (pressure) broadening, truncated at
//! an adjustable number of Voigt widths from the line centre.

use tracing::{debug, warn};

use crate::constants::{
    number_density, BOLTZMANN, ELECTRON_MASS, FINE_STRUCTURE, HBAR_C, N_ENERGY_STEPS_GAMMA,
    SMALL, SPEED_OF_LIGHT,
};
use crate::deexcitation::DxcTable;
use crate::error::{EngineError, EngineResult};
use crate::optical::OpticalData;
use crate::products::{PhotonCollisionType, N_CS_TYPES_GAMMA};

/// Continuum photon collision rates. `cf_gamma` holds cumulative (not
/// normalized) rates per bin; `cs_type_gamma` encodes, per term, the
/// owning gas and the collision type.
pub struct PhotonTables {
    pub e_final_gamma: f64,
    pub e_step_gamma: f64,
    pub cf_tot_gamma: Vec<f64>,
    pub cf_gamma: Vec<Vec<f64>>,
    pub cs_type_gamma: Vec<usize>,
}

impl PhotonTables {
    pub(crate) fn decode(&self, term: usize) -> (usize, PhotonCollisionType) {
        let code = self.cs_type_gamma[term];
        (
            code / N_CS_TYPES_GAMMA,
            PhotonCollisionType::from_index(code % N_CS_TYPES_GAMMA),
        )
    }
}

/// Build the continuum table and, if a de-excitation arena is given,
/// fill in the absorption line parameters of its resonant levels.
pub(crate) fn build_photon_table<O: OpticalData>(
    gases: &[String],
    fractions: &[f64],
    temperature: f64,
    pressure: f64,
    e_final_gamma: f64,
    rgas: &[f64],
    line_cut: f64,
    deexcitation: Option<&mut DxcTable>,
    optical: &O,
) -> EngineResult<PhotonTables> {
    let dens = number_density(temperature, pressure);
    let e_step_gamma = e_final_gamma / N_ENERGY_STEPS_GAMMA as f64;

    let mut cf_tot_gamma = vec![0.0; N_ENERGY_STEPS_GAMMA];
    let mut cf_gamma: Vec<Vec<f64>> = vec![Vec::new(); N_ENERGY_STEPS_GAMMA];
    let mut cs_type_gamma: Vec<usize> = Vec::new();

    for (i, gas) in gases.iter().enumerate() {
        let prefactor = dens * SPEED_OF_LIGHT * fractions[i];
        // Isobutane is absent from the optical database; fall back to
        // the n-butane cross-section.
        let gasname = if gas == "iC4H10" {
            debug!("no photoabsorption data for iC4H10, using nC4H10");
            "nC4H10"
        } else {
            gas.as_str()
        };
        if !optical.is_available(gasname) {
            return Err(EngineError::OpticalData(gas.clone()));
        }
        cs_type_gamma.push(i * N_CS_TYPES_GAMMA + PhotonCollisionType::Ionisation.index());
        cs_type_gamma.push(i * N_CS_TYPES_GAMMA + PhotonCollisionType::Inelastic.index());
        for (j, row) in cf_gamma.iter_mut().enumerate() {
            let energy = (j as f64 + 0.5) * e_step_gamma;
            let (cs, eta) = optical.photoabsorption(gasname, energy).unwrap_or((0.0, 0.0));
            cf_tot_gamma[j] += cs * prefactor;
            // Ionising and non-ionising absorption.
            row.push(cs * prefactor * eta);
            row.push(cs * prefactor * (1.0 - eta));
        }
    }

    // Cumulative rates.
    for row in &mut cf_gamma {
        for i in 1..row.len() {
            row[i] += row[i - 1];
        }
    }

    if let Some(dxc) = deexcitation {
        // Conversion factor from oscillator strength to cross-section.
        let f2cs =
            FINE_STRUCTURE * 2.0 * std::f64::consts::PI.powi(2) * HBAR_C * HBAR_C / ELECTRON_MASS;
        let k_res_broad = 1.92 * std::f64::consts::PI * (1.0f64 / 3.0).sqrt();
        let mut n_resonance_lines = 0;
        for level in &mut dxc.levels {
            if level.osc < SMALL {
                continue;
            }
            let prefactor = dens * SPEED_OF_LIGHT * fractions[level.gas];
            level.cf = prefactor * f2cs * level.osc;
            // Doppler broadening.
            let mgas = ELECTRON_MASS / (rgas[level.gas] - 1.0);
            let w_doppler = (BOLTZMANN * temperature / mgas).sqrt();
            level.s_doppler = w_doppler * level.energy;
            // Resonance broadening, Ali and Griem, Phys. Rev. 140, 1044.
            level.g_pressure = k_res_broad * FINE_STRUCTURE * HBAR_C.powi(3) * level.osc * dens
                * fractions[level.gas]
                / (ELECTRON_MASS * level.energy);
            // Truncation width from the Voigt FWHM approximation of
            // Olivero and Longbothum, J. Quant. Spectr. Rad. Trans. 17, 233.
            let fwhm_gauss = level.s_doppler * (2.0 * 2.0f64.ln()).sqrt();
            let fwhm_lorentz = level.g_pressure;
            let fwhm_voigt = 0.5
                * (1.0692 * fwhm_lorentz
                    + (0.86639 * fwhm_lorentz * fwhm_lorentz + 4.0 * fwhm_gauss * fwhm_gauss)
                        .sqrt());
            level.width = line_cut * fwhm_voigt;
            n_resonance_lines += 1;
        }
        if n_resonance_lines == 0 {
            warn!("no resonance lines found in the de-excitation table");
        }
    }

    Ok(PhotonTables {
        e_final_gamma,
        e_step_gamma,
        cf_tot_gamma,
        cf_gamma,
        cs_type_gamma,
    })
}

#[derive(Clone, Copy)]
struct Complex {
    re: f64,
    im: f64,
}

impl Complex {
    fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn mul(self, o: Complex) -> Complex {
        Complex::new(
            self.re * o.re - self.im * o.im,
            self.re * o.im + self.im * o.re,
        )
    }

    fn add_re(self, r: f64) -> Complex {
        Complex::new(self.re + r, self.im)
    }

    fn scale(self, r: f64) -> Complex {
        Complex::new(self.re * r, self.im * r)
    }

    fn div(self, o: Complex) -> Complex {
        let d = o.re * o.re + o.im * o.im;
        Complex::new(
            (self.re * o.re + self.im * o.im) / d,
            (self.im * o.re - self.re * o.im) / d,
        )
    }

    fn sub(self, o: Complex) -> Complex {
        Complex::new(self.re - o.re, self.im - o.im)
    }

    fn exp(self) -> Complex {
        let r = self.re.exp();
        Complex::new(r * self.im.cos(), r * self.im.sin())
    }
}

/// Real part of the Faddeeva function w(x + iy) for y >= 0, using the
/// rational approximations of Humlicek, J. Quant. Spectr. Rad. Trans.
/// 27 (1982), 437.
fn faddeeva_re(x: f64, y: f64) -> f64 {
    let t = Complex::new(y, -x);
    let s = x.abs() + y;
    let w = if s >= 15.0 {
        // Region I.
        t.scale(0.5641896).div(t.mul(t).add_re(0.5))
    } else if s >= 5.5 {
        // Region II.
        let u = t.mul(t);
        t.mul(u.scale(0.5641896).add_re(1.410474))
            .div(u.mul(u.add_re(3.0)).add_re(0.75))
    } else if y >= 0.195 * x.abs() - 0.176 {
        // Region III.
        let num = t
            .scale(0.5642236)
            .add_re(3.778987)
            .mul(t)
            .add_re(11.96482)
            .mul(t)
            .add_re(20.20933)
            .mul(t)
            .add_re(16.4955);
        let den = t
            .add_re(6.699398)
            .mul(t)
            .add_re(21.69274)
            .mul(t)
            .add_re(39.27121)
            .mul(t)
            .add_re(38.82363)
            .mul(t)
            .add_re(16.4955);
        num.div(den)
    } else {
        // Region IV.
        let u = t.mul(t);
        let num = t.mul(
            u.scale(-0.56419)
                .add_re(1.320522)
                .mul(u)
                .scale(-1.0)
                .add_re(35.76683)
                .mul(u)
                .scale(-1.0)
                .add_re(219.0313)
                .mul(u)
                .scale(-1.0)
                .add_re(1540.787)
                .mul(u)
                .scale(-1.0)
                .add_re(3321.9905)
                .mul(u)
                .scale(-1.0)
                .add_re(36183.31),
        );
        let den = u
            .scale(-1.0)
            .add_re(1.841439)
            .mul(u)
            .scale(-1.0)
            .add_re(61.57037)
            .mul(u)
            .scale(-1.0)
            .add_re(364.2191)
            .mul(u)
            .scale(-1.0)
            .add_re(2186.181)
            .mul(u)
            .scale(-1.0)
            .add_re(9022.228)
            .mul(u)
            .scale(-1.0)
            .add_re(24322.84)
            .mul(u)
            .scale(-1.0)
            .add_re(32066.6);
        u.exp().sub(num.div(den))
    };
    w.re
}

/// Voigt profile, normalized to unit area. `sigma` is the Gaussian
/// standard deviation and `lg` the full width at half maximum of the
/// Lorentzian component.
pub fn voigt(x: f64, sigma: f64, lg: f64) -> f64 {
    use std::f64::consts::PI;
    if sigma <= 0.0 {
        let hwhm = 0.5 * lg;
        if hwhm <= 0.0 {
            return 0.0;
        }
        return hwhm / (PI * (x * x + hwhm * hwhm));
    }
    let inv = 1.0 / (sigma * std::f64::consts::SQRT_2);
    faddeeva_re(x * inv, 0.5 * lg * inv) / (sigma * (2.0 * PI).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_voigt_pure_gaussian_limit() {
        // With a vanishing Lorentzian width the profile approaches a
        // Gaussian.
        let sigma = 0.3;
        let g = |x: f64| (-0.5 * x * x / (sigma * sigma)).exp()
            / (sigma * (2.0 * std::f64::consts::PI).sqrt());
        for x in [0.0, 0.1, 0.5, 1.0] {
            assert_relative_eq!(voigt(x, sigma, 1e-12), g(x), max_relative = 1e-4);
        }
    }

    #[test]
    fn test_voigt_pure_lorentzian() {
        let hwhm = 0.2;
        let l = |x: f64| hwhm / (std::f64::consts::PI * (x * x + hwhm * hwhm));
        for x in [0.0, 0.05, 0.4, 2.0] {
            assert_relative_eq!(voigt(x, 0.0, 2.0 * hwhm), l(x), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_voigt_symmetric_and_decreasing() {
        let v0 = voigt(0.0, 0.1, 0.05);
        let mut prev = v0;
        for i in 1..20 {
            let x = 0.05 * i as f64;
            let v = voigt(x, 0.1, 0.05);
            assert_relative_eq!(v, voigt(-x, 0.1, 0.05), max_relative = 1e-12);
            assert!(v < prev);
            prev = v;
        }
    }

    #[test]
    fn test_voigt_normalization() {
        // Trapezoidal integral over a wide window should be close to 1.
        let sigma = 0.2;
        let lg = 0.1;
        let n = 20000;
        let half = 50.0;
        let step = 2.0 * half / n as f64;
        let mut sum = 0.0;
        for i in 0..=n {
            let x = -half + i as f64 * step;
            let w = if i == 0 || i == n { 0.5 } else { 1.0 };
            sum += w * voigt(x, sigma, lg) * step;
        }
        assert!((sum - 1.0).abs() < 0.02, "integral = {}", sum);
    }
}
