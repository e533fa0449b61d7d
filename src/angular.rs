//! Angular distribution models for post-collision scattering.

use serde::{Deserialize, Serialize};

/// How the polar scattering angle is sampled for a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScatterModel {
    /// Uniform in the cosine of the polar angle.
    Isotropic,
    /// Forward-peaked distribution with a cutoff angle and a
    /// renormalized forward probability.
    Capped,
    /// Continuous one-parameter model of Okhrimovskyy et al.
    Okhrimovskyy,
}

impl ScatterModel {
    /// Decode the database's integer scattering algorithm tag. Unknown
    /// tags fall back to isotropic.
    pub fn from_tag(tag: i64) -> Self {
        match tag {
            1 => ScatterModel::Capped,
            2 => ScatterModel::Okhrimovskyy,
            _ => ScatterModel::Isotropic,
        }
    }
}

/// Convert a raw angular-distribution fit parameter into a cutoff angle
/// (scaled to [0, 1] by dividing by pi) and a renormalized forward
/// scattering probability.
///
/// Parameters up to 1 need no cutoff and pass through unchanged.
pub fn angular_cut(par_in: f64) -> (f64, f64) {
    if par_in <= 1.0 {
        return (1.0, par_in);
    }
    let cns = par_in - 0.5;
    let theta_c = (2.0 * (cns - cns * cns).sqrt()).asin();
    let fac = (1.0 - theta_c.cos()) / theta_c.sin().powi(2);
    let par_out = cns * fac + 0.5;
    let cut = theta_c * 2.0 / std::f64::consts::PI;
    (cut, par_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_passthrough_below_one() {
        let (cut, par) = angular_cut(0.5);
        assert_eq!(cut, 1.0);
        assert_eq!(par, 0.5);
        let (cut, par) = angular_cut(1.0);
        assert_eq!(cut, 1.0);
        assert_eq!(par, 1.0);
    }

    #[test]
    fn test_cut_applied_above_one() {
        let (cut, par) = angular_cut(1.2);
        assert!(cut < 1.0 && cut > 0.0);
        // The renormalized parameter stays a forward probability.
        assert!(par > 0.5 && par <= 1.0);
    }

    #[test]
    fn test_limit_at_threshold() {
        // Just above 1 the cutoff angle approaches pi
        // (c close to 0.5 gives asin(1) = pi/2 scaled to 1).
        let (cut, _) = angular_cut(1.0 + 1e-9);
        assert!(cut < 1.0);
    }

    #[test]
    fn test_parameter_one_and_a_half() {
        // c = 1 gives thetac = asin(0) with the branch at 0; check the
        // formula stays finite slightly below that point.
        let (cut, par) = angular_cut(1.499);
        assert!(cut.is_finite() && par.is_finite());
    }

    #[test]
    fn test_model_tags() {
        assert_eq!(ScatterModel::from_tag(0), ScatterModel::Isotropic);
        assert_eq!(ScatterModel::from_tag(1), ScatterModel::Capped);
        assert_eq!(ScatterModel::from_tag(2), ScatterModel::Okhrimovskyy);
        assert_eq!(ScatterModel::from_tag(7), ScatterModel::Isotropic);
    }

    #[test]
    fn test_known_value() {
        // For parIn = 1.25, c = 0.75, thetac = asin(2 sqrt(0.1875)).
        let c: f64 = 0.75;
        let thetac = (2.0 * (c - c * c).sqrt()).asin();
        let expected_cut = thetac * 2.0 / std::f64::consts::PI;
        let (cut, _) = angular_cut(1.25);
        assert_relative_eq!(cut, expected_cut, max_relative = 1e-12);
    }
}
