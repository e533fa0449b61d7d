//! Construction of the electron collision-rate tables for a gas mixture.
//!
//! The mixer queries the cross-section provider for every gas in the
//! mixture, converts cross sections into collision rates using the gas
//! number density, and lays the resulting scattering terms out in a
//! contiguous table: elastic, ionisation, attachment, then the inelastic
//! terms, gas by gas. Rates are tabulated on a linear grid up to
//! `min(e_final, e_high)` and, if the ceiling exceeds `e_high`, on an
//! additional logarithmic grid re-queried bin by bin.

use tracing::{debug, warn};

use crate::angular::{angular_cut, ScatterModel};
use crate::constants::{
    number_density, ELECTRON_MASS, N_ENERGY_STEPS, N_ENERGY_STEPS_LOG, N_MAX_LEVELS,
    SPEED_OF_LIGHT,
};
use crate::cross_sections::{CrossSectionProvider, GasCrossSections, GridSpec, InelasticKind};
use crate::error::{EngineError, EngineResult};
use crate::level::{CollisionType, Level};
use crate::split::GreenSawadaParams;

/// Inputs to the mixing step, assembled by the engine from its settings.
pub(crate) struct MixConfig<'a> {
    pub gases: &'a [String],
    pub fractions: &'a [f64],
    /// Temperature [K].
    pub temperature: f64,
    /// Pressure [Torr].
    pub pressure: f64,
    /// Upper limit of the electron energy range [eV].
    pub e_final: f64,
    /// Crossover energy between the linear and logarithmic grid [eV].
    pub e_high: f64,
    /// Multiplier applied to the inelastic cross sections, per gas.
    pub scale_inelastic: &'a [f64],
}

/// Mixed collision-rate tables. `cf` holds, per linear energy bin, the
/// cumulative normalized collision probabilities over all scattering
/// terms; `cf_tot` the total rate [ns^-1]. The `_log` variants cover the
/// high-energy logarithmic grid, with `cf_tot_log` stored as a logarithm
/// for log-log interpolation.
pub struct RateTables {
    pub e_final: f64,
    pub e_high: f64,
    /// Width of one linear energy bin [eV].
    pub e_step: f64,
    /// Logarithmic bin width, `ln((e_final / e_high)^(1/n_log))`.
    pub ln_step: f64,
    pub levels: Vec<Level>,
    pub cf_tot: Vec<f64>,
    pub cf: Vec<Vec<f64>>,
    pub scat_parameter: Vec<Vec<f64>>,
    pub scat_cut: Vec<Vec<f64>>,
    pub cf_tot_log: Vec<f64>,
    pub cf_log: Vec<Vec<f64>>,
    pub scat_parameter_log: Vec<Vec<f64>>,
    pub scat_cut_log: Vec<Vec<f64>>,
    /// Largest total rate over both grids, used as null-collision rate.
    pub cf_null: f64,
    /// Rest-mass scaling factor per gas.
    pub rgas: Vec<f64>,
    /// Ionisation potential per gas [eV], negative if not in range.
    pub ion_pot: Vec<f64>,
    /// Smallest ionisation potential in the mixture [eV], negative if none.
    pub min_ion_pot: f64,
    pub green_sawada: Vec<GreenSawadaParams>,
}

impl RateTables {
    pub fn n_terms(&self) -> usize {
        self.levels.len()
    }

    /// Whether the high-energy logarithmic grid is in use.
    pub fn use_log_grid(&self) -> bool {
        self.e_final > self.e_high
    }
}

/// One scattering term's value and angular data at a single energy bin,
/// in table order.
struct TermSample {
    cs: f64,
    model: ScatterModel,
    parameter: f64,
}

/// Collect the per-bin cross sections of one gas in the fixed term
/// order. `layout` is the payload from the initial linear-grid query and
/// fixes which ionisation channels exist; `payload` supplies the values
/// (it differs from `layout` on the logarithmic grid).
fn ordered_terms(
    layout: &GasCrossSections,
    payload: &GasCrossSections,
    i_e: usize,
    e_ceiling: f64,
    scale_inelastic: f64,
) -> Vec<TermSample> {
    let mut out = Vec::with_capacity(2 + layout.shells.len() + layout.inelastic.len());
    out.push(TermSample {
        cs: payload.elastic[i_e],
        model: layout.elastic_model,
        parameter: payload.elastic_parameter[i_e],
    });
    if !layout.shells.is_empty() {
        for (j, shell) in layout.shells.iter().enumerate() {
            if e_ceiling < shell.threshold {
                continue;
            }
            out.push(TermSample {
                cs: payload.shells[j].cross_section[i_e],
                model: layout.ionisation_model,
                parameter: payload.shells[j].parameter[i_e],
            });
        }
    } else if e_ceiling >= layout.ionisation_threshold {
        out.push(TermSample {
            cs: payload.gross_ionisation[i_e],
            model: layout.ionisation_model,
            parameter: payload.gross_parameter[i_e],
        });
    }
    out.push(TermSample {
        cs: payload.attachment[i_e],
        model: ScatterModel::Isotropic,
        parameter: 0.5,
    });
    for (j, term) in layout.inelastic.iter().enumerate() {
        out.push(TermSample {
            cs: payload.inelastic[j].cross_section[i_e] * scale_inelastic,
            model: term.model,
            parameter: payload.inelastic[j].parameter[i_e],
        });
    }
    out
}

/// Angular-distribution table entries (cut, parameter) for one term at
/// one energy bin.
fn angular_entries(model: ScatterModel, parameter: f64) -> (f64, f64) {
    match model {
        ScatterModel::Isotropic => (1.0, 0.5),
        ScatterModel::Capped => angular_cut(parameter),
        ScatterModel::Okhrimovskyy => (1.0, parameter),
    }
}

/// Build the scattering terms of one gas from its linear-grid payload.
fn build_levels(gcs: &GasCrossSections, i_gas: usize, e_ceiling: f64) -> Vec<Level> {
    let r = gcs.rgas();
    let mut levels = Vec::new();

    let mut elastic = Level::new(i_gas, CollisionType::Elastic, 0.0);
    elastic.model = gcs.elastic_model;
    elastic.description = format!("{} elastic", gcs.name);
    levels.push(elastic);

    if !gcs.shells.is_empty() {
        for shell in &gcs.shells {
            if e_ceiling < shell.threshold {
                continue;
            }
            let mut lvl = Level::new(i_gas, CollisionType::Ionisation, shell.threshold / r);
            lvl.model = gcs.ionisation_model;
            lvl.opal_beaty_w = shell.opal_beaty;
            // Splitting parameters for the methane K-shell and valence
            // shells from Opal, Beaty and Peterson.
            if gcs.name == "CH4" {
                if (shell.threshold - 21.0).abs() < 0.1 {
                    lvl.opal_beaty_w = 14.0;
                } else if (shell.threshold - 291.0).abs() < 0.1 {
                    lvl.opal_beaty_w = 200.0;
                }
            }
            lvl.description = format!("{} ionisation ({:.2} eV)", gcs.name, shell.threshold);
            levels.push(lvl);
        }
    } else if e_ceiling >= gcs.ionisation_threshold {
        let mut lvl = Level::new(
            i_gas,
            CollisionType::Ionisation,
            gcs.ionisation_threshold / r,
        );
        lvl.model = gcs.ionisation_model;
        lvl.opal_beaty_w = gcs.opal_beaty;
        lvl.description = format!("{} ionisation (gross)", gcs.name);
        levels.push(lvl);
    }

    let mut attachment = Level::new(i_gas, CollisionType::Attachment, 0.0);
    attachment.description = format!("{} attachment", gcs.name);
    levels.push(attachment);

    for term in &gcs.inelastic {
        let kind = match term.kind {
            InelasticKind::Excitation => CollisionType::Excitation,
            InelasticKind::Superelastic => CollisionType::Superelastic,
            InelasticKind::Inelastic => CollisionType::Inelastic,
        };
        let mut lvl = Level::new(i_gas, kind, term.threshold / r);
        lvl.model = term.model;
        lvl.label = term.label.clone();
        lvl.description = if term.label.is_empty() {
            format!("{} inelastic ({:.2} eV)", gcs.name, term.threshold)
        } else {
            format!("{} {}", gcs.name, term.label)
        };
        levels.push(lvl);
    }

    levels
}

/// Build the full collision-rate tables for the mixture.
pub(crate) fn mix<P: CrossSectionProvider>(
    provider: &P,
    cfg: &MixConfig,
) -> EngineResult<RateTables> {
    let n_gases = cfg.gases.len();
    let use_log = cfg.e_final > cfg.e_high;
    let e_linear = if use_log { cfg.e_high } else { cfg.e_final };
    let e_step = e_linear / N_ENERGY_STEPS as f64;

    let dens = number_density(cfg.temperature, cfg.pressure);
    let prefactor = dens * SPEED_OF_LIGHT * (2.0 / ELECTRON_MASS).sqrt();

    let mut levels: Vec<Level> = Vec::new();
    // Rate columns, indexed [term][bin]; transposed to [bin][term] at the
    // end to match the sampling access pattern.
    let mut cols: Vec<Vec<f64>> = Vec::new();
    let mut par_cols: Vec<Vec<f64>> = Vec::new();
    let mut cut_cols: Vec<Vec<f64>> = Vec::new();
    let mut cols_log: Vec<Vec<f64>> = Vec::new();
    let mut par_cols_log: Vec<Vec<f64>> = Vec::new();
    let mut cut_cols_log: Vec<Vec<f64>> = Vec::new();

    let mut rgas = vec![1.0; n_gases];
    let mut ion_pot = vec![-1.0; n_gases];
    let mut green_sawada = vec![GreenSawadaParams::default(); n_gases];

    let r_log = (cfg.e_final / cfg.e_high).powf(1.0 / N_ENERGY_STEPS_LOG as f64);
    let ln_step = r_log.ln();

    for (i_gas, gas) in cfg.gases.iter().enumerate() {
        let grid = GridSpec::new(N_ENERGY_STEPS, e_step, e_linear);
        let gcs = provider.cross_sections(gas, &grid)?;

        let n_new = build_levels(&gcs, i_gas, cfg.e_final);
        if levels.len() + gcs.inelastic.len() + gcs.shells.len() + 1 >= N_MAX_LEVELS {
            return Err(EngineError::LevelOverflow { max: N_MAX_LEVELS });
        }

        rgas[i_gas] = gcs.rgas();
        if !gcs.shells.is_empty() {
            green_sawada[i_gas].gs = gcs.shells[0].opal_beaty;
            green_sawada[i_gas].tb = 2.0 * gcs.shells[0].threshold;
            ion_pot[i_gas] = gcs.shells[0].threshold;
        } else if cfg.e_final >= gcs.ionisation_threshold {
            green_sawada[i_gas].gs = gcs.opal_beaty;
            green_sawada[i_gas].tb = 2.0 * gcs.ionisation_threshold;
            ion_pot[i_gas] = gcs.ionisation_threshold;
        }

        let np0 = levels.len();
        let n_terms_gas = n_new.len();
        levels.extend(n_new);
        for _ in 0..n_terms_gas {
            cols.push(vec![0.0; N_ENERGY_STEPS]);
            par_cols.push(vec![0.5; N_ENERGY_STEPS]);
            cut_cols.push(vec![1.0; N_ENERGY_STEPS]);
            if use_log {
                cols_log.push(vec![0.0; N_ENERGY_STEPS_LOG]);
                par_cols_log.push(vec![0.5; N_ENERGY_STEPS_LOG]);
                cut_cols_log.push(vec![1.0; N_ENERGY_STEPS_LOG]);
            }
        }

        let van = cfg.fractions[i_gas] * prefactor;
        let scale = cfg.scale_inelastic[i_gas];

        let mut warned_negative = false;
        for i_e in 0..N_ENERGY_STEPS {
            let terms = ordered_terms(&gcs, &gcs, i_e, cfg.e_final, scale);
            debug_assert_eq!(terms.len(), n_terms_gas);
            for (k, t) in terms.iter().enumerate() {
                let np = np0 + k;
                let mut rate = t.cs * van;
                if rate < 0.0 && levels[np].kind != CollisionType::Elastic {
                    if !warned_negative {
                        warn!(
                            gas = gas.as_str(),
                            energy = (i_e as f64 + 0.5) * e_step,
                            "negative inelastic cross-section, set to zero"
                        );
                        warned_negative = true;
                    }
                    rate = 0.0;
                }
                cols[np][i_e] = rate;
                let (cut, par) = angular_entries(t.model, t.parameter);
                cut_cols[np][i_e] = cut;
                par_cols[np][i_e] = par;
            }
        }

        if use_log {
            // The provider is re-queried for every logarithmic bin with a
            // grid whose last bin centre falls on the bin energy.
            let mut emax = cfg.e_high * r_log;
            let imax = N_ENERGY_STEPS - 1;
            for i_e in 0..N_ENERGY_STEPS_LOG {
                let estep = emax / (N_ENERGY_STEPS as f64 - 0.5);
                let efinal = emax + 0.5 * estep;
                let grid = GridSpec::new(N_ENERGY_STEPS, estep, efinal);
                let payload = provider.cross_sections(gas, &grid)?;
                let terms = ordered_terms(&gcs, &payload, imax, cfg.e_final, scale);
                for (k, t) in terms.iter().enumerate() {
                    let np = np0 + k;
                    let mut rate = t.cs * van;
                    if rate < 0.0 {
                        rate = 0.0;
                    }
                    cols_log[np][i_e] = rate;
                    let (cut, par) = angular_entries(t.model, t.parameter);
                    cut_cols_log[np][i_e] = cut;
                    par_cols_log[np][i_e] = par;
                }
                emax *= r_log;
            }
        }
    }

    let n_terms = levels.len();

    // Smallest ionisation threshold in the mixture.
    let mut min_ion_pot = -1.0;
    for &p in &ion_pot {
        if p < 0.0 {
            continue;
        }
        if min_ion_pot < 0.0 || p < min_ion_pot {
            min_ion_pot = p;
        }
    }
    debug!(min_ion_pot, n_terms, "collision-rate table mixed");

    // Transpose to per-bin rows, normalize, and accumulate.
    let mut cf = vec![vec![0.0; n_terms]; N_ENERGY_STEPS];
    let mut scat_parameter = vec![vec![0.5; n_terms]; N_ENERGY_STEPS];
    let mut scat_cut = vec![vec![1.0; n_terms]; N_ENERGY_STEPS];
    let mut cf_tot = vec![0.0; N_ENERGY_STEPS];
    for i_e in 0..N_ENERGY_STEPS {
        let row = &mut cf[i_e];
        for k in 0..n_terms {
            let mut rate = cols[k][i_e];
            if rate < 0.0 {
                warn!(
                    energy = (i_e as f64 + 0.5) * e_step,
                    term = k,
                    "negative collision rate, set to zero"
                );
                rate = 0.0;
            }
            row[k] = rate;
            cf_tot[i_e] += rate;
            scat_parameter[i_e][k] = par_cols[k][i_e];
            scat_cut[i_e][k] = cut_cols[k][i_e];
        }
        if cf_tot[i_e] > 0.0 {
            for k in 0..n_terms {
                row[k] /= cf_tot[i_e];
            }
        }
        for k in 1..n_terms {
            row[k] += row[k - 1];
        }
        let ekin = e_step * (i_e as f64 + 0.5);
        cf_tot[i_e] *= ekin.sqrt();
        // Relativistic correction at high energies.
        if ekin > 1.0e3 {
            cf_tot[i_e] *=
                (1.0 + 0.5 * ekin / ELECTRON_MASS).sqrt() / (1.0 + ekin / ELECTRON_MASS);
        }
    }

    let (mut cf_log, mut scat_parameter_log, mut scat_cut_log, mut cf_tot_log) = (
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
    );
    if use_log {
        cf_log = vec![vec![0.0; n_terms]; N_ENERGY_STEPS_LOG];
        scat_parameter_log = vec![vec![0.5; n_terms]; N_ENERGY_STEPS_LOG];
        scat_cut_log = vec![vec![1.0; n_terms]; N_ENERGY_STEPS_LOG];
        cf_tot_log = vec![0.0; N_ENERGY_STEPS_LOG];
        for i_e in 0..N_ENERGY_STEPS_LOG {
            let row = &mut cf_log[i_e];
            for k in 0..n_terms {
                let rate = cols_log[k][i_e].max(0.0);
                row[k] = rate;
                cf_tot_log[i_e] += rate;
                scat_parameter_log[i_e][k] = par_cols_log[k][i_e];
                scat_cut_log[i_e][k] = cut_cols_log[k][i_e];
            }
            if cf_tot_log[i_e] > 0.0 {
                for k in 0..n_terms {
                    row[k] /= cf_tot_log[i_e];
                }
            }
            for k in 1..n_terms {
                row[k] += row[k - 1];
            }
            let ekin = cfg.e_high * r_log.powi(i_e as i32 + 1);
            cf_tot_log[i_e] *= ekin.sqrt() * (1.0 + 0.5 * ekin / ELECTRON_MASS).sqrt()
                / (1.0 + ekin / ELECTRON_MASS);
            // Stored as a logarithm for log-log interpolation.
            cf_tot_log[i_e] = cf_tot_log[i_e].ln();
        }
    }

    // Null-collision rate: the largest total rate over both grids.
    let mut cf_null = 0.0;
    for &r in &cf_tot {
        if r > cf_null {
            cf_null = r;
        }
    }
    for &r in &cf_tot_log {
        let r = r.exp();
        if r > cf_null {
            cf_null = r;
        }
    }

    // Fitted splitting-function parameters override the seeded values.
    for (i, gas) in cfg.gases.iter().enumerate() {
        green_sawada[i].apply_fit(gas);
        if !green_sawada[i].available {
            debug!(
                gas = gas.as_str(),
                "no Green-Sawada parameters, using Opal-Beaty splitting"
            );
        }
    }

    Ok(RateTables {
        e_final: cfg.e_final,
        e_high: cfg.e_high,
        e_step,
        ln_step,
        levels,
        cf_tot,
        cf,
        scat_parameter,
        scat_cut,
        cf_tot_log,
        cf_log,
        scat_parameter_log,
        scat_cut_log,
        cf_null,
        rgas,
        ion_pot,
        min_ion_pot,
        green_sawada,
    })
}
