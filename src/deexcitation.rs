//! De-excitation level arena and cascade sampling.
//!
//! Excitation terms of the rate table are mapped onto an arena of
//! de-excitation levels. Each arena level carries its decay channels
//! with cumulative branching ratios: radiative transitions from the
//! spectroscopy tables, collisional transfer and loss in collisions
//! with ground-state argon, and quenching by molecular admixtures.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, warn};

use crate::argon::{
    ar_level_data, ChannelKind, P4Mode, PenningSplit, RadRate, Target, AR_3D5S_GROUP,
    AR_4P_AR, AR_4P_TOKENS, AR_4S_AR, AR_4S_TOKENS, AR_DIMER_ENERGY, AR_HIGH_GROUP, AR_LEVELS,
    AR_NONRES_3D, AR_NONRES_5S, K_HORNBECK_MOLNAR, M_ARGON_AMU, M_ETHANE_AMU, M_ISOBUTANE_AMU,
    NE_TOKENS, QUENCHERS, R_AR_3D, R_AR_4P, R_AR_5S, R_ETHANE, R_ISOBUTANE,
};
use crate::constants::{
    number_density, ATOMIC_MASS_EV, BOHR_RADIUS, BOLTZMANN, ELECTRON_MASS, FINE_STRUCTURE,
    HBAR_C, RYDBERG, SMALL, SPEED_OF_LIGHT,
};
use crate::error::{EngineError, EngineResult};
use crate::level::CollisionType;
use crate::mixer::RateTables;
use crate::optical::OpticalData;
use crate::products::{CollisionProduct, ProductKind};
use crate::rng::{random_voigt, uniform_pos};

/// Upper bound on the number of steps in a single cascade. The
/// collisional transfer channels can move between neighbouring levels
/// in both directions, so the walk is not strictly monotonic.
const MAX_CASCADE_STEPS: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DxcChannelKind {
    /// Photon emission.
    Radiative,
    /// Electron emission (Penning or associative ionisation).
    CollIon,
    /// Collisional transfer or loss without ionisation.
    CollNonIon,
}

/// One decay channel. After table finalization `p` holds the cumulative
/// branching ratio. `dest` is the destination arena level; `None` marks
/// the ground state (radiative, ionising) or plain loss (non-ionising).
#[derive(Clone, Copy, Debug)]
pub struct DxcChannel {
    pub p: f64,
    pub dest: Option<usize>,
    pub kind: DxcChannelKind,
}

/// One level of the de-excitation arena.
#[derive(Clone, Debug)]
pub struct DxcLevel {
    /// Index of the owning gas in the mixture.
    pub gas: usize,
    /// Index of the corresponding scattering term, if any. The
    /// artificial dimer and excimer levels have no term.
    pub term: Option<usize>,
    /// Spectroscopic token.
    pub label: String,
    /// Excitation energy [eV].
    pub energy: f64,
    /// Oscillator strength.
    pub osc: f64,
    /// Photon absorption rate at the line centre [ns^-1], filled in by
    /// the photon collision table.
    pub cf: f64,
    /// Doppler broadening sigma [eV].
    pub s_doppler: f64,
    /// Pressure broadening HWHM [eV].
    pub g_pressure: f64,
    /// Truncation half-width of the absorption line [eV].
    pub width: f64,
    /// Total decay rate [ns^-1].
    pub rate: f64,
    pub channels: Vec<DxcChannel>,
}

impl DxcLevel {
    fn new(gas: usize, term: Option<usize>, label: &str, energy: f64) -> Self {
        Self {
            gas,
            term,
            label: label.to_string(),
            energy,
            osc: 0.0,
            cf: 0.0,
            s_doppler: 0.0,
            g_pressure: 0.0,
            width: 0.0,
            rate: 0.0,
            channels: Vec::new(),
        }
    }

    fn push(&mut self, p: f64, dest: Option<usize>, kind: DxcChannelKind) {
        self.channels.push(DxcChannel { p, dest, kind });
    }
}

/// The complete de-excitation arena.
pub struct DxcTable {
    pub levels: Vec<DxcLevel>,
    /// Scattering-term index to arena index.
    pub term_map: HashMap<usize, usize>,
}

/// Adjustable parameters of the collisional de-excitation model.
#[derive(Clone, Copy, Debug)]
pub struct DeexcitationFits {
    /// Prefactor of the 3d/5s to 4p transfer rate.
    pub transfer_3d_4p: f64,
    /// Prefactor of the high-level to 4p transfer rate.
    pub transfer_high_4p: f64,
    /// Prefactors of the hard-sphere quenching rates.
    pub quench_3d_co2: f64,
    pub quench_3d_ch4: f64,
    pub quench_3d_c2h6: f64,
    /// Penning probabilities of the hard-sphere channels.
    pub eta_3d_co2: f64,
    pub eta_3d_ch4: f64,
    pub eta_3d_c2h6: f64,
    /// Penning probabilities of the 4p quenching channels.
    pub eta_4p_ch4: f64,
    pub eta_4p_c2h6: f64,
    /// Penning probability of the C2H6 1S3 channel.
    pub eta_4s_c2h6: f64,
    /// Number of Voigt widths within which a photon can be absorbed by
    /// a resonance line.
    pub line_cut: f64,
}

impl Default for DeexcitationFits {
    fn default() -> Self {
        Self {
            transfer_3d_4p: 1.0,
            transfer_high_4p: 1.0,
            quench_3d_co2: 1.0,
            quench_3d_ch4: 1.0,
            quench_3d_c2h6: 1.0,
            eta_3d_co2: 0.5,
            eta_3d_ch4: 0.5,
            eta_3d_c2h6: 0.5,
            eta_4p_ch4: 0.5,
            eta_4p_c2h6: 0.5,
            eta_4s_c2h6: 0.5,
            line_cut: 1000.0,
        }
    }
}

impl DeexcitationFits {
    fn quench_3d(&self, gas: &str) -> f64 {
        match gas {
            "CO2" => self.quench_3d_co2,
            "CH4" => self.quench_3d_ch4,
            "C2H6" => self.quench_3d_c2h6,
            _ => 1.0,
        }
    }

    fn eta_3d(&self, gas: &str) -> f64 {
        match gas {
            "CO2" => self.eta_3d_co2,
            "CH4" => self.eta_3d_ch4,
            _ => self.eta_3d_c2h6,
        }
    }

    fn eta_4p(&self, gas: &str) -> f64 {
        match gas {
            "CH4" => self.eta_4p_ch4,
            _ => self.eta_4p_c2h6,
        }
    }
}

/// Penning-ionisation rate constant from the Watanabe-Katsuura formula
/// [cm^3 ns^-1].
fn watanabe_katsuura(
    energy: f64,
    osc: f64,
    pacs: f64,
    rgas_ar: f64,
    rgas_q: f64,
    temperature: f64,
) -> f64 {
    use std::f64::consts::PI;
    let m1 = ELECTRON_MASS / (rgas_ar - 1.0);
    let m2 = ELECTRON_MASS / (rgas_q - 1.0);
    // Reduced mass in amu.
    let m_r = (m1 * m2 / (m1 + m2)) / ATOMIC_MASS_EV;
    let u_a = (RYDBERG / energy) * osc;
    let u_q = (2.0 * RYDBERG / energy) * pacs
        / (4.0 * PI * PI * FINE_STRUCTURE * BOHR_RADIUS * BOHR_RADIUS);
    2.591e-19 * (u_a * u_q).powf(2.0 / 5.0) * (temperature / m_r).powf(3.0 / 10.0)
}

/// Hard-sphere quenching rate constant [cm^3 ns^-1].
fn hard_sphere(r_ar: f64, r_q: f64, rgas_ar: f64, rgas_q: f64, temperature: f64) -> f64 {
    use std::f64::consts::PI;
    let sigma = (r_ar + r_q).powi(2) * PI;
    let m1 = ELECTRON_MASS / (rgas_ar - 1.0);
    let m2 = ELECTRON_MASS / (rgas_q - 1.0);
    let m_r = m1 * m2 / (m1 + m2);
    let vel = SPEED_OF_LIGHT * (8.0 * BOLTZMANN * temperature / (PI * m_r)).sqrt();
    sigma * vel
}

/// Resolve the Penning branching of a quenching channel. `None` means a
/// single non-ionising channel.
fn penning_probability(
    split: PenningSplit,
    gas: &str,
    p_wk: f64,
    fits: &DeexcitationFits,
) -> Option<f64> {
    match split {
        PenningSplit::Single => None,
        PenningSplit::WkYield => Some(p_wk),
        PenningSplit::Fixed(p) => Some(p),
        PenningSplit::EtaFit4s => Some(fits.eta_4s_c2h6),
        PenningSplit::EtaFit4p => Some(fits.eta_4p(gas)),
        PenningSplit::EtaFit4pIfYield => Some(if p_wk > 0.0 { fits.eta_4p(gas) } else { 0.0 }),
        PenningSplit::EtaFit3d => Some(fits.eta_3d(gas)),
    }
}

/// Build the de-excitation arena from the mixed rate tables.
pub(crate) fn build_table<O: OpticalData>(
    tables: &RateTables,
    gases: &[String],
    fractions: &[f64],
    temperature: f64,
    pressure: f64,
    fits: &DeexcitationFits,
    optical: &O,
) -> EngineResult<DxcTable> {
    let dens = number_density(temperature, pressure);

    // Map the excitation terms of the rate table onto level tokens.
    let mut i_ar: Option<usize> = None;
    let mut mapped_ar: HashMap<&'static str, usize> = HashMap::new();
    for (i, level) in tables.levels.iter().enumerate() {
        if level.kind != CollisionType::Excitation {
            continue;
        }
        let gas = gases[level.gas].as_str();
        if gas == "Ar" {
            i_ar = Some(level.gas);
            match ar_level_data(&level.label) {
                Some(data) => {
                    mapped_ar.insert(data.token, i);
                }
                None => {
                    warn!(level = level.label.as_str(), "unknown Ar excitation level");
                }
            }
        } else if gas == "Ne" {
            if NE_TOKENS.contains(&level.label.as_str()) {
                // Channel data for neon is not tabulated.
                return Err(EngineError::DataConsistency(format!(
                    "missing de-excitation channel data for level Ne {}",
                    level.label
                )));
            }
            warn!(level = level.label.as_str(), "unknown Ne excitation level");
        }
    }

    let mut levels: Vec<DxcLevel> = Vec::new();
    let mut term_map: HashMap<usize, usize> = HashMap::new();
    let mut arena: HashMap<&'static str, usize> = HashMap::new();

    // Arena slots in spectroscopy-table order.
    for data in AR_LEVELS {
        if let Some(&term) = mapped_ar.get(data.token) {
            let gas = tables.levels[term].gas;
            let energy = tables.levels[term].energy_loss * tables.rgas[gas];
            let idx = levels.len();
            let mut lvl = DxcLevel::new(gas, Some(term), data.token, energy);
            lvl.osc = data.osc;
            levels.push(lvl);
            arena.insert(data.token, idx);
            term_map.insert(term, idx);
        }
    }

    // Conversion factor from oscillator strength to transition rate.
    let f2a = 2.0 * SPEED_OF_LIGHT * FINE_STRUCTURE / (3.0 * ELECTRON_MASS * HBAR_C);

    // Radiative channels from the spectroscopy tables.
    for data in AR_LEVELS {
        let Some(&idx) = arena.get(data.token) else {
            continue;
        };
        let energy = levels[idx].energy;
        for ch in data.channels {
            let rate = match ch.rate {
                RadRate::Fixed(r) => r,
                RadRate::FromOscillator => f2a * energy * energy * data.osc,
            };
            let kind = match ch.kind {
                ChannelKind::Radiative => DxcChannelKind::Radiative,
                ChannelKind::CollIon => DxcChannelKind::CollIon,
                ChannelKind::CollNonIon => DxcChannelKind::CollNonIon,
            };
            let dest = match ch.dest {
                Target::Ground => None,
                Target::Level(token) => match arena.get(token) {
                    Some(&d) => Some(d),
                    None => {
                        // Destination level missing from the mixture.
                        debug!(
                            level = data.token,
                            dest = token,
                            "dropping channel to unmapped level"
                        );
                        continue;
                    }
                },
            };
            levels[idx].push(rate, dest, kind);
        }
    }

    // Collisional de-excitation and loss in collisions with ground
    // state argon.
    if let Some(i_ar) = i_ar {
        let n_ar = dens * fractions[i_ar];

        // Artificial levels for the argon dimer (associative
        // ionisation product) and excimer (three-body destination).
        let i_dimer = levels.len();
        levels.push(DxcLevel::new(i_ar, None, "Dimer", AR_DIMER_ENERGY));
        let i_excimer = levels.len();
        levels.push(DxcLevel::new(i_ar, None, "Excimer", AR_DIMER_ENERGY));

        for rule in AR_4S_AR {
            let Some(&idx) = arena.get(rule.token) else {
                continue;
            };
            levels[idx].push(
                rule.k3 * n_ar * n_ar,
                Some(i_excimer),
                DxcChannelKind::CollNonIon,
            );
            if let Some(&d) = arena.get("1S4") {
                levels[idx].push(rule.k2 * n_ar, Some(d), DxcChannelKind::CollNonIon);
            }
        }

        for rule in AR_4P_AR {
            let Some(&idx) = arena.get(rule.token) else {
                continue;
            };
            for t in rule.transfers {
                if let Some(&d) = arena.get(t.dest) {
                    levels[idx].push(t.k * n_ar, Some(d), DxcChannelKind::CollNonIon);
                }
            }
            if rule.k_4s > 0.0 {
                for token in AR_4S_TOKENS {
                    if let Some(&d) = arena.get(token) {
                        levels[idx].push(
                            0.25 * rule.k_4s * n_ar,
                            Some(d),
                            DxcChannelKind::CollNonIon,
                        );
                    }
                }
            }
        }

        for (group, k4p) in [
            (AR_3D5S_GROUP, fits.transfer_3d_4p * 1.0e-20),
            (AR_HIGH_GROUP, fits.transfer_high_4p * 1.0e-20),
        ] {
            for token in group {
                let Some(&idx) = arena.get(token) else {
                    continue;
                };
                for dest in AR_4P_TOKENS {
                    if let Some(&d) = arena.get(dest) {
                        levels[idx].push(0.1 * k4p * n_ar, Some(d), DxcChannelKind::CollNonIon);
                    }
                }
            }
        }

        // Hornbeck-Molnar associative ionisation of the levels above
        // the 3d/5s group.
        for token in AR_HIGH_GROUP {
            if let Some(&idx) = arena.get(token) {
                levels[idx].push(
                    K_HORNBECK_MOLNAR * n_ar,
                    Some(i_dimer),
                    DxcChannelKind::CollIon,
                );
            }
        }

        // Quenching by molecular admixtures.
        let eth_scale = ((R_AR_4P + R_ISOBUTANE) / (R_AR_4P + R_ETHANE)).powi(2)
            * ((M_ETHANE_AMU / M_ISOBUTANE_AMU) * (M_ARGON_AMU + M_ISOBUTANE_AMU)
                / (M_ARGON_AMU + M_ETHANE_AMU))
                .sqrt();
        let rest_4p: Vec<&str> = AR_4P_TOKENS
            .iter()
            .copied()
            .filter(|t| !["2P8", "2P6", "2P5", "2P1"].contains(t))
            .collect();

        for spec in QUENCHERS {
            let Some(i_q) = gases.iter().position(|g| g.as_str() == spec.gas) else {
                continue;
            };
            let n_q = dens * fractions[i_q];
            let rgas_ar = tables.rgas[i_ar];
            let rgas_q = tables.rgas[i_q];
            // Isobutane has no tabulated photoabsorption data; the
            // n-butane cross-section is used instead.
            let optical_name = if spec.gas == "iC4H10" { "nC4H10" } else { spec.gas };

            for idx in 0..levels.len() {
                let (label, energy, osc) = {
                    let l = &levels[idx];
                    if l.term.is_none() {
                        continue;
                    }
                    (l.label.clone(), l.energy, l.osc)
                };
                let token = label.as_str();
                let (pacs, eta) = optical
                    .photoabsorption(optical_name, energy)
                    .unwrap_or((0.0, 0.0));
                let p_wk = eta.powf(2.0 / 5.0);

                let fixed = spec.fixed.iter().find(|f| f.token == token);
                let (k_q, split) = if let Some(f) = fixed {
                    let mut k = f.k;
                    if spec.p4_mode == P4Mode::EthaneScaled && token.starts_with("2P") {
                        k *= eth_scale;
                    }
                    (k, f.split)
                } else if rest_4p.contains(&token) {
                    let mut k = spec.p4_rest.k;
                    if spec.p4_mode == P4Mode::EthaneScaled {
                        k *= eth_scale;
                    }
                    (k, spec.p4_rest.split)
                } else if osc > 0.0 {
                    let k = watanabe_katsuura(energy, osc, pacs, rgas_ar, rgas_q, temperature);
                    (k, spec.wk_split)
                } else if AR_NONRES_3D.contains(&token) {
                    let mut k = hard_sphere(R_AR_3D, spec.radius_3d, rgas_ar, rgas_q, temperature);
                    if spec.hs_fitted {
                        k *= fits.quench_3d(spec.gas);
                    }
                    (k, spec.hs_split)
                } else if AR_NONRES_5S.contains(&token) {
                    let mut k = hard_sphere(R_AR_5S, spec.radius_5s, rgas_ar, rgas_q, temperature);
                    if spec.hs_fitted {
                        k *= fits.quench_3d(spec.gas);
                    }
                    (k, spec.hs_split)
                } else {
                    continue;
                };

                match penning_probability(split, spec.gas, p_wk, fits) {
                    None => {
                        levels[idx].push(k_q * n_q, None, DxcChannelKind::CollNonIon);
                    }
                    Some(p) => {
                        levels[idx].push(k_q * n_q * p, None, DxcChannelKind::CollIon);
                        levels[idx].push(k_q * n_q * (1.0 - p), None, DxcChannelKind::CollNonIon);
                    }
                }
            }
        }
    }

    // Total decay rates and cumulative branching ratios.
    let mut total_rad = 0.0;
    let mut total_coll_ion = 0.0;
    for level in &mut levels {
        let mut f_rad = 0.0;
        let mut f_coll_ion = 0.0;
        let mut f_coll_transfer = 0.0;
        let mut f_coll_loss = 0.0;
        for ch in &level.channels {
            match ch.kind {
                DxcChannelKind::Radiative => f_rad += ch.p,
                DxcChannelKind::CollIon => f_coll_ion += ch.p,
                DxcChannelKind::CollNonIon => {
                    if ch.dest.is_none() {
                        f_coll_loss += ch.p;
                    } else {
                        f_coll_transfer += ch.p;
                    }
                }
            }
        }
        level.rate = f_rad + f_coll_ion + f_coll_transfer + f_coll_loss;
        total_rad += f_rad;
        total_coll_ion += f_coll_ion;
        if level.rate > 0.0 {
            let rate = level.rate;
            let mut cumulative = 0.0;
            for ch in &mut level.channels {
                cumulative += ch.p / rate;
                ch.p = cumulative;
            }
        }
    }
    debug!(
        n_levels = levels.len(),
        total_rad, total_coll_ion, "de-excitation table built"
    );

    Ok(DxcTable { levels, term_map })
}

/// Run one de-excitation cascade starting from the given arena level,
/// appending the emitted photons and electrons to `products`. Returns
/// the arena level at which the cascade terminated, or `None` if the
/// excitation energy was lost without a trace.
pub(crate) fn cascade<R: Rng + ?Sized>(
    table: &DxcTable,
    start: usize,
    min_ion_pot: f64,
    rng: &mut R,
    products: &mut Vec<CollisionProduct>,
    n_penning: &mut u64,
) -> Option<usize> {
    let mut i_level = start;
    let mut t = 0.0;
    for _ in 0..MAX_CASCADE_STEPS {
        let level = &table.levels[i_level];
        if level.rate <= 0.0 || level.channels.is_empty() {
            // Dead end.
            return Some(i_level);
        }
        t += -uniform_pos(rng).ln() / level.rate;
        // Select the transition.
        let r: f64 = rng.gen();
        let mut dest: Option<usize> = None;
        let mut kind = DxcChannelKind::Radiative;
        for ch in &level.channels {
            if r <= ch.p {
                dest = ch.dest;
                kind = ch.kind;
                break;
            }
        }
        match kind {
            DxcChannelKind::Radiative => {
                let mut product = CollisionProduct::new(ProductKind::Photon, level.energy);
                product.delay = t;
                match dest {
                    Some(f) => {
                        // Decay to a lower lying excited state.
                        product.energy = (level.energy - table.levels[f].energy).max(SMALL);
                        products.push(product);
                        i_level = f;
                    }
                    None => {
                        // Decay to ground state: smear the photon energy
                        // over the absorption line profile.
                        if level.width > 0.0 {
                            let mut accepted = false;
                            for _ in 0..1000 {
                                let delta =
                                    random_voigt(rng, 0.0, level.s_doppler, level.g_pressure);
                                if product.energy + delta >= SMALL && delta.abs() < level.width {
                                    product.energy += delta;
                                    accepted = true;
                                    break;
                                }
                            }
                            if !accepted {
                                warn!(
                                    level = level.label.as_str(),
                                    "line profile sampling failed, emitting at line centre"
                                );
                            }
                        }
                        products.push(product);
                        return Some(i_level);
                    }
                }
            }
            DxcChannelKind::CollIon => {
                let mut product = CollisionProduct::new(ProductKind::Electron, level.energy);
                product.delay = t;
                match dest {
                    Some(f) => {
                        // Associative ionisation.
                        product.energy = (level.energy - table.levels[f].energy).max(SMALL);
                        *n_penning += 1;
                        products.push(product);
                        i_level = f;
                    }
                    None => {
                        // Penning ionisation.
                        product.energy = (level.energy - min_ion_pot).max(SMALL);
                        *n_penning += 1;
                        products.push(product);
                        return Some(i_level);
                    }
                }
            }
            DxcChannelKind::CollNonIon => match dest {
                Some(f) => i_level = f,
                None => return None,
            },
        }
    }
    warn!(start, "de-excitation cascade exceeded step limit");
    Some(i_level)
}
