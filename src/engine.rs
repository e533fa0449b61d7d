//! The collision engine: mixture settings, table lifecycle and the
//! sampling entry points used by a Monte Carlo transport loop.
//!
//! The engine owns the cross-section and optical data seams, the mixed
//! rate tables and the de-excitation arena. Any setter that affects the
//! tables marks the engine dirty; the tables are rebuilt lazily on the
//! next query or sampling call. A failed rebuild leaves the engine
//! dirty so the next call tries again.

use std::f64::consts::PI;

use rand::Rng;
use tracing::{info, warn};

use crate::angular::ScatterModel;
use crate::constants::{
    ATMOSPHERIC_PRESSURE, N_ENERGY_STEPS, N_ENERGY_STEPS_GAMMA, N_ENERGY_STEPS_LOG, SMALL,
    ZERO_CELSIUS,
};
use crate::cross_sections::{canonical_gas_name, CrossSectionProvider};
use crate::deexcitation::{self, DeexcitationFits, DxcTable};
use crate::error::{EngineError, EngineResult};
use crate::level::{CollisionType, Level, N_CS_TYPES};
use crate::mixer::{mix, MixConfig, RateTables};
use crate::optical::OpticalData;
use crate::photon::{build_photon_table, voigt, PhotonTables};
use crate::products::{
    CollisionProduct, ElectronCollision, PhotonCollision, PhotonCollisionType, ProductKind,
    N_CS_TYPES_GAMMA,
};
use crate::rng::uniform_pos;
use crate::split::{sample_flat, sample_green_sawada, sample_opal_beaty, SplittingFunction};

/// Validity of the collision-rate tables with respect to the settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableState {
    Clean,
    Dirty,
}

/// Collision-rate engine for electrons and photons in a gas mixture.
pub struct CollisionEngine<P, O> {
    provider: P,
    optical: O,

    gases: Vec<String>,
    fractions: Vec<f64>,
    /// Temperature [K].
    temperature: f64,
    /// Pressure [Torr].
    pressure: f64,
    e_final: f64,
    e_high: f64,
    e_final_gamma: f64,

    use_anisotropic: bool,
    use_auto_adjust: bool,
    use_deexcitation: bool,
    use_radiation_trapping: bool,
    use_penning: bool,
    splitting: SplittingFunction,
    scale_inelastic: Vec<f64>,
    penning_r: f64,
    penning_lambda: f64,
    penning_r_gas: Vec<f64>,
    penning_lambda_gas: Vec<f64>,
    fits: DeexcitationFits,

    state: TableState,
    tables: Option<RateTables>,
    dxc: Option<DxcTable>,
    photon: Option<PhotonTables>,

    n_collisions: [u64; N_CS_TYPES],
    n_collisions_detailed: Vec<u64>,
    n_penning: u64,
    n_photon_collisions: [u64; N_CS_TYPES_GAMMA],
    ion_products: Vec<CollisionProduct>,
    dxc_products: Vec<CollisionProduct>,
}

impl<P: CrossSectionProvider, O: OpticalData> CollisionEngine<P, O> {
    /// Create an engine for the given mixture. Gas names are resolved
    /// against the cross-section registry and fractions are normalized.
    pub fn new(provider: P, optical: O, gases: &[&str], fractions: &[f64]) -> EngineResult<Self> {
        let mut engine = Self {
            provider,
            optical,
            gases: Vec::new(),
            fractions: Vec::new(),
            temperature: ZERO_CELSIUS + 20.0,
            pressure: ATMOSPHERIC_PRESSURE,
            e_final: 40.0,
            e_high: 1.0e4,
            e_final_gamma: 20.0,
            use_anisotropic: true,
            use_auto_adjust: true,
            use_deexcitation: false,
            use_radiation_trapping: false,
            use_penning: false,
            splitting: SplittingFunction::OpalBeaty,
            scale_inelastic: Vec::new(),
            penning_r: 0.0,
            penning_lambda: 0.0,
            penning_r_gas: Vec::new(),
            penning_lambda_gas: Vec::new(),
            fits: DeexcitationFits::default(),
            state: TableState::Dirty,
            tables: None,
            dxc: None,
            photon: None,
            n_collisions: [0; N_CS_TYPES],
            n_collisions_detailed: Vec::new(),
            n_penning: 0,
            n_photon_collisions: [0; N_CS_TYPES_GAMMA],
            ion_products: Vec::new(),
            dxc_products: Vec::new(),
        };
        engine.set_composition(gases, fractions)?;
        Ok(engine)
    }

    /// Replace the gas mixture. Per-gas settings (inelastic scaling,
    /// Penning parameters) are reset.
    pub fn set_composition(&mut self, gases: &[&str], fractions: &[f64]) -> EngineResult<()> {
        if gases.is_empty() || gases.len() != fractions.len() {
            return Err(EngineError::InvalidParameter(
                "composition needs matching, non-empty gas and fraction lists".into(),
            ));
        }
        let mut canonical = Vec::with_capacity(gases.len());
        for gas in gases {
            canonical.push(canonical_gas_name(gas)?);
        }
        let mut total = 0.0;
        for &f in fractions {
            if f < 0.0 {
                return Err(EngineError::InvalidParameter(
                    "gas fractions must be non-negative".into(),
                ));
            }
            total += f;
        }
        if total <= 0.0 {
            return Err(EngineError::InvalidParameter(
                "gas fractions must not all vanish".into(),
            ));
        }
        let n = canonical.len();
        self.gases = canonical;
        self.fractions = fractions.iter().map(|f| f / total).collect();
        self.scale_inelastic = vec![1.0; n];
        self.penning_r_gas = vec![0.0; n];
        self.penning_lambda_gas = vec![0.0; n];
        self.state = TableState::Dirty;
        Ok(())
    }

    pub fn composition(&self) -> (&[String], &[f64]) {
        (&self.gases, &self.fractions)
    }

    pub fn set_temperature(&mut self, temperature: f64) -> EngineResult<()> {
        if temperature <= 0.0 {
            return Err(EngineError::InvalidParameter(
                "temperature must be positive".into(),
            ));
        }
        self.temperature = temperature;
        self.state = TableState::Dirty;
        Ok(())
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_pressure(&mut self, pressure: f64) -> EngineResult<()> {
        if pressure <= 0.0 {
            return Err(EngineError::InvalidParameter(
                "pressure must be positive".into(),
            ));
        }
        self.pressure = pressure;
        self.state = TableState::Dirty;
        Ok(())
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Set the upper limit of the electron energy range [eV].
    pub fn set_max_electron_energy(&mut self, e: f64) -> EngineResult<()> {
        if e <= SMALL {
            return Err(EngineError::InvalidParameter(
                "electron energy limit too small".into(),
            ));
        }
        self.e_final = e;
        self.state = TableState::Dirty;
        Ok(())
    }

    pub fn max_electron_energy(&self) -> f64 {
        self.e_final
    }

    /// Set the upper limit of the photon energy range [eV].
    pub fn set_max_photon_energy(&mut self, e: f64) -> EngineResult<()> {
        if e <= SMALL {
            return Err(EngineError::InvalidParameter(
                "photon energy limit too small".into(),
            ));
        }
        self.e_final_gamma = e;
        self.state = TableState::Dirty;
        Ok(())
    }

    pub fn max_photon_energy(&self) -> f64 {
        self.e_final_gamma
    }

    pub fn set_splitting_function(&mut self, splitting: SplittingFunction) {
        self.splitting = splitting;
    }

    /// Multiply the inelastic cross sections of one gas by a constant.
    pub fn set_inelastic_scaling(&mut self, gas: &str, scale: f64) -> EngineResult<()> {
        if scale <= 0.0 {
            return Err(EngineError::InvalidParameter(
                "scaling factor must be positive".into(),
            ));
        }
        let i = self.gas_index(gas)?;
        self.scale_inelastic[i] = scale;
        self.state = TableState::Dirty;
        Ok(())
    }

    pub fn enable_anisotropic_scattering(&mut self, on: bool) {
        self.use_anisotropic = on;
    }

    /// Whether the energy range grows automatically when queried above
    /// its current ceiling.
    pub fn enable_energy_range_adjustment(&mut self, on: bool) {
        self.use_auto_adjust = on;
    }

    /// Switch on the microscopic de-excitation cascade. Mutually
    /// exclusive with the simplified Penning transfer model.
    pub fn enable_deexcitation(&mut self) {
        if self.use_penning {
            warn!("Penning transfer switched off in favour of de-excitation handling");
            self.use_penning = false;
        }
        self.use_deexcitation = true;
        self.state = TableState::Dirty;
    }

    pub fn disable_deexcitation(&mut self) {
        self.use_deexcitation = false;
    }

    /// Whether discrete resonance lines contribute to the photon
    /// collision rate.
    pub fn enable_radiation_trapping(&mut self, on: bool) {
        self.use_radiation_trapping = on;
    }

    /// Switch on the simplified Penning transfer model with a single
    /// transfer probability `r` and displacement radius `lambda` [cm]
    /// for all eligible excitation levels.
    pub fn enable_penning_transfer(&mut self, r: f64, lambda: f64) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&r) {
            return Err(EngineError::InvalidParameter(
                "Penning probability must be in [0, 1]".into(),
            ));
        }
        self.penning_r = r;
        self.penning_lambda = if lambda < SMALL { 0.0 } else { lambda };
        self.use_penning = true;
        if self.use_deexcitation {
            warn!("de-excitation handling switched off in favour of Penning transfer");
            self.use_deexcitation = false;
        }
        self.state = TableState::Dirty;
        Ok(())
    }

    /// Penning parameters for the excitation levels of a single gas,
    /// overriding the global values.
    pub fn enable_penning_transfer_for_gas(
        &mut self,
        gas: &str,
        r: f64,
        lambda: f64,
    ) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&r) {
            return Err(EngineError::InvalidParameter(
                "Penning probability must be in [0, 1]".into(),
            ));
        }
        let i = self.gas_index(gas)?;
        self.penning_r_gas[i] = r;
        self.penning_lambda_gas[i] = if lambda < SMALL { 0.0 } else { lambda };
        self.use_penning = true;
        if self.use_deexcitation {
            warn!("de-excitation handling switched off in favour of Penning transfer");
            self.use_deexcitation = false;
        }
        self.state = TableState::Dirty;
        Ok(())
    }

    pub fn disable_penning_transfer(&mut self) {
        self.use_penning = false;
        self.penning_r = 0.0;
        self.penning_lambda = 0.0;
        for r in &mut self.penning_r_gas {
            *r = 0.0;
        }
        for l in &mut self.penning_lambda_gas {
            *l = 0.0;
        }
        self.state = TableState::Dirty;
    }

    /// Adjustable parameters of the collisional de-excitation model.
    pub fn set_deexcitation_fits(&mut self, fits: DeexcitationFits) {
        self.fits = fits;
        self.state = TableState::Dirty;
    }

    pub fn is_dirty(&self) -> bool {
        self.state == TableState::Dirty
    }

    fn gas_index(&self, gas: &str) -> EngineResult<usize> {
        let canonical = canonical_gas_name(gas)?;
        self.gases
            .iter()
            .position(|g| *g == canonical)
            .ok_or(EngineError::UnknownGas(canonical))
    }

    /// Rebuild the tables if any setting changed since the last build.
    /// On failure the engine stays dirty and the error propagates.
    fn ensure_tables(&mut self) -> EngineResult<()> {
        if self.state == TableState::Clean {
            return Ok(());
        }
        info!(
            gases = ?self.gases,
            e_final = self.e_final,
            temperature = self.temperature,
            pressure = self.pressure,
            "building collision-rate tables"
        );
        let cfg = MixConfig {
            gases: &self.gases,
            fractions: &self.fractions,
            temperature: self.temperature,
            pressure: self.pressure,
            e_final: self.e_final,
            e_high: self.e_high,
            scale_inelastic: &self.scale_inelastic,
        };
        let mut tables = mix(&self.provider, &cfg)?;
        self.dxc = None;
        self.photon = None;

        if self.use_deexcitation {
            match deexcitation::build_table(
                &tables,
                &self.gases,
                &self.fractions,
                self.temperature,
                self.pressure,
                &self.fits,
                &self.optical,
            ) {
                Ok(table) => self.dxc = Some(table),
                Err(err) => {
                    warn!(error = %err, "de-excitation table failed, de-excitation disabled");
                    self.use_deexcitation = false;
                }
            }
        }

        match build_photon_table(
            &self.gases,
            &self.fractions,
            self.temperature,
            self.pressure,
            self.e_final_gamma,
            &tables.rgas,
            self.fits.line_cut,
            self.dxc.as_mut(),
            &self.optical,
        ) {
            Ok(table) => self.photon = Some(table),
            Err(err) => {
                warn!(error = %err, "photon collision table failed");
                if self.use_deexcitation {
                    warn!("de-excitation disabled");
                    self.use_deexcitation = false;
                }
            }
        }

        // Attach the Penning parameters and cascade links to the
        // excitation levels of the freshly mixed table.
        for (i, level) in tables.levels.iter_mut().enumerate() {
            if level.kind != CollisionType::Excitation {
                continue;
            }
            level.penning_r = self.penning_r;
            level.penning_lambda = self.penning_lambda;
            let g = level.gas;
            if self.penning_r_gas[g] > SMALL {
                level.penning_r = self.penning_r_gas[g];
                level.penning_lambda = self.penning_lambda_gas[g];
            }
            level.deexcitation = self.dxc.as_ref().and_then(|d| d.term_map.get(&i).copied());
        }

        self.n_collisions = [0; N_CS_TYPES];
        self.n_collisions_detailed = vec![0; tables.n_terms()];
        self.n_penning = 0;
        self.n_photon_collisions = [0; N_CS_TYPES_GAMMA];
        self.ion_products.clear();
        self.dxc_products.clear();

        self.tables = Some(tables);
        self.state = TableState::Clean;
        Ok(())
    }

    fn tables_ref(&self) -> EngineResult<&RateTables> {
        self.tables.as_ref().ok_or_else(|| {
            EngineError::DataConsistency("collision-rate tables not built".into())
        })
    }

    /// The mixed rate tables, rebuilding them if necessary.
    pub fn rate_tables(&mut self) -> EngineResult<&RateTables> {
        self.ensure_tables()?;
        self.tables_ref()
    }

    /// Number of scattering terms in the current mixture.
    pub fn n_terms(&mut self) -> EngineResult<usize> {
        Ok(self.rate_tables()?.n_terms())
    }

    /// One scattering term of the built table, if in range.
    pub fn level(&self, i: usize) -> Option<&Level> {
        self.tables.as_ref().and_then(|t| t.levels.get(i))
    }

    /// Smallest ionisation potential in the mixture [eV], negative when
    /// no ionisation channel is within the energy range.
    pub fn min_ionisation_potential(&mut self) -> EngineResult<f64> {
        Ok(self.rate_tables()?.min_ion_pot)
    }

    /// The de-excitation arena, if built.
    pub fn deexcitation_table(&self) -> Option<&DxcTable> {
        self.dxc.as_ref()
    }

    /// Total electron collision rate [ns^-1] at the given energy.
    pub fn electron_collision_rate(&mut self, e: f64) -> EngineResult<f64> {
        if e > self.e_final && self.use_auto_adjust {
            warn!(
                energy = e,
                new_limit = 1.05 * e,
                "electron energy outside table range, adjusting"
            );
            self.set_max_electron_energy(1.05 * e)?;
        }
        self.ensure_tables()?;
        let tables = self.tables_ref()?;
        if e <= 0.0 {
            warn!(energy = e, "non-positive electron energy");
            return Ok(tables.cf_tot[0]);
        }
        if e <= tables.e_high || !tables.use_log_grid() {
            let i_e = ((e / tables.e_step) as usize).min(N_ENERGY_STEPS - 1);
            return Ok(tables.cf_tot[i_e]);
        }
        // Log-log interpolation on the high-energy grid.
        let e_log = e.ln();
        let e_high_log = tables.e_high.ln();
        let i_e = (((e_log - e_high_log) / tables.ln_step) as usize).min(N_ENERGY_STEPS_LOG - 1);
        let f_max = tables.cf_tot_log[i_e];
        let f_min = if i_e == 0 {
            tables.cf_tot[N_ENERGY_STEPS - 1].ln()
        } else {
            tables.cf_tot_log[i_e - 1]
        };
        let e_min = e_high_log + i_e as f64 * tables.ln_step;
        let f = f_min + (e_log - e_min) * (f_max - f_min) / tables.ln_step;
        Ok(f.exp())
    }

    /// Collision rate [ns^-1] of a single scattering term.
    pub fn level_collision_rate(&mut self, e: f64, level: usize) -> EngineResult<f64> {
        if e <= 0.0 {
            warn!(energy = e, "non-positive electron energy");
            return Ok(0.0);
        }
        let total = self.electron_collision_rate(e)?;
        let tables = self.tables_ref()?;
        if level >= tables.n_terms() {
            return Err(EngineError::InvalidParameter(format!(
                "level {} does not exist, the mixture has {} terms",
                level,
                tables.n_terms()
            )));
        }
        let row = if e <= tables.e_high || !tables.use_log_grid() {
            let i_e = ((e / tables.e_step) as usize).min(N_ENERGY_STEPS - 1);
            &tables.cf[i_e]
        } else {
            let i_e = (((e.ln() - tables.e_high.ln()) / tables.ln_step) as usize)
                .min(N_ENERGY_STEPS_LOG - 1);
            &tables.cf_log[i_e]
        };
        let p = if level == 0 {
            row[0]
        } else {
            row[level] - row[level - 1]
        };
        Ok(total * p)
    }

    /// Null-collision rate [ns^-1]: the largest total rate over the
    /// whole energy range.
    pub fn null_collision_rate(&mut self) -> EngineResult<f64> {
        Ok(self.rate_tables()?.cf_null)
    }

    /// Sample a collision for an electron of energy `e` moving along
    /// `direction`. The direction is rotated in place; secondaries are
    /// left in the product buffers until the next sampling call.
    pub fn sample_electron_collision<R: Rng + ?Sized>(
        &mut self,
        e: f64,
        direction: &mut [f64; 3],
        rng: &mut R,
    ) -> EngineResult<ElectronCollision> {
        if e > self.e_final && self.use_auto_adjust {
            warn!(
                energy = e,
                new_limit = 1.05 * e,
                "electron energy outside table range, adjusting"
            );
            self.set_max_electron_energy(1.05 * e)?;
        } else if e <= 0.0 {
            return Err(EngineError::InvalidParameter(
                "electron energy must be positive".into(),
            ));
        }
        self.ensure_tables()?;
        // Field-precise borrow so the counters below stay writable.
        let tables = self.tables.as_ref().ok_or_else(|| {
            EngineError::DataConsistency("collision-rate tables not built".into())
        })?;

        // Sample the scattering term from the cumulative probabilities
        // of the energy bin.
        let (level, ang_cut, ang_par) = if e <= tables.e_high || !tables.use_log_grid() {
            let i_e = ((e / tables.e_step) as usize).min(N_ENERGY_STEPS - 1);
            let r: f64 = rng.gen();
            let lvl = sample_term(&tables.cf[i_e], r);
            (lvl, tables.scat_cut[i_e][lvl], tables.scat_parameter[i_e][lvl])
        } else {
            let i_e = (((e.ln() - tables.e_high.ln()) / tables.ln_step) as usize)
                .min(N_ENERGY_STEPS_LOG - 1);
            let r: f64 = rng.gen();
            let lvl = sample_term(&tables.cf_log[i_e], r);
            (
                lvl,
                tables.scat_cut_log[i_e][lvl],
                tables.scat_parameter_log[i_e][lvl],
            )
        };

        let lvl = &tables.levels[level];
        let kind = lvl.kind;
        let i_gas = lvl.gas;
        let rgas = tables.rgas[i_gas];
        self.n_collisions[kind.index()] += 1;
        self.n_collisions_detailed[level] += 1;

        let mut loss = lvl.energy_loss;
        let mut n_ion = 0;
        let mut n_dxc = 0;

        match kind {
            CollisionType::Ionisation => {
                let esec = match self.splitting {
                    SplittingFunction::GreenSawada if tables.green_sawada[i_gas].available => {
                        sample_green_sawada(rng, e, loss, &tables.green_sawada[i_gas])
                    }
                    SplittingFunction::Flat => sample_flat(rng, e, loss),
                    _ => sample_opal_beaty(rng, e, loss, lvl.opal_beaty_w),
                };
                loss += esec;
                self.ion_products.clear();
                self.ion_products
                    .push(CollisionProduct::new(ProductKind::Electron, esec));
                self.ion_products
                    .push(CollisionProduct::new(ProductKind::Ion, 0.0));
                n_ion = 2;
            }
            CollisionType::Excitation => {
                if self.use_deexcitation && lvl.deexcitation.is_some() {
                    if let (Some(idx), Some(dxc)) = (lvl.deexcitation, self.dxc.as_ref()) {
                        self.dxc_products.clear();
                        deexcitation::cascade(
                            dxc,
                            idx,
                            tables.min_ion_pot,
                            rng,
                            &mut self.dxc_products,
                            &mut self.n_penning,
                        );
                        n_dxc = self.dxc_products.len();
                    }
                } else if self.use_penning {
                    self.dxc_products.clear();
                    // Simplified Penning transfer: if the excitation
                    // threshold exceeds the smallest ionisation
                    // potential, eject an electron with probability r.
                    if loss * rgas > tables.min_ion_pot
                        && rng.gen::<f64>() < lvl.penning_r
                    {
                        let esec = (loss * rgas - tables.min_ion_pot).max(SMALL);
                        let mut product = CollisionProduct::new(ProductKind::Electron, esec);
                        if lvl.penning_lambda > SMALL {
                            // Uniform within a sphere of radius lambda.
                            product.offset = lvl.penning_lambda * uniform_pos(rng).cbrt();
                        }
                        self.dxc_products.push(product);
                        n_dxc = 1;
                        self.n_penning += 1;
                    }
                }
            }
            _ => {}
        }

        // The energy loss must stay below the electron energy.
        if e < loss {
            loss = e - 0.0001;
        }

        let mut ctheta0 = 1.0 - 2.0 * rng.gen::<f64>();
        if self.use_anisotropic {
            match lvl.model {
                ScatterModel::Isotropic => {}
                ScatterModel::Capped => {
                    ctheta0 = 1.0 - rng.gen::<f64>() * ang_cut;
                    if rng.gen::<f64>() > ang_par {
                        ctheta0 = -ctheta0;
                    }
                }
                ScatterModel::Okhrimovskyy => {
                    ctheta0 = (ctheta0 + ang_par) / (1.0 + ang_par * ctheta0);
                }
            }
        }

        let e1 = deflect(e, loss, rgas, ctheta0, direction, rng);

        Ok(ElectronCollision {
            kind,
            level,
            energy: e1,
            n_ionisation_products: n_ion,
            n_deexcitation_products: n_dxc,
        })
    }

    /// Run the de-excitation cascade of an excitation term directly,
    /// filling the de-excitation product buffer. Returns the number of
    /// products.
    pub fn compute_deexcitation<R: Rng + ?Sized>(
        &mut self,
        term: usize,
        rng: &mut R,
    ) -> EngineResult<usize> {
        self.ensure_tables()?;
        let tables = self.tables.as_ref().ok_or_else(|| {
            EngineError::DataConsistency("collision-rate tables not built".into())
        })?;
        let level = tables.levels.get(term).ok_or_else(|| {
            EngineError::InvalidParameter(format!("level {} does not exist", term))
        })?;
        let idx = level.deexcitation.ok_or_else(|| {
            EngineError::InvalidParameter(format!("level {} has no de-excitation cascade", term))
        })?;
        let dxc = self.dxc.as_ref().ok_or_else(|| {
            EngineError::DataConsistency("de-excitation table not built".into())
        })?;
        self.dxc_products.clear();
        deexcitation::cascade(
            dxc,
            idx,
            tables.min_ion_pot,
            rng,
            &mut self.dxc_products,
            &mut self.n_penning,
        );
        Ok(self.dxc_products.len())
    }

    /// Total photon collision rate [ns^-1] at the given energy,
    /// including discrete resonance lines when radiation trapping is
    /// enabled.
    pub fn photon_collision_rate(&mut self, e: f64) -> EngineResult<f64> {
        if e <= 0.0 {
            return Err(EngineError::InvalidParameter(
                "photon energy must be positive".into(),
            ));
        }
        if e > self.e_final_gamma && self.use_auto_adjust {
            warn!(
                energy = e,
                new_limit = 1.05 * e,
                "photon energy outside table range, adjusting"
            );
            self.set_max_photon_energy(1.05 * e)?;
        }
        self.ensure_tables()?;
        let photon = self.photon.as_ref().ok_or_else(|| {
            EngineError::OpticalData("photon collision table unavailable".into())
        })?;
        let i_e = ((e / photon.e_step_gamma) as usize).min(N_ENERGY_STEPS_GAMMA - 1);
        let mut sum = photon.cf_tot_gamma[i_e];
        if self.use_deexcitation && self.use_radiation_trapping {
            if let Some(dxc) = &self.dxc {
                for lvl in &dxc.levels {
                    if lvl.cf > 0.0 && (e - lvl.energy).abs() <= lvl.width {
                        sum += lvl.cf * voigt(e - lvl.energy, lvl.s_doppler, 2.0 * lvl.g_pressure);
                    }
                }
            }
        }
        Ok(sum)
    }

    /// Sample a collision for a photon of energy `e`.
    pub fn sample_photon_collision<R: Rng + ?Sized>(
        &mut self,
        e: f64,
        rng: &mut R,
    ) -> EngineResult<PhotonCollision> {
        if e > self.e_final_gamma && self.use_auto_adjust {
            warn!(
                energy = e,
                new_limit = 1.05 * e,
                "photon energy outside table range, adjusting"
            );
            self.set_max_photon_energy(1.05 * e)?;
        } else if e <= 0.0 {
            return Err(EngineError::InvalidParameter(
                "photon energy must be positive".into(),
            ));
        }
        self.ensure_tables()?;
        let tables = self.tables.as_ref().ok_or_else(|| {
            EngineError::DataConsistency("collision-rate tables not built".into())
        })?;
        let photon = self.photon.as_ref().ok_or_else(|| {
            EngineError::OpticalData("photon collision table unavailable".into())
        })?;
        let i_e = ((e / photon.e_step_gamma) as usize).min(N_ENERGY_STEPS_GAMMA - 1);

        let mut r = photon.cf_tot_gamma[i_e];
        let mut p_line: Vec<f64> = Vec::new();
        let mut i_line: Vec<usize> = Vec::new();
        if self.use_deexcitation && self.use_radiation_trapping {
            if let Some(dxc) = &self.dxc {
                for (i, lvl) in dxc.levels.iter().enumerate() {
                    if lvl.cf > 0.0 && (e - lvl.energy).abs() <= lvl.width {
                        r += lvl.cf * voigt(e - lvl.energy, lvl.s_doppler, 2.0 * lvl.g_pressure);
                        p_line.push(r);
                        i_line.push(i);
                    }
                }
            }
        }
        r *= rng.gen::<f64>();

        if !p_line.is_empty() && r >= photon.cf_tot_gamma[i_e] {
            // The photon is absorbed by a discrete line.
            for (k, &p) in p_line.iter().enumerate() {
                if r <= p {
                    self.n_photon_collisions[PhotonCollisionType::Excitation.index()] += 1;
                    self.dxc_products.clear();
                    if let Some(dxc) = self.dxc.as_ref() {
                        deexcitation::cascade(
                            dxc,
                            i_line[k],
                            tables.min_ion_pot,
                            rng,
                            &mut self.dxc_products,
                            &mut self.n_penning,
                        );
                    }
                    return Ok(PhotonCollision {
                        kind: PhotonCollisionType::Excitation,
                        level: i_line[k],
                        energy: 0.0,
                        ctheta: 1.0,
                        secondary: None,
                        n_deexcitation_products: self.dxc_products.len(),
                    });
                }
            }
            return Err(EngineError::DataConsistency(
                "absorption line sampling failed".into(),
            ));
        }

        let term = sample_term(&photon.cf_gamma[i_e], r);
        let (gas, kind) = photon.decode(term);
        self.n_photon_collisions[kind.index()] += 1;
        let secondary = if kind == PhotonCollisionType::Ionisation {
            Some((e - tables.ion_pot[gas]).max(SMALL))
        } else {
            None
        };
        let ctheta = 2.0 * rng.gen::<f64>() - 1.0;
        Ok(PhotonCollision {
            kind,
            level: term,
            energy: 0.0,
            ctheta,
            secondary,
            n_deexcitation_products: 0,
        })
    }

    /// Secondaries of the last ionising collision.
    pub fn ionisation_products(&self) -> &[CollisionProduct] {
        &self.ion_products
    }

    /// Photons and electrons of the last de-excitation cascade (or
    /// simplified Penning transfer).
    pub fn deexcitation_products(&self) -> &[CollisionProduct] {
        &self.dxc_products
    }

    /// Total number of electron collisions since the last reset.
    pub fn n_electron_collisions(&self) -> u64 {
        self.n_collisions.iter().sum()
    }

    pub fn n_electron_collisions_of(&self, kind: CollisionType) -> u64 {
        self.n_collisions[kind.index()]
    }

    /// Per-term collision counts.
    pub fn n_collisions_detailed(&self) -> &[u64] {
        &self.n_collisions_detailed
    }

    /// Number of Penning ionisations since the last reset.
    pub fn n_penning_transfers(&self) -> u64 {
        self.n_penning
    }

    pub fn n_photon_collisions(&self) -> u64 {
        self.n_photon_collisions.iter().sum()
    }

    pub fn n_photon_collisions_of(&self, kind: PhotonCollisionType) -> u64 {
        self.n_photon_collisions[kind.index()]
    }

    pub fn reset_collision_counters(&mut self) {
        self.n_collisions = [0; N_CS_TYPES];
        for n in &mut self.n_collisions_detailed {
            *n = 0;
        }
        self.n_penning = 0;
        self.n_photon_collisions = [0; N_CS_TYPES_GAMMA];
    }
}

/// Binary search of the cumulative probability row.
fn sample_term(row: &[f64], r: f64) -> usize {
    let last = row.len() - 1;
    if r <= row[0] {
        return 0;
    }
    if r >= row[last] {
        return last;
    }
    let mut i_low = 0;
    let mut i_up = last;
    while i_up - i_low > 1 {
        let i_mid = (i_low + i_up) >> 1;
        if r < row[i_mid] {
            i_up = i_mid;
        } else {
            i_low = i_mid;
        }
    }
    i_up
}

/// Two-body collision kinematics: deflect the direction by the sampled
/// centre-of-mass angle and a random azimuth, and return the electron
/// energy after the collision.
fn deflect<R: Rng + ?Sized>(
    e: f64,
    loss: f64,
    rgas: f64,
    ctheta0: f64,
    direction: &mut [f64; 3],
    rng: &mut R,
) -> f64 {
    let s1 = rgas;
    let s2 = s1 * s1 / (s1 - 1.0);
    let theta0 = ctheta0.acos();
    let arg = (1.0 - s1 * loss / e).max(SMALL);
    let d = 1.0 - ctheta0 * arg.sqrt();

    let e1 = (e * (1.0 - loss / (s1 * e) - 2.0 * d / s2)).max(SMALL);
    let q = (((e / e1) * arg).sqrt() / s1).min(1.0);
    let theta = (q * theta0.sin()).asin();
    let mut ctheta = theta.cos();
    if ctheta0 < 0.0 {
        let u = (s1 - 1.0) * (s1 - 1.0) / arg;
        if ctheta0 * ctheta0 > u {
            ctheta = -ctheta;
        }
    }
    let stheta = theta.sin();

    let [dx, dy, dz] = *direction;
    let dz = dz.min(1.0);
    let arg_z = (dx * dx + dy * dy).sqrt();
    let phi = 2.0 * PI * rng.gen::<f64>();
    let (sphi, cphi) = phi.sin_cos();

    if arg_z == 0.0 {
        direction[0] = cphi * stheta;
        direction[1] = sphi * stheta;
        direction[2] = ctheta;
    } else {
        let a = stheta / arg_z;
        direction[0] = dx * ctheta - a * (dy * cphi + dx * dz * sphi);
        direction[1] = dy * ctheta + a * (dx * cphi - dy * dz * sphi);
        direction[2] = dz * ctheta + arg_z * stheta * sphi;
    }
    e1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FastRng;

    #[test]
    fn test_sample_term_picks_first_and_last() {
        let row = [0.2, 0.5, 0.9, 1.0];
        assert_eq!(sample_term(&row, 0.0), 0);
        assert_eq!(sample_term(&row, 0.1), 0);
        assert_eq!(sample_term(&row, 0.3), 1);
        assert_eq!(sample_term(&row, 0.7), 2);
        assert_eq!(sample_term(&row, 1.0), 3);
    }

    #[test]
    fn test_deflect_conserves_energy_bound() {
        let mut rng = FastRng::new(17);
        let rgas = 1.0 + 1.37e-5;
        for _ in 0..1000 {
            let e = 1.0 + 39.0 * rng.random();
            let loss = 0.9 * e * rng.random();
            let ctheta0 = 1.0 - 2.0 * rng.random();
            let mut dir = [0.0, 0.0, 1.0];
            let e1 = deflect(e, loss, rgas, ctheta0, &mut dir, &mut rng);
            assert!(e1 > 0.0);
            assert!(e1 <= e, "e1 = {} must not exceed e = {}", e1, e);
        }
    }

    #[test]
    fn test_deflect_keeps_direction_normalized() {
        let mut rng = FastRng::new(23);
        let rgas = 1.0 + 1.37e-5;
        for _ in 0..1000 {
            let mut dir = [0.6, 0.0, 0.8];
            deflect(10.0, 0.5, rgas, 1.0 - 2.0 * rng.random(), &mut dir, &mut rng);
            let norm = dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2];
            assert!((norm - 1.0).abs() < 1e-9, "norm^2 = {}", norm);
        }
    }

    #[test]
    fn test_elastic_deflection_loses_little_energy() {
        let mut rng = FastRng::new(5);
        let rgas = 1.0 + 1.37e-5;
        for _ in 0..1000 {
            let mut dir = [0.0, 0.0, 1.0];
            let e1 = deflect(10.0, 0.0, rgas, 1.0 - 2.0 * rng.random(), &mut dir, &mut rng);
            // The fractional elastic energy loss is of order 2 m_e / M.
            assert!(e1 > 10.0 * (1.0 - 1e-3));
            assert!(e1 <= 10.0);
        }
    }
}
