//! Reference event generator
//!
//! A small, fully deterministic soft-QCD generator that honours the same
//! settings and event-record conventions as the real external generator:
//!
//! - beams sit in slots 1 and 2, outgoing particles from slot 3,
//! - process codes 101 (non-diffractive), 102 (elastic), 103/104 (single
//!   diffractive, side A/B excited), 105 (double diffractive), 106 (central
//!   diffractive),
//! - code 106 leaves `t_hat` unfilled (0.0); its momentum transfer is only
//!   available from the event record.
//!
//! The event record is expressed in the collision rest frame.

use std::f64::consts::PI;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use super::physics::{
    self, beam_mass, diffractive_id, two_body_momentum, PartialSigmas, M_PION, MIN_ECM, XI_MAX,
};
use super::{EventGenerator, GeneratorError};
use crate::models::{EventInfo, EventRecord, Particle, Vec4};
use crate::rng::RandomStream;
use crate::settings::{SettingKey, SettingTarget, SettingValue};

/// Seed used when `Random:setSeed` is off.
pub const DEFAULT_SEED: u64 = 19_780_503;

/// Process codes in channel order.
const PROCESS_CODES: [i32; 6] = [101, 102, 103, 104, 105, 106];
const ND: usize = 0;
const EL: usize = 1;
const SD_XB: usize = 2;
const SD_AX: usize = 3;
const DD: usize = 4;
const CD: usize = 5;

/// Smallest mass fraction per side in central diffraction.
const XI_CD_MIN: f64 = 1e-4;
/// t slope per side in central diffraction, GeV⁻².
const CD_SLOPE: f64 = 2.0 * physics::B_PROTON;
/// t slope for non-diffractive cluster pairs, GeV⁻².
const ND_SLOPE: f64 = 1.0;

/// PDG-style codes for record entries without a physical particle.
const ID_SYSTEM: i32 = 90;
const ID_STRING: i32 = 92;
const ID_CENTRAL_SYSTEM: i32 = 9_900_110;

/// Values read from the settings store at init.
#[derive(Debug, Clone)]
struct ToySettings {
    all: bool,
    elastic: bool,
    single_diffractive: bool,
    double_diffractive: bool,
    central_diffractive: bool,
    non_diffractive: bool,
    coulomb: bool,
    t_abs_min: f64,
    set_seed: bool,
    seed: i32,
    frame_type: i32,
    id_a: i32,
    id_b: i32,
    e_cm: f64,
    e_a: f64,
    e_b: f64,
}

impl Default for ToySettings {
    fn default() -> Self {
        let flag = |key: SettingKey| key.default_value().as_flag().unwrap_or(false);
        let mode = |key: SettingKey| key.default_value().as_mode().unwrap_or(0);
        let parm = |key: SettingKey| key.default_value().as_parm().unwrap_or(0.0);
        Self {
            all: flag(SettingKey::SoftQcdAll),
            elastic: flag(SettingKey::SoftQcdElastic),
            single_diffractive: flag(SettingKey::SoftQcdSingleDiffractive),
            double_diffractive: flag(SettingKey::SoftQcdDoubleDiffractive),
            central_diffractive: flag(SettingKey::SoftQcdCentralDiffractive),
            non_diffractive: flag(SettingKey::SoftQcdNonDiffractive),
            coulomb: flag(SettingKey::SigmaElasticCoulomb),
            t_abs_min: parm(SettingKey::SigmaElasticTAbsMin),
            set_seed: flag(SettingKey::RandomSetSeed),
            seed: mode(SettingKey::RandomSeed),
            frame_type: mode(SettingKey::BeamsFrameType),
            id_a: mode(SettingKey::BeamsIdA),
            id_b: mode(SettingKey::BeamsIdB),
            e_cm: parm(SettingKey::BeamsECm),
            e_a: parm(SettingKey::BeamsEA),
            e_b: parm(SettingKey::BeamsEB),
        }
    }
}

/// Collision kinematics fixed at init.
#[derive(Debug, Clone, Copy)]
struct Kinematics {
    e_cm: f64,
    s: f64,
    id_a: i32,
    id_b: i32,
    m_a: f64,
    m_b: f64,
    /// Beam momentum in the rest frame
    p_cm: f64,
    beam_a: Vec4,
    beam_b: Vec4,
}

/// Deterministic soft-QCD reference generator.
///
/// # Example
/// ```
/// use generator_adapter_core_rs::generator::{EventGenerator, ToyGenerator};
/// use generator_adapter_core_rs::settings::{SettingKey, SettingTarget, SettingValue};
///
/// let mut gen = ToyGenerator::new();
/// gen.apply_setting(SettingKey::SoftQcdElastic, SettingValue::Flag(true)).unwrap();
/// gen.init().unwrap();
/// assert!(gen.next_event());
/// assert_eq!(gen.info().code, 102);
/// ```
#[derive(Debug, Clone)]
pub struct ToyGenerator {
    settings: ToySettings,
    initialized: bool,
    rng: RandomStream,
    seed_used: u64,
    kinematics: Option<Kinematics>,
    sigmas: PartialSigmas,
    /// Per-channel weights, zero for disabled channels
    weights: [f64; 6],
    accepted: [u64; 6],
    info: EventInfo,
    event: EventRecord,
}

impl Default for ToyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ToyGenerator {
    pub fn new() -> Self {
        Self {
            settings: ToySettings::default(),
            initialized: false,
            rng: RandomStream::new(DEFAULT_SEED),
            seed_used: DEFAULT_SEED,
            kinematics: None,
            sigmas: PartialSigmas::default(),
            weights: [0.0; 6],
            accepted: [0; 6],
            info: EventInfo::default(),
            event: EventRecord::new(),
        }
    }

    /// Seed the random stream was started from (meaningful after init).
    pub fn seed_used(&self) -> u64 {
        self.seed_used
    }

    /// Current random stream position.
    pub fn rng_state(&self) -> u64 {
        self.rng.state()
    }

    /// Partial cross sections computed at init.
    pub fn partial_sigmas(&self) -> &PartialSigmas {
        &self.sigmas
    }

    /// Collision energy in GeV, once initialized.
    pub fn e_cm(&self) -> Option<f64> {
        self.kinematics.map(|k| k.e_cm)
    }

    fn resolve_seed(&self) -> u64 {
        if !self.settings.set_seed {
            DEFAULT_SEED
        } else if self.settings.seed < 0 {
            system_seed()
        } else {
            self.settings.seed as u64
        }
    }

    fn resolve_kinematics(&self) -> Result<Kinematics, GeneratorError> {
        let s = &self.settings;
        let m_a = beam_mass(s.id_a).ok_or_else(|| {
            GeneratorError::Init(format!("unsupported beam A particle id {}", s.id_a))
        })?;
        let m_b = beam_mass(s.id_b).ok_or_else(|| {
            GeneratorError::Init(format!("unsupported beam B particle id {}", s.id_b))
        })?;

        let e_cm = match s.frame_type {
            1 => s.e_cm,
            2 => {
                if s.e_a < m_a || s.e_b < m_b {
                    return Err(GeneratorError::Init(format!(
                        "beam energies ({} GeV, {} GeV) below the beam particle masses",
                        s.e_a, s.e_b
                    )));
                }
                physics::cm_energy(m_a, s.e_a, m_b, s.e_b)
            }
            3 => {
                return Err(GeneratorError::Init(
                    "frame type 3 (arbitrary beam momenta) is not supported".to_string(),
                ))
            }
            4 => {
                return Err(GeneratorError::Init(
                    "frame type 4 requires a Les Houches event file".to_string(),
                ))
            }
            other => {
                return Err(GeneratorError::Init(format!("unknown frame type {}", other)));
            }
        };

        if !e_cm.is_finite() || e_cm < MIN_ECM {
            return Err(GeneratorError::Init(format!(
                "collision energy {} GeV below the {} GeV soft-QCD threshold",
                e_cm, MIN_ECM
            )));
        }
        let s_hat = e_cm * e_cm;
        if !s_hat.is_finite() {
            return Err(GeneratorError::Init(format!(
                "collision energy {} GeV too large to square",
                e_cm
            )));
        }

        let p_cm = two_body_momentum(e_cm, m_a, m_b).ok_or_else(|| {
            GeneratorError::Init(format!("collision energy {} GeV below beam masses", e_cm))
        })?;
        let beam_a = Vec4::new(0.0, 0.0, p_cm, (m_a * m_a + p_cm * p_cm).sqrt());
        let beam_b = Vec4::new(0.0, 0.0, -p_cm, (m_b * m_b + p_cm * p_cm).sqrt());

        Ok(Kinematics {
            e_cm,
            s: s_hat,
            id_a: s.id_a,
            id_b: s.id_b,
            m_a,
            m_b,
            p_cm,
            beam_a,
            beam_b,
        })
    }

    fn channel_weights(&self) -> [f64; 6] {
        let s = &self.settings;
        let on = |flag: bool, sigma: f64| if s.all || flag { sigma } else { 0.0 };
        [
            on(s.non_diffractive, self.sigmas.non_diffractive),
            on(s.elastic, self.sigmas.elastic()),
            on(s.single_diffractive, self.sigmas.single_diffractive_xb),
            on(s.single_diffractive, self.sigmas.single_diffractive_ax),
            on(s.double_diffractive, self.sigmas.double_diffractive),
            on(s.central_diffractive, self.sigmas.central_diffractive),
        ]
    }

    /// Outgoing pair of a 2 → 2 process in the rest frame. `t_excess` is
    /// how far |t| between beam A and the first outgoing particle lies above
    /// its kinematic minimum. Returns the pair and |t|, or `None` when the
    /// masses or |t| are out of reach.
    fn two_body(
        &mut self,
        kin: &Kinematics,
        m3: f64,
        m4: f64,
        t_excess: f64,
    ) -> Option<(Vec4, Vec4, f64)> {
        let p_out = two_body_momentum(kin.e_cm, m3, m4)?;
        let e3 = (m3 * m3 + p_out * p_out).sqrt();
        let e4 = (m4 * m4 + p_out * p_out).sqrt();

        // |t| at cos θ = 1.
        let t_kin_min =
            (2.0 * kin.beam_a.e * e3 - 2.0 * kin.p_cm * p_out - kin.m_a * kin.m_a - m3 * m3).max(0.0);
        let t_abs = t_kin_min + t_excess;
        let cos_theta = (2.0 * kin.beam_a.e * e3 - kin.m_a * kin.m_a - m3 * m3 - t_abs)
            / (2.0 * kin.p_cm * p_out);
        if cos_theta < -1.0 {
            return None;
        }
        let cos_theta = cos_theta.min(1.0);
        let sin_theta = ((1.0 - cos_theta) * (1.0 + cos_theta)).sqrt();
        let phi = 2.0 * PI * self.rng.next_f64();

        let px = p_out * sin_theta * phi.cos();
        let py = p_out * sin_theta * phi.sin();
        let pz = p_out * cos_theta;
        Some((Vec4::new(px, py, pz, e3), Vec4::new(-px, -py, -pz, e4), t_abs))
    }

    fn begin_record(&mut self, kin: &Kinematics) {
        self.event.clear();
        self.event.append(Particle::new(
            ID_SYSTEM,
            -11,
            kin.beam_a + kin.beam_b,
            kin.e_cm,
        ));
        self.event
            .append(Particle::new(kin.id_a, -12, kin.beam_a, kin.m_a));
        self.event
            .append(Particle::new(kin.id_b, -12, kin.beam_b, kin.m_b));
    }

    fn sample_elastic(&mut self, kin: &Kinematics) -> Option<EventInfo> {
        let slope = physics::elastic_slope(kin.s);
        let coulomb_weight = self.sigmas.elastic_coulomb;
        let nuclear_weight = self.sigmas.elastic_nuclear;
        let t_min = if self.settings.coulomb {
            self.settings.t_abs_min
        } else {
            0.0
        };

        let t_excess = match self.rng.choose_weighted(&[nuclear_weight, coulomb_weight])? {
            0 => t_min + self.rng.exponential(slope),
            _ => {
                // dσ/dt ∝ 1/t² between t_min and s.
                let inv = 1.0 / t_min - self.rng.next_f64() * (1.0 / t_min - 1.0 / kin.s);
                1.0 / inv
            }
        };

        let (p3, p4, t_abs) = self.two_body(kin, kin.m_a, kin.m_b, t_excess)?;
        self.begin_record(kin);
        self.event.append(Particle::new(kin.id_a, 1, p3, kin.m_a));
        self.event.append(Particle::new(kin.id_b, 1, p4, kin.m_b));
        Some(EventInfo {
            code: PROCESS_CODES[EL],
            t_hat: -t_abs,
            pt_hat: p3.pt(),
        })
    }

    fn sample_single_diffractive(&mut self, kin: &Kinematics, excite_a: bool) -> Option<EventInfo> {
        let excited_mass = if excite_a { kin.m_a } else { kin.m_b };
        let xi_min = (excited_mass + 2.0 * M_PION).powi(2) / kin.s;
        if xi_min >= XI_MAX {
            return None;
        }
        let xi = self.rng.log_uniform(xi_min, XI_MAX);
        let m_x = (xi * kin.s).sqrt();
        let t_excess = self.rng.exponential(physics::single_diffractive_slope(xi));

        let (m3, m4, id3, id4, code) = if excite_a {
            (m_x, kin.m_b, diffractive_id(kin.id_a), kin.id_b, PROCESS_CODES[SD_XB])
        } else {
            (kin.m_a, m_x, kin.id_a, diffractive_id(kin.id_b), PROCESS_CODES[SD_AX])
        };

        let (p3, p4, t_abs) = self.two_body(kin, m3, m4, t_excess)?;
        self.begin_record(kin);
        self.event.append(Particle::new(id3, 1, p3, m3));
        self.event.append(Particle::new(id4, 1, p4, m4));
        Some(EventInfo {
            code,
            t_hat: -t_abs,
            pt_hat: p3.pt(),
        })
    }

    fn sample_double_diffractive(&mut self, kin: &Kinematics) -> Option<EventInfo> {
        let xi_min_a = (kin.m_a + 2.0 * M_PION).powi(2) / kin.s;
        let xi_min_b = (kin.m_b + 2.0 * M_PION).powi(2) / kin.s;
        if xi_min_a >= XI_MAX || xi_min_b >= XI_MAX {
            return None;
        }
        let m1_sq = self.rng.log_uniform(xi_min_a, XI_MAX) * kin.s;
        let m2_sq = self.rng.log_uniform(xi_min_b, XI_MAX) * kin.s;
        let slope = physics::double_diffractive_slope(kin.s, m1_sq, m2_sq);
        let t_excess = self.rng.exponential(slope);

        let (m1, m2) = (m1_sq.sqrt(), m2_sq.sqrt());
        let (p3, p4, t_abs) = self.two_body(kin, m1, m2, t_excess)?;
        self.begin_record(kin);
        self.event
            .append(Particle::new(diffractive_id(kin.id_a), 1, p3, m1));
        self.event
            .append(Particle::new(diffractive_id(kin.id_b), 1, p4, m2));
        Some(EventInfo {
            code: PROCESS_CODES[DD],
            t_hat: -t_abs,
            pt_hat: p3.pt(),
        })
    }

    fn sample_central_diffractive(&mut self, kin: &Kinematics) -> Option<EventInfo> {
        let xi_a = self.rng.log_uniform(XI_CD_MIN, XI_MAX);
        let xi_b = self.rng.log_uniform(XI_CD_MIN, XI_MAX);
        let t_a = self.rng.exponential(CD_SLOPE);
        let t_b = self.rng.exponential(CD_SLOPE);
        let phi_a = 2.0 * PI * self.rng.next_f64();
        let phi_b = 2.0 * PI * self.rng.next_f64();

        let outgoing = |m: f64, xi: f64, t_abs: f64, phi: f64, direction: f64| {
            let pt = (t_abs * (1.0 - xi)).sqrt();
            let pz = direction * (1.0 - xi) * kin.p_cm;
            let e = (m * m + pt * pt + pz * pz).sqrt();
            Vec4::new(pt * phi.cos(), pt * phi.sin(), pz, e)
        };
        let p3 = outgoing(kin.m_a, xi_a, t_a, phi_a, 1.0);
        let p4 = outgoing(kin.m_b, xi_b, t_b, phi_b, -1.0);
        let central = kin.beam_a + kin.beam_b - p3 - p4;

        let m_x_sq = central.m2_calc();
        if central.e <= 0.0 || m_x_sq <= (2.0 * M_PION).powi(2) {
            return None;
        }

        self.begin_record(kin);
        self.event.append(Particle::new(kin.id_a, 1, p3, kin.m_a));
        self.event.append(Particle::new(kin.id_b, 1, p4, kin.m_b));
        self.event
            .append(Particle::new(ID_CENTRAL_SYSTEM, 1, central, m_x_sq.sqrt()));
        // The generic t field is not filled for this process.
        Some(EventInfo {
            code: PROCESS_CODES[CD],
            t_hat: 0.0,
            pt_hat: central.pt(),
        })
    }

    fn sample_non_diffractive(&mut self, kin: &Kinematics) -> Option<EventInfo> {
        let xi_min = (2.0 * M_PION).powi(2) / kin.s;
        let m1 = (self.rng.log_uniform(xi_min, 0.25) * kin.s).sqrt();
        let m2 = (self.rng.log_uniform(xi_min, 0.25) * kin.s).sqrt();
        let t_excess = self.rng.exponential(ND_SLOPE);

        let (p3, p4, t_abs) = self.two_body(kin, m1, m2, t_excess)?;
        self.begin_record(kin);
        self.event.append(Particle::new(ID_STRING, 1, p3, m1));
        self.event.append(Particle::new(ID_STRING, 1, p4, m2));
        Some(EventInfo {
            code: PROCESS_CODES[ND],
            t_hat: -t_abs,
            pt_hat: p3.pt(),
        })
    }
}

fn system_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    nanos ^ (u64::from(std::process::id()) << 32)
}

impl SettingTarget for ToyGenerator {
    fn apply_setting(
        &mut self,
        key: SettingKey,
        value: SettingValue,
    ) -> Result<(), GeneratorError> {
        if self.initialized {
            return Err(GeneratorError::Setting(format!(
                "{} cannot change after init",
                key
            )));
        }
        if value.kind() != key.kind() {
            return Err(GeneratorError::Setting(format!(
                "{} expects a {} value, got {}",
                key,
                key.kind(),
                value
            )));
        }

        let s = &mut self.settings;
        match (key, value) {
            (SettingKey::SoftQcdAll, SettingValue::Flag(v)) => s.all = v,
            (SettingKey::SoftQcdElastic, SettingValue::Flag(v)) => s.elastic = v,
            (SettingKey::SoftQcdSingleDiffractive, SettingValue::Flag(v)) => {
                s.single_diffractive = v
            }
            (SettingKey::SoftQcdDoubleDiffractive, SettingValue::Flag(v)) => {
                s.double_diffractive = v
            }
            (SettingKey::SoftQcdCentralDiffractive, SettingValue::Flag(v)) => {
                s.central_diffractive = v
            }
            (SettingKey::SoftQcdNonDiffractive, SettingValue::Flag(v)) => s.non_diffractive = v,
            (SettingKey::SigmaElasticCoulomb, SettingValue::Flag(v)) => s.coulomb = v,
            (SettingKey::SigmaElasticTAbsMin, SettingValue::Parm(v)) => s.t_abs_min = v,
            (SettingKey::RandomSetSeed, SettingValue::Flag(v)) => s.set_seed = v,
            (SettingKey::RandomSeed, SettingValue::Mode(v)) => s.seed = v,
            (SettingKey::BeamsFrameType, SettingValue::Mode(v)) => s.frame_type = v,
            (SettingKey::BeamsIdA, SettingValue::Mode(v)) => s.id_a = v,
            (SettingKey::BeamsIdB, SettingValue::Mode(v)) => s.id_b = v,
            (SettingKey::BeamsECm, SettingValue::Parm(v)) => s.e_cm = v,
            (SettingKey::BeamsEA, SettingValue::Parm(v)) => s.e_a = v,
            (SettingKey::BeamsEB, SettingValue::Parm(v)) => s.e_b = v,
            // Printing and cross-section mode switches have no effect here.
            _ => {}
        }
        Ok(())
    }
}

impl EventGenerator for ToyGenerator {
    fn init(&mut self) -> Result<(), GeneratorError> {
        if self.initialized {
            return Err(GeneratorError::Init("generator already initialized".to_string()));
        }

        let kin = self.resolve_kinematics()?;
        let coulomb = self.settings.coulomb.then_some(self.settings.t_abs_min);
        if let Some(t_min) = coulomb {
            if !(t_min > 0.0) {
                return Err(GeneratorError::Init(format!(
                    "Coulomb |t| cut must be positive, got {}",
                    t_min
                )));
            }
        }

        let sigmas = PartialSigmas::compute(kin.e_cm, kin.id_a * kin.id_b < 0, coulomb);
        if !sigmas.is_finite() {
            return Err(GeneratorError::Init(format!(
                "cross sections at {} GeV are not finite: {:?}",
                kin.e_cm, sigmas
            )));
        }
        self.sigmas = sigmas;
        self.weights = self.channel_weights();
        self.seed_used = self.resolve_seed();
        self.rng = RandomStream::new(self.seed_used);
        self.kinematics = Some(kin);
        self.initialized = true;

        info!(
            e_cm = kin.e_cm,
            sigma_total = self.sigmas.total(),
            sigma_elastic = self.sigmas.elastic(),
            seed = self.seed_used,
            "reference generator initialized"
        );
        if self.weights.iter().all(|w| *w == 0.0) {
            debug!("no soft-QCD process switched on; every sample will fail");
        }
        Ok(())
    }

    fn next_event(&mut self) -> bool {
        self.event.clear();
        self.info = EventInfo::default();

        let Some(kin) = self.kinematics.filter(|_| self.initialized) else {
            return false;
        };
        let Some(channel) = self.rng.choose_weighted(&self.weights) else {
            return false;
        };

        let outcome = match channel {
            ND => self.sample_non_diffractive(&kin),
            EL => self.sample_elastic(&kin),
            SD_XB => self.sample_single_diffractive(&kin, true),
            SD_AX => self.sample_single_diffractive(&kin, false),
            DD => self.sample_double_diffractive(&kin),
            _ => self.sample_central_diffractive(&kin),
        };

        match outcome {
            Some(info) => {
                self.accepted[channel] += 1;
                self.info = info;
                true
            }
            None => {
                self.event.clear();
                self.info = EventInfo {
                    code: PROCESS_CODES[channel],
                    ..EventInfo::default()
                };
                false
            }
        }
    }

    fn info(&self) -> &EventInfo {
        &self.info
    }

    fn event(&self) -> &EventRecord {
        &self.event
    }

    fn sigma_total(&self) -> f64 {
        if self.initialized {
            self.sigmas.total()
        } else {
            0.0
        }
    }

    /// Before any accepted event (or with elastic switched off) this is the
    /// model value; afterwards, the selected cross section times the observed
    /// elastic fraction, which converges on the model value.
    fn sigma_elastic(&self) -> f64 {
        if !self.initialized {
            return 0.0;
        }
        let accepted_total: u64 = self.accepted.iter().sum();
        if self.weights[EL] == 0.0 || accepted_total == 0 {
            return self.sigmas.elastic();
        }
        let selected: f64 = self.weights.iter().sum();
        selected * self.accepted[EL] as f64 / accepted_total as f64
    }
}
