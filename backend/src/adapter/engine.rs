//! Adapter lifecycle and event sampler
//!
//! # Critical Invariants
//!
//! 1. Settings change only while configuring; the registry freezes the
//!    moment initialization is attempted.
//! 2. The generator's init runs at most once per adapter.
//! 3. Sampling and cross-section queries require a successful init.
//! 4. A failed sample is a result (`status == false`), never an error.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::types::{BeamConfig, ProcessSelection, SeedMode};
use crate::generator::EventGenerator;
use crate::models::event::{SLOT_BEAM_A, SLOT_FIRST_OUTGOING};
use crate::models::{CrossSectionSummary, EventRecord, EventResult, SamplerStats};
use crate::settings::snapshot::DEFAULT_SNAPSHOT_FILE;
use crate::settings::{ConfigError, SettingKey, SettingValue, SettingsRegistry};

/// Process code whose generic t field the generator leaves unfilled.
pub const CENTRAL_DIFFRACTIVE_CODE: i32 = 106;

/// Errors surfaced by the adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generator already initialized")]
    AlreadyInitialized,

    #[error("Generator initialization failed: {0}")]
    Init(String),

    #[error("Generator initialization failed earlier; create a new adapter")]
    InitFailed,

    #[error("Generator not initialized")]
    NotInitialized,

    #[error("Invalid run configuration: {0}")]
    RunConfig(String),
}

/// Lifecycle phase of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting settings
    Configuring,
    /// Generator up; sampling allowed
    Initialized,
    /// Generator refused to start; terminal
    Failed,
}

/// Owned, single-caller handle over one event generator.
///
/// Not meant to be shared between threads: a host wanting parallel
/// throughput builds one adapter (and generator) per worker.
///
/// # Example
/// ```
/// use generator_adapter_core_rs::adapter::{BeamConfig, GeneratorAdapter, ProcessSelection};
/// use generator_adapter_core_rs::generator::ToyGenerator;
///
/// let mut adapter = GeneratorAdapter::new(ToyGenerator::new()).with_snapshot_path(None);
/// adapter.apply_defaults().unwrap();
/// adapter.set_processes(ProcessSelection::elastic_only()).unwrap();
/// adapter.set_seed(42).unwrap();
/// adapter
///     .set_beam(BeamConfig { frame_type: 2, id_a: 2212, id_b: 2212, e_a: 6500.0, e_b: 6500.0 })
///     .unwrap();
/// adapter.initialize().unwrap();
///
/// let event = adapter.sample_event().unwrap();
/// assert!(event.status);
/// assert_eq!(event.process_code, 102);
/// ```
pub struct GeneratorAdapter<G: EventGenerator> {
    generator: G,
    registry: SettingsRegistry,
    phase: Phase,
    run_id: Uuid,
    snapshot_path: Option<PathBuf>,
    stats: SamplerStats,
}

impl<G: EventGenerator> GeneratorAdapter<G> {
    /// Wrap `generator`. The settings snapshot goes to
    /// `generator_settings.dat` in the working directory unless changed with
    /// [`with_snapshot_path`](Self::with_snapshot_path).
    pub fn new(generator: G) -> Self {
        let run_id = Uuid::new_v4();
        debug!(run_id = %run_id, "generator adapter created");
        Self {
            generator,
            registry: SettingsRegistry::new(),
            phase: Phase::Configuring,
            run_id,
            snapshot_path: Some(PathBuf::from(DEFAULT_SNAPSHOT_FILE)),
            stats: SamplerStats::default(),
        }
    }

    /// Where to write the changed-settings snapshot; `None` disables it.
    pub fn with_snapshot_path(mut self, path: Option<PathBuf>) -> Self {
        self.snapshot_path = path;
        self
    }

    pub fn set_snapshot_path(&mut self, path: Option<PathBuf>) {
        self.snapshot_path = path;
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn registry(&self) -> &SettingsRegistry {
        &self.registry
    }

    /// Read-only access to the wrapped generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    // ========================================================================
    // Settings Registry Proxy
    // ========================================================================

    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), AdapterError> {
        self.registry.set(&mut self.generator, key, value)?;
        Ok(())
    }

    pub fn set_flag(&mut self, key: SettingKey, value: bool) -> Result<(), AdapterError> {
        self.set(key, SettingValue::Flag(value))
    }

    pub fn set_mode(&mut self, key: SettingKey, value: i32) -> Result<(), AdapterError> {
        self.set(key, SettingValue::Mode(value))
    }

    pub fn set_parm(&mut self, key: SettingKey, value: f64) -> Result<(), AdapterError> {
        self.set(key, SettingValue::Parm(value))
    }

    /// Apply a setting by its native name, e.g. `("SoftQCD:elastic", "on")`.
    pub fn set_by_name(&mut self, name: &str, raw: &str) -> Result<(), AdapterError> {
        self.registry.set_by_name(&mut self.generator, name, raw)?;
        Ok(())
    }

    /// Apply a settings file. Returns the number of settings applied.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, AdapterError> {
        info!(run_id = %self.run_id, path = %path.display(), "loading settings from external file");
        Ok(self.registry.load_file(&mut self.generator, path)?)
    }

    // ========================================================================
    // Beam/Process Configuration
    // ========================================================================

    /// Baseline settings every run starts from.
    pub fn apply_defaults(&mut self) -> Result<(), AdapterError> {
        info!(run_id = %self.run_id, "setting defaults");
        self.set_flag(SettingKey::InitShowChangedSettings, true)?;
        self.set_flag(SettingKey::InitShowChangedParticleData, false)?;
        self.set_mode(SettingKey::SigmaTotalMode, 3)?;
        self.set_mode(SettingKey::SigmaDiffractiveMode, 3)?;
        Ok(())
    }

    pub fn set_processes(&mut self, processes: ProcessSelection) -> Result<(), AdapterError> {
        info!(run_id = %self.run_id, ?processes, "setting processes");
        if !processes.any() {
            warn!(run_id = %self.run_id, "no process selected; every sample will fail");
        }
        self.apply_batch(&[
            (SettingKey::SoftQcdElastic, SettingValue::Flag(processes.elastic)),
            (
                SettingKey::SoftQcdSingleDiffractive,
                SettingValue::Flag(processes.single_diffractive),
            ),
            (
                SettingKey::SoftQcdDoubleDiffractive,
                SettingValue::Flag(processes.double_diffractive),
            ),
            (
                SettingKey::SoftQcdCentralDiffractive,
                SettingValue::Flag(processes.central_diffractive),
            ),
            (
                SettingKey::SoftQcdNonDiffractive,
                SettingValue::Flag(processes.non_diffractive),
            ),
        ])
    }

    /// Switch the Coulomb term in elastic scattering and set its |t| cut.
    pub fn set_coulomb(&mut self, enabled: bool, t_abs_min: f64) -> Result<(), AdapterError> {
        self.ensure_configuring(SettingKey::SigmaElasticCoulomb)?;
        if !t_abs_min.is_finite() || t_abs_min <= 0.0 {
            return Err(AdapterError::Validation(format!(
                "Coulomb |t| cut must be positive, got {}",
                t_abs_min
            )));
        }
        info!(run_id = %self.run_id, enabled, t_abs_min, "setting Coulomb term");
        self.apply_batch(&[
            (SettingKey::SigmaElasticCoulomb, SettingValue::Flag(enabled)),
            (SettingKey::SigmaElasticTAbsMin, SettingValue::Parm(t_abs_min)),
        ])
    }

    /// Seed the generator. Negative seeds select [`SeedMode::SystemDerived`],
    /// which makes the run non-reproducible.
    pub fn set_seed(&mut self, seed: i32) -> Result<SeedMode, AdapterError> {
        self.ensure_configuring(SettingKey::RandomSeed)?;
        let mode = SeedMode::from_host(seed).map_err(AdapterError::Validation)?;
        info!(run_id = %self.run_id, ?mode, "setting random seed");
        if !mode.is_deterministic() {
            warn!(run_id = %self.run_id, "system-derived seed: event sequence will not be reproducible");
        }
        self.apply_batch(&[
            (SettingKey::RandomSetSeed, SettingValue::Flag(true)),
            (SettingKey::RandomSeed, SettingValue::Mode(mode.native_value())),
        ])?;
        Ok(mode)
    }

    pub fn set_beam(&mut self, beam: BeamConfig) -> Result<(), AdapterError> {
        self.ensure_configuring(SettingKey::BeamsFrameType)?;
        beam.validate().map_err(AdapterError::Validation)?;
        info!(run_id = %self.run_id, ?beam, "setting beam parameters");
        self.apply_batch(&[
            (SettingKey::BeamsFrameType, SettingValue::Mode(beam.frame_type)),
            (SettingKey::BeamsIdA, SettingValue::Mode(beam.id_a)),
            (SettingKey::BeamsIdB, SettingValue::Mode(beam.id_b)),
            (SettingKey::BeamsEA, SettingValue::Parm(beam.e_a)),
            (SettingKey::BeamsEB, SettingValue::Parm(beam.e_b)),
        ])
    }

    /// Validate every entry first, so a value the registry rejects leaves
    /// nothing applied. A refusal from the generator itself
    /// (`ConfigError::Rejected`) stops the batch at that entry; the entries
    /// before it stay forwarded and recorded.
    fn apply_batch(&mut self, entries: &[(SettingKey, SettingValue)]) -> Result<(), AdapterError> {
        if let Some((key, _)) = entries.first() {
            self.ensure_configuring(*key)?;
        }
        for (key, value) in entries {
            SettingsRegistry::validate(*key, *value)?;
        }
        for (key, value) in entries {
            self.set(*key, *value)?;
        }
        Ok(())
    }

    fn ensure_configuring(&self, key: SettingKey) -> Result<(), AdapterError> {
        if self.registry.is_frozen() {
            return Err(ConfigError::Frozen(key).into());
        }
        Ok(())
    }

    // ========================================================================
    // Initialization Controller
    // ========================================================================

    /// Bring the generator up. Call exactly once, after all configuration.
    ///
    /// On success the settings freeze and the changed-settings snapshot is
    /// written (if a path is set). A snapshot write failure is logged and
    /// does not undo initialization.
    pub fn initialize(&mut self) -> Result<(), AdapterError> {
        match self.phase {
            Phase::Initialized => return Err(AdapterError::AlreadyInitialized),
            Phase::Failed => return Err(AdapterError::InitFailed),
            Phase::Configuring => {}
        }

        self.registry.freeze();
        if let Err(e) = self.generator.init() {
            self.phase = Phase::Failed;
            error!(run_id = %self.run_id, error = %e, "generator initialization failed");
            return Err(AdapterError::Init(e.to_string()));
        }
        self.phase = Phase::Initialized;

        info!(
            run_id = %self.run_id,
            changed = self.registry.changed().len(),
            fingerprint = %self.registry.fingerprint(),
            "generator initialized"
        );

        if let Some(path) = &self.snapshot_path {
            match self.registry.write_snapshot(path) {
                Ok(()) => info!(run_id = %self.run_id, path = %path.display(), "settings snapshot written"),
                Err(e) => warn!(
                    run_id = %self.run_id,
                    path = %path.display(),
                    error = %e,
                    "failed to write settings snapshot"
                ),
            }
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), AdapterError> {
        match self.phase {
            Phase::Initialized => Ok(()),
            Phase::Configuring => Err(AdapterError::NotInitialized),
            Phase::Failed => Err(AdapterError::InitFailed),
        }
    }

    // ========================================================================
    // Event Sampler
    // ========================================================================

    /// Request one event and derive `(status, process_code, t, xi)`.
    ///
    /// `status == false` means the generator produced no event this time; the
    /// host decides whether to retry. Nothing is retried here.
    pub fn sample_event(&mut self) -> Result<EventResult, AdapterError> {
        self.ensure_initialized()?;

        let status = self.generator.next_event();
        self.stats.attempted += 1;
        if status {
            self.stats.accepted += 1;
        } else {
            debug!(run_id = %self.run_id, attempt = self.stats.attempted, "generator returned no event");
        }

        let info = self.generator.info();
        let process_code = info.code;
        let t = if process_code == CENTRAL_DIFFRACTIVE_CODE {
            momentum_transfer_from_record(self.generator.event())
        } else {
            info.t_hat
        };

        Ok(EventResult {
            status,
            process_code,
            t,
            xi: info.pt_hat,
        })
    }

    // ========================================================================
    // Cross-Section Query
    // ========================================================================

    /// The generator's current total and elastic cross-section estimates.
    pub fn cross_sections(&self) -> Result<CrossSectionSummary, AdapterError> {
        self.ensure_initialized()?;
        Ok(CrossSectionSummary {
            sigma_total: self.generator.sigma_total(),
            sigma_elastic: self.generator.sigma_elastic(),
        })
    }
}

/// Momentum transfer between incoming beam A and the first outgoing
/// particle, from the event record. NaN if either slot is absent.
pub fn momentum_transfer_from_record(record: &EventRecord) -> f64 {
    match (record.get(SLOT_FIRST_OUTGOING), record.get(SLOT_BEAM_A)) {
        (Some(outgoing), Some(beam)) => (outgoing.p - beam.p).m2_calc(),
        _ => f64::NAN,
    }
}
