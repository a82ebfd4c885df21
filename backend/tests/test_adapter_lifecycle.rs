//! Adapter Lifecycle Tests
//!
//! Critical invariants tested:
//! - Init runs at most once; a second call changes nothing
//! - Sampling and queries require a successful init
//! - Invalid beams never reach the generator
//! - A refused init is terminal for the adapter

use generator_adapter_core_rs::adapter::{
    AdapterError, BeamConfig, GeneratorAdapter, Phase, ProcessSelection, SeedMode,
};
use generator_adapter_core_rs::generator::{EventGenerator, GeneratorError, ToyGenerator};
use generator_adapter_core_rs::models::{EventInfo, EventRecord};
use generator_adapter_core_rs::settings::{ConfigError, SettingKey, SettingTarget, SettingValue};

// ============================================================================
// Test Helpers
// ============================================================================

/// Generator stub that records every call it receives.
#[derive(Default)]
struct RecordingGenerator {
    applied: Vec<(SettingKey, SettingValue)>,
    init_calls: usize,
    next_calls: usize,
    refuse_init: Option<String>,
    refuse_key: Option<SettingKey>,
    info: EventInfo,
    record: EventRecord,
}

impl SettingTarget for RecordingGenerator {
    fn apply_setting(&mut self, key: SettingKey, value: SettingValue) -> Result<(), GeneratorError> {
        if self.refuse_key == Some(key) {
            return Err(GeneratorError::Setting(format!("{} is read-only", key)));
        }
        self.applied.push((key, value));
        Ok(())
    }
}

impl EventGenerator for RecordingGenerator {
    fn init(&mut self) -> Result<(), GeneratorError> {
        self.init_calls += 1;
        match &self.refuse_init {
            Some(message) => Err(GeneratorError::Init(message.clone())),
            None => Ok(()),
        }
    }

    fn next_event(&mut self) -> bool {
        self.next_calls += 1;
        self.info = EventInfo {
            code: 101,
            t_hat: -0.5,
            pt_hat: 1.5,
        };
        true
    }

    fn info(&self) -> &EventInfo {
        &self.info
    }

    fn event(&self) -> &EventRecord {
        &self.record
    }

    fn sigma_total(&self) -> f64 {
        100.0
    }

    fn sigma_elastic(&self) -> f64 {
        25.0
    }
}

fn recording_adapter() -> GeneratorAdapter<RecordingGenerator> {
    GeneratorAdapter::new(RecordingGenerator::default()).with_snapshot_path(None)
}

fn lhc_beam() -> BeamConfig {
    BeamConfig {
        frame_type: 2,
        id_a: 2212,
        id_b: 2212,
        e_a: 6500.0,
        e_b: 6500.0,
    }
}

// ============================================================================
// Initialization Controller
// ============================================================================

#[test]
fn test_initialize_twice_fails_without_touching_generator() {
    let mut adapter = recording_adapter();
    adapter.initialize().unwrap();
    let applied_before = adapter.generator().applied.len();

    let err = adapter.initialize().unwrap_err();

    assert!(matches!(err, AdapterError::AlreadyInitialized));
    assert_eq!(adapter.generator().init_calls, 1);
    assert_eq!(adapter.generator().applied.len(), applied_before);
    assert_eq!(adapter.phase(), Phase::Initialized);
}

#[test]
fn test_init_failure_carries_generator_message() {
    let mut adapter = GeneratorAdapter::new(RecordingGenerator {
        refuse_init: Some("missing cross-section tables".to_string()),
        ..Default::default()
    })
    .with_snapshot_path(None);

    let err = adapter.initialize().unwrap_err();
    match err {
        AdapterError::Init(message) => assert!(message.contains("missing cross-section tables")),
        other => panic!("expected Init error, got {:?}", other),
    }
    assert_eq!(adapter.phase(), Phase::Failed);
}

#[test]
fn test_failed_init_is_terminal() {
    let mut adapter = GeneratorAdapter::new(RecordingGenerator {
        refuse_init: Some("bad beams".to_string()),
        ..Default::default()
    })
    .with_snapshot_path(None);
    let _ = adapter.initialize();

    assert!(matches!(adapter.initialize(), Err(AdapterError::InitFailed)));
    assert!(matches!(adapter.sample_event(), Err(AdapterError::InitFailed)));
    assert!(matches!(adapter.cross_sections(), Err(AdapterError::InitFailed)));
    assert_eq!(adapter.generator().init_calls, 1);
    assert_eq!(adapter.generator().next_calls, 0);
}

#[test]
fn test_toy_generator_refuses_les_houches_frame() {
    let mut adapter = GeneratorAdapter::new(ToyGenerator::new()).with_snapshot_path(None);
    adapter
        .set_beam(BeamConfig {
            frame_type: 4,
            ..lhc_beam()
        })
        .unwrap();

    let err = adapter.initialize().unwrap_err();
    assert!(matches!(err, AdapterError::Init(ref m) if m.contains("Les Houches")));
}

#[test]
fn test_toy_generator_refuses_overflowing_energy() {
    let mut adapter = GeneratorAdapter::new(ToyGenerator::new()).with_snapshot_path(None);
    adapter.set_by_name("SoftQCD:all", "on").unwrap();
    adapter.set_by_name("Beams:eCM", "1e200").unwrap();

    let err = adapter.initialize().unwrap_err();
    assert!(matches!(err, AdapterError::Init(ref m) if m.contains("too large")));
    assert_eq!(adapter.phase(), Phase::Failed);
    assert!(matches!(adapter.sample_event(), Err(AdapterError::InitFailed)));
    assert!(matches!(adapter.cross_sections(), Err(AdapterError::InitFailed)));
}

// ============================================================================
// Protocol Errors
// ============================================================================

#[test]
fn test_sample_before_initialize_fails() {
    let mut adapter = recording_adapter();
    let err = adapter.sample_event().unwrap_err();
    assert!(matches!(err, AdapterError::NotInitialized));
    assert_eq!(adapter.generator().next_calls, 0);
}

#[test]
fn test_cross_sections_before_initialize_fails() {
    let adapter = recording_adapter();
    assert!(matches!(adapter.cross_sections(), Err(AdapterError::NotInitialized)));
}

#[test]
fn test_cross_sections_after_initialize_never_fail() {
    let mut adapter = recording_adapter();
    adapter.initialize().unwrap();
    for _ in 0..3 {
        let summary = adapter.cross_sections().unwrap();
        assert_eq!(summary.sigma_total, 100.0);
        assert_eq!(summary.sigma_elastic, 25.0);
    }
}

#[test]
fn test_settings_frozen_after_initialize() {
    let mut adapter = recording_adapter();
    adapter.initialize().unwrap();
    let applied_before = adapter.generator().applied.len();

    assert!(matches!(
        adapter.set_flag(SettingKey::SoftQcdElastic, true),
        Err(AdapterError::Config(ConfigError::Frozen(SettingKey::SoftQcdElastic)))
    ));
    assert!(matches!(
        adapter.set_beam(lhc_beam()),
        Err(AdapterError::Config(ConfigError::Frozen(_)))
    ));
    assert!(matches!(
        adapter.apply_defaults(),
        Err(AdapterError::Config(ConfigError::Frozen(_)))
    ));
    assert_eq!(adapter.generator().applied.len(), applied_before);
}

// ============================================================================
// Beam/Process Configuration
// ============================================================================

#[test]
fn test_negative_beam_energy_never_reaches_generator() {
    let mut adapter = recording_adapter();
    let err = adapter
        .set_beam(BeamConfig {
            e_a: -10.0,
            ..lhc_beam()
        })
        .unwrap_err();

    assert!(matches!(err, AdapterError::Validation(_)));
    assert!(adapter.generator().applied.is_empty());
}

#[test]
fn test_generator_refusal_stops_batch_midway() {
    let mut adapter = GeneratorAdapter::new(RecordingGenerator {
        refuse_key: Some(SettingKey::BeamsEA),
        ..Default::default()
    })
    .with_snapshot_path(None);

    let err = adapter
        .set_beam(BeamConfig {
            id_a: 211,
            ..lhc_beam()
        })
        .unwrap_err();

    assert!(matches!(
        err,
        AdapterError::Config(ConfigError::Rejected {
            key: SettingKey::BeamsEA,
            ..
        })
    ));
    // Entries before the refused one stay applied; nothing after it is sent.
    assert_eq!(adapter.generator().applied.len(), 3);
    let registry = adapter.registry();
    assert_eq!(registry.get(SettingKey::BeamsIdA), SettingValue::Mode(211));
    assert_eq!(registry.get(SettingKey::BeamsEA), SettingValue::Parm(7000.0));
    assert_eq!(registry.get(SettingKey::BeamsEB), SettingValue::Parm(7000.0));
}

#[test]
fn test_unsupported_frame_type_rejected() {
    let mut adapter = recording_adapter();
    for frame_type in [0, 5, -1] {
        let err = adapter
            .set_beam(BeamConfig {
                frame_type,
                ..lhc_beam()
            })
            .unwrap_err();
        assert!(matches!(err, AdapterError::Validation(_)));
    }
    assert!(adapter.generator().applied.is_empty());
}

#[test]
fn test_set_beam_forwards_all_five_keys() {
    let mut adapter = recording_adapter();
    adapter.set_beam(lhc_beam()).unwrap();

    assert_eq!(
        adapter.generator().applied,
        vec![
            (SettingKey::BeamsFrameType, SettingValue::Mode(2)),
            (SettingKey::BeamsIdA, SettingValue::Mode(2212)),
            (SettingKey::BeamsIdB, SettingValue::Mode(2212)),
            (SettingKey::BeamsEA, SettingValue::Parm(6500.0)),
            (SettingKey::BeamsEB, SettingValue::Parm(6500.0)),
        ]
    );
}

#[test]
fn test_set_processes_forwards_flags() {
    let mut adapter = recording_adapter();
    adapter
        .set_processes(ProcessSelection {
            elastic: true,
            single_diffractive: false,
            double_diffractive: true,
            central_diffractive: false,
            non_diffractive: false,
        })
        .unwrap();

    let applied = &adapter.generator().applied;
    assert_eq!(applied.len(), 5);
    assert!(applied.contains(&(SettingKey::SoftQcdElastic, SettingValue::Flag(true))));
    assert!(applied.contains(&(SettingKey::SoftQcdDoubleDiffractive, SettingValue::Flag(true))));
    assert!(applied.contains(&(SettingKey::SoftQcdNonDiffractive, SettingValue::Flag(false))));
}

#[test]
fn test_negative_seed_is_system_derived() {
    let mut adapter = recording_adapter();
    let mode = adapter.set_seed(-1).unwrap();

    assert_eq!(mode, SeedMode::SystemDerived);
    assert!(!mode.is_deterministic());
    assert!(adapter
        .generator()
        .applied
        .contains(&(SettingKey::RandomSetSeed, SettingValue::Flag(true))));
    assert!(adapter
        .generator()
        .applied
        .contains(&(SettingKey::RandomSeed, SettingValue::Mode(-1))));
}

#[test]
fn test_seed_above_maximum_rejected() {
    let mut adapter = recording_adapter();
    assert!(matches!(
        adapter.set_seed(1_000_000_000),
        Err(AdapterError::Validation(_))
    ));
    assert!(adapter.generator().applied.is_empty());
}

#[test]
fn test_defaults_set_cross_section_modes() {
    let mut adapter = recording_adapter();
    adapter.apply_defaults().unwrap();
    assert!(adapter
        .generator()
        .applied
        .contains(&(SettingKey::SigmaTotalMode, SettingValue::Mode(3))));
    assert!(adapter
        .generator()
        .applied
        .contains(&(SettingKey::SigmaDiffractiveMode, SettingValue::Mode(3))));
}

#[test]
fn test_each_adapter_has_its_own_run_id() {
    let a = recording_adapter();
    let b = recording_adapter();
    assert_ne!(a.run_id(), b.run_id());
}
