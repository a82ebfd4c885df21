//! Run Configuration Tests
//!
//! A JSON document drives the same configuration path as the individual
//! setters, including native settings and a settings file.

use generator_adapter_core_rs::adapter::{AdapterError, BeamConfig, GeneratorAdapter, SeedMode};
use generator_adapter_core_rs::config::AdapterConfig;
use generator_adapter_core_rs::generator::ToyGenerator;
use generator_adapter_core_rs::settings::{ConfigError, SettingKey, SettingValue};
use std::fs;
use tempfile::tempdir;

const RUN_JSON: &str = r#"{
    "beam": { "frame_type": 2, "id_a": 2212, "id_b": 2212, "e_a": 6500.0, "e_b": 6500.0 },
    "processes": { "elastic": true, "central_diffractive": true },
    "coulomb": { "enabled": true },
    "seed": 4242,
    "settings": { "Next:numberCount": "0" },
    "snapshot_path": null
}"#;

fn toy_adapter() -> GeneratorAdapter<ToyGenerator> {
    GeneratorAdapter::new(ToyGenerator::new())
}

#[test]
fn test_parse_fills_defaults() {
    let config = AdapterConfig::from_json_str(RUN_JSON).unwrap();

    assert!(config.apply_defaults);
    assert!(config.processes.elastic);
    assert!(config.processes.central_diffractive);
    assert!(!config.processes.non_diffractive);
    assert_eq!(config.coulomb.unwrap().t_abs_min, 5e-5);
    assert_eq!(config.seed, Some(4242));
    assert_eq!(config.snapshot_path, None);
}

#[test]
fn test_missing_snapshot_path_uses_default_file() {
    let config = AdapterConfig::from_json_str(
        r#"{ "beam": { "frame_type": 1, "id_a": 2212, "id_b": 2212, "e_a": 1.0, "e_b": 1.0 } }"#,
    )
    .unwrap();
    assert_eq!(
        config.snapshot_path.as_deref(),
        Some(std::path::Path::new("generator_settings.dat"))
    );
}

#[test]
fn test_apply_and_run() {
    let config = AdapterConfig::from_json_str(RUN_JSON).unwrap();
    let mut adapter = toy_adapter();
    config.apply_to(&mut adapter).unwrap();

    let registry = adapter.registry();
    assert_eq!(registry.get(SettingKey::RandomSeed), SettingValue::Mode(4242));
    assert_eq!(registry.get(SettingKey::SigmaElasticCoulomb), SettingValue::Flag(true));
    assert_eq!(registry.get(SettingKey::NextNumberCount), SettingValue::Mode(0));
    assert!(adapter.snapshot_path().is_none());

    adapter.initialize().unwrap();
    for _ in 0..50 {
        let result = adapter.sample_event().unwrap();
        if result.status {
            assert!(result.process_code == 102 || result.process_code == 106);
        }
    }
}

#[test]
fn test_same_config_same_events() {
    let config = AdapterConfig::from_json_str(RUN_JSON).unwrap();
    let run = || {
        let mut adapter = toy_adapter();
        config.apply_to(&mut adapter).unwrap();
        adapter.initialize().unwrap();
        (0..20)
            .map(|_| {
                let r = adapter.sample_event().unwrap();
                (r.status, r.process_code, r.t.to_bits(), r.xi.to_bits())
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
    assert_eq!(SeedMode::from_host(4242), Ok(SeedMode::Fixed(4242)));
}

#[test]
fn test_unknown_native_key_fails() {
    let mut config = AdapterConfig::from_json_str(RUN_JSON).unwrap();
    config
        .settings
        .insert("PartonLevel:all".to_string(), "off".to_string());

    let err = config.apply_to(&mut toy_adapter()).unwrap_err();
    assert!(matches!(err, AdapterError::Config(ConfigError::UnknownKey(ref k)) if k == "PartonLevel:all"));
}

#[test]
fn test_invalid_beam_fails_validation() {
    let mut config = AdapterConfig::from_json_str(RUN_JSON).unwrap();
    config.beam.e_b = f64::NAN;
    assert!(matches!(
        config.apply_to(&mut toy_adapter()),
        Err(AdapterError::Validation(_))
    ));
}

#[test]
fn test_settings_file_applied_last() {
    let dir = tempdir().unwrap();
    let settings = dir.path().join("override.cmnd");
    fs::write(&settings, "Random:seed = 77\n").unwrap();

    let mut config = AdapterConfig::from_json_str(RUN_JSON).unwrap();
    config.settings_file = Some(settings);
    let mut adapter = toy_adapter();
    config.apply_to(&mut adapter).unwrap();

    assert_eq!(
        adapter.registry().get(SettingKey::RandomSeed),
        SettingValue::Mode(77)
    );
}

#[test]
fn test_from_json_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.json");
    let config = AdapterConfig::for_beam(BeamConfig {
        frame_type: 1,
        id_a: 2212,
        id_b: -2212,
        e_a: 980.0,
        e_b: 980.0,
    });
    fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

    assert_eq!(AdapterConfig::from_json_file(&path).unwrap(), config);
}

#[test]
fn test_missing_json_file_reports_read_error() {
    let err = AdapterConfig::from_json_file(std::path::Path::new("/nonexistent/run.json"))
        .unwrap_err();
    assert!(matches!(err, AdapterError::Config(ConfigError::Read { .. })));
}

#[test]
fn test_malformed_json_reports_run_config_error() {
    let err = AdapterConfig::from_json_str(r#"{ "beam": { "frame_type": "two" } }"#).unwrap_err();
    assert!(matches!(err, AdapterError::RunConfig(_)));
}
