//! Run configuration
//!
//! One serde document describing everything a host sets up before
//! initialization: beam, processes, Coulomb term, seed, extra native
//! settings and an optional settings file.
//!
//! ```json
//! {
//!   "beam": { "frame_type": 2, "id_a": 2212, "id_b": 2212, "e_a": 6500.0, "e_b": 6500.0 },
//!   "processes": { "elastic": true, "single_diffractive": true },
//!   "coulomb": { "enabled": true, "t_abs_min": 5e-5 },
//!   "seed": 12345,
//!   "settings": { "Next:numberCount": "0" },
//!   "snapshot_path": "run/generator_settings.dat"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::adapter::{AdapterError, BeamConfig, GeneratorAdapter, ProcessSelection};
use crate::generator::EventGenerator;
use crate::settings::snapshot::DEFAULT_SNAPSHOT_FILE;
use crate::settings::ConfigError;

/// Coulomb term in elastic scattering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoulombConfig {
    pub enabled: bool,
    #[serde(default = "default_t_abs_min")]
    pub t_abs_min: f64,
}

fn default_t_abs_min() -> f64 {
    5e-5
}

fn default_true() -> bool {
    true
}

fn default_snapshot_path() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_SNAPSHOT_FILE))
}

/// Complete pre-initialization setup for one adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Apply the baseline defaults first
    #[serde(default = "default_true")]
    pub apply_defaults: bool,

    pub beam: BeamConfig,

    #[serde(default)]
    pub processes: ProcessSelection,

    #[serde(default)]
    pub coulomb: Option<CoulombConfig>,

    /// Host seed; negative selects a system-derived (non-reproducible) seed.
    /// Absent leaves the generator's default seed in place.
    #[serde(default)]
    pub seed: Option<i32>,

    /// Extra settings by native key, applied after the structured ones
    #[serde(default)]
    pub settings: BTreeMap<String, String>,

    /// Settings file applied last
    #[serde(default)]
    pub settings_file: Option<PathBuf>,

    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: Option<PathBuf>,
}

impl AdapterConfig {
    /// A minimal configuration for the given beam: defaults on, no
    /// processes, default seed.
    pub fn for_beam(beam: BeamConfig) -> Self {
        Self {
            apply_defaults: true,
            beam,
            processes: ProcessSelection::default(),
            coulomb: None,
            seed: None,
            settings: BTreeMap::new(),
            settings_file: None,
            snapshot_path: default_snapshot_path(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, AdapterError> {
        serde_json::from_str(json).map_err(|e| AdapterError::RunConfig(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AdapterError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, AdapterError> {
        serde_json::to_string_pretty(self).map_err(|e| AdapterError::RunConfig(e.to_string()))
    }

    /// Apply the whole configuration to an adapter that is still
    /// configuring. Stops at the first error.
    pub fn apply_to<G: EventGenerator>(
        &self,
        adapter: &mut GeneratorAdapter<G>,
    ) -> Result<(), AdapterError> {
        if self.apply_defaults {
            adapter.apply_defaults()?;
        }
        adapter.set_processes(self.processes)?;
        if let Some(coulomb) = self.coulomb {
            adapter.set_coulomb(coulomb.enabled, coulomb.t_abs_min)?;
        }
        if let Some(seed) = self.seed {
            adapter.set_seed(seed)?;
        }
        adapter.set_beam(self.beam)?;
        for (name, raw) in &self.settings {
            adapter.set_by_name(name, raw)?;
        }
        if let Some(path) = &self.settings_file {
            adapter.load_file(path)?;
        }
        adapter.set_snapshot_path(self.snapshot_path.clone());

        info!(
            run_id = %adapter.run_id(),
            changed = adapter.registry().changed().len(),
            "run configuration applied"
        );
        Ok(())
    }
}
