//! Generator Adapter Core - Rust Engine
//!
//! Typed, fail-safe boundary between a host simulation and an external Monte
//! Carlo event generator.
//!
//! # Architecture
//!
//! - **settings**: closed setting keys, registry proxy, settings files, snapshot
//! - **generator**: the `EventGenerator` capability and a reference generator
//! - **adapter**: lifecycle, beam/process configuration, event sampler,
//!   cross-section query
//! - **config**: serde run configuration
//! - **models**: four-vectors, event record, results
//! - **rng**: deterministic random stream
//! - **ffi**: C ABI (and Python bindings behind the `pyo3` feature)
//!
//! # Critical Invariants
//!
//! 1. Settings are validated before they reach the generator and frozen at init
//! 2. Init runs at most once; sampling requires a successful init
//! 3. Same seed and settings → same event sequence
//! 4. Generator failures come back as values or errors, never as panics
//!    across the FFI boundary

// Module declarations
pub mod adapter;
pub mod config;
pub mod ffi;
pub mod generator;
pub mod models;
pub mod rng;
pub mod settings;

// Re-exports for convenience
pub use adapter::{AdapterError, BeamConfig, GeneratorAdapter, Phase, ProcessSelection, SeedMode};
pub use config::{AdapterConfig, CoulombConfig};
pub use generator::{EventGenerator, GeneratorError, ToyGenerator};
pub use models::{CrossSectionSummary, EventInfo, EventRecord, EventResult, Particle, SamplerStats, Vec4};
pub use rng::RandomStream;
pub use settings::{ConfigError, SettingKey, SettingKind, SettingValue, SettingsRegistry};

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn generator_adapter_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::python::PyGenerator>()?;
    Ok(())
}
