//! Generator adapter
//!
//! Owns one generator and drives it through its lifecycle:
//! configure → initialize (exactly once) → sample / query.
//!
//! See `engine.rs` for the lifecycle and sampler, `types.rs` for the
//! structured configuration inputs.

pub mod engine;
pub mod types;

pub use engine::{
    momentum_transfer_from_record, AdapterError, GeneratorAdapter, Phase,
    CENTRAL_DIFFRACTIVE_CODE,
};
pub use types::{BeamConfig, ProcessSelection, SeedMode, SUPPORTED_FRAME_TYPES};
