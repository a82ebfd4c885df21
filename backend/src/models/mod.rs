//! Domain types shared by the adapter and generator implementations
//!
//! - **vec4**: four-momenta
//! - **event**: event record and per-event info as a generator reports them
//! - **results**: what the adapter hands back to the host

pub mod event;
pub mod results;
pub mod vec4;

pub use event::{EventInfo, EventRecord, Particle};
pub use results::{CrossSectionSummary, EventResult, SamplerStats};
pub use vec4::Vec4;
