//! Values handed back to the host per sample and per query.

use serde::{Deserialize, Serialize};

/// Outcome of one sampling call.
///
/// A fresh value is produced on every call; nothing here refers back to the
/// generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventResult {
    /// `false` when the generator could not complete this sample. The host
    /// may simply sample again.
    pub status: bool,
    /// Process classification code of the event.
    pub process_code: i32,
    /// Momentum transfer in GeV². Recomputed from the event record for
    /// code 106, otherwise the generator's reported Mandelstam t.
    pub t: f64,
    /// The generator's hard-process transverse scale (pTHat).
    ///
    /// This is NOT the diffractive momentum-loss fraction the name suggests.
    /// Downstream consumers rely on this convention, so it is kept as is.
    pub xi: f64,
}

/// Total and elastic cross sections, in mb.
///
/// A snapshot of the generator's running estimate; values may shift as more
/// events are sampled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionSummary {
    pub sigma_total: f64,
    pub sigma_elastic: f64,
}

/// Sampling counters kept by the adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerStats {
    pub attempted: u64,
    pub accepted: u64,
}

impl SamplerStats {
    pub fn failed(&self) -> u64 {
        self.attempted - self.accepted
    }
}
