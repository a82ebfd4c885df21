//! Event record and per-event info
//!
//! Slot conventions follow the generator's own record layout:
//!
//! | Slot | Content |
//! |------|---------|
//! | 0 | the system as a whole |
//! | 1, 2 | incoming beams A and B |
//! | 3.. | outgoing particles |

use serde::{Deserialize, Serialize};

use super::vec4::Vec4;

/// Slot of incoming beam A.
pub const SLOT_BEAM_A: usize = 1;
/// Slot of incoming beam B.
pub const SLOT_BEAM_B: usize = 2;
/// First outgoing slot.
pub const SLOT_FIRST_OUTGOING: usize = 3;

/// One entry in the event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// PDG particle code
    pub id: i32,
    /// Generator status code (negative for decayed/incoming entries)
    pub status: i32,
    pub p: Vec4,
    pub m: f64,
}

impl Particle {
    pub fn new(id: i32, status: i32, p: Vec4, m: f64) -> Self {
        Self { id, status, p, m }
    }
}

/// The particle list of the most recently generated event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    particles: Vec<Particle>,
}

impl EventRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Append a particle, returning its slot.
    pub fn append(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    pub fn get(&self, slot: usize) -> Option<&Particle> {
        self.particles.get(slot)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

/// Summary information about the most recent event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Process classification code (e.g. 101 non-diffractive, 102 elastic)
    pub code: i32,
    /// Mandelstam t of the hard process, when the process fills it
    pub t_hat: f64,
    /// Transverse scale of the hard process
    pub pt_hat: f64,
}
