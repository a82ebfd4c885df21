//! Structured configuration inputs for the adapter.

use serde::{Deserialize, Serialize};

use crate::settings::MAX_SEED;

/// Frame conventions the generator documents: 1 = CM frame, 2 = head-on
/// beams with separate energies, 3 = arbitrary beam momenta, 4 = Les Houches
/// input.
pub const SUPPORTED_FRAME_TYPES: [i32; 4] = [1, 2, 3, 4];

/// Beam kinematics. Must be set in full before initialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    pub frame_type: i32,
    /// PDG code of beam A
    pub id_a: i32,
    /// PDG code of beam B
    pub id_b: i32,
    /// Energy of beam A, GeV
    pub e_a: f64,
    /// Energy of beam B, GeV
    pub e_b: f64,
}

impl BeamConfig {
    /// Check the physical sanity of the beam before anything is forwarded.
    pub fn validate(&self) -> Result<(), String> {
        if !SUPPORTED_FRAME_TYPES.contains(&self.frame_type) {
            return Err(format!(
                "frame type {} is not one of {:?}",
                self.frame_type, SUPPORTED_FRAME_TYPES
            ));
        }
        for (name, energy) in [("eA", self.e_a), ("eB", self.e_b)] {
            if !energy.is_finite() || energy <= 0.0 {
                return Err(format!("beam energy {} = {} is not physical", name, energy));
            }
        }
        Ok(())
    }
}

/// Which soft-QCD processes to generate. Any combination is allowed,
/// including none at all (every sample then fails).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessSelection {
    pub elastic: bool,
    pub single_diffractive: bool,
    pub double_diffractive: bool,
    pub central_diffractive: bool,
    pub non_diffractive: bool,
}

impl ProcessSelection {
    /// Every process switched on.
    pub fn all() -> Self {
        Self {
            elastic: true,
            single_diffractive: true,
            double_diffractive: true,
            central_diffractive: true,
            non_diffractive: true,
        }
    }

    /// Only elastic scattering.
    pub fn elastic_only() -> Self {
        Self {
            elastic: true,
            ..Self::default()
        }
    }

    pub fn any(&self) -> bool {
        self.elastic
            || self.single_diffractive
            || self.double_diffractive
            || self.central_diffractive
            || self.non_diffractive
    }
}

/// How the generator's random stream is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedMode {
    /// Reproducible: the same seed gives the same event sequence.
    Fixed(u32),
    /// Seed derived from the system clock at init. Runs are NOT
    /// reproducible in this mode.
    SystemDerived,
}

impl SeedMode {
    /// Interpret a host seed: negative means system-derived, otherwise a
    /// fixed seed up to [`MAX_SEED`].
    pub fn from_host(seed: i32) -> Result<Self, String> {
        if seed < 0 {
            Ok(SeedMode::SystemDerived)
        } else if seed > MAX_SEED {
            Err(format!("seed {} exceeds the maximum {}", seed, MAX_SEED))
        } else {
            Ok(SeedMode::Fixed(seed as u32))
        }
    }

    /// The value forwarded as `Random:seed`.
    pub fn native_value(&self) -> i32 {
        match self {
            SeedMode::Fixed(seed) => *seed as i32,
            SeedMode::SystemDerived => -1,
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, SeedMode::Fixed(_))
    }
}
