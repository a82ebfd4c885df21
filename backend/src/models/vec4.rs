//! Four-vectors in (px, py, pz, e) order, GeV units.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A four-momentum.
///
/// # Example
/// ```
/// use generator_adapter_core_rs::Vec4;
///
/// let p = Vec4::new(0.0, 0.0, 3.0, 5.0);
/// assert_eq!(p.m2_calc(), 16.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl Vec4 {
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Squared invariant mass computed from the components, e² − |p|².
    ///
    /// Negative for space-like vectors, which is exactly what a momentum
    /// transfer is.
    pub fn m2_calc(&self) -> f64 {
        self.e * self.e - self.p_abs2()
    }

    /// Squared three-momentum.
    pub fn p_abs2(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        (self.px * self.px + self.py * self.py).sqrt()
    }
}

impl Add for Vec4 {
    type Output = Vec4;

    fn add(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.px + rhs.px, self.py + rhs.py, self.pz + rhs.pz, self.e + rhs.e)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;

    fn sub(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.px - rhs.px, self.py - rhs.py, self.pz - rhs.pz, self.e - rhs.e)
    }
}
