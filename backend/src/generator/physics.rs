//! Soft-QCD cross sections and two-body kinematics for the reference
//! generator.
//!
//! Total cross section from the Donnachie-Landshoff pomeron + reggeon fit,
//! elastic from the optical theorem with an exponential slope, diffractive
//! channels as fixed fractions of the total. Accurate to tens of percent at
//! collider energies, which is all a reference implementation needs.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// (ħc)² in mb·GeV².
pub const HBARC2_MB: f64 = 0.3894;
pub const ALPHA_EM: f64 = 1.0 / 137.036;

pub const M_PROTON: f64 = 0.938272;
pub const M_NEUTRON: f64 = 0.939565;
pub const M_PION: f64 = 0.13957;

/// Lowest collision energy (GeV) the soft-QCD description is used at.
pub const MIN_ECM: f64 = 10.0;

/// Pomeron intercept minus one.
pub const EPSILON: f64 = 0.0808;
/// Pomeron slope, GeV⁻².
pub const ALPHA_PRIME: f64 = 0.25;
/// Proton-pomeron coupling slope, GeV⁻².
pub const B_PROTON: f64 = 2.3;

/// Largest diffractive mass fraction M²/s.
pub const XI_MAX: f64 = 0.1;

/// Rest mass of a supported beam particle.
pub fn beam_mass(id: i32) -> Option<f64> {
    match id.abs() {
        2212 => Some(M_PROTON),
        2112 => Some(M_NEUTRON),
        211 => Some(M_PION),
        _ => None,
    }
}

/// Code of the diffractive state excited from beam particle `id`.
pub fn diffractive_id(id: i32) -> i32 {
    id.signum() * (9_900_000 + (id.abs() / 10) * 10)
}

/// Centre-of-mass energy of two head-on beams given lab energies.
pub fn cm_energy(m_a: f64, e_a: f64, m_b: f64, e_b: f64) -> f64 {
    let p_a = (e_a * e_a - m_a * m_a).max(0.0).sqrt();
    let p_b = (e_b * e_b - m_b * m_b).max(0.0).sqrt();
    (m_a * m_a + m_b * m_b + 2.0 * (e_a * e_b + p_a * p_b)).sqrt()
}

/// Momentum of either particle in a two-body state of energy `e_cm`, or
/// `None` below threshold.
pub fn two_body_momentum(e_cm: f64, m1: f64, m2: f64) -> Option<f64> {
    if m1 + m2 >= e_cm {
        return None;
    }
    let s = e_cm * e_cm;
    let lambda = (s - (m1 + m2).powi(2)) * (s - (m1 - m2).powi(2));
    Some(lambda.max(0.0).sqrt() / (2.0 * e_cm))
}

/// Elastic slope B(s), GeV⁻².
pub fn elastic_slope(s: f64) -> f64 {
    4.0 * B_PROTON + 4.0 * s.powf(EPSILON) - 4.2
}

/// Single-diffractive t slope for mass fraction `xi`, GeV⁻².
pub fn single_diffractive_slope(xi: f64) -> f64 {
    2.0 * B_PROTON + 2.0 * ALPHA_PRIME * (1.0 / xi).ln()
}

/// Double-diffractive t slope, GeV⁻².
pub fn double_diffractive_slope(s: f64, m1_sq: f64, m2_sq: f64) -> f64 {
    (2.0 * ALPHA_PRIME * (s / (m1_sq * m2_sq)).ln()).max(1.0)
}

/// Partial cross sections in mb.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSigmas {
    pub non_diffractive: f64,
    /// Nuclear elastic, restricted to |t| above the Coulomb cut when the
    /// Coulomb term is on.
    pub elastic_nuclear: f64,
    /// Pure Coulomb elastic above the |t| cut; zero when Coulomb is off.
    pub elastic_coulomb: f64,
    pub single_diffractive_xb: f64,
    pub single_diffractive_ax: f64,
    pub double_diffractive: f64,
    pub central_diffractive: f64,
}

impl PartialSigmas {
    /// Cross sections at energy `e_cm`. `antiparticle` selects the
    /// particle-antiparticle reggeon term; `coulomb_t_min` switches on the
    /// Coulomb term with that |t| cut.
    pub fn compute(e_cm: f64, antiparticle: bool, coulomb_t_min: Option<f64>) -> Self {
        let s = e_cm * e_cm;
        let reggeon = if antiparticle { 98.39 } else { 56.08 };
        let total = 21.70 * s.powf(EPSILON) + reggeon * s.powf(-0.4525);

        let slope = elastic_slope(s);
        let elastic_full = total * total / (16.0 * PI * HBARC2_MB * slope);

        let single = 0.07 * total;
        let double = 0.06 * total;
        let central = 0.01 * total;
        let non_diffractive = (total - elastic_full - 2.0 * single - double - central).max(0.0);

        let (elastic_nuclear, elastic_coulomb) = match coulomb_t_min {
            Some(t_min) => {
                let t_max = s;
                let coulomb =
                    4.0 * PI * ALPHA_EM * ALPHA_EM * HBARC2_MB * (1.0 / t_min - 1.0 / t_max);
                (elastic_full * (-slope * t_min).exp(), coulomb.max(0.0))
            }
            None => (elastic_full, 0.0),
        };

        Self {
            non_diffractive,
            elastic_nuclear,
            elastic_coulomb,
            single_diffractive_xb: single,
            single_diffractive_ax: single,
            double_diffractive: double,
            central_diffractive: central,
        }
    }

    /// Hadronic total (the Coulomb term is not part of it).
    pub fn total(&self) -> f64 {
        self.non_diffractive
            + self.elastic_nuclear
            + self.single_diffractive_xb
            + self.single_diffractive_ax
            + self.double_diffractive
            + self.central_diffractive
    }

    pub fn elastic(&self) -> f64 {
        self.elastic_nuclear + self.elastic_coulomb
    }

    /// Every partial cross section is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.non_diffractive,
            self.elastic_nuclear,
            self.elastic_coulomb,
            self.single_diffractive_xb,
            self.single_diffractive_ax,
            self.double_diffractive,
            self.central_diffractive,
        ]
        .iter()
        .all(|sigma| sigma.is_finite())
    }
}
