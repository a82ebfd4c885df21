//! The closed set of settings the adapter knows how to forward.
//!
//! Each [`SettingKey`] maps to exactly one native key string and one value
//! kind. Anything outside this set is rejected at the boundary instead of
//! being passed through as a string that might be silently ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value kind of a setting, matching the native registry's three stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKind {
    Flag,
    Mode,
    Parm,
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingKind::Flag => "flag",
            SettingKind::Mode => "mode",
            SettingKind::Parm => "parm",
        };
        f.write_str(name)
    }
}

/// A typed setting value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    Flag(bool),
    Mode(i32),
    Parm(f64),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Flag(_) => SettingKind::Flag,
            SettingValue::Mode(_) => SettingKind::Mode,
            SettingValue::Parm(_) => SettingKind::Parm,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match *self {
            SettingValue::Flag(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mode(&self) -> Option<i32> {
        match *self {
            SettingValue::Mode(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_parm(&self) -> Option<f64> {
        match *self {
            SettingValue::Parm(v) => Some(v),
            _ => None,
        }
    }

    /// Parse a raw settings-file token as a value of `kind`.
    pub fn parse(kind: SettingKind, raw: &str) -> Result<SettingValue, String> {
        let raw = raw.trim();
        match kind {
            SettingKind::Flag => match raw.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" | "1" => Ok(SettingValue::Flag(true)),
                "off" | "false" | "no" | "0" => Ok(SettingValue::Flag(false)),
                _ => Err(format!("'{}' is not a flag value (expected on/off)", raw)),
            },
            SettingKind::Mode => raw
                .parse::<i32>()
                .map(SettingValue::Mode)
                .map_err(|_| format!("'{}' is not an integer mode value", raw)),
            SettingKind::Parm => raw
                .parse::<f64>()
                .map(SettingValue::Parm)
                .map_err(|_| format!("'{}' is not a numeric parameter value", raw)),
        }
    }
}

impl fmt::Display for SettingValue {
    /// Formats in settings-file syntax. Parameters use Rust's shortest
    /// round-trip representation, so parsing the output restores the exact
    /// value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Flag(true) => f.write_str("on"),
            SettingValue::Flag(false) => f.write_str("off"),
            SettingValue::Mode(v) => write!(f, "{}", v),
            SettingValue::Parm(v) => write!(f, "{}", v),
        }
    }
}

/// Every setting the adapter may forward to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SettingKey {
    InitShowChangedSettings,
    InitShowChangedParticleData,
    SigmaTotalMode,
    SigmaDiffractiveMode,
    SoftQcdAll,
    SoftQcdElastic,
    SoftQcdSingleDiffractive,
    SoftQcdDoubleDiffractive,
    SoftQcdCentralDiffractive,
    SoftQcdNonDiffractive,
    SigmaElasticCoulomb,
    SigmaElasticTAbsMin,
    RandomSetSeed,
    RandomSeed,
    BeamsFrameType,
    BeamsIdA,
    BeamsIdB,
    BeamsECm,
    BeamsEA,
    BeamsEB,
    NextNumberCount,
    PrintQuiet,
}

/// Largest seed the native random engine accepts.
pub const MAX_SEED: i32 = 900_000_000;

impl SettingKey {
    pub const ALL: [SettingKey; 22] = [
        SettingKey::InitShowChangedSettings,
        SettingKey::InitShowChangedParticleData,
        SettingKey::SigmaTotalMode,
        SettingKey::SigmaDiffractiveMode,
        SettingKey::SoftQcdAll,
        SettingKey::SoftQcdElastic,
        SettingKey::SoftQcdSingleDiffractive,
        SettingKey::SoftQcdDoubleDiffractive,
        SettingKey::SoftQcdCentralDiffractive,
        SettingKey::SoftQcdNonDiffractive,
        SettingKey::SigmaElasticCoulomb,
        SettingKey::SigmaElasticTAbsMin,
        SettingKey::RandomSetSeed,
        SettingKey::RandomSeed,
        SettingKey::BeamsFrameType,
        SettingKey::BeamsIdA,
        SettingKey::BeamsIdB,
        SettingKey::BeamsECm,
        SettingKey::BeamsEA,
        SettingKey::BeamsEB,
        SettingKey::NextNumberCount,
        SettingKey::PrintQuiet,
    ];

    /// The generator's own name for this key.
    pub fn native_name(&self) -> &'static str {
        match self {
            SettingKey::InitShowChangedSettings => "Init:showChangedSettings",
            SettingKey::InitShowChangedParticleData => "Init:showChangedParticleData",
            SettingKey::SigmaTotalMode => "SigmaTotal:mode",
            SettingKey::SigmaDiffractiveMode => "SigmaDiffractive:mode",
            SettingKey::SoftQcdAll => "SoftQCD:all",
            SettingKey::SoftQcdElastic => "SoftQCD:elastic",
            SettingKey::SoftQcdSingleDiffractive => "SoftQCD:singleDiffractive",
            SettingKey::SoftQcdDoubleDiffractive => "SoftQCD:doubleDiffractive",
            SettingKey::SoftQcdCentralDiffractive => "SoftQCD:centralDiffractive",
            SettingKey::SoftQcdNonDiffractive => "SoftQCD:nonDiffractive",
            SettingKey::SigmaElasticCoulomb => "SigmaElastic:Coulomb",
            SettingKey::SigmaElasticTAbsMin => "SigmaElastic:tAbsMin",
            SettingKey::RandomSetSeed => "Random:setSeed",
            SettingKey::RandomSeed => "Random:seed",
            SettingKey::BeamsFrameType => "Beams:frameType",
            SettingKey::BeamsIdA => "Beams:idA",
            SettingKey::BeamsIdB => "Beams:idB",
            SettingKey::BeamsECm => "Beams:eCM",
            SettingKey::BeamsEA => "Beams:eA",
            SettingKey::BeamsEB => "Beams:eB",
            SettingKey::NextNumberCount => "Next:numberCount",
            SettingKey::PrintQuiet => "Print:quiet",
        }
    }

    pub fn kind(&self) -> SettingKind {
        self.default_value().kind()
    }

    /// The generator's built-in default for this key.
    pub fn default_value(&self) -> SettingValue {
        use SettingValue::*;
        match self {
            SettingKey::InitShowChangedSettings => Flag(true),
            SettingKey::InitShowChangedParticleData => Flag(true),
            SettingKey::SigmaTotalMode => Mode(1),
            SettingKey::SigmaDiffractiveMode => Mode(1),
            SettingKey::SoftQcdAll
            | SettingKey::SoftQcdElastic
            | SettingKey::SoftQcdSingleDiffractive
            | SettingKey::SoftQcdDoubleDiffractive
            | SettingKey::SoftQcdCentralDiffractive
            | SettingKey::SoftQcdNonDiffractive => Flag(false),
            SettingKey::SigmaElasticCoulomb => Flag(false),
            SettingKey::SigmaElasticTAbsMin => Parm(5e-5),
            SettingKey::RandomSetSeed => Flag(false),
            SettingKey::RandomSeed => Mode(-1),
            SettingKey::BeamsFrameType => Mode(1),
            SettingKey::BeamsIdA => Mode(2212),
            SettingKey::BeamsIdB => Mode(2212),
            SettingKey::BeamsECm => Parm(14000.0),
            SettingKey::BeamsEA => Parm(7000.0),
            SettingKey::BeamsEB => Parm(7000.0),
            SettingKey::NextNumberCount => Mode(1000),
            SettingKey::PrintQuiet => Flag(false),
        }
    }

    /// Inclusive numeric range accepted for mode and parm keys, if any.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            SettingKey::SigmaTotalMode | SettingKey::SigmaDiffractiveMode => Some((0.0, 4.0)),
            SettingKey::RandomSeed => Some((-1.0, MAX_SEED as f64)),
            SettingKey::BeamsFrameType => Some((1.0, 4.0)),
            SettingKey::NextNumberCount => Some((0.0, f64::INFINITY)),
            SettingKey::SigmaElasticTAbsMin => Some((f64::MIN_POSITIVE, f64::INFINITY)),
            SettingKey::BeamsECm | SettingKey::BeamsEA | SettingKey::BeamsEB => {
                Some((f64::MIN_POSITIVE, f64::INFINITY))
            }
            _ => None,
        }
    }

    /// Resolve a native key name. Matching ignores ASCII case, as the native
    /// registry does.
    pub fn from_native(name: &str) -> Option<SettingKey> {
        let name = name.trim();
        SettingKey::ALL
            .iter()
            .copied()
            .find(|key| key.native_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.native_name())
    }
}
