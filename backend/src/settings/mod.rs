//! Settings registry proxy
//!
//! Typed application layer over the generator's native settings store:
//! - **keys**: the closed [`SettingKey`] set, value kinds, defaults
//! - **registry**: validation, forwarding and the record of applied values
//! - **parser**: the `Key = value` settings-file format
//! - **snapshot**: the changed-settings audit file and its fingerprint

pub mod error;
pub mod keys;
pub mod parser;
pub mod registry;
pub mod snapshot;

pub use error::ConfigError;
pub use keys::{SettingKey, SettingKind, SettingValue, MAX_SEED};
pub use registry::SettingsRegistry;

use crate::generator::GeneratorError;

/// Anything that accepts typed settings, i.e. the native store behind the
/// registry.
pub trait SettingTarget {
    fn apply_setting(&mut self, key: SettingKey, value: SettingValue)
        -> Result<(), GeneratorError>;
}
