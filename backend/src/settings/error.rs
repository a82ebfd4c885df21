//! Configuration errors raised by the settings registry.

use std::path::PathBuf;
use thiserror::Error;

use super::keys::{SettingKey, SettingKind};

/// Errors from applying settings, directly or from a file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting key: '{0}'")]
    UnknownKey(String),

    #[error("Setting {key} is a {expected}, got a {found} value")]
    KindMismatch {
        key: SettingKey,
        expected: SettingKind,
        found: SettingKind,
    },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: SettingKey, reason: String },

    #[error("Setting {0} cannot change after initialization")]
    Frozen(SettingKey),

    #[error("Settings file {} cannot be applied after initialization", .0.display())]
    FrozenFile(PathBuf),

    #[error("Generator rejected {key}: {reason}")]
    Rejected { key: SettingKey, reason: String },

    #[error("Cannot read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}
