//! Settings registry
//!
//! Records the current value of every [`SettingKey`], validates each change,
//! and forwards accepted changes to a [`SettingTarget`]. Once frozen (after
//! the generator has initialized) every further change is refused.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

use super::error::ConfigError;
use super::keys::{SettingKey, SettingValue};
use super::parser::parse_line;
use super::snapshot;
use super::SettingTarget;

/// Typed record of applied settings.
///
/// # Example
/// ```
/// use generator_adapter_core_rs::settings::{SettingKey, SettingValue, SettingsRegistry};
/// use generator_adapter_core_rs::generator::NullTarget;
///
/// let mut registry = SettingsRegistry::new();
/// registry.set_flag(&mut NullTarget, SettingKey::SoftQcdElastic, true).unwrap();
/// assert_eq!(registry.get(SettingKey::SoftQcdElastic), SettingValue::Flag(true));
/// assert_eq!(registry.changed().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SettingsRegistry {
    values: BTreeMap<SettingKey, SettingValue>,
    frozen: bool,
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsRegistry {
    /// Create a registry holding every key at its default.
    pub fn new() -> Self {
        let values = SettingKey::ALL
            .iter()
            .map(|key| (*key, key.default_value()))
            .collect();
        Self {
            values,
            frozen: false,
        }
    }

    /// Current value of `key`.
    pub fn get(&self, key: SettingKey) -> SettingValue {
        self.values
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_value())
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Refuse all further changes.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Check `value` against the kind and range of `key` without applying it.
    pub fn validate(key: SettingKey, value: SettingValue) -> Result<(), ConfigError> {
        if value.kind() != key.kind() {
            return Err(ConfigError::KindMismatch {
                key,
                expected: key.kind(),
                found: value.kind(),
            });
        }

        let numeric = match value {
            SettingValue::Flag(_) => return Ok(()),
            SettingValue::Mode(v) => v as f64,
            SettingValue::Parm(v) => {
                if !v.is_finite() {
                    return Err(ConfigError::InvalidValue {
                        key,
                        reason: format!("{} is not a finite number", v),
                    });
                }
                v
            }
        };

        if let Some((lo, hi)) = key.bounds() {
            if !(numeric >= lo && numeric <= hi) {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: format!("{} is outside the allowed range [{}, {}]", value, lo, hi),
                });
            }
        }
        Ok(())
    }

    /// Validate `value`, forward it to `target`, and record it.
    ///
    /// Nothing is recorded if validation fails or the target refuses.
    pub fn set<T: SettingTarget + ?Sized>(
        &mut self,
        target: &mut T,
        key: SettingKey,
        value: SettingValue,
    ) -> Result<(), ConfigError> {
        if self.frozen {
            return Err(ConfigError::Frozen(key));
        }
        Self::validate(key, value)?;

        target
            .apply_setting(key, value)
            .map_err(|e| ConfigError::Rejected {
                key,
                reason: e.to_string(),
            })?;

        debug!(key = %key, value = %value, "setting forwarded");
        self.values.insert(key, value);
        Ok(())
    }

    pub fn set_flag<T: SettingTarget + ?Sized>(
        &mut self,
        target: &mut T,
        key: SettingKey,
        value: bool,
    ) -> Result<(), ConfigError> {
        self.set(target, key, SettingValue::Flag(value))
    }

    pub fn set_mode<T: SettingTarget + ?Sized>(
        &mut self,
        target: &mut T,
        key: SettingKey,
        value: i32,
    ) -> Result<(), ConfigError> {
        self.set(target, key, SettingValue::Mode(value))
    }

    pub fn set_parm<T: SettingTarget + ?Sized>(
        &mut self,
        target: &mut T,
        key: SettingKey,
        value: f64,
    ) -> Result<(), ConfigError> {
        self.set(target, key, SettingValue::Parm(value))
    }

    /// Apply a setting given by native name and raw text value.
    pub fn set_by_name<T: SettingTarget + ?Sized>(
        &mut self,
        target: &mut T,
        name: &str,
        raw: &str,
    ) -> Result<(), ConfigError> {
        let key =
            SettingKey::from_native(name).ok_or_else(|| ConfigError::UnknownKey(name.to_string()))?;
        let value = SettingValue::parse(key.kind(), raw)
            .map_err(|reason| ConfigError::InvalidValue { key, reason })?;
        self.set(target, key, value)
    }

    /// Apply every setting in a settings file, in file order.
    ///
    /// Stops at the first bad line; lines before it stay applied. Returns the
    /// number of settings applied.
    pub fn load_file<T: SettingTarget + ?Sized>(
        &mut self,
        target: &mut T,
        path: &Path,
    ) -> Result<usize, ConfigError> {
        if self.frozen {
            return Err(ConfigError::FrozenFile(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut applied = 0;
        for (index, line) in content.lines().enumerate() {
            let malformed = |reason: String| ConfigError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            };

            let Some((key, value)) = parse_line(line).map_err(malformed)? else {
                continue;
            };
            self.set(target, key, value)
                .map_err(|e| malformed(e.to_string()))?;
            applied += 1;
        }

        info!(path = %path.display(), applied, "settings file loaded");
        Ok(applied)
    }

    /// Every setting whose value differs from its default, sorted by native
    /// key name.
    pub fn changed(&self) -> Vec<(SettingKey, SettingValue)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .filter(|(key, value)| **value != key.default_value())
            .map(|(key, value)| (*key, *value))
            .collect();
        entries.sort_by(|a, b| a.0.native_name().cmp(b.0.native_name()));
        entries
    }

    /// Changed settings in settings-file syntax.
    pub fn snapshot_text(&self) -> String {
        snapshot::render(&self.changed())
    }

    /// SHA-256 fingerprint of the changed settings.
    pub fn fingerprint(&self) -> String {
        snapshot::fingerprint(&self.changed())
    }

    /// Write the changed-settings snapshot to `path`.
    pub fn write_snapshot(&self, path: &Path) -> io::Result<()> {
        snapshot::write(path, &self.changed())
    }
}
