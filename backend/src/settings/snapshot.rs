//! Changed-settings snapshot
//!
//! The snapshot lists every setting whose value differs from the built-in
//! default, one `Key = value` line each, sorted by key. The same text feeds
//! the SHA-256 fingerprint logged at initialization.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::keys::{SettingKey, SettingValue};

/// Default file name of the snapshot written after initialization.
pub const DEFAULT_SNAPSHOT_FILE: &str = "generator_settings.dat";

/// Render entries in settings-file syntax.
pub fn render(entries: &[(SettingKey, SettingValue)]) -> String {
    let mut text = String::new();
    for (key, value) in entries {
        text.push_str(key.native_name());
        text.push_str(" = ");
        text.push_str(&value.to_string());
        text.push('\n');
    }
    text
}

/// SHA-256 hex digest of the rendered entries.
pub fn fingerprint(entries: &[(SettingKey, SettingValue)]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(render(entries).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Write the snapshot file. The writer is flushed explicitly so write
/// errors surface here rather than being lost on drop.
pub fn write(path: &Path, entries: &[(SettingKey, SettingValue)]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(render(entries).as_bytes())?;
    writer.flush()?;
    writer.get_ref().sync_all()
}
