//! Settings-file line parser
//!
//! One `Key = value` per line. Blank lines and lines starting with `!`, `#`
//! or `//` are skipped, and anything after a `!` on a setting line is a
//! comment.

use super::keys::{SettingKey, SettingValue};

/// Parse one settings-file line.
///
/// Returns `Ok(None)` for lines that carry no setting and `Err(reason)` for
/// lines that should carry one but cannot be understood.
pub fn parse_line(line: &str) -> Result<Option<(SettingKey, SettingValue)>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty()
        || trimmed.starts_with('!')
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
    {
        return Ok(None);
    }

    let content = match trimmed.find('!') {
        Some(pos) => trimmed[..pos].trim_end(),
        None => trimmed,
    };

    let (name, raw) = content
        .split_once('=')
        .ok_or_else(|| format!("expected 'Key = value', found '{}'", content))?;

    let name = name.trim();
    let raw = raw.trim();
    if name.is_empty() {
        return Err("missing key before '='".to_string());
    }
    if raw.is_empty() {
        return Err(format!("missing value for '{}'", name));
    }

    let key = SettingKey::from_native(name).ok_or_else(|| format!("unknown setting '{}'", name))?;
    let value = SettingValue::parse(key.kind(), raw)?;
    Ok(Some((key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blanks_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("! a comment"), Ok(None));
        assert_eq!(parse_line("# also a comment"), Ok(None));
        assert_eq!(parse_line("// and this"), Ok(None));
    }

    #[test]
    fn test_trailing_comment_stripped() {
        assert_eq!(
            parse_line("Beams:eA = 6500.  ! LHC run 2"),
            Ok(Some((SettingKey::BeamsEA, SettingValue::Parm(6500.0))))
        );
    }

    #[test]
    fn test_missing_equals_is_error() {
        let err = parse_line("SoftQCD:elastic on").unwrap_err();
        assert!(err.contains("expected 'Key = value'"), "{}", err);
    }

    #[test]
    fn test_unknown_key_is_error() {
        let err = parse_line("HardQCD:all = on").unwrap_err();
        assert!(err.contains("unknown setting"), "{}", err);
    }

    #[test]
    fn test_bad_value_is_error() {
        assert!(parse_line("Random:seed = twelve").is_err());
        assert!(parse_line("Random:seed =").is_err());
    }
}
