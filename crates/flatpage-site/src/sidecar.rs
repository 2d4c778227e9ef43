//! Optional JSON sidecar: `{"settings": {"layout": ...}, "data": {...}}`.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Layout used when the sidecar names none.
const DEFAULT_LAYOUT: &str = "default.html";

/// Parsed sidecar file. A missing file deserializes to the default:
/// empty settings, empty data map.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Sidecar {
    #[serde(default)]
    pub(crate) settings: PageSettings,
    #[serde(default)]
    pub(crate) data: Map<String, Value>,
}

/// Page metadata from the sidecar `settings` object.
#[derive(Debug, Default, Deserialize)]
pub struct PageSettings {
    #[serde(default)]
    layout: String,
}

impl PageSettings {
    /// Effective layout name: the configured one, or the default when
    /// absent or empty.
    #[must_use]
    pub fn layout(&self) -> &str {
        if self.layout.is_empty() {
            DEFAULT_LAYOUT
        } else {
            &self.layout
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum SidecarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a sidecar file. A missing file is an empty sidecar; any other
/// failure is reported so the caller can pick between soft and strict
/// handling.
pub(crate) fn load(path: &Path) -> Result<Sidecar, SidecarError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Sidecar::default()),
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_is_empty_sidecar() {
        let tmp = TempDir::new().unwrap();
        let sidecar = load(&tmp.path().join("index.json")).unwrap();
        assert_eq!(sidecar.settings.layout(), "default.html");
        assert!(sidecar.data.is_empty());
    }

    #[test]
    fn parses_settings_and_data() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("about.json");
        fs::write(
            &path,
            r#"{"settings": {"layout": "custom.html"}, "data": {"x": 1}}"#,
        )
        .unwrap();
        let sidecar = load(&path).unwrap();
        assert_eq!(sidecar.settings.layout(), "custom.html");
        assert_eq!(sidecar.data.get("x"), Some(&Value::from(1)));
    }

    #[test]
    fn empty_layout_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("about.json");
        fs::write(&path, r#"{"settings": {"layout": ""}}"#).unwrap();
        let sidecar = load(&path).unwrap();
        assert_eq!(sidecar.settings.layout(), "default.html");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{not valid").unwrap();
        assert!(matches!(load(&path), Err(SidecarError::Parse(_))));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("extra.json");
        fs::write(&path, r#"{"settings": {"layout": "a.html", "future": true}}"#).unwrap();
        let sidecar = load(&path).unwrap();
        assert_eq!(sidecar.settings.layout(), "a.html");
    }
}
