//! Loading the desired set: a JSON array of spell documents, read from a
//! local path or fetched over HTTP(S).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Value;

use crate::error::source_err;
use crate::SyncError;

/// Default location of the bundled core spell list.
pub const DEFAULT_SOURCE: &str = "data/spells-core.json";

/// Where the desired set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Path(PathBuf),
    Url(String),
}

impl Default for SourceRef {
    fn default() -> Self {
        SourceRef::Path(PathBuf::from(DEFAULT_SOURCE))
    }
}

impl FromStr for SourceRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("source must not be empty".to_string());
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(SourceRef::Url(s.to_string()))
        } else {
            Ok(SourceRef::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Path(p) => write!(f, "{}", p.display()),
            SourceRef::Url(u) => write!(f, "{u}"),
        }
    }
}

/// Load the desired set.
///
/// Any failure (missing file, transport error, non-2xx status, malformed
/// JSON, or a body that is not an array) is [`SyncError::SourceUnavailable`].
pub fn fetch_records(source: &SourceRef) -> Result<Vec<Value>, SyncError> {
    let label = source.to_string();
    let body: Value = match source {
        SourceRef::Path(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| source_err(&label, e))?;
            serde_json::from_str(&raw).map_err(|e| source_err(&label, e))?
        }
        SourceRef::Url(url) => fetch_url(url)?,
    };

    match body {
        Value::Array(items) => {
            tracing::debug!("loaded {} records from {label}", items.len());
            Ok(items)
        }
        other => Err(source_err(
            label,
            format!("expected a JSON array, got {}", json_kind(&other)),
        )),
    }
}

fn fetch_url(url: &str) -> Result<Value, SyncError> {
    match ureq::get(url).call() {
        Ok(resp) => resp.into_json::<Value>().map_err(|e| source_err(url, e)),
        Err(ureq::Error::Status(code, _)) => Err(source_err(url, format!("fetch failed {code}"))),
        Err(err) => Err(source_err(url, err)),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_urls_and_paths() {
        assert_eq!(
            "https://example.test/spells.json".parse::<SourceRef>().unwrap(),
            SourceRef::Url("https://example.test/spells.json".to_string())
        );
        assert_eq!(
            "data/spells-core.json".parse::<SourceRef>().unwrap(),
            SourceRef::Path(PathBuf::from("data/spells-core.json"))
        );
        assert!("  ".parse::<SourceRef>().is_err());
    }

    #[test]
    fn reads_array_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spells.json");
        std::fs::write(&path, r#"[{"name":"Gate"},{"name":"Root"}]"#).unwrap();
        let items = fetch_records(&SourceRef::Path(path)).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = fetch_records(&SourceRef::Path(dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, SyncError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn malformed_json_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{").unwrap();
        let err = fetch_records(&SourceRef::Path(path)).unwrap_err();
        assert!(matches!(err, SyncError::SourceUnavailable { .. }));
    }

    #[test]
    fn non_array_body_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object.json");
        std::fs::write(&path, r#"{"spells":[]}"#).unwrap();
        let err = fetch_records(&SourceRef::Path(path)).unwrap_err();
        assert!(err.to_string().contains("expected a JSON array, got an object"));
    }

    #[test]
    fn unreachable_url_is_source_unavailable() {
        // Port 9 on loopback is reserved (discard); nothing listens in CI.
        let err = fetch_records(&SourceRef::Url("http://127.0.0.1:9/spells.json".into()))
            .unwrap_err();
        assert!(matches!(err, SyncError::SourceUnavailable { .. }));
    }
}
