//! Dashboard configuration files
//!
//! Reads the local JSON layout of a Cloud Monitoring dashboard. Hand-edited
//! files often carry a stray comma between two closing braces (`}, }`); that
//! one pattern is repaired before parsing. Nothing else is fixed up.

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;

/// A closing brace, a comma, a closing brace, with any whitespace between
static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();

fn trailing_comma() -> &'static Regex {
    TRAILING_COMMA.get_or_init(|| {
        Regex::new(r"\}\s*,\s*\}").unwrap_or_else(|e| panic!("Invalid repair pattern: {}", e))
    })
}

/// Replace every `}`-comma-`}` run with `}}`.
///
/// Single left-to-right pass over non-overlapping matches; text produced by
/// a replacement is not rescanned. A comma after anything other than `}`
/// (e.g. `{"a": 1, }`) is left alone.
pub fn repair_trailing_commas(text: &str) -> Cow<'_, str> {
    trailing_comma().replace_all(text, "}}")
}

/// Parse dashboard JSON after repair. The top level must be an object.
pub fn parse_dashboard(path: &Path, text: &str) -> Result<Map<String, Value>> {
    let repaired = repair_trailing_commas(text);
    if let Cow::Owned(_) = repaired {
        tracing::debug!("Repaired trailing comma(s) in {:?}", path);
    }

    serde_json::from_str(&repaired).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse the dashboard file at `path`
pub fn load_dashboard(path: &Path) -> Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Read {} bytes from {:?}", text.len(), path);

    let dashboard = parse_dashboard(path, &text)?;
    tracing::info!("Loaded dashboard {:?} with {} top-level keys", path, dashboard.len());
    Ok(dashboard)
}
