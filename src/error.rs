//! Error types for dashboard resource generation.
//!
//! Every failure aborts the invocation and is handed back to the caller unchanged.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read dashboard config {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dashboard JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("invalid deployment context: {0}")]
    Context(String),
}

impl Error {
    /// `config_file` was never set, so there is nothing to open.
    pub(crate) fn config_file_unset() -> Self {
        Error::FileAccess {
            path: PathBuf::new(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "`config_file` property is not set",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
