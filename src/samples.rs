// Samples loader — reads the static sample-tweet file.
//
// The file is a single JSON array. Entries are either bare strings or
// objects carrying a "text" field; both shapes deserialize to the same
// in-memory Vec<String>, in file order. A malformed file fails wholesale
// before any scoring starts.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Failure modes of the samples source. Propagated to the caller as-is.
#[derive(Debug, Error)]
pub enum SourceReadError {
    #[error("failed to read samples file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("samples file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One entry in the samples array — a bare string, or an object with a
/// text field (extra fields are ignored).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SampleEntry {
    Text(String),
    Object { text: String },
}

impl SampleEntry {
    fn into_text(self) -> String {
        match self {
            SampleEntry::Text(text) => text,
            SampleEntry::Object { text } => text,
        }
    }
}

/// Read every sample text from the given file, in file order.
pub fn read_samples(path: &Path) -> Result<Vec<String>, SourceReadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SourceReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries: Vec<SampleEntry> =
        serde_json::from_str(&raw).map_err(|source| SourceReadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(entries.into_iter().map(SampleEntry::into_text).collect())
}
