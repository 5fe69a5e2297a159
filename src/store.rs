//! Dataset file persistence.
//!
//! Datasets are stored as pretty-printed JSON envelopes. Writes go to a
//! sibling temp file that is renamed over the target, so readers only ever
//! see a complete envelope.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Dataset, DATA_VERSION};

const INDENT: &[u8] = b"    ";

/// Errors that can occur reading or writing a dataset file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse dataset {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid output path: {}", .0.display())]
    InvalidPath(PathBuf),
}

/// Loads the dataset to merge into.
///
/// Without a path this is an empty dataset. A file written with a different
/// format version is accepted with a warning; its records are carried
/// forward unchanged and the envelope is restamped with the current version.
pub fn load(path: Option<&Path>) -> Result<Dataset, StoreError> {
    let Some(path) = path else {
        return Ok(Dataset::new());
    };

    let contents = fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let stored: Dataset = serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    if stored.version != DATA_VERSION {
        tracing::warn!(
            "Dataset {} has version {}, current version is {}; merging its records as-is",
            path.display(),
            stored.version,
            DATA_VERSION
        );
    }
    let dataset = Dataset::new().with_recipes(stored.recipes);

    tracing::info!(
        "Loaded {} recipe(s) from {}",
        dataset.recipes.len(),
        path.display()
    );
    Ok(dataset)
}

/// Writes the whole dataset to `path`, replacing any existing file.
///
/// Creates the parent directory if it doesn't exist.
pub fn save(dataset: &Dataset, path: &Path) -> Result<(), StoreError> {
    let bytes = to_pretty_json(dataset)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = temp_path_for(path)?;

    let result = write_synced(&temp_path, &bytes).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let io_err = |e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.sync_all().map_err(io_err)
}

/// Serializes a dataset with four-space indentation and a trailing newline.
pub fn to_pretty_json(dataset: &Dataset) -> Result<Vec<u8>, StoreError> {
    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    dataset.serialize(&mut serializer)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn temp_path_for(path: &Path) -> Result<PathBuf, StoreError> {
    let mut name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidPath(path.to_path_buf()))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}
