#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::path::{Path, PathBuf};

pub mod local_storage;
pub mod model;
pub mod routine_files;


/// Filesystem storage below a data root.
///
/// ```text
/// <root>/config.json          key-value store
/// <root>/data/routines/*.json routine artifacts
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join(local_storage::CONFIG_FILE)
    }

    #[must_use]
    pub fn routines_dir(&self) -> PathBuf {
        self.root.join("data").join("routines")
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FileSystemError {
    #[error("invalid file name: {0}")]
    InvalidFileName(String),
}
