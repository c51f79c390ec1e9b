use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Fingerprints of files known to be formatted, keyed by absolute path.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct FormatCache {
    entries: HashMap<String, String>,
}

fn entry_key(path: &Path) -> String {
    path.display().to_string()
}

fn fingerprint(contents: &str, options_fingerprint: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(options_fingerprint.as_bytes());
    hasher.update(contents.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl FormatCache {
    /// Loads the cache at `path`. A missing or unreadable file yields an
    /// empty cache.
    pub fn load(path: &Path) -> Self {
        let Ok(reader) = File::open(path) else {
            debug!("No cache at `{}`", path.display());
            return Self::default();
        };

        match serde_yaml::from_reader(reader) {
            Ok(cache) => cache,
            Err(e) => {
                warn!("Ignoring unreadable cache at `{}`: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Writes the cache to `path`, creating its parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io_error(
                    "cache directory".to_string(),
                    parent.display().to_string(),
                    e,
                )
            })?;
        }

        let file = File::create(path).map_err(|e| {
            Error::io_error("cache".to_string(), path.display().to_string(), e)
        })?;

        serde_yaml::to_writer(file, self)
            .map_err(|e| Error::yaml_error("writing".to_string(), path.display().to_string(), e))
    }

    /// Whether `contents` is exactly what was last written for `path` under
    /// the same options.
    pub fn is_current(&self, path: &Path, contents: &str, options_fingerprint: &str) -> bool {
        self.entries
            .get(&entry_key(path))
            .is_some_and(|recorded| *recorded == fingerprint(contents, options_fingerprint))
    }

    pub fn record(&mut self, path: &Path, contents: &str, options_fingerprint: &str) {
        self.entries
            .insert(entry_key(path), fingerprint(contents, options_fingerprint));
    }
}
