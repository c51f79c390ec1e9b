//! Host paths: working directory, user cache directory and path expansion.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

/// Extension of the source files picked up when walking a directory.
pub const SOURCE_EXTENSION: &str = "swift";

/// The host inputs path resolution depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    pub working_directory: PathBuf,
    pub cache_directory: Option<PathBuf>,
}

impl HostEnvironment {
    /// Captures the process working directory and the platform per-user
    /// cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn from_process() -> Result<Self> {
        let working_directory = env::current_dir()
            .map_err(|e| Error::io_error("working directory".to_string(), ".".to_string(), e))?;

        Ok(Self {
            working_directory,
            cache_directory: dirs::cache_dir(),
        })
    }

    /// Expands a leading `~` to the home directory, then resolves a relative
    /// path against the working directory. The path need not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use swiftfmt_core::paths::HostEnvironment;
    ///
    /// let host = HostEnvironment {
    ///     working_directory: PathBuf::from("/work"),
    ///     cache_directory: None,
    /// };
    /// assert_eq!(host.expand_path("src/main.swift"), PathBuf::from("/work/src/main.swift"));
    /// assert_eq!(host.expand_path("/abs/file.swift"), PathBuf::from("/abs/file.swift"));
    /// ```
    pub fn expand_path(&self, path: &str) -> PathBuf {
        let expanded = shellexpand::tilde(path);
        let expanded = Path::new(expanded.as_ref());

        if expanded.is_absolute() {
            expanded.to_path_buf()
        } else {
            self.working_directory.join(expanded)
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
}

/// Lists the source files under `root` in file-name order.
///
/// A file root is returned as-is whatever its extension. A directory root is
/// walked recursively for `.swift` files, skipping hidden entries.
///
/// # Errors
///
/// Returns an error if `root` does not exist or a directory cannot be read.
pub fn source_files(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = root.metadata().map_err(|e| {
        Error::io_error("input path".to_string(), root.display().to_string(), e)
    })?;
    if metadata.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
            Error::io_error("source directory".to_string(), path, io::Error::from(e))
        })?;

        if entry.file_type().is_file() && is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} source file(s) under `{}`", files.len(), root.display());
    Ok(files)
}
