use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::paths::HostEnvironment;

/// Subdirectory of the user cache directory holding the default cache.
pub const CACHE_DIRECTORY_NAME: &str = "swiftfmt";
/// File name of the cache, also appended when `--cache` names a directory.
pub const DEFAULT_CACHE_FILE_NAME: &str = "swiftfmt.cache";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    Default(PathBuf),
    Explicit(PathBuf),
    Disabled,
}

impl CacheLocation {
    pub fn path(&self) -> Option<&Path> {
        match self {
            CacheLocation::Default(path) | CacheLocation::Explicit(path) => Some(path),
            CacheLocation::Disabled => None,
        }
    }
}

/// What the `--cache` flag asks this invocation to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDirective {
    /// Format with the given cache policy.
    Use(CacheLocation),
    /// Delete the default cache file (if it could be located) and stop.
    Clear(Option<PathBuf>),
}

#[derive(Debug)]
pub struct CacheResolution {
    pub directive: CacheDirective,
    /// Non-fatal failure encountered while preparing the default location.
    pub warning: Option<Error>,
}

impl CacheResolution {
    fn new(directive: CacheDirective) -> Self {
        Self {
            directive,
            warning: None,
        }
    }
}

/// Resolves the default cache file path, creating its directory if needed.
///
/// # Errors
///
/// Returns [`Error::NoCacheDirectory`] when the platform has no user cache
/// directory, or [`Error::CacheDirectory`] when the subdirectory cannot be
/// created.
pub fn default_cache_path(host: &HostEnvironment) -> Result<PathBuf> {
    let cache_directory = host
        .cache_directory
        .as_ref()
        .ok_or(Error::NoCacheDirectory)?
        .join(CACHE_DIRECTORY_NAME);

    fs::create_dir_all(&cache_directory).map_err(|original| Error::CacheDirectory {
        path: cache_directory.display().to_string(),
        original,
    })?;

    Ok(cache_directory.join(DEFAULT_CACHE_FILE_NAME))
}

fn default_or_warning(host: &HostEnvironment) -> (Option<PathBuf>, Option<Error>) {
    match default_cache_path(host) {
        Ok(path) => (Some(path), None),
        Err(e) => {
            warn!("Caching disabled: {e}");
            (None, Some(e))
        }
    }
}

/// Interprets the optional `--cache` value.
///
/// * absent: the default location, or caching disabled with a warning when
///   it cannot be prepared
/// * `ignore`: caching disabled
/// * `clear`: the default location, to be deleted
/// * anything else: an explicit path; an existing directory gets
///   [`DEFAULT_CACHE_FILE_NAME`] appended
///
/// # Errors
///
/// Returns [`Error::MissingValue`] for an empty value.
pub fn resolve_cache(value: Option<&str>, host: &HostEnvironment) -> Result<CacheResolution> {
    let resolution = match value {
        None => {
            let (path, warning) = default_or_warning(host);
            CacheResolution {
                directive: CacheDirective::Use(
                    path.map_or(CacheLocation::Disabled, CacheLocation::Default),
                ),
                warning,
            }
        }
        Some("") => return Err(Error::MissingValue("cache".to_string())),
        Some("ignore") => CacheResolution::new(CacheDirective::Use(CacheLocation::Disabled)),
        Some("clear") => {
            let (path, warning) = default_or_warning(host);
            CacheResolution {
                directive: CacheDirective::Clear(path),
                warning,
            }
        }
        Some(explicit) => {
            let mut path = host.expand_path(explicit);
            if path.is_dir() {
                path.push(DEFAULT_CACHE_FILE_NAME);
            }
            CacheResolution::new(CacheDirective::Use(CacheLocation::Explicit(path)))
        }
    };

    debug!("Cache directive: {:?}", resolution.directive);
    Ok(resolution)
}

/// Deletes the cache file at `path` if one exists. Returns whether a file
/// was removed.
///
/// # Errors
///
/// Returns [`Error::CacheDelete`] if an existing file cannot be removed.
pub fn clear_cache(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path).map_err(|original| Error::CacheDelete {
        path: path.display().to_string(),
        original,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn host_with_cache(cache_root: &Path) -> HostEnvironment {
        HostEnvironment {
            working_directory: cache_root.to_path_buf(),
            cache_directory: Some(cache_root.to_path_buf()),
        }
    }

    #[test]
    fn test_absent_value_uses_default_location() {
        let temp = TempDir::new().unwrap();
        let resolution = resolve_cache(None, &host_with_cache(temp.path())).unwrap();

        let expected = temp
            .path()
            .join(CACHE_DIRECTORY_NAME)
            .join(DEFAULT_CACHE_FILE_NAME);
        assert_eq!(
            resolution.directive,
            CacheDirective::Use(CacheLocation::Default(expected))
        );
        assert!(temp.path().join(CACHE_DIRECTORY_NAME).is_dir());
        assert!(resolution.warning.is_none());
    }

    #[test]
    fn test_missing_platform_directory_disables_caching() {
        let host = HostEnvironment {
            working_directory: PathBuf::from("/"),
            cache_directory: None,
        };
        let resolution = resolve_cache(None, &host).unwrap();
        assert_eq!(
            resolution.directive,
            CacheDirective::Use(CacheLocation::Disabled)
        );
        assert!(matches!(resolution.warning, Some(Error::NoCacheDirectory)));
    }

    #[test]
    fn test_uncreatable_directory_disables_caching() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let resolution = resolve_cache(None, &host_with_cache(&blocker)).unwrap();
        assert_eq!(
            resolution.directive,
            CacheDirective::Use(CacheLocation::Disabled)
        );
        assert!(matches!(
            resolution.warning,
            Some(Error::CacheDirectory { .. })
        ));
    }

    #[test]
    fn test_ignore_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let resolution = resolve_cache(Some("ignore"), &host_with_cache(temp.path())).unwrap();
        assert_eq!(
            resolution.directive,
            CacheDirective::Use(CacheLocation::Disabled)
        );
        assert!(!temp.path().join(CACHE_DIRECTORY_NAME).exists());
    }

    #[test]
    fn test_empty_value_is_usage_error() {
        let temp = TempDir::new().unwrap();
        let result = resolve_cache(Some(""), &host_with_cache(temp.path()));
        assert!(matches!(result, Err(Error::MissingValue(key)) if key == "cache"));
    }

    #[test]
    fn test_existing_directory_gets_default_file_name() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().to_str().unwrap();
        let resolution = resolve_cache(Some(explicit), &host_with_cache(temp.path())).unwrap();
        assert_eq!(
            resolution.directive,
            CacheDirective::Use(CacheLocation::Explicit(
                temp.path().join(DEFAULT_CACHE_FILE_NAME)
            ))
        );
    }

    #[test]
    fn test_explicit_file_is_expanded_relative_to_working_directory() {
        let temp = TempDir::new().unwrap();
        let resolution =
            resolve_cache(Some("build/fmt.cache"), &host_with_cache(temp.path())).unwrap();
        assert_eq!(
            resolution.directive,
            CacheDirective::Use(CacheLocation::Explicit(
                temp.path().join("build/fmt.cache")
            ))
        );
    }

    #[test]
    fn test_clear_resolves_default_and_deletes_file() {
        let temp = TempDir::new().unwrap();
        let host = host_with_cache(temp.path());
        let resolution = resolve_cache(Some("clear"), &host).unwrap();

        let CacheDirective::Clear(Some(path)) = resolution.directive else {
            panic!("expected a clear directive with a path");
        };
        fs::write(&path, "cached").unwrap();

        assert!(clear_cache(&path).unwrap());
        assert!(!path.exists());
        assert!(!clear_cache(&path).unwrap());
    }
}
