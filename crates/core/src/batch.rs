//! Formats files and directory trees on disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::cache::FormatCache;
use crate::error::{Error, Result};
use crate::formatter::format;
use crate::options::FormatOptions;
use crate::paths::source_files;
use crate::rules::default_rules;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub written: usize,
    pub checked: usize,
    /// Files that could not be read or parsed. They are reported but do not
    /// stop the run.
    pub errors: Vec<Error>,
}

/// Where the formatted contents of `file`, found under `input`, are written.
fn destination(input: &Path, file: &Path, output: Option<&Path>) -> PathBuf {
    let Some(output) = output else {
        return file.to_path_buf();
    };

    if input == file {
        match file.file_name() {
            Some(name) if output.is_dir() => output.join(name),
            _ => output.to_path_buf(),
        }
    } else {
        output.join(file.strip_prefix(input).unwrap_or(file))
    }
}

/// Writes `contents` to `path`, creating parent directories.
///
/// The text goes to a temporary file beside `path` which is then renamed
/// over it, so an interrupted write leaves either the previous file or the
/// complete new one. An existing file keeps its permissions.
///
/// # Errors
///
/// Returns [`Error::Write`] if any step fails.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    let write_error = |original| Error::Write {
        path: path.display().to_string(),
        original,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_error)?;

    let mut file = NamedTempFile::new_in(parent).map_err(write_error)?;
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(file.path(), metadata.permissions()).map_err(write_error)?;
    }
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

struct Batch<'a> {
    options: &'a FormatOptions,
    options_fingerprint: String,
    cache: Option<FormatCache>,
    summary: BatchSummary,
}

impl Batch<'_> {
    fn process_file(&mut self, file: &Path, destination: &Path) -> Result<()> {
        let source = match fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                self.summary.errors.push(Error::io_error(
                    "input file".to_string(),
                    file.display().to_string(),
                    e,
                ));
                return Ok(());
            }
        };

        let in_place = destination == file;
        if in_place {
            if let Some(cache) = &self.cache {
                if cache.is_current(file, &source, &self.options_fingerprint) {
                    debug!("Skipping unchanged `{}`", file.display());
                    self.summary.checked += 1;
                    return Ok(());
                }
            }
        }

        let formatted = match format(&source, default_rules(), self.options) {
            Ok(formatted) => formatted,
            Err(error) => {
                self.summary.errors.push(Error::ParseFile {
                    path: file.display().to_string(),
                    source: error,
                });
                return Ok(());
            }
        };
        self.summary.checked += 1;

        if formatted != source || !in_place {
            write_file(destination, &formatted)?;
            info!("Wrote `{}`", destination.display());
            self.summary.written += 1;
        }

        if let Some(cache) = self.cache.as_mut().filter(|_| in_place) {
            cache.record(file, &formatted, &self.options_fingerprint);
        }
        Ok(())
    }
}

/// Formats every input file, and every `.swift` file under every input
/// directory.
///
/// Without `output` files are rewritten in place. With `output`, a file
/// input is written to `output` (or into it, when it is a directory) and a
/// directory input is mirrored below `output`.
///
/// When `cache` is given, in-place files whose contents match their last
/// recorded result are skipped, and the cache is updated afterwards.
///
/// # Errors
///
/// Returns an error if a formatted file cannot be written. Unreadable or
/// unparsable inputs are collected in [`BatchSummary::errors`] instead.
pub fn process_inputs(
    inputs: &[PathBuf],
    output: Option<&Path>,
    options: &FormatOptions,
    cache: Option<&Path>,
) -> Result<BatchSummary> {
    let mut batch = Batch {
        options,
        options_fingerprint: options.fingerprint(),
        cache: cache.map(FormatCache::load),
        summary: BatchSummary::default(),
    };

    for input in inputs {
        let files = match source_files(input) {
            Ok(files) => files,
            Err(e) => {
                batch.summary.errors.push(e);
                continue;
            }
        };

        for file in files {
            let destination = destination(input, &file, output);
            batch.process_file(&file, &destination)?;
        }
    }

    if let (Some(cache), Some(path)) = (&batch.cache, cache) {
        if let Err(e) = cache.save(path) {
            warn!("Failed to save cache: {e}");
        }
    }

    Ok(batch.summary)
}
