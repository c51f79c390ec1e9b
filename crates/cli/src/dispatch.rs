//! Top-level execution: choosing a mode for one invocation and running it.
//!
//! Options are resolved first, so an invalid flag value stops the run before
//! anything else happens. Then exactly one mode runs, checked in this order:
//! help, version, option inference, cache clearing, stdin formatting (no
//! inputs) and batch formatting.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, info};
use swiftfmt_core::arguments::{options_for_arguments, RawArguments};
use swiftfmt_core::batch::{process_inputs, write_file, BatchSummary};
use swiftfmt_core::cache::location::clear_cache;
use swiftfmt_core::cache::{resolve_cache, CacheDirective};
use swiftfmt_core::error::{Error, ParseError, Result};
use swiftfmt_core::formatter;
use swiftfmt_core::inference;
use swiftfmt_core::options::FormatOptions;
use swiftfmt_core::paths::HostEnvironment;
use swiftfmt_core::rules::default_rules;

use crate::help::{help_text, version_line};
use crate::report::write_error;
use crate::stdin::{run_session, StdinCompletion, StdinOutcome, StdinTimeouts};

/// The formatting services the dispatcher delegates to.
pub trait Services: Send + Sync {
    /// Formats one complete source text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text cannot be parsed.
    fn format(&self, source: &str, options: &FormatOptions) -> std::result::Result<String, ParseError>;

    /// Formats files and directories on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if a formatted file cannot be written.
    fn process_batch(
        &self,
        inputs: &[PathBuf],
        output: Option<&Path>,
        options: &FormatOptions,
        cache: Option<&Path>,
    ) -> Result<BatchSummary>;

    /// Infers options from the sources at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be walked.
    fn infer_options(&self, root: &Path) -> Result<(usize, FormatOptions)>;
}

/// [`Services`] backed by `swiftfmt-core`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Toolchain;

impl Services for Toolchain {
    fn format(&self, source: &str, options: &FormatOptions) -> std::result::Result<String, ParseError> {
        formatter::format(source, default_rules(), options)
    }

    fn process_batch(
        &self,
        inputs: &[PathBuf],
        output: Option<&Path>,
        options: &FormatOptions,
        cache: Option<&Path>,
    ) -> Result<BatchSummary> {
        process_inputs(inputs, output, options, cache)
    }

    fn infer_options(&self, root: &Path) -> Result<(usize, FormatOptions)> {
        inference::infer_options(root)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionResult {
    pub files_written: usize,
    pub files_checked: usize,
    /// Wall-clock seconds, rounded to two decimals.
    pub elapsed: f64,
}

/// What an invocation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Help,
    Version,
    Inferred { files: usize, options: FormatOptions },
    CacheCleared { removed: bool },
    StdinFormatted,
    Formatted(ExecutionResult),
}

fn rounded_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

fn files(count: usize) -> &'static str {
    if count == 1 {
        "file"
    } else {
        "files"
    }
}

pub struct Dispatcher {
    services: Arc<dyn Services>,
    host: HostEnvironment,
    timeouts: StdinTimeouts,
    styled_errors: bool,
}

impl Dispatcher {
    pub fn new(services: Arc<dyn Services>, host: HostEnvironment) -> Self {
        Self {
            services,
            host,
            timeouts: StdinTimeouts::default(),
            styled_errors: false,
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: StdinTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Colour the `error:` prefix of non-fatal errors.
    #[must_use]
    pub fn with_styled_errors(mut self, styled: bool) -> Self {
        self.styled_errors = styled;
        self
    }

    /// Runs one invocation. Progress and results go to `out`, non-fatal
    /// errors to `err`; `input` is only read when there are no inputs.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: an invalid flag value, `--output` with
    /// several inputs, a parse failure on stdin, a failed write, or a stdin
    /// timeout.
    pub fn run<R>(
        &self,
        args: &RawArguments,
        input: R,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Outcome>
    where
        R: Read + Send + 'static,
    {
        let options = options_for_arguments(args)?;

        if args.contains("help") {
            write!(out, "{}", help_text())?;
            return Ok(Outcome::Help);
        }

        if args.contains("version") {
            writeln!(out, "{}", version_line())?;
            return Ok(Outcome::Version);
        }

        if let Some(root) = args.get("inferoptions") {
            return self.infer(root, out);
        }

        let inputs: Vec<PathBuf> = (1..)
            .map_while(|ordinal| args.positional(ordinal))
            .map(|input| self.host.expand_path(input))
            .collect();

        let output = match args.get("output") {
            Some("") => return Err(Error::MissingValue("output".to_string())),
            Some(path) => Some(self.host.expand_path(path)),
            None => None,
        };
        if output.is_some() && inputs.len() > 1 {
            return Err(Error::OutputWithMultipleInputs);
        }

        let resolution = resolve_cache(args.get("cache"), &self.host)?;
        if let Some(warning) = &resolution.warning {
            write_error(err, warning, self.styled_errors)?;
        }
        let cache = match resolution.directive {
            CacheDirective::Clear(path) => return self.clear(path.as_deref(), out),
            CacheDirective::Use(location) => location,
        };

        let outcome = if inputs.is_empty() {
            self.format_stdin(input, options, output, out)?
        } else {
            self.format_batch(&inputs, output.as_deref(), &options, cache.path(), out, err)?
        };
        out.flush()?;
        Ok(outcome)
    }

    fn infer(&self, root: &str, out: &mut dyn Write) -> Result<Outcome> {
        if root.is_empty() {
            return Err(Error::MissingValue("inferoptions".to_string()));
        }

        writeln!(out, "inferring swiftfmt options from source file(s)...")?;
        let start = Instant::now();
        let (count, options) = self.services.infer_options(&self.host.expand_path(root))?;
        let elapsed = rounded_seconds(start.elapsed());

        let arguments = options
            .to_arguments()
            .iter()
            .map(|(key, value)| format!("--{key} {value}"))
            .join(" ");

        writeln!(out, "options inferred from {count} {} in {elapsed}s", files(count))?;
        writeln!(out)?;
        writeln!(out, "{arguments}")?;
        writeln!(out)?;

        Ok(Outcome::Inferred {
            files: count,
            options,
        })
    }

    fn clear(&self, path: Option<&Path>, out: &mut dyn Write) -> Result<Outcome> {
        let removed = match path {
            Some(path) => clear_cache(path)?,
            None => false,
        };

        if removed {
            info!("Removed cache file");
            writeln!(out, "swiftfmt cache cleared")?;
        } else {
            writeln!(out, "no swiftfmt cache to clear")?;
        }
        Ok(Outcome::CacheCleared { removed })
    }

    fn format_stdin<R>(
        &self,
        input: R,
        options: FormatOptions,
        output: Option<PathBuf>,
        out: &mut dyn Write,
    ) -> Result<Outcome>
    where
        R: Read + Send + 'static,
    {
        let services = Arc::clone(&self.services);
        let handler = move |text: String| -> Result<StdinCompletion> {
            let formatted = services.format(&text, &options)?;
            match output {
                Some(path) => {
                    write_file(&path, &formatted)?;
                    Ok(StdinCompletion::Written(path))
                }
                None => Ok(StdinCompletion::Formatted(formatted)),
            }
        };

        match run_session(input, self.timeouts, handler)? {
            StdinOutcome::NoInput => {
                write!(out, "{}", help_text())?;
                Ok(Outcome::Help)
            }
            StdinOutcome::Completed(StdinCompletion::Formatted(text)) => {
                writeln!(out, "{text}")?;
                Ok(Outcome::StdinFormatted)
            }
            StdinOutcome::Completed(StdinCompletion::Written(path)) => {
                debug!("Wrote formatted stdin to `{}`", path.display());
                writeln!(out, "swiftfmt completed successfully")?;
                Ok(Outcome::StdinFormatted)
            }
        }
    }

    fn format_batch(
        &self,
        inputs: &[PathBuf],
        output: Option<&Path>,
        options: &FormatOptions,
        cache: Option<&Path>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Outcome> {
        writeln!(out, "running swiftfmt...")?;
        let start = Instant::now();
        let summary = self.services.process_batch(inputs, output, options, cache)?;
        let elapsed = rounded_seconds(start.elapsed());

        for error in &summary.errors {
            write_error(err, error, self.styled_errors)?;
        }

        writeln!(
            out,
            "swiftfmt completed. {}/{} {} updated in {elapsed}s",
            summary.written,
            summary.checked,
            files(summary.checked)
        )?;

        Ok(Outcome::Formatted(ExecutionResult {
            files_written: summary.written,
            files_checked: summary.checked,
            elapsed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Mutex;
    use swiftfmt_core::options::Indent;
    use tempfile::TempDir;

    /// Records every call and answers with canned results.
    #[derive(Default)]
    struct FakeServices {
        calls: Mutex<Vec<String>>,
    }

    impl FakeServices {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl Services for FakeServices {
        fn format(&self, source: &str, _options: &FormatOptions) -> std::result::Result<String, ParseError> {
            self.record(format!("format {source:?}"));
            if source.contains('{') {
                return Err(ParseError::new(1, "unclosed '{'"));
            }
            Ok(source.to_uppercase())
        }

        fn process_batch(
            &self,
            inputs: &[PathBuf],
            output: Option<&Path>,
            options: &FormatOptions,
            cache: Option<&Path>,
        ) -> Result<BatchSummary> {
            self.record(format!(
                "batch {} output={} indent={:?} cache={}",
                inputs.len(),
                output.is_some(),
                options.indent,
                cache.is_some()
            ));
            Ok(BatchSummary {
                written: 1,
                checked: 2,
                errors: vec![Error::custom("could not parse b.swift")],
            })
        }

        fn infer_options(&self, root: &Path) -> Result<(usize, FormatOptions)> {
            self.record(format!("infer {}", root.display()));
            Ok((
                1,
                FormatOptions {
                    indent: Indent::Tab,
                    ..FormatOptions::default()
                },
            ))
        }
    }

    struct Harness {
        services: Arc<FakeServices>,
        dispatcher: Dispatcher,
        dir: TempDir,
        cache_file: PathBuf,
    }

    fn harness() -> Harness {
        let dir = TempDir::new().unwrap();
        let host = HostEnvironment {
            working_directory: dir.path().to_path_buf(),
            cache_directory: Some(dir.path().join("caches")),
        };
        let services = Arc::new(FakeServices::default());
        let dispatcher = Dispatcher::new(services.clone(), host).with_timeouts(StdinTimeouts {
            probe: Duration::from_millis(200),
            bound: Duration::from_secs(5),
        });
        Harness {
            services,
            dispatcher,
            cache_file: dir.path().join("caches/swiftfmt/swiftfmt.cache"),
            dir,
        }
    }

    fn run(
        harness: &Harness,
        flags: &[(&str, &str)],
        inputs: &[&str],
        stdin: &'static str,
    ) -> (Result<Outcome>, String, String) {
        let args = RawArguments::from_pairs(flags.iter().copied(), inputs.iter().copied());
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = harness
            .dispatcher
            .run(&args, Cursor::new(stdin), &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_help_is_shown_without_touching_services() {
        let h = harness();
        let (result, out, _) = run(&h, &[("help", "")], &["a.swift"], "");
        assert_eq!(result.unwrap(), Outcome::Help);
        assert_eq!(out, help_text());
        assert!(h.services.calls().is_empty());
    }

    #[test]
    fn test_invalid_option_wins_over_help() {
        let h = harness();
        let (result, out, _) = run(&h, &[("help", ""), ("ranges", "sideways")], &[], "");
        assert!(matches!(result, Err(Error::UnsupportedValue { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_version() {
        let h = harness();
        let (result, out, _) = run(&h, &[("version", "")], &[], "");
        assert_eq!(result.unwrap(), Outcome::Version);
        assert_eq!(out, format!("{}\n", version_line()));
    }

    #[test]
    fn test_inference_skips_formatting_and_cache() {
        let h = harness();
        std::fs::create_dir_all(h.cache_file.parent().unwrap()).unwrap();
        std::fs::write(&h.cache_file, "{}").unwrap();

        let (result, out, _) = run(
            &h,
            &[("inferoptions", "Sources"), ("cache", "clear")],
            &["a.swift"],
            "",
        );

        assert!(matches!(result.unwrap(), Outcome::Inferred { files: 1, .. }));
        assert!(h.cache_file.exists());
        let calls = h.services.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("infer ") && calls[0].ends_with("Sources"));

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "inferring swiftfmt options from source file(s)...");
        assert!(lines[1].starts_with("options inferred from 1 file in "));
        assert_eq!(lines[2], "");
        assert!(lines[3].starts_with("--indent tab --allman false"));
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_empty_inferoptions_is_missing_value() {
        let h = harness();
        let (result, _, _) = run(&h, &[("inferoptions", "")], &[], "");
        assert!(matches!(result, Err(Error::MissingValue(key)) if key == "inferoptions"));
    }

    #[test]
    fn test_output_with_several_inputs_is_rejected() {
        let h = harness();
        let (result, _, _) = run(&h, &[("output", "out")], &["a.swift", "b.swift"], "");
        assert!(matches!(result, Err(Error::OutputWithMultipleInputs)));
        assert!(h.services.calls().is_empty());
    }

    #[test]
    fn test_empty_output_is_missing_value() {
        let h = harness();
        let (result, _, _) = run(&h, &[("output", "")], &["a.swift"], "");
        assert!(matches!(result, Err(Error::MissingValue(key)) if key == "output"));
    }

    #[test]
    fn test_batch_reports_summary_and_file_errors() {
        let h = harness();
        let (result, out, err) = run(&h, &[("indent", "2")], &["a.swift", "src"], "");

        let Outcome::Formatted(execution) = result.unwrap() else {
            panic!("expected batch formatting");
        };
        assert_eq!((execution.files_written, execution.files_checked), (1, 2));
        assert_eq!(
            h.services.calls(),
            vec!["batch 2 output=false indent=Spaces(2) cache=true".to_string()]
        );
        assert!(out.starts_with("running swiftfmt...\nswiftfmt completed. 1/2 files updated in "));
        assert_eq!(err, "error: could not parse b.swift\n");
    }

    #[test]
    fn test_cache_ignore_passes_no_cache() {
        let h = harness();
        let (result, _, _) = run(&h, &[("cache", "ignore")], &["a.swift"], "");
        assert!(result.is_ok());
        assert!(h.services.calls()[0].ends_with("cache=false"));
    }

    #[test]
    fn test_cache_clear_deletes_and_stops() {
        let h = harness();
        std::fs::create_dir_all(h.cache_file.parent().unwrap()).unwrap();
        std::fs::write(&h.cache_file, "{}").unwrap();

        let (result, out, _) = run(&h, &[("cache", "clear")], &["a.swift"], "");
        assert_eq!(result.unwrap(), Outcome::CacheCleared { removed: true });
        assert_eq!(out, "swiftfmt cache cleared\n");
        assert!(!h.cache_file.exists());
        assert!(h.services.calls().is_empty());

        let (result, out, _) = run(&h, &[("cache", "clear")], &[], "");
        assert_eq!(result.unwrap(), Outcome::CacheCleared { removed: false });
        assert_eq!(out, "no swiftfmt cache to clear\n");
    }

    #[test]
    fn test_empty_cache_value_is_missing_value() {
        let h = harness();
        let (result, _, _) = run(&h, &[("cache", "")], &["a.swift"], "");
        assert!(matches!(result, Err(Error::MissingValue(key)) if key == "cache"));
    }

    #[test]
    fn test_stdin_is_formatted_to_stdout() {
        let h = harness();
        let (result, out, _) = run(&h, &[], &[], "let x=1\n");
        assert_eq!(result.unwrap(), Outcome::StdinFormatted);
        assert_eq!(out, "LET X=1\n\n");
    }

    #[test]
    fn test_stdin_output_ends_with_linebreak() {
        let h = harness();
        let (result, out, _) = run(&h, &[], &[], "let x=1");
        assert_eq!(result.unwrap(), Outcome::StdinFormatted);
        assert_eq!(out, "LET X=1\n");
    }

    #[test]
    fn test_stdin_output_replaces_longer_file() {
        let h = harness();
        let target = h.dir.path().join("formatted.swift");
        std::fs::write(&target, "// a much longer previous version of the file\n").unwrap();

        let (result, _, _) = run(&h, &[("output", "formatted.swift")], &[], "let y=2\n");
        assert_eq!(result.unwrap(), Outcome::StdinFormatted);
        assert_eq!(std::fs::read_to_string(target).unwrap(), "LET Y=2\n");
    }

    #[test]
    fn test_stdin_written_to_output_file() {
        let h = harness();
        let target = h.dir.path().join("formatted.swift");
        let (result, out, _) = run(&h, &[("output", "formatted.swift")], &[], "let x=1\n");
        assert_eq!(result.unwrap(), Outcome::StdinFormatted);
        assert_eq!(out, "swiftfmt completed successfully\n");
        assert_eq!(std::fs::read_to_string(target).unwrap(), "LET X=1\n");
    }

    #[test]
    fn test_no_stdin_shows_help() {
        let h = harness();
        let (result, out, _) = run(&h, &[], &[], "");
        assert_eq!(result.unwrap(), Outcome::Help);
        assert_eq!(out, help_text());
        assert!(h.services.calls().is_empty());
    }

    #[test]
    fn test_stdin_parse_failure_is_fatal() {
        let h = harness();
        let (result, _, _) = run(&h, &[], &[], "func f() {\n");
        let error = result.unwrap_err();
        assert!(matches!(error, Error::ParseInput(_)));
        assert_eq!(error.exit_code(), 65);
    }

    #[test]
    fn test_rounded_seconds() {
        assert!((rounded_seconds(Duration::from_millis(1234)) - 1.23).abs() < f64::EPSILON);
        assert!(rounded_seconds(Duration::from_millis(4)).abs() < f64::EPSILON);
    }
}
