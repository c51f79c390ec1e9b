//! Command-line argument parsing.
//!
//! This module defines the command-line surface with the `clap` crate and
//! converts it into [`RawArguments`], the flat flag map the option resolver
//! and dispatcher work from. Every value flag accepts an optional value so
//! that a bare `--indent` reaches the resolver as an empty value and is
//! reported as missing. Negative numbers are taken as values, so they are
//! rejected by the resolver like any other unsupported value.

use std::ffi::OsString;

use clap::Parser;
use indexmap::IndexMap;
use swiftfmt_core::arguments::RawArguments;
use swiftfmt_core::error::{Error, Result};

/// Command-line arguments for the swiftfmt binary.
///
/// The built-in help and version flags are disabled; `--help` and
/// `--version` print swiftfmt's own text instead.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use swiftfmt_cli::cli_args::Args;
///
/// let args = Args::parse_from(["swiftfmt", "--indent", "2", "Sources"]);
/// assert_eq!(args.indent.as_deref(), Some("2"));
/// assert_eq!(args.inputs, vec!["Sources".to_string()]);
/// ```
#[derive(Parser, Debug, Default)]
#[command(
    name = "swiftfmt",
    disable_help_flag = true,
    disable_version_flag = true,
    term_width = 0
)]
pub struct Args {
    /// Output path for formatted file(s) (defaults to input path).
    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub output: Option<String>,

    /// Path to file or directory from which to infer formatting options.
    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub inferoptions: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub indent: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub allman: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub linebreaks: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub semicolons: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub commas: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub comments: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub ranges: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub empty: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub trimwhitespace: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub insertlines: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub removelines: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub header: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub ifdef: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub hexliterals: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub experimental: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub fragment: Option<String>,

    /// Path to cache file, or "clear" or "ignore" the default cache.
    #[arg(long, num_args = 0..=1, default_missing_value = "", allow_negative_numbers = true)]
    pub cache: Option<String>,

    #[arg(long, action)]
    pub help: bool,

    #[arg(long, action)]
    pub version: bool,

    /// Input file(s) or directory path(s).
    pub inputs: Vec<String>,
}

impl Args {
    /// Flattens the parsed arguments into flag/value pairs plus positional
    /// inputs. `--help` and `--version` are recorded with an empty value.
    pub fn into_raw_arguments(self) -> RawArguments {
        let values = [
            ("output", self.output),
            ("inferoptions", self.inferoptions),
            ("indent", self.indent),
            ("allman", self.allman),
            ("linebreaks", self.linebreaks),
            ("semicolons", self.semicolons),
            ("commas", self.commas),
            ("comments", self.comments),
            ("ranges", self.ranges),
            ("empty", self.empty),
            ("trimwhitespace", self.trimwhitespace),
            ("insertlines", self.insertlines),
            ("removelines", self.removelines),
            ("header", self.header),
            ("ifdef", self.ifdef),
            ("hexliterals", self.hexliterals),
            ("experimental", self.experimental),
            ("fragment", self.fragment),
            ("cache", self.cache),
            ("help", self.help.then(String::new)),
            ("version", self.version.then(String::new)),
        ];

        let flags: IndexMap<String, String> = values
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
            .collect();

        RawArguments::new(flags, self.inputs)
    }
}

/// Parses a full argument list, program name first.
///
/// # Errors
///
/// Returns [`Error::InvalidArguments`] carrying the first line of clap's
/// message for unknown flags and similar problems.
pub fn parse_arguments<I, T>(args: I) -> Result<RawArguments>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(args)
        .map(Args::into_raw_arguments)
        .map_err(|e| {
            let message = e.to_string();
            let first_line = message.lines().next().unwrap_or_default();
            Error::InvalidArguments(
                first_line
                    .strip_prefix("error: ")
                    .unwrap_or(first_line)
                    .to_string(),
            )
        })
}
