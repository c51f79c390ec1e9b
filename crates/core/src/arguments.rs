//! Raw invocation arguments and their resolution into [`FormatOptions`].
//!
//! The accepted vocabulary for every formatting flag lives in a single
//! declarative table, [`OPTION_TABLE`]. Each entry maps an accepted
//! (lowercase) value to the field update it performs; `indent` additionally
//! accepts any non-negative integer.

use indexmap::IndexMap;
use log::debug;

use crate::error::{Error, Result};
use crate::options::{FormatOptions, IfdefIndent, Indent, Linebreak};

/// Every flag name the preprocessor recognises.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "output",
    "inferoptions",
    "indent",
    "allman",
    "linebreaks",
    "semicolons",
    "commas",
    "comments",
    "ranges",
    "empty",
    "trimwhitespace",
    "insertlines",
    "removelines",
    "header",
    "ifdef",
    "hexliterals",
    "experimental",
    "fragment",
    "cache",
    "help",
    "version",
];

/// Flag values keyed by flag name, plus positional inputs in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArguments {
    flags: IndexMap<String, String>,
    inputs: Vec<String>,
}

impl RawArguments {
    pub fn new(flags: IndexMap<String, String>, inputs: Vec<String>) -> Self {
        Self { flags, inputs }
    }

    /// Builds arguments from `(key, value)` pairs; handy for callers that
    /// already split flags themselves.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
        inputs: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            flags: pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            inputs: inputs.into_iter().map(ToString::to_string).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.flags.contains_key(key)
    }

    /// Positional input by ordinal, starting at 1.
    pub fn positional(&self, ordinal: usize) -> Option<&str> {
        ordinal
            .checked_sub(1)
            .and_then(|index| self.inputs.get(index))
            .map(String::as_str)
    }
}

type Setter = fn(&mut FormatOptions);

/// Vocabulary for one formatting flag.
pub struct OptionDescriptor {
    pub key: &'static str,
    pub values: &'static [(&'static str, Setter)],
    parse_other: Option<fn(&str, &mut FormatOptions) -> bool>,
}

impl OptionDescriptor {
    /// Applies an already lowercased value. Returns `false` when the value is
    /// outside the vocabulary, leaving `options` untouched.
    pub fn apply(&self, value: &str, options: &mut FormatOptions) -> bool {
        if let Some((_, setter)) = self.values.iter().find(|(accepted, _)| *accepted == value) {
            setter(options);
            return true;
        }
        match self.parse_other {
            Some(parse) => parse(value, options),
            None => false,
        }
    }
}

/// Widest accepted `--indent` width.
pub const MAX_INDENT_WIDTH: usize = 64;

fn parse_indent_width(value: &str, options: &mut FormatOptions) -> bool {
    match value.parse::<usize>() {
        Ok(count) if count <= MAX_INDENT_WIDTH => {
            options.indent = Indent::Spaces(count);
            true
        }
        _ => false,
    }
}

pub static OPTION_TABLE: &[OptionDescriptor] = &[
    OptionDescriptor {
        key: "indent",
        values: &[
            ("tab", |o| o.indent = Indent::Tab),
            ("tabs", |o| o.indent = Indent::Tab),
            ("tabbed", |o| o.indent = Indent::Tab),
        ],
        parse_other: Some(parse_indent_width),
    },
    OptionDescriptor {
        key: "allman",
        values: &[
            ("true", |o| o.allman_braces = true),
            ("enabled", |o| o.allman_braces = true),
            ("false", |o| o.allman_braces = false),
            ("disabled", |o| o.allman_braces = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "semicolons",
        values: &[
            ("inline", |o| o.allow_inline_semicolons = true),
            ("never", |o| o.allow_inline_semicolons = false),
            ("false", |o| o.allow_inline_semicolons = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "commas",
        values: &[
            ("always", |o| o.trailing_commas = true),
            ("true", |o| o.trailing_commas = true),
            ("inline", |o| o.trailing_commas = false),
            ("false", |o| o.trailing_commas = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "comments",
        values: &[
            ("indent", |o| o.indent_comments = true),
            ("indented", |o| o.indent_comments = true),
            ("ignore", |o| o.indent_comments = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "linebreaks",
        values: &[
            ("cr", |o| o.linebreak = Linebreak::Cr),
            ("lf", |o| o.linebreak = Linebreak::Lf),
            ("crlf", |o| o.linebreak = Linebreak::CrLf),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "ranges",
        values: &[
            ("space", |o| o.space_around_range_operators = true),
            ("spaced", |o| o.space_around_range_operators = true),
            ("spaces", |o| o.space_around_range_operators = true),
            ("nospace", |o| o.space_around_range_operators = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "empty",
        values: &[
            ("void", |o| o.use_void = true),
            ("tuple", |o| o.use_void = false),
            ("tuples", |o| o.use_void = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "trimwhitespace",
        values: &[
            ("always", |o| o.truncate_blank_lines = true),
            ("nonblank-lines", |o| o.truncate_blank_lines = false),
            ("nonblank", |o| o.truncate_blank_lines = false),
            ("non-blank-lines", |o| o.truncate_blank_lines = false),
            ("non-blank", |o| o.truncate_blank_lines = false),
            ("nonempty-lines", |o| o.truncate_blank_lines = false),
            ("nonempty", |o| o.truncate_blank_lines = false),
            ("non-empty-lines", |o| o.truncate_blank_lines = false),
            ("non-empty", |o| o.truncate_blank_lines = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "insertlines",
        values: &[
            ("enabled", |o| o.insert_blank_lines = true),
            ("true", |o| o.insert_blank_lines = true),
            ("disabled", |o| o.insert_blank_lines = false),
            ("false", |o| o.insert_blank_lines = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "removelines",
        values: &[
            ("enabled", |o| o.remove_blank_lines = true),
            ("true", |o| o.remove_blank_lines = true),
            ("disabled", |o| o.remove_blank_lines = false),
            ("false", |o| o.remove_blank_lines = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "header",
        values: &[
            ("strip", |o| o.strip_header = true),
            ("ignore", |o| o.strip_header = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "ifdef",
        values: &[
            ("indent", |o| o.ifdef_indent = IfdefIndent::Indent),
            ("noindent", |o| o.ifdef_indent = IfdefIndent::NoIndent),
            ("outdent", |o| o.ifdef_indent = IfdefIndent::Outdent),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "hexliterals",
        values: &[
            ("uppercase", |o| o.uppercase_hex = true),
            ("upper", |o| o.uppercase_hex = true),
            ("lowercase", |o| o.uppercase_hex = false),
            ("lower", |o| o.uppercase_hex = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "experimental",
        values: &[
            ("enabled", |o| o.experimental_rules = true),
            ("true", |o| o.experimental_rules = true),
            ("disabled", |o| o.experimental_rules = false),
            ("false", |o| o.experimental_rules = false),
        ],
        parse_other: None,
    },
    OptionDescriptor {
        key: "fragment",
        values: &[
            ("true", |o| o.fragment = true),
            ("enabled", |o| o.fragment = true),
            ("false", |o| o.fragment = false),
            ("disabled", |o| o.fragment = false),
        ],
        parse_other: None,
    },
];

/// Resolves every formatting flag present in `args`.
///
/// Flags that are absent keep their defaults. Resolution stops at the first
/// empty or unsupported value, so a partially applied configuration is never
/// returned.
///
/// # Errors
///
/// Returns [`Error::MissingValue`] for a flag given without a value and
/// [`Error::UnsupportedValue`] for a value outside the flag's vocabulary.
pub fn options_for_arguments(args: &RawArguments) -> Result<FormatOptions> {
    let mut options = FormatOptions::default();

    for descriptor in OPTION_TABLE {
        let Some(value) = args.get(descriptor.key) else {
            continue;
        };

        if value.is_empty() {
            return Err(Error::MissingValue(descriptor.key.to_string()));
        }

        if !descriptor.apply(&value.to_lowercase(), &mut options) {
            return Err(Error::unsupported_value(descriptor.key, value));
        }
        debug!("Resolved --{} {}", descriptor.key, value);
    }

    Ok(options)
}
