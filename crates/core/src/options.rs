//! Typed formatting configuration.
//!
//! [`FormatOptions`] holds every independently defaulted formatting decision
//! the engine consults. Values arrive through the option table in
//! [`crate::arguments`] and can be rendered back into command-line flags with
//! [`FormatOptions::to_arguments`].

use indexmap::IndexMap;
use sha2::{Digest, Sha256};

/// Unit of one indentation level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indent {
    Tab,
    Spaces(usize),
}

impl Indent {
    pub fn unit(&self) -> String {
        match self {
            Indent::Tab => "\t".to_string(),
            Indent::Spaces(count) => " ".repeat(*count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linebreak {
    Cr,
    Lf,
    CrLf,
}

impl Linebreak {
    pub fn as_str(self) -> &'static str {
        match self {
            Linebreak::Cr => "\r",
            Linebreak::Lf => "\n",
            Linebreak::CrLf => "\r\n",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Linebreak::Cr => "cr",
            Linebreak::Lf => "lf",
            Linebreak::CrLf => "crlf",
        }
    }
}

/// How `#if` / `#else` / `#endif` blocks are indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfdefIndent {
    /// Directives sit at the enclosing level, their bodies one level deeper.
    Indent,
    /// Directives and bodies both sit at the enclosing level.
    NoIndent,
    /// Directives are flush left, bodies stay at the enclosing level.
    Outdent,
}

impl IfdefIndent {
    pub fn name(self) -> &'static str {
        match self {
            IfdefIndent::Indent => "indent",
            IfdefIndent::NoIndent => "noindent",
            IfdefIndent::Outdent => "outdent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub indent: Indent,
    pub allman_braces: bool,
    pub allow_inline_semicolons: bool,
    pub trailing_commas: bool,
    pub indent_comments: bool,
    pub linebreak: Linebreak,
    pub space_around_range_operators: bool,
    pub use_void: bool,
    pub truncate_blank_lines: bool,
    pub insert_blank_lines: bool,
    pub remove_blank_lines: bool,
    pub strip_header: bool,
    pub ifdef_indent: IfdefIndent,
    pub uppercase_hex: bool,
    pub experimental_rules: bool,
    pub fragment: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: Indent::Spaces(4),
            allman_braces: false,
            allow_inline_semicolons: true,
            trailing_commas: true,
            indent_comments: true,
            linebreak: Linebreak::Lf,
            space_around_range_operators: true,
            use_void: true,
            truncate_blank_lines: true,
            insert_blank_lines: true,
            remove_blank_lines: true,
            strip_header: false,
            ifdef_indent: IfdefIndent::Indent,
            uppercase_hex: true,
            experimental_rules: false,
            fragment: false,
        }
    }
}

fn choose(flag: bool, when_true: &str, when_false: &str) -> String {
    if flag {
        when_true.to_string()
    } else {
        when_false.to_string()
    }
}

impl FormatOptions {
    /// Renders the options as flag/value pairs, in help-page order.
    ///
    /// Every rendered value is accepted by the option resolver, so feeding the
    /// result back through it reproduces `self`.
    pub fn to_arguments(&self) -> IndexMap<&'static str, String> {
        let mut arguments = IndexMap::new();
        let indent = match self.indent {
            Indent::Tab => "tab".to_string(),
            Indent::Spaces(count) => count.to_string(),
        };
        arguments.insert("indent", indent);
        arguments.insert("allman", choose(self.allman_braces, "true", "false"));
        arguments.insert("linebreaks", self.linebreak.name().to_string());
        arguments.insert(
            "semicolons",
            choose(self.allow_inline_semicolons, "inline", "never"),
        );
        arguments.insert("commas", choose(self.trailing_commas, "always", "inline"));
        arguments.insert("comments", choose(self.indent_comments, "indent", "ignore"));
        arguments.insert(
            "ranges",
            choose(self.space_around_range_operators, "spaced", "nospace"),
        );
        arguments.insert("empty", choose(self.use_void, "void", "tuple"));
        arguments.insert(
            "trimwhitespace",
            choose(self.truncate_blank_lines, "always", "nonblank-lines"),
        );
        arguments.insert(
            "insertlines",
            choose(self.insert_blank_lines, "enabled", "disabled"),
        );
        arguments.insert(
            "removelines",
            choose(self.remove_blank_lines, "enabled", "disabled"),
        );
        arguments.insert("header", choose(self.strip_header, "strip", "ignore"));
        arguments.insert("ifdef", self.ifdef_indent.name().to_string());
        arguments.insert(
            "hexliterals",
            choose(self.uppercase_hex, "uppercase", "lowercase"),
        );
        arguments.insert(
            "experimental",
            choose(self.experimental_rules, "enabled", "disabled"),
        );
        arguments.insert("fragment", choose(self.fragment, "true", "false"));
        arguments
    }

    /// Stable digest of the configuration, used to invalidate cached results
    /// when options change between runs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (key, value) in self.to_arguments() {
            hasher.update(key.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
            hasher.update(b";");
        }
        format!("{:x}", hasher.finalize())
    }
}
