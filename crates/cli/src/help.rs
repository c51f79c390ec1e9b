//! Help and version text.

use itertools::Itertools;
use swiftfmt_core::VERSION;

const USAGE: &str = "usage: swiftfmt [<file> ...] [--output path] [--indent spaces] [...]";

const FLAG_DESCRIPTIONS: &[(&str, &str)] = &[
    ("<file> ...", "input file(s) or directory path(s)"),
    ("--output", "output path for formatted file(s) (defaults to input path)"),
    ("--inferoptions", "path to file or directory from which to infer formatting options"),
    ("--indent", "number of spaces to indent, or \"tab\" to use tabs"),
    ("--allman", "use allman indentation style \"true\" or \"false\" (default)"),
    ("--linebreaks", "linebreak character to use. \"cr\", \"crlf\" or \"lf\" (default)"),
    ("--semicolons", "allow semicolons. \"never\" or \"inline\" (default)"),
    ("--commas", "commas in collection literals. \"always\" (default) or \"inline\""),
    ("--comments", "indenting of comment bodies. \"indent\" (default) or \"ignore\""),
    ("--ranges", "spacing for ranges. \"spaced\" (default) or \"nospace\""),
    ("--empty", "how empty values are represented. \"void\" (default) or \"tuple\""),
    ("--trimwhitespace", "trim trailing space. \"always\" (default) or \"nonblank-lines\""),
    ("--insertlines", "insert blank line after }. \"enabled\" (default) or \"disabled\""),
    ("--removelines", "remove blank line before }. \"enabled\" (default) or \"disabled\""),
    ("--header", "header comments. \"strip\" to remove, or \"ignore\" (default)"),
    ("--ifdef", "#if indenting. \"indent\" (default), \"noindent\" or \"outdent\""),
    ("--hexliterals", "casing for hex literals. \"uppercase\" (default) or \"lowercase\""),
    ("--experimental", "experimental rules. \"enabled\" or \"disabled\" (default)"),
    ("--fragment", "input is part of a larger file. \"true\" or \"false\" (default)"),
    ("--cache", "path to cache file, or \"clear\" or \"ignore\" the default cache"),
    ("--help", "this help page"),
    ("--version", "version information"),
];

pub fn version_line() -> String {
    format!("swiftfmt, version {VERSION}")
}

/// The full help page, ending with a blank line.
pub fn help_text() -> String {
    let flags = FLAG_DESCRIPTIONS
        .iter()
        .map(|(flag, description)| format!(" {flag:<18}{description}"))
        .join("\n");

    format!("{}\n\n{USAGE}\n\n{flags}\n\n", version_line())
}
