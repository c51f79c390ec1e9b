//! Terminal error reporting.
//!
//! Every failure is shown as a single `error: <message>` line. The prefix is
//! coloured when the destination is a terminal.

use std::fmt::Display;
use std::io::{self, Write};

use crossterm::style::Stylize;
use crossterm::tty::IsTty;

fn prefix(styled: bool) -> String {
    if styled {
        "error:".red().to_string()
    } else {
        "error:".to_string()
    }
}

/// Writes one `error:` line to `writer`.
///
/// # Errors
///
/// Returns an error if `writer` fails.
pub fn write_error(writer: &mut dyn Write, error: &dyn Display, styled: bool) -> io::Result<()> {
    writeln!(writer, "{} {error}", prefix(styled))
}

/// Whether errors written to stderr should be coloured.
pub fn stderr_is_styled() -> bool {
    io::stderr().is_tty()
}

/// Prints a fatal error to stderr.
pub fn print_error(error: &dyn Display) {
    let mut stderr = io::stderr();
    // Nothing useful can be done if stderr itself is gone.
    let _ = write_error(&mut stderr, error, stderr_is_styled());
}
