//! swiftfmt command-line library
//!
//! This crate turns a command line into one formatting run. It owns the
//! terminal-facing half of swiftfmt; all formatting work is delegated to
//! `swiftfmt-core`.
//!
//! # Architecture
//!
//! - [`cli_args`]: flag parsing into raw flag/value pairs
//! - [`dispatch`]: mode selection (help, version, inference, cache clearing,
//!   stdin or batch formatting) and progress output
//! - [`stdin`]: reading piped input with a short probe and a longer bound
//! - [`help`]: help page and version line
//! - [`report`]: `error:` lines on stderr
//!
//! # Examples
//!
//! ```bash
//! # Format a directory in place
//! swiftfmt Sources
//!
//! # Format one file into another with tabs
//! swiftfmt main.swift --output formatted.swift --indent tab
//!
//! # Format piped input
//! cat main.swift | swiftfmt --indent 2
//!
//! # Suggest options for an existing code base
//! swiftfmt --inferoptions Sources
//! ```

pub mod cli_args;
pub mod dispatch;
pub mod help;
pub mod report;
pub mod stdin;
