//! swiftfmt Core Library
//!
//! This crate provides the core functionality for swiftfmt, a formatter for
//! Swift-like brace-delimited source code.
//!
//! # Key Features
//!
//! - **Option Resolution**: Map raw command-line flags onto a typed [`options::FormatOptions`]
//!   through a declarative vocabulary table
//! - **Path and Cache Resolution**: Expand user paths and decide where the incremental cache lives
//! - **Formatting Engine**: A lossless tokenizer and an ordered list of formatting rules
//! - **Option Inference**: Derive options from the style of existing source files
//! - **Batch Processing**: Format files and directory trees with an incremental cache
//! - **Error Handling**: Tagged errors that map onto process exit codes
//!
//! # Examples
//!
//! Resolving flags and formatting a snippet:
//!
//! ```
//! use swiftfmt_core::arguments::{options_for_arguments, RawArguments};
//! use swiftfmt_core::formatter::format;
//! use swiftfmt_core::rules::default_rules;
//!
//! let args = RawArguments::from_pairs([("indent", "2")], []);
//! let options = options_for_arguments(&args)?;
//! let formatted = format("if ready {\ngo()\n}\n", default_rules(), &options)?;
//! assert_eq!(formatted, "if ready {\n  go()\n}\n");
//! # Ok::<(), swiftfmt_core::error::Error>(())
//! ```

pub mod arguments;
pub mod batch;
pub mod cache;
pub mod error;
pub mod formatter;
pub mod inference;
pub mod options;
pub mod paths;
pub mod rules;
pub mod tokenizer;

/// Version reported by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
