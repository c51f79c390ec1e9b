//! Source formatting entry point.

use log::trace;

use crate::error::ParseError;
use crate::options::FormatOptions;
use crate::rules::FormatRule;
use crate::tokenizer::{check_scopes, render, tokenize};

/// Formats `source` by applying each enabled rule in order.
///
/// # Errors
///
/// Returns a [`ParseError`] when the source cannot be tokenized or its scopes
/// are unbalanced (unless `options.fragment` is set).
///
/// # Examples
///
/// ```
/// use swiftfmt_core::formatter::format;
/// use swiftfmt_core::options::FormatOptions;
/// use swiftfmt_core::rules::default_rules;
///
/// let formatted = format("if x {\nfoo();\n}\n", default_rules(), &FormatOptions::default())?;
/// assert_eq!(formatted, "if x {\n    foo()\n}\n");
/// # Ok::<(), swiftfmt_core::error::ParseError>(())
/// ```
pub fn format(source: &str, rules: &[FormatRule], options: &FormatOptions) -> Result<String, ParseError> {
    let mut tokens = tokenize(source)?;
    check_scopes(&tokens, options.fragment)?;

    for rule in rules.iter().filter(|rule| rule.is_enabled(options)) {
        trace!("Applying rule {}", rule.name);
        rule.apply(&mut tokens, options);
    }

    Ok(render(&tokens))
}
