//! Formatting rules.
//!
//! Each rule edits the token list in place. Rules run in the order of
//! [`DEFAULT_RULES`]; experimental rules are skipped unless
//! `experimental_rules` is enabled.

mod blank_lines;
mod braces;
mod indent;
mod syntax;
mod whitespace;

use crate::options::FormatOptions;
use crate::tokenizer::Token;

pub struct FormatRule {
    pub name: &'static str,
    pub experimental: bool,
    apply: fn(&mut Vec<Token>, &FormatOptions),
}

impl FormatRule {
    pub fn apply(&self, tokens: &mut Vec<Token>, options: &FormatOptions) {
        (self.apply)(tokens, options);
    }

    pub fn is_enabled(&self, options: &FormatOptions) -> bool {
        !self.experimental || options.experimental_rules
    }
}

pub static DEFAULT_RULES: &[FormatRule] = &[
    FormatRule {
        name: "linebreaks",
        experimental: false,
        apply: whitespace::linebreaks,
    },
    FormatRule {
        name: "header",
        experimental: false,
        apply: whitespace::header,
    },
    FormatRule {
        name: "semicolons",
        experimental: false,
        apply: syntax::semicolons,
    },
    FormatRule {
        name: "ranges",
        experimental: false,
        apply: syntax::ranges,
    },
    FormatRule {
        name: "void",
        experimental: false,
        apply: syntax::void,
    },
    FormatRule {
        name: "hexLiterals",
        experimental: false,
        apply: syntax::hex_literals,
    },
    FormatRule {
        name: "trailingCommas",
        experimental: false,
        apply: syntax::trailing_commas,
    },
    FormatRule {
        name: "braces",
        experimental: false,
        apply: braces::braces,
    },
    FormatRule {
        name: "blankLinesAtScopeEdges",
        experimental: false,
        apply: blank_lines::at_scope_edges,
    },
    FormatRule {
        name: "blankLinesBetweenScopes",
        experimental: false,
        apply: blank_lines::between_scopes,
    },
    FormatRule {
        name: "consecutiveBlankLines",
        experimental: true,
        apply: blank_lines::consecutive,
    },
    FormatRule {
        name: "indent",
        experimental: false,
        apply: indent::indent,
    },
    FormatRule {
        name: "trailingWhitespace",
        experimental: false,
        apply: whitespace::trailing_whitespace,
    },
];

pub fn default_rules() -> &'static [FormatRule] {
    DEFAULT_RULES
}

pub fn rule_named(name: &str) -> Option<&'static FormatRule> {
    DEFAULT_RULES.iter().find(|rule| rule.name == name)
}

// Token navigation shared by the rules.

/// Index of the next token after `index` that is not horizontal whitespace.
pub(crate) fn next_non_space(tokens: &[Token], index: usize) -> Option<usize> {
    (index + 1..tokens.len()).find(|&i| !tokens[i].is_whitespace())
}

/// Index of the previous token before `index` that is not horizontal
/// whitespace.
pub(crate) fn prev_non_space(tokens: &[Token], index: usize) -> Option<usize> {
    (0..index).rev().find(|&i| !tokens[i].is_whitespace())
}

/// Previous token that is not whitespace, a linebreak or a comment.
pub(crate) fn prev_meaningful(tokens: &[Token], index: usize) -> Option<usize> {
    (0..index).rev().find(|&i| {
        let token = &tokens[i];
        !token.is_whitespace() && !token.is_linebreak() && !token.is_comment()
    })
}

/// Index of the scope closer matching the opener at `open`.
pub(crate) fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::StartOfScope(_) => depth += 1,
            Token::EndOfScope(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Start index of the line containing `index`.
pub(crate) fn line_start(tokens: &[Token], index: usize) -> usize {
    (0..index)
        .rev()
        .find(|&i| tokens[i].is_linebreak())
        .map_or(0, |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_rule_order_runs_indent_before_trailing_whitespace() {
        let names: Vec<&str> = DEFAULT_RULES.iter().map(|rule| rule.name).collect();
        let indent = names.iter().position(|n| *n == "indent").unwrap();
        let trailing = names.iter().position(|n| *n == "trailingWhitespace").unwrap();
        assert!(indent < trailing);
        assert_eq!(names.first(), Some(&"linebreaks"));
    }

    #[test]
    fn test_experimental_rules_are_gated() {
        let rule = rule_named("consecutiveBlankLines").unwrap();
        assert!(!rule.is_enabled(&FormatOptions::default()));
        let options = FormatOptions {
            experimental_rules: true,
            ..FormatOptions::default()
        };
        assert!(rule.is_enabled(&options));
    }

    #[test]
    fn test_matching_close_skips_nested_scopes() {
        let tokens = tokenize("{ ( [ ] ) }").unwrap();
        assert_eq!(matching_close(&tokens, 0), Some(tokens.len() - 1));
        assert_eq!(matching_close(&tokens, 2), Some(8));
    }

    #[test]
    fn test_line_start() {
        let tokens = tokenize("a\nb c").unwrap();
        assert_eq!(line_start(&tokens, 4), 2);
        assert_eq!(line_start(&tokens, 0), 0);
    }
}
