//! Infers formatting options from existing source files.
//!
//! Every observation in every file casts one vote; the most common style
//! wins. Ties, and options nobody voted on, keep their default.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::arguments::MAX_INDENT_WIDTH;
use crate::error::Result;
use crate::options::{FormatOptions, Indent, Linebreak};
use crate::paths::source_files;
use crate::rules::{next_non_space, prev_meaningful, prev_non_space};
use crate::tokenizer::{tokenize, Token};

#[derive(Debug, Default)]
struct Votes {
    indent: Vec<Indent>,
    linebreak: Vec<Linebreak>,
    allman_braces: Vec<bool>,
    inline_semicolons: Vec<bool>,
    trailing_commas: Vec<bool>,
    spaced_ranges: Vec<bool>,
    use_void: Vec<bool>,
    truncate_blank_lines: Vec<bool>,
    uppercase_hex: Vec<bool>,
}

/// The single most common vote, or `default` when there is none or the lead
/// is shared.
fn majority<T: PartialEq + Clone>(votes: &[T], default: T) -> T {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for vote in votes {
        match counts.iter_mut().find(|(value, _)| value == vote) {
            Some((_, count)) => *count += 1,
            None => counts.push((vote.clone(), 1)),
        }
    }

    let Some(best) = counts.iter().map(|(_, count)| *count).max() else {
        return default;
    };
    let mut leaders = counts.into_iter().filter(|(_, count)| *count == best);
    match (leaders.next(), leaders.next()) {
        (Some((value, _)), None) => value,
        _ => default,
    }
}

fn is_content(token: &Token) -> bool {
    !token.is_whitespace() && !token.is_comment()
}

impl Votes {
    fn observe(&mut self, tokens: &[Token]) {
        self.observe_lines(tokens);
        let mut inline_semicolon = false;

        for (index, token) in tokens.iter().enumerate() {
            match token {
                Token::Linebreak(text) => self.linebreak.push(match text.as_str() {
                    "\r" => Linebreak::Cr,
                    "\r\n" => Linebreak::CrLf,
                    _ => Linebreak::Lf,
                }),
                Token::Delimiter(';') => {
                    let ends_line = next_non_space(tokens, index)
                        .map_or(true, |next| matches!(tokens[next], Token::Linebreak(_) | Token::LineComment(_)));
                    inline_semicolon |= !ends_line;
                }
                Token::EndOfScope(']') => self.observe_collection_end(tokens, index),
                Token::Operator(op) if op == "..." || op == "..<" => self.observe_range(tokens, index),
                Token::Operator(op) if op == "->" => self.observe_return_type(tokens, index),
                Token::Number(text) => self.observe_number(text),
                _ => {}
            }
        }

        if tokens.iter().any(is_content) {
            self.inline_semicolons.push(inline_semicolon);
        }
    }

    /// Indent unit, brace placement and blank-line whitespace are line
    /// properties.
    fn observe_lines(&mut self, tokens: &[Token]) {
        let lines: Vec<&[Token]> = tokens.split(Token::is_linebreak).collect();
        let terminated = lines.len().saturating_sub(1);
        let mut previous: Option<(&str, bool)> = None;

        for line in &lines[..terminated] {
            let indentation = match line.first() {
                Some(Token::Whitespace(text)) => text.as_str(),
                _ => "",
            };
            let content: Vec<&Token> = line.iter().filter(|token| is_content(token)).collect();

            let Some(last) = content.last() else {
                if line.iter().all(Token::is_whitespace) {
                    self.truncate_blank_lines.push(indentation.is_empty());
                }
                continue;
            };

            if let Some((outer, opened)) = previous {
                if opened && indentation.len() > outer.len() && indentation.starts_with(outer) {
                    let step = &indentation[outer.len()..];
                    if step.contains('\t') {
                        self.indent.push(Indent::Tab);
                    } else if step.len() <= MAX_INDENT_WIDTH {
                        self.indent.push(Indent::Spaces(step.len()));
                    }
                }
            }

            if **last == Token::StartOfScope('{') {
                self.allman_braces.push(content.len() == 1);
            }
            previous = Some((indentation, **last == Token::StartOfScope('{')));
        }
    }

    /// A multi-line collection literal votes on its trailing comma.
    fn observe_collection_end(&mut self, tokens: &[Token], index: usize) {
        let own_line = prev_non_space(tokens, index).is_some_and(|i| tokens[i].is_linebreak());
        if !own_line {
            return;
        }
        match prev_meaningful(tokens, index).map(|i| &tokens[i]) {
            Some(Token::Delimiter(',')) => self.trailing_commas.push(true),
            Some(Token::StartOfScope('[') | Token::Delimiter(':')) | None => {}
            Some(_) => self.trailing_commas.push(false),
        }
    }

    fn observe_range(&mut self, tokens: &[Token], index: usize) {
        let (Some(before), Some(after)) = (index.checked_sub(1).map(|i| &tokens[i]), tokens.get(index + 1))
        else {
            return;
        };
        let operand_before = matches!(before, Token::Identifier(_) | Token::Number(_) | Token::EndOfScope(')'));
        let operand_after = matches!(after, Token::Identifier(_) | Token::Number(_) | Token::StartOfScope('('));

        if before.is_whitespace() && after.is_whitespace() {
            self.spaced_ranges.push(true);
        } else if operand_before && operand_after {
            self.spaced_ranges.push(false);
        }
    }

    fn observe_return_type(&mut self, tokens: &[Token], index: usize) {
        let Some(next) = next_non_space(tokens, index) else {
            return;
        };
        if tokens[next].is_identifier("Void") {
            self.use_void.push(true);
        } else if tokens[next] == Token::StartOfScope('(')
            && tokens.get(next + 1) == Some(&Token::EndOfScope(')'))
        {
            self.use_void.push(false);
        }
    }

    fn observe_number(&mut self, text: &str) {
        let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) else {
            return;
        };
        let letters: Vec<char> = digits.chars().filter(char::is_ascii_alphabetic).collect();
        if letters.is_empty() {
            return;
        }
        if letters.iter().all(char::is_ascii_uppercase) {
            self.uppercase_hex.push(true);
        } else if letters.iter().all(char::is_ascii_lowercase) {
            self.uppercase_hex.push(false);
        }
    }

    fn into_options(self) -> FormatOptions {
        let default = FormatOptions::default();
        FormatOptions {
            indent: majority(&self.indent, default.indent.clone()),
            linebreak: majority(&self.linebreak, default.linebreak),
            allman_braces: majority(&self.allman_braces, default.allman_braces),
            allow_inline_semicolons: majority(&self.inline_semicolons, default.allow_inline_semicolons),
            trailing_commas: majority(&self.trailing_commas, default.trailing_commas),
            space_around_range_operators: majority(
                &self.spaced_ranges,
                default.space_around_range_operators,
            ),
            use_void: majority(&self.use_void, default.use_void),
            truncate_blank_lines: majority(&self.truncate_blank_lines, default.truncate_blank_lines),
            uppercase_hex: majority(&self.uppercase_hex, default.uppercase_hex),
            ..default
        }
    }
}

/// Infers options from the `.swift` files at or under `root`.
///
/// Returns the number of files examined together with the inferred options.
/// Files that cannot be read or tokenized are counted but cast no votes.
///
/// # Errors
///
/// Returns an error if `root` does not exist or cannot be walked.
pub fn infer_options(root: &Path) -> Result<(usize, FormatOptions)> {
    let files = source_files(root)?;
    let mut votes = Votes::default();

    for file in &files {
        let source = match fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                warn!("Skipping unreadable file `{}`: {e}", file.display());
                continue;
            }
        };
        match tokenize(&source) {
            Ok(tokens) => votes.observe(&tokens),
            Err(e) => debug!("Skipping unparsable file `{}`: {e}", file.display()),
        }
    }

    Ok((files.len(), votes.into_options()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::{options_for_arguments, RawArguments};
    use tempfile::TempDir;

    fn infer_source(source: &str) -> FormatOptions {
        let mut votes = Votes::default();
        votes.observe(&tokenize(source).unwrap());
        votes.into_options()
    }

    #[test]
    fn test_majority_ties_keep_default() {
        assert!(majority(&[true, false], true));
        assert!(!majority(&[true, false, false], true));
        assert_eq!(majority::<Linebreak>(&[], Linebreak::Lf), Linebreak::Lf);
    }

    #[test]
    fn test_infers_two_space_indent_and_allman() {
        let options = infer_source("func f()\n{\n  if x\n  {\n    g()\n  }\n}\n");
        assert_eq!(options.indent, Indent::Spaces(2));
        assert!(options.allman_braces);
    }

    #[test]
    fn test_overwide_indent_casts_no_vote() {
        let wide = " ".repeat(MAX_INDENT_WIDTH + 1);
        let options = infer_source(&format!("if a {{\n{wide}b()\n}}\n"));
        assert_eq!(options.indent, FormatOptions::default().indent);
    }

    #[test]
    fn test_infers_tabs_and_crlf() {
        let options = infer_source("if a {\r\n\tb()\r\n}\r\n");
        assert_eq!(options.indent, Indent::Tab);
        assert_eq!(options.linebreak, Linebreak::CrLf);
        assert!(!options.allman_braces);
    }

    #[test]
    fn test_infers_syntax_preferences() {
        let source = "let a = [\n    1,\n    2\n]\nlet r = 0..<n\nfunc f() -> () {}\nlet c = 0xabc\nlet x = 1; let y = 2\n";
        let options = infer_source(source);
        assert!(!options.trailing_commas);
        assert!(!options.space_around_range_operators);
        assert!(!options.use_void);
        assert!(!options.uppercase_hex);
        assert!(options.allow_inline_semicolons);
    }

    #[test]
    fn test_infers_blank_line_whitespace() {
        let options = infer_source("if a {\n    b()\n    \n    c()\n}\n");
        assert!(!options.truncate_blank_lines);
    }

    #[test]
    fn test_infer_options_counts_unparsable_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.swift"), "if a {\n\tb()\n}\n").unwrap();
        fs::write(dir.path().join("broken.swift"), "let s = \"open\n").unwrap();
        fs::write(dir.path().join("readme.md"), "ignored").unwrap();

        let (count, options) = infer_options(dir.path()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(options.indent, Indent::Tab);
    }

    #[test]
    fn test_rendered_arguments_resolve_to_same_options() {
        let options = infer_source("func f()\n{\n\tlet a = [\n\t\t1\n\t]\n}\r\n");
        let rendered = options.to_arguments();
        let args = RawArguments::from_pairs(rendered.iter().map(|(key, value)| (*key, value.as_str())), []);
        assert_eq!(options_for_arguments(&args).unwrap(), options);
    }
}
