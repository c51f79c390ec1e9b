use super::{matching_close, next_non_space, prev_meaningful, prev_non_space};
use crate::options::FormatOptions;
use crate::tokenizer::Token;

/// Drops semicolons that end a line or precede a closing brace. With inline
/// semicolons disallowed, statements joined by `;` are split onto separate
/// lines. Semicolons inside parentheses or brackets are never touched.
pub(super) fn semicolons(tokens: &mut Vec<Token>, options: &FormatOptions) {
    let mut nesting = 0usize;
    let mut index = 0;
    while index < tokens.len() {
        match tokens[index] {
            Token::StartOfScope('(' | '[') => nesting += 1,
            Token::EndOfScope(')' | ']') => nesting = nesting.saturating_sub(1),
            Token::Delimiter(';') if nesting == 0 => {
                let next = next_non_space(tokens, index);
                let terminal = match next {
                    None => true,
                    Some(next) => matches!(
                        tokens[next],
                        Token::Linebreak(_)
                            | Token::LineComment(_)
                            | Token::EndOfScope('}')
                    ),
                };

                if terminal {
                    tokens.remove(index);
                    continue;
                }

                if !options.allow_inline_semicolons {
                    let next = next.unwrap_or(index + 1);
                    tokens.splice(
                        index..next,
                        [Token::Linebreak(options.linebreak.as_str().to_string())],
                    );
                    if index > 0 && tokens[index - 1].is_whitespace() {
                        tokens.remove(index - 1);
                        continue;
                    }
                }
            }
            _ => {}
        }
        index += 1;
    }
}

fn is_range_operator(token: &Token) -> bool {
    token.is_operator("...") || token.is_operator("..<")
}

fn is_operand_end(token: &Token) -> bool {
    matches!(
        token,
        Token::Identifier(_) | Token::Number(_) | Token::StringLiteral(_) | Token::EndOfScope(')' | ']')
    )
}

fn is_operand_start(token: &Token) -> bool {
    matches!(
        token,
        Token::Identifier(_) | Token::Number(_) | Token::StringLiteral(_) | Token::StartOfScope('(' | '[')
    )
}

/// Spaces or unspaces `...` and `..<` between two operands. One-sided and
/// variadic uses are left alone.
pub(super) fn ranges(tokens: &mut Vec<Token>, options: &FormatOptions) {
    let spaced = options.space_around_range_operators;
    let mut index = 0;
    while index < tokens.len() {
        if !is_range_operator(&tokens[index]) {
            index += 1;
            continue;
        }

        let before = prev_non_space(tokens, index).filter(|&i| is_operand_end(&tokens[i]));
        let after = next_non_space(tokens, index).filter(|&i| is_operand_start(&tokens[i]));
        let (Some(before), Some(after)) = (before, after) else {
            index += 1;
            continue;
        };

        let space = || Token::Whitespace(" ".to_string());
        let operator = tokens[index].clone();
        let mut replacement = Vec::new();
        if spaced {
            replacement.extend([space(), operator, space()]);
        } else {
            replacement.push(operator);
        }
        let inserted = replacement.len();
        tokens.splice(before + 1..after, replacement);
        index = before + 1 + inserted;
    }
}

/// Converts between `-> ()` and `-> Void` in return positions.
pub(super) fn void(tokens: &mut Vec<Token>, options: &FormatOptions) {
    let mut index = 0;
    while index < tokens.len() {
        if tokens[index].is_operator("->") {
            if let Some(next) = next_non_space(tokens, index) {
                if options.use_void {
                    let close = next_non_space(tokens, next)
                        .filter(|&close| tokens[close] == Token::EndOfScope(')'));
                    if let Some(close) = close.filter(|_| tokens[next] == Token::StartOfScope('(')) {
                        tokens.splice(next..=close, [Token::Identifier("Void".to_string())]);
                    }
                } else if tokens[next].is_identifier("Void") {
                    tokens.splice(
                        next..=next,
                        [Token::StartOfScope('('), Token::EndOfScope(')')],
                    );
                }
            }
        }
        index += 1;
    }
}

pub(super) fn hex_literals(tokens: &mut Vec<Token>, options: &FormatOptions) {
    for token in tokens.iter_mut() {
        let Token::Number(text) = token else {
            continue;
        };
        let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) else {
            continue;
        };
        let digits = if options.uppercase_hex {
            digits.to_uppercase()
        } else {
            digits.to_lowercase()
        };
        *text = format!("0x{digits}");
    }
}

/// Adds or removes the comma after the last element of collection literals
/// whose closing bracket sits on its own line.
pub(super) fn trailing_commas(tokens: &mut Vec<Token>, options: &FormatOptions) {
    let mut index = 0;
    while index < tokens.len() {
        if tokens[index] != Token::StartOfScope('[') {
            index += 1;
            continue;
        }

        let Some(close) = matching_close(tokens, index) else {
            index += 1;
            continue;
        };
        let closes_own_line = prev_non_space(tokens, close).is_some_and(|i| tokens[i].is_linebreak());
        let last = prev_meaningful(tokens, close).filter(|&i| i > index);

        if let (true, Some(last)) = (closes_own_line, last) {
            match tokens[last] {
                Token::Delimiter(',') if !options.trailing_commas => {
                    tokens.remove(last);
                }
                Token::Delimiter(_) => {}
                _ if options.trailing_commas => tokens.insert(last + 1, Token::Delimiter(',')),
                _ => {}
            }
        }
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{render, tokenize};

    fn apply(
        rule: fn(&mut Vec<Token>, &FormatOptions),
        source: &str,
        options: &FormatOptions,
    ) -> String {
        let mut tokens = tokenize(source).unwrap();
        rule(&mut tokens, options);
        render(&tokens)
    }

    #[test]
    fn test_terminal_semicolons_removed() {
        assert_eq!(
            apply(semicolons, "let a = 1;\nf(); // call\n{ g(); }", &FormatOptions::default()),
            "let a = 1\nf() // call\n{ g() }"
        );
    }

    #[test]
    fn test_inline_semicolons_kept_when_allowed() {
        let source = "let a = 1; let b = 2\n";
        assert_eq!(apply(semicolons, source, &FormatOptions::default()), source);
    }

    #[test]
    fn test_inline_semicolons_split_when_never() {
        let options = FormatOptions {
            allow_inline_semicolons: false,
            ..FormatOptions::default()
        };
        assert_eq!(
            apply(semicolons, "let a = 1 ; let b = 2\n", &options),
            "let a = 1\nlet b = 2\n"
        );
    }

    #[test]
    fn test_semicolons_in_parentheses_untouched() {
        let source = "for (i = 0; i < n; i++) {}\n";
        let options = FormatOptions {
            allow_inline_semicolons: false,
            ..FormatOptions::default()
        };
        assert_eq!(apply(semicolons, source, &options), source);
    }

    #[test]
    fn test_ranges_spaced_and_unspaced() {
        assert_eq!(
            apply(ranges, "for i in 0..<n {}\nlet r = a  ...b", &FormatOptions::default()),
            "for i in 0 ..< n {}\nlet r = a ... b"
        );
        let options = FormatOptions {
            space_around_range_operators: false,
            ..FormatOptions::default()
        };
        assert_eq!(apply(ranges, "0 ..< n", &options), "0..<n");
    }

    #[test]
    fn test_variadic_and_one_sided_ranges_untouched() {
        let source = "func f(x: Int...) {}\nlet s = a[1...]";
        assert_eq!(apply(ranges, source, &FormatOptions::default()), source);
    }

    #[test]
    fn test_void_conversion() {
        assert_eq!(
            apply(void, "let f: () -> () = {}", &FormatOptions::default()),
            "let f: () -> Void = {}"
        );
        let options = FormatOptions {
            use_void: false,
            ..FormatOptions::default()
        };
        assert_eq!(
            apply(void, "func f() -> Void {}", &options),
            "func f() -> () {}"
        );
    }

    #[test]
    fn test_hex_literal_casing() {
        assert_eq!(
            apply(hex_literals, "let c = 0xff_aa + 12", &FormatOptions::default()),
            "let c = 0xFF_AA + 12"
        );
        let options = FormatOptions {
            uppercase_hex: false,
            ..FormatOptions::default()
        };
        assert_eq!(apply(hex_literals, "0XABC", &options), "0xabc");
    }

    #[test]
    fn test_trailing_comma_added_to_multiline_literal() {
        assert_eq!(
            apply(trailing_commas, "let a = [\n    1,\n    2\n]\nlet b = [1, 2]", &FormatOptions::default()),
            "let a = [\n    1,\n    2,\n]\nlet b = [1, 2]"
        );
    }

    #[test]
    fn test_trailing_comma_removed_for_inline_policy() {
        let options = FormatOptions {
            trailing_commas: false,
            ..FormatOptions::default()
        };
        assert_eq!(
            apply(trailing_commas, "let a = [\n    1,\n    2, // two\n]", &options),
            "let a = [\n    1,\n    2 // two\n]"
        );
    }

    #[test]
    fn test_empty_multiline_collections_untouched() {
        let source = "let a = [\n]\nlet d = [\n    :\n]";
        assert_eq!(
            apply(trailing_commas, source, &FormatOptions::default()),
            source
        );
    }
}
