use super::{next_non_space, prev_non_space};
use crate::options::FormatOptions;
use crate::tokenizer::Token;

/// Tokens after which a `{` opens a statement or declaration body rather
/// than a closure value.
fn ends_block_header(token: &Token) -> bool {
    match token {
        Token::Identifier(_) | Token::EndOfScope(')' | ']') => true,
        Token::Operator(op) => op != "->" && (op.ends_with('>') || op.ends_with('?') || op.ends_with('!')),
        _ => false,
    }
}

/// Whether the `{` at `index` is the last code on its line.
fn ends_line(tokens: &[Token], index: usize) -> bool {
    match next_non_space(tokens, index) {
        None => true,
        Some(next) => matches!(tokens[next], Token::Linebreak(_) | Token::LineComment(_)),
    }
}

/// Places block-opening braces on their own line (Allman) or at the end of
/// the header line (K&R).
pub(super) fn braces(tokens: &mut Vec<Token>, options: &FormatOptions) {
    let linebreak = options.linebreak.as_str();
    let mut index = 0;
    while index < tokens.len() {
        if tokens[index] != Token::StartOfScope('{') {
            index += 1;
            continue;
        }

        let Some(previous) = prev_non_space(tokens, index) else {
            index += 1;
            continue;
        };

        if options.allman_braces {
            if ends_block_header(&tokens[previous]) && ends_line(tokens, index) {
                tokens.splice(
                    previous + 1..index,
                    [Token::Linebreak(linebreak.to_string())],
                );
                index = previous + 2;
            }
        } else if tokens[previous].is_linebreak() {
            let header = (0..previous)
                .rev()
                .find(|&i| !tokens[i].is_whitespace() && !tokens[i].is_linebreak());
            if let Some(header) = header.filter(|&i| ends_block_header(&tokens[i])) {
                tokens.splice(header + 1..index, [Token::Whitespace(" ".to_string())]);
                index = header + 2;
            }
        }
        index += 1;
    }
}
