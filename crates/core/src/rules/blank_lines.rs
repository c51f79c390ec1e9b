use super::{line_start, next_non_space, prev_non_space};
use crate::options::FormatOptions;
use crate::tokenizer::Token;

const DECLARATION_KEYWORDS: &[&str] = &[
    "func",
    "init",
    "deinit",
    "class",
    "struct",
    "enum",
    "extension",
    "protocol",
    "subscript",
    "actor",
];

/// Removes blank lines directly after an opening brace and directly before
/// a closing brace.
pub(super) fn at_scope_edges(tokens: &mut Vec<Token>, options: &FormatOptions) {
    if !options.remove_blank_lines {
        return;
    }

    let mut index = 0;
    while index < tokens.len() {
        match tokens[index] {
            Token::StartOfScope('{') => {
                if let Some(linebreak) = next_non_space(tokens, index).filter(|&i| tokens[i].is_linebreak()) {
                    while let Some(next) =
                        next_non_space(tokens, linebreak).filter(|&i| tokens[i].is_linebreak())
                    {
                        tokens.drain(linebreak + 1..=next);
                    }
                }
            }
            Token::EndOfScope('}') => {
                if let Some(mut linebreak) =
                    prev_non_space(tokens, index).filter(|&i| tokens[i].is_linebreak())
                {
                    while let Some(previous) =
                        prev_non_space(tokens, linebreak).filter(|&i| tokens[i].is_linebreak())
                    {
                        tokens.drain(previous + 1..=linebreak);
                        index -= linebreak - previous;
                        linebreak = previous;
                    }
                }
            }
            _ => {}
        }
        index += 1;
    }
}

/// Whether the `{` at `index` opens a type or function body. For a brace on
/// its own line the preceding line is the header.
fn opens_declaration(tokens: &[Token], index: usize) -> bool {
    let mut start = line_start(tokens, index);
    if tokens[start..index].iter().all(Token::is_whitespace) && start > 0 {
        start = line_start(tokens, start - 1);
    }
    tokens[start..index].iter().any(|token| {
        DECLARATION_KEYWORDS
            .iter()
            .any(|keyword| token.is_identifier(keyword))
    })
}

/// Inserts a blank line after the closing brace of a declaration when more
/// code follows at the same level.
pub(super) fn between_scopes(tokens: &mut Vec<Token>, options: &FormatOptions) {
    if !options.insert_blank_lines {
        return;
    }

    let linebreak = options.linebreak.as_str();
    let mut declarations: Vec<bool> = Vec::new();
    let mut index = 0;
    while index < tokens.len() {
        match tokens[index] {
            Token::StartOfScope('{') => declarations.push(opens_declaration(tokens, index)),
            Token::EndOfScope('}') => {
                let closes_declaration = declarations.pop().unwrap_or(false);
                let line_end = next_non_space(tokens, index).filter(|&i| tokens[i].is_linebreak());
                if let (true, Some(line_end)) = (closes_declaration, line_end) {
                    let followed_by_code = next_non_space(tokens, line_end)
                        .is_some_and(|i| !matches!(tokens[i], Token::Linebreak(_) | Token::EndOfScope(_)));
                    if followed_by_code {
                        tokens.insert(line_end + 1, Token::Linebreak(linebreak.to_string()));
                    }
                }
            }
            _ => {}
        }
        index += 1;
    }
}

/// Collapses runs of blank lines to a single blank line and drops blank
/// lines at the end of the file.
pub(super) fn consecutive(tokens: &mut Vec<Token>, _options: &FormatOptions) {
    let mut index = 0;
    while index < tokens.len() {
        if tokens[index].is_linebreak() {
            let second = next_non_space(tokens, index).filter(|&i| tokens[i].is_linebreak());
            let third = second
                .and_then(|second| next_non_space(tokens, second))
                .filter(|&i| tokens[i].is_linebreak());
            if let (Some(second), Some(third)) = (second, third) {
                tokens.drain(second + 1..=third);
                continue;
            }
        }
        index += 1;
    }

    while let Some(last) = tokens.iter().rposition(|token| !token.is_whitespace()) {
        let is_blank_tail = tokens[last].is_linebreak()
            && prev_non_space(tokens, last).is_some_and(|i| tokens[i].is_linebreak());
        if !is_blank_tail {
            break;
        }
        tokens.truncate(last);
    }
}
