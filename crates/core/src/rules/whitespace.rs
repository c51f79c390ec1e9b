use crate::options::FormatOptions;
use crate::tokenizer::Token;

fn normalize_linebreaks(text: &str, linebreak: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', linebreak)
}

/// Rewrites every line terminator, including those inside block comments.
pub(super) fn linebreaks(tokens: &mut Vec<Token>, options: &FormatOptions) {
    let linebreak = options.linebreak.as_str();
    for token in tokens.iter_mut() {
        match token {
            Token::Linebreak(text) => *text = linebreak.to_string(),
            Token::BlockComment(text) => *text = normalize_linebreaks(text, linebreak),
            _ => {}
        }
    }
}

/// Strips the comment block at the top of the file. Only comments separated
/// from the first declaration by a blank line count as a header.
pub(super) fn header(tokens: &mut Vec<Token>, options: &FormatOptions) {
    if !options.strip_header {
        return;
    }

    let mut header_end = None;
    let mut previous_was_linebreak = true;
    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Whitespace(_) => {}
            Token::Linebreak(_) => {
                if previous_was_linebreak {
                    header_end = Some(index + 1);
                }
                previous_was_linebreak = true;
            }
            Token::LineComment(_) | Token::BlockComment(_) => previous_was_linebreak = false,
            _ => break,
        }
    }

    let Some(end) = header_end else {
        return;
    };
    if tokens[..end].iter().any(Token::is_comment) {
        tokens.drain(..end);
    }
}

/// Removes whitespace at the end of lines. Whitespace-only lines are left
/// alone when blank lines are not truncated.
pub(super) fn trailing_whitespace(tokens: &mut Vec<Token>, options: &FormatOptions) {
    let mut index = 0;
    while index < tokens.len() {
        if let Token::LineComment(text) = &mut tokens[index] {
            let trimmed_len = text.trim_end().len();
            text.truncate(trimmed_len);
        }

        let at_line_end = tokens
            .get(index + 1)
            .map_or(true, Token::is_linebreak);
        if tokens[index].is_whitespace() && at_line_end {
            let blank_line = index == 0 || tokens[index - 1].is_linebreak();
            let keep = blank_line && !options.truncate_blank_lines && index + 1 < tokens.len();
            if !keep {
                tokens.remove(index);
                continue;
            }
        }
        index += 1;
    }
}
