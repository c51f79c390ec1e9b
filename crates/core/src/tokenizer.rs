//! Lossless tokenizer for Swift-like source.
//!
//! Rendering the tokens produced by [`tokenize`] with [`render`] reproduces
//! the input exactly; formatting rules work by editing the token list.

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Whitespace(String),
    Linebreak(String),
    /// Identifiers and keywords, including `#directives`, `@attributes`
    /// and backtick-escaped names.
    Identifier(String),
    Number(String),
    StringLiteral(String),
    Operator(String),
    StartOfScope(char),
    EndOfScope(char),
    /// `,` `;` or `:`
    Delimiter(char),
    LineComment(String),
    BlockComment(String),
}

impl Token {
    pub fn text(&self) -> String {
        match self {
            Token::Whitespace(s)
            | Token::Linebreak(s)
            | Token::Identifier(s)
            | Token::Number(s)
            | Token::StringLiteral(s)
            | Token::Operator(s)
            | Token::LineComment(s)
            | Token::BlockComment(s) => s.clone(),
            Token::StartOfScope(c) | Token::EndOfScope(c) | Token::Delimiter(c) => c.to_string(),
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace(_))
    }

    pub fn is_linebreak(&self) -> bool {
        matches!(self, Token::Linebreak(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment(_) | Token::BlockComment(_))
    }

    pub fn is_identifier(&self, name: &str) -> bool {
        matches!(self, Token::Identifier(s) if s == name)
    }

    pub fn is_operator(&self, op: &str) -> bool {
        matches!(self, Token::Operator(s) if s == op)
    }
}

/// Counts line terminators (`\n`, `\r\n` or a lone `\r`) in `text`.
pub fn count_linebreaks(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => count += 1,
            '\r' => {
                count += 1;
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            _ => {}
        }
    }
    count
}

pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect()
}

const OPERATOR_CHARS: &str = "/=-+!*%<>&|^~?.";

fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(c)
}

fn is_identifier_head(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_tail(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

struct Scanner {
    chars: Vec<char>,
    position: usize,
    line: usize,
}

impl Scanner {
    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn slice(&self, start: usize) -> String {
        self.chars[start..self.position].iter().collect()
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek(0).is_some_and(&predicate) {
            self.position += 1;
        }
    }

    fn error(&self, line: usize, message: &str) -> ParseError {
        ParseError::new(line, message)
    }

    fn scan_block_comment(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        let start_line = self.line;
        let mut depth = 0;
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some('/'), Some('*')) => {
                    depth += 1;
                    self.position += 2;
                }
                (Some('*'), Some('/')) => {
                    depth -= 1;
                    self.position += 2;
                    if depth == 0 {
                        break;
                    }
                }
                (Some(c), next) => {
                    if c == '\n' || (c == '\r' && next != Some('\n')) {
                        self.line += 1;
                    }
                    self.position += 1;
                }
                (None, _) => {
                    return Err(self.error(start_line, "unterminated block comment"));
                }
            }
        }
        Ok(Token::BlockComment(self.slice(start)))
    }

    fn scan_multiline_string(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        let start_line = self.line;
        self.position += 3;
        loop {
            match self.peek(0) {
                Some('"') if self.peek(1) == Some('"') && self.peek(2) == Some('"') => {
                    self.position += 3;
                    return Ok(Token::StringLiteral(self.slice(start)));
                }
                Some('\\') => self.position += 2,
                Some(c) => {
                    if c == '\n' || (c == '\r' && self.peek(1) != Some('\n')) {
                        self.line += 1;
                    }
                    self.position += 1;
                }
                None => return Err(self.error(start_line, "unterminated string literal")),
            }
        }
    }

    /// Scans a single-line string body up to and including the closing quote.
    fn scan_quoted(&mut self) -> Result<(), ParseError> {
        self.position += 1;
        loop {
            match self.peek(0) {
                Some('"') => {
                    self.position += 1;
                    return Ok(());
                }
                Some('\\') if self.peek(1) == Some('(') => {
                    self.position += 2;
                    self.scan_interpolation()?;
                }
                Some('\\') => self.position += 2,
                Some('\n' | '\r') | None => {
                    return Err(self.error(self.line, "unterminated string literal"));
                }
                Some(_) => self.position += 1,
            }
        }
    }

    fn scan_interpolation(&mut self) -> Result<(), ParseError> {
        let mut depth = 1;
        while depth > 0 {
            match self.peek(0) {
                Some('(') => {
                    depth += 1;
                    self.position += 1;
                }
                Some(')') => {
                    depth -= 1;
                    self.position += 1;
                }
                Some('"') => self.scan_quoted()?,
                Some('\n' | '\r') | None => {
                    return Err(self.error(self.line, "unterminated string interpolation"));
                }
                Some(_) => self.position += 1,
            }
        }
        Ok(())
    }

    fn scan_number(&mut self) -> Token {
        let start = self.position;
        while let Some(c) = self.peek(0) {
            let continues = is_identifier_tail(c)
                || (c == '.' && self.peek(1).is_some_and(|next| next.is_ascii_digit()));
            if !continues {
                break;
            }
            self.position += 1;
        }
        Token::Number(self.slice(start))
    }

    fn scan_operator(&mut self) -> Token {
        let start = self.position;
        while let Some(c) = self.peek(0) {
            let comment_start =
                c == '/' && matches!(self.peek(1), Some('/' | '*')) && self.position > start;
            if !is_operator_char(c) || comment_start {
                break;
            }
            self.position += 1;
        }
        Token::Operator(self.slice(start))
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        let c = self.chars[start];
        let token = match c {
            ' ' | '\t' => {
                self.advance_while(|c| c == ' ' || c == '\t');
                Token::Whitespace(self.slice(start))
            }
            '\n' => {
                self.position += 1;
                self.line += 1;
                Token::Linebreak("\n".to_string())
            }
            '\r' => {
                self.position += 1;
                if self.peek(0) == Some('\n') {
                    self.position += 1;
                }
                self.line += 1;
                Token::Linebreak(self.slice(start))
            }
            '/' if self.peek(1) == Some('/') => {
                self.advance_while(|c| c != '\n' && c != '\r');
                Token::LineComment(self.slice(start))
            }
            '/' if self.peek(1) == Some('*') => self.scan_block_comment()?,
            '"' if self.peek(1) == Some('"') && self.peek(2) == Some('"') => {
                self.scan_multiline_string()?
            }
            '"' => {
                self.scan_quoted()?;
                Token::StringLiteral(self.slice(start))
            }
            '(' | '[' | '{' => {
                self.position += 1;
                Token::StartOfScope(c)
            }
            ')' | ']' | '}' => {
                self.position += 1;
                Token::EndOfScope(c)
            }
            ',' | ';' | ':' => {
                self.position += 1;
                Token::Delimiter(c)
            }
            '`' => {
                self.position += 1;
                self.advance_while(|c| c != '`' && c != '\n' && c != '\r');
                if self.peek(0) != Some('`') {
                    return Err(self.error(self.line, "unterminated escaped identifier"));
                }
                self.position += 1;
                Token::Identifier(self.slice(start))
            }
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_head(c) || c == '#' || c == '@' || c == '$' => {
                self.position += 1;
                self.advance_while(is_identifier_tail);
                Token::Identifier(self.slice(start))
            }
            c if is_operator_char(c) => self.scan_operator(),
            _ => {
                self.position += 1;
                Token::Operator(self.slice(start))
            }
        };
        Ok(token)
    }
}

/// Splits `source` into tokens.
///
/// # Errors
///
/// Returns a [`ParseError`] for an unterminated string literal, escaped
/// identifier or block comment.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut scanner = Scanner {
        chars: source.chars().collect(),
        position: 0,
        line: 1,
    };
    let mut tokens = Vec::new();
    while scanner.position < scanner.chars.len() {
        tokens.push(scanner.next_token()?);
    }
    Ok(tokens)
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Verifies that scopes are balanced. Fragments may leave scopes unclosed or
/// close scopes they never opened.
///
/// # Errors
///
/// Returns a [`ParseError`] naming the first mismatched or unclosed scope.
pub fn check_scopes(tokens: &[Token], fragment: bool) -> Result<(), ParseError> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut line = 1;

    for token in tokens {
        match token {
            Token::Linebreak(_) => line += 1,
            Token::BlockComment(text) | Token::StringLiteral(text) => {
                line += count_linebreaks(text);
            }
            Token::StartOfScope(open) => stack.push((*open, line)),
            Token::EndOfScope(close) => match stack.pop() {
                Some((open, _)) if closing_for(open) == *close => {}
                _ if fragment => {}
                _ => return Err(ParseError::new(line, format!("unexpected '{close}'"))),
            },
            _ => {}
        }
    }

    match stack.last() {
        Some((open, opened_on)) if !fragment => Err(ParseError::new(
            *opened_on,
            format!("unclosed '{open}'"),
        )),
        _ => Ok(()),
    }
}
