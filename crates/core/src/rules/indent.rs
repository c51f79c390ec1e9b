use super::next_non_space;
use crate::options::{FormatOptions, IfdefIndent};
use crate::tokenizer::Token;

#[derive(Debug, Clone, Copy)]
struct Scope {
    line: usize,
    switch: bool,
    conditional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    If,
    Else,
    EndIf,
}

fn directive(token: &Token) -> Option<Directive> {
    let Token::Identifier(name) = token else {
        return None;
    };
    match name.as_str() {
        "#if" => Some(Directive::If),
        "#else" | "#elseif" => Some(Directive::Else),
        "#endif" => Some(Directive::EndIf),
        _ => None,
    }
}

/// Indent levels contributed by `scopes`. Scopes opened on the same line
/// count once.
fn depth(scopes: &[Scope]) -> usize {
    scopes
        .iter()
        .enumerate()
        .filter(|&(i, scope)| i == 0 || scopes[i - 1].line != scope.line)
        .count()
}

fn leading_closers(tokens: &[Token], first: usize) -> usize {
    tokens[first..]
        .iter()
        .filter(|token| !token.is_whitespace())
        .take_while(|token| matches!(token, Token::EndOfScope(_)))
        .count()
}

fn starts_case(tokens: &[Token], first: usize) -> bool {
    tokens[first].is_identifier("case")
        || (tokens[first].is_identifier("default")
            && next_non_space(tokens, first).is_some_and(|i| tokens[i] == Token::Delimiter(':')))
}

/// Replaces the leading whitespace of the line at `start`. Returns the index
/// of the first token after the indentation.
fn set_indentation(tokens: &mut Vec<Token>, start: usize, indentation: &str) -> usize {
    match (tokens[start].is_whitespace(), indentation.is_empty()) {
        (true, true) => {
            tokens.remove(start);
            start
        }
        (true, false) => {
            tokens[start] = Token::Whitespace(indentation.to_string());
            start + 1
        }
        (false, true) => start,
        (false, false) => {
            tokens.insert(start, Token::Whitespace(indentation.to_string()));
            start + 1
        }
    }
}

/// Aligns the `*`-prefixed continuation lines of a block comment one column
/// inside `indentation`.
fn reindent_comment(text: &str, indentation: &str) -> String {
    let mut lines = text.split('\n');
    let mut result = lines.next().unwrap_or_default().to_string();
    for line in lines {
        result.push('\n');
        let trimmed = line.trim_start_matches([' ', '\t']);
        if trimmed.starts_with('*') {
            result.push_str(indentation);
            result.push(' ');
            result.push_str(trimmed);
        } else {
            result.push_str(line);
        }
    }
    result
}

pub(super) fn indent(tokens: &mut Vec<Token>, options: &FormatOptions) {
    let unit = options.indent.unit();
    let mut scopes: Vec<Scope> = Vec::new();
    let mut pending_switch = false;
    let mut line = 0;
    let mut start = 0;

    while start < tokens.len() {
        let first = if tokens[start].is_whitespace() {
            start + 1
        } else {
            start
        };
        let first_token = tokens.get(first);
        let blank = first_token.map_or(true, Token::is_linebreak);
        let directive = first_token.and_then(directive);
        let keep_comment =
            first_token.is_some_and(Token::is_comment) && !options.indent_comments;

        let level = match (directive, options.ifdef_indent) {
            (Some(_), IfdefIndent::Outdent) => 0,
            (Some(Directive::Else | Directive::EndIf), IfdefIndent::Indent) => {
                let open = scopes
                    .iter()
                    .rposition(|scope| scope.conditional)
                    .unwrap_or(scopes.len());
                depth(&scopes[..open])
            }
            _ => {
                let closers = if blank { 0 } else { leading_closers(tokens, first) };
                let open = scopes.len().saturating_sub(closers);
                let level = depth(&scopes[..open]);
                if !blank && open > 0 && scopes[open - 1].switch && starts_case(tokens, first) {
                    level.saturating_sub(1)
                } else {
                    level
                }
            }
        };

        if options.ifdef_indent == IfdefIndent::Indent {
            match directive {
                Some(Directive::If) => scopes.push(Scope {
                    line,
                    switch: false,
                    conditional: true,
                }),
                Some(Directive::EndIf) => {
                    if let Some(pos) = scopes.iter().rposition(|scope| scope.conditional) {
                        scopes.truncate(pos);
                    }
                }
                _ => {}
            }
        }

        let indentation = unit.repeat(level);
        let mut index = if keep_comment {
            first
        } else if blank && options.truncate_blank_lines {
            set_indentation(tokens, start, "")
        } else {
            set_indentation(tokens, start, &indentation)
        };

        while index < tokens.len() {
            match &mut tokens[index] {
                Token::Linebreak(_) => break,
                Token::StartOfScope(c) => {
                    let switch = *c == '{' && pending_switch;
                    if *c == '{' {
                        pending_switch = false;
                    }
                    scopes.push(Scope {
                        line,
                        switch,
                        conditional: false,
                    });
                }
                Token::EndOfScope(_) => {
                    if let Some(pos) = scopes.iter().rposition(|scope| !scope.conditional) {
                        scopes.remove(pos);
                    }
                }
                Token::Identifier(name) if name.as_str() == "switch" => pending_switch = true,
                Token::BlockComment(text) if options.indent_comments => {
                    *text = reindent_comment(text, &indentation);
                }
                _ => {}
            }
            index += 1;
        }
        line += 1;
        start = index + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Indent;
    use crate::tokenizer::{render, tokenize};

    fn apply(source: &str, options: &FormatOptions) -> String {
        let mut tokens = tokenize(source).unwrap();
        indent(&mut tokens, options);
        render(&tokens)
    }

    fn ifdef(mode: IfdefIndent) -> FormatOptions {
        FormatOptions {
            ifdef_indent: mode,
            ..FormatOptions::default()
        }
    }

    #[test]
    fn test_nested_scopes_indented() {
        assert_eq!(
            apply(
                "func f() {\nlet x = 1\n  if x {\ny()\n}\n}\n",
                &FormatOptions::default()
            ),
            "func f() {\n    let x = 1\n    if x {\n        y()\n    }\n}\n"
        );
    }

    #[test]
    fn test_scopes_opened_on_one_line_indent_once() {
        assert_eq!(
            apply("foo(bar {\nx\n})\n", &FormatOptions::default()),
            "foo(bar {\n    x\n})\n"
        );
    }

    #[test]
    fn test_switch_cases_align_with_switch() {
        assert_eq!(
            apply(
                "switch x {\n  case 1:\nfoo()\n    default:\nbar()\n}\n",
                &FormatOptions::default()
            ),
            "switch x {\ncase 1:\n    foo()\ndefault:\n    bar()\n}\n"
        );
    }

    #[test]
    fn test_enum_cases_are_not_outdented() {
        assert_eq!(
            apply("enum E {\ncase a\n}\n", &FormatOptions::default()),
            "enum E {\n    case a\n}\n"
        );
    }

    #[test]
    fn test_tab_indent() {
        let options = FormatOptions {
            indent: Indent::Tab,
            ..FormatOptions::default()
        };
        assert_eq!(apply("if a {\nb()\n}\n", &options), "if a {\n\tb()\n}\n");
    }

    #[test]
    fn test_ifdef_modes() {
        let source = "struct S {\n#if DEBUG\nlet a = 1\n#else\nlet a = 2\n#endif\n}\n";
        assert_eq!(
            apply(source, &ifdef(IfdefIndent::Indent)),
            "struct S {\n    #if DEBUG\n        let a = 1\n    #else\n        let a = 2\n    #endif\n}\n"
        );
        assert_eq!(
            apply(source, &ifdef(IfdefIndent::NoIndent)),
            "struct S {\n    #if DEBUG\n    let a = 1\n    #else\n    let a = 2\n    #endif\n}\n"
        );
        assert_eq!(
            apply(source, &ifdef(IfdefIndent::Outdent)),
            "struct S {\n#if DEBUG\n    let a = 1\n#else\n    let a = 2\n#endif\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_follow_whitespace_policy() {
        let source = "if a {\n\n  b()\n}\n";
        assert_eq!(
            apply(source, &FormatOptions::default()),
            "if a {\n\n    b()\n}\n"
        );
        let options = FormatOptions {
            truncate_blank_lines: false,
            ..FormatOptions::default()
        };
        assert_eq!(apply(source, &options), "if a {\n    \n    b()\n}\n");
    }

    #[test]
    fn test_block_comment_body_indented() {
        assert_eq!(
            apply(
                "struct S {\n/**\n   * Doc\n   */\nvar a = 1\n}\n",
                &FormatOptions::default()
            ),
            "struct S {\n    /**\n     * Doc\n     */\n    var a = 1\n}\n"
        );
    }

    #[test]
    fn test_comments_left_alone_when_ignored() {
        let options = FormatOptions {
            indent_comments: false,
            ..FormatOptions::default()
        };
        assert_eq!(
            apply("struct S {\n// note\nvar a = 1\n}\n", &options),
            "struct S {\n// note\n    var a = 1\n}\n"
        );
    }
}
