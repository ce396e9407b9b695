/*
 * lexer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Tokenizer for the inside of `{{ ... }}` code blocks.

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Str(String),
    Number(f64),
    Dot,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Pipe,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Bang,
}

impl TokenKind {
    /// How the token is shown in "unexpected token" messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("`{}`", name),
            TokenKind::Str(s) => format!("string \"{}\"", s),
            TokenKind::Number(n) => format!("number {}", crate::context::format_number(*n)),
            TokenKind::Dot => "`.`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::Pipe => "`|`".to_string(),
            TokenKind::EqEq => "`==`".to_string(),
            TokenKind::NotEq => "`!=`".to_string(),
            TokenKind::Lt => "`<`".to_string(),
            TokenKind::LtEq => "`<=`".to_string(),
            TokenKind::Gt => "`>`".to_string(),
            TokenKind::GtEq => "`>=`".to_string(),
            TokenKind::AndAnd => "`&&`".to_string(),
            TokenKind::OrOr => "`||`".to_string(),
            TokenKind::Bang => "`!`".to_string(),
        }
    }

    pub(crate) fn is_ident(&self, word: &str) -> bool {
        matches!(self, TokenKind::Ident(name) if name == word)
    }
}

/// A token with absolute byte offsets into the template source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LexError {
    pub message: String,
    pub start: usize,
    pub end: usize,
}

/// Tokenize `source[start..end]`.
pub(crate) fn tokenize(source: &str, start: usize, end: usize) -> Result<Vec<Token>, LexError> {
    let code = &source[start..end];
    let mut tokens = Vec::new();
    let mut chars = code.char_indices().peekable();

    while let Some((rel, ch)) = chars.next() {
        let pos = start + rel;
        let single = |kind: TokenKind| Token {
            kind,
            start: pos,
            end: pos + ch.len_utf8(),
        };

        match ch {
            c if c.is_whitespace() => {}
            '.' => tokens.push(single(TokenKind::Dot)),
            '[' => tokens.push(single(TokenKind::LBracket)),
            ']' => tokens.push(single(TokenKind::RBracket)),
            '(' => tokens.push(single(TokenKind::LParen)),
            ')' => tokens.push(single(TokenKind::RParen)),
            '|' | '&' | '=' | '!' | '<' | '>' => {
                let next = chars.peek().map(|(_, c)| *c);
                let (kind, width) = match (ch, next) {
                    ('|', Some('|')) => (TokenKind::OrOr, 2),
                    ('|', _) => (TokenKind::Pipe, 1),
                    ('&', Some('&')) => (TokenKind::AndAnd, 2),
                    ('=', Some('=')) => (TokenKind::EqEq, 2),
                    ('!', Some('=')) => (TokenKind::NotEq, 2),
                    ('!', _) => (TokenKind::Bang, 1),
                    ('<', Some('=')) => (TokenKind::LtEq, 2),
                    ('<', _) => (TokenKind::Lt, 1),
                    ('>', Some('=')) => (TokenKind::GtEq, 2),
                    ('>', _) => (TokenKind::Gt, 1),
                    ('&', _) => {
                        return Err(LexError {
                            message: "unexpected `&`; use `&&` or `and`".to_string(),
                            start: pos,
                            end: pos + 1,
                        });
                    }
                    _ => {
                        return Err(LexError {
                            message: "unexpected `=`; use `==` to compare values".to_string(),
                            start: pos,
                            end: pos + 1,
                        });
                    }
                };
                if width == 2 {
                    chars.next();
                }
                tokens.push(Token {
                    kind,
                    start: pos,
                    end: pos + width,
                });
            }
            '"' | '\'' => {
                let quote = ch;
                let mut value = String::new();
                let mut closed_at = None;
                while let Some((rel_inner, c)) = chars.next() {
                    if c == quote {
                        closed_at = Some(start + rel_inner + 1);
                        break;
                    }
                    if c == '\\' {
                        match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, other)) => value.push(other),
                            None => break,
                        }
                    } else {
                        value.push(c);
                    }
                }
                let Some(string_end) = closed_at else {
                    return Err(LexError {
                        message: "unterminated string literal".to_string(),
                        start: pos,
                        end,
                    });
                };
                tokens.push(Token {
                    kind: TokenKind::Str(value),
                    start: pos,
                    end: string_end,
                });
            }
            c if c.is_ascii_digit() || (c == '-' && next_is_digit(&mut chars)) => {
                let mut text = String::from(c);
                let mut token_end = pos + 1;
                let mut seen_dot = false;
                while let Some(&(rel_inner, next)) = chars.peek() {
                    let dot_followed_by_digit = next == '.'
                        && !seen_dot
                        && code[rel_inner + 1..]
                            .chars()
                            .next()
                            .is_some_and(|d| d.is_ascii_digit());
                    if next.is_ascii_digit() || dot_followed_by_digit {
                        seen_dot |= next == '.';
                        text.push(next);
                        token_end = start + rel_inner + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = text.parse::<f64>().map_err(|_| LexError {
                    message: format!("invalid number `{}`", text),
                    start: pos,
                    end: token_end,
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    start: pos,
                    end: token_end,
                });
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::from(c);
                let mut token_end = pos + c.len_utf8();
                while let Some(&(rel_inner, next)) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' {
                        name.push(next);
                        token_end = start + rel_inner + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(name),
                    start: pos,
                    end: token_end,
                });
            }
            other => {
                return Err(LexError {
                    message: format!("unexpected character `{}`", other),
                    start: pos,
                    end: pos + other.len_utf8(),
                });
            }
        }
    }

    Ok(tokens)
}

fn next_is_digit(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> bool {
    chars.peek().is_some_and(|(_, c)| c.is_ascii_digit())
}
