//! Tokenizer for the invariant expression language
//!
//! The alphabet is small: identifiers, integer and string literals, the
//! keywords `true`/`false`/`null`, comparison and logical operators,
//! parentheses, commas, and dots. String literals accept single or double
//! quotes and carry no escape sequences. A leading `-` followed by a digit
//! lexes as a negative integer literal; the language has no arithmetic.

use crate::error::LexError;
use crate::token::{Token, TokenKind};

/// Tokenize source text
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::new(TokenKind::LParen, pos));
            }
            ')' => {
                chars.next();
                tokens.push(Token::new(TokenKind::RParen, pos));
            }
            ',' => {
                chars.next();
                tokens.push(Token::new(TokenKind::Comma, pos));
            }
            '.' => {
                chars.next();
                tokens.push(Token::new(TokenKind::Dot, pos));
            }
            '!' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(Token::new(TokenKind::NotEq, pos));
                } else {
                    tokens.push(Token::new(TokenKind::Bang, pos));
                }
            }
            '=' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(Token::new(TokenKind::EqEq, pos));
                } else {
                    return Err(LexError::UnexpectedChar { ch: '=', pos });
                }
            }
            '<' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(Token::new(TokenKind::Le, pos));
                } else {
                    tokens.push(Token::new(TokenKind::Lt, pos));
                }
            }
            '>' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(Token::new(TokenKind::Ge, pos));
                } else {
                    tokens.push(Token::new(TokenKind::Gt, pos));
                }
            }
            '&' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '&'))) {
                    chars.next();
                    tokens.push(Token::new(TokenKind::AndAnd, pos));
                } else {
                    return Err(LexError::UnexpectedChar { ch: '&', pos });
                }
            }
            '|' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '|'))) {
                    chars.next();
                    tokens.push(Token::new(TokenKind::OrOr, pos));
                } else {
                    return Err(LexError::UnexpectedChar { ch: '|', pos });
                }
            }
            '\'' | '"' => {
                tokens.push(lex_string(&mut chars, pos, ch)?);
            }
            '-' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, d)) if d.is_ascii_digit() => {
                        tokens.push(lex_int(&mut chars, pos, true)?);
                    }
                    _ => return Err(LexError::UnexpectedChar { ch: '-', pos }),
                }
            }
            c if c.is_ascii_digit() => {
                tokens.push(lex_int(&mut chars, pos, false)?);
            }
            c if c.is_alphabetic() || c == '_' => {
                tokens.push(lex_ident(&mut chars, pos));
            }
            other => return Err(LexError::UnexpectedChar { ch: other, pos }),
        }
    }

    Ok(tokens)
}

fn lex_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    pos: usize,
    quote: char,
) -> Result<Token, LexError> {
    chars.next(); // opening quote
    let mut text = String::new();
    loop {
        match chars.next() {
            Some((_, c)) if c == quote => return Ok(Token::new(TokenKind::Str(text), pos)),
            Some((_, c)) => text.push(c),
            None => return Err(LexError::UnterminatedString { pos }),
        }
    }
}

fn lex_int(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    pos: usize,
    negative: bool,
) -> Result<Token, LexError> {
    let mut text = String::new();
    if negative {
        text.push('-');
    }
    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_digit() {
            text.push(c);
            chars.next();
        } else {
            break;
        }
    }
    match text.parse::<i64>() {
        Ok(value) => Ok(Token::new(TokenKind::Int(value), pos)),
        Err(_) => Err(LexError::InvalidInteger { text, pos }),
    }
}

fn lex_ident(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, pos: usize) -> Token {
    let mut text = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_alphanumeric() || c == '_' {
            text.push(c);
            chars.next();
        } else {
            break;
        }
    }
    let kind = match text.as_str() {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        _ => TokenKind::Ident(text),
    };
    Token::new(kind, pos)
}
