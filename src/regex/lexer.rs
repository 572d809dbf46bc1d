use std::fmt;

use log::trace;

use crate::regex::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    String,   // abcdef\[
    Dot,      // .
    Question, // ?
    Asterisk, // *
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]
    LParen,   // (
    RParen,   // )
    Comma,    // ,
    Pipe,     // |
    End,      // appended once, marks end of input
}

impl TokenKind {
    /// Maps a metacharacter to its token kind.
    pub fn from_meta(c: char) -> Option<TokenKind> {
        let kind = match c {
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            '*' => TokenKind::Asterisk,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '|' => TokenKind::Pipe,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::String => "STRING",
            TokenKind::Dot => "DOT",
            TokenKind::Question => "QUESTION",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::Pipe => "PIPE",
            TokenKind::End => "END",
        };
        f.write_str(name)
    }
}

pub fn is_meta(c: char) -> bool {
    TokenKind::from_meta(c).is_some()
}

/// A lexed piece of pattern source. `position` is the byte offset where the
/// token starts; for a literal run that is the first character of the run
/// (or its backslash, if the run starts with an escape).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut literal_start = 0;
    let mut chars = source.char_indices();

    while let Some((i, c)) = chars.next() {
        if let Some(kind) = TokenKind::from_meta(c) {
            flush_literal(&mut tokens, &mut literal, literal_start);
            tokens.push(Token::new(kind, c.to_string(), i));
            continue;
        }

        if literal.is_empty() {
            literal_start = i;
        }

        if c == '\\' {
            match chars.next() {
                Some((_, escaped)) if is_meta(escaped) => literal.push(escaped),
                Some((_, other)) => {
                    return Err(Error::InvalidEscape {
                        position: i,
                        found: Some(other),
                    });
                }
                None => {
                    return Err(Error::InvalidEscape {
                        position: i,
                        found: None,
                    });
                }
            }
        } else {
            literal.push(c);
        }
    }
    flush_literal(&mut tokens, &mut literal, literal_start);

    tokens.push(Token::new(TokenKind::End, "", source.len()));
    trace!("tokenized {source:?} into {} tokens", tokens.len());
    Ok(tokens)
}

fn flush_literal(tokens: &mut Vec<Token>, literal: &mut String, start: usize) {
    if !literal.is_empty() {
        tokens.push(Token::new(TokenKind::String, std::mem::take(literal), start));
    }
}
