use thiserror::Error;

use crate::regex::lexer::TokenKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A backslash followed by something other than a metacharacter.
    #[error("invalid escape at position {position}: {}", describe_escape(.found))]
    InvalidEscape {
        position: usize,
        found: Option<char>,
    },

    #[error("unterminated character class opened at position {position}")]
    UnterminatedCharClass { position: usize },

    #[error("unterminated repetition brace opened at position {position}")]
    UnterminatedBrace { position: usize },

    #[error("invalid repetition bounds at position {position}: {reason}")]
    InvalidRepeatBounds { position: usize, reason: String },

    #[error("unmatched '(' at position {position}")]
    UnmatchedOpenParen { position: usize },

    #[error("unmatched ')' at position {position}")]
    UnmatchedCloseParen { position: usize },

    #[error("unexpected {found} at position {position}, expected one of: {}", join_kinds(.expected))]
    Syntax {
        position: usize,
        found: TokenKind,
        expected: Vec<TokenKind>,
    },

    #[error("no such group {index}, match has {len} groups")]
    NoSuchGroup { index: usize, len: usize },
}

impl Error {
    /// Source offset of the offending token, for compile-time errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::InvalidEscape { position, .. }
            | Error::UnterminatedCharClass { position }
            | Error::UnterminatedBrace { position }
            | Error::InvalidRepeatBounds { position, .. }
            | Error::UnmatchedOpenParen { position }
            | Error::UnmatchedCloseParen { position }
            | Error::Syntax { position, .. } => Some(*position),
            Error::NoSuchGroup { .. } => None,
        }
    }
}

fn describe_escape(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("'\\{c}' does not escape a metacharacter"),
        None => "trailing backslash".to_string(),
    }
}

fn join_kinds(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_lists_expected_kinds() {
        let err = Error::Syntax {
            position: 3,
            found: TokenKind::Question,
            expected: vec![TokenKind::String, TokenKind::RBracket],
        };
        assert_eq!(
            err.to_string(),
            "unexpected QUESTION at position 3, expected one of: STRING, RBRACKET"
        );
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn escape_error_messages() {
        let err = Error::InvalidEscape {
            position: 0,
            found: Some('d'),
        };
        assert_eq!(
            err.to_string(),
            "invalid escape at position 0: '\\d' does not escape a metacharacter"
        );

        let err = Error::InvalidEscape {
            position: 4,
            found: None,
        };
        assert_eq!(err.to_string(), "invalid escape at position 4: trailing backslash");
    }

    #[test]
    fn group_error_has_no_position() {
        let err = Error::NoSuchGroup { index: 3, len: 2 };
        assert_eq!(err.position(), None);
    }
}
