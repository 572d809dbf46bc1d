//! A small backtracking pattern engine.
//!
//! Patterns are literal text plus `.`, `?`, `*`, `{m,n}`, `[...]`, capturing
//! `(...)` groups and `|` alternation. A backslash makes a metacharacter
//! literal.
//!
//! ```
//! let m = yre::match_prefix("(a|b)c", "bcd").unwrap().unwrap();
//! assert_eq!(m.groups(), ["bc", "b"]);
//! ```

pub mod regex;

pub use regex::{
    CompiledPattern, Error, Match, Matches, Node, Pattern, PatternCache, Result, Token, TokenKind,
    compile, match_at, match_prefix, parse, search, tokenize,
};
