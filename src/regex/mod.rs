pub mod ast;
pub mod cache;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod parser;

use std::sync::Arc;

pub use ast::{CompiledPattern, Node};
pub use cache::PatternCache;
pub use error::{Error, Result};
pub use lexer::{Token, TokenKind, tokenize};
pub use matcher::{Match, Matches};
pub use parser::parse;

impl CompiledPattern {
    /// Matches anchored at `start` (a byte offset).
    pub fn match_at(&self, text: &str, start: usize) -> Option<Match> {
        matcher::match_at(self, text, start)
    }

    /// Matches anchored at the start of `text`.
    pub fn match_prefix(&self, text: &str) -> Option<Match> {
        self.match_at(text, 0)
    }

    /// Leftmost match anywhere in `text`.
    pub fn search(&self, text: &str) -> Option<Match> {
        matcher::search_from(self, text, 0)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.search(text).is_some()
    }

    pub fn find_iter<'p, 't>(&'p self, text: &'t str) -> Matches<'p, 't> {
        Matches::new(self, text)
    }
}

/// Something `match_*`/`search` can run: a compiled pattern, or pattern
/// source that gets compiled through the global cache first.
pub trait Pattern {
    fn with_compiled<R>(self, f: impl FnOnce(&CompiledPattern) -> R) -> Result<R>;
}

impl Pattern for &CompiledPattern {
    fn with_compiled<R>(self, f: impl FnOnce(&CompiledPattern) -> R) -> Result<R> {
        Ok(f(self))
    }
}

impl Pattern for &Arc<CompiledPattern> {
    fn with_compiled<R>(self, f: impl FnOnce(&CompiledPattern) -> R) -> Result<R> {
        Ok(f(&**self))
    }
}

impl Pattern for &str {
    fn with_compiled<R>(self, f: impl FnOnce(&CompiledPattern) -> R) -> Result<R> {
        compile(self).map(|pattern| f(&*pattern))
    }
}

impl Pattern for &String {
    fn with_compiled<R>(self, f: impl FnOnce(&CompiledPattern) -> R) -> Result<R> {
        self.as_str().with_compiled(f)
    }
}

/// Compiles `source` through the process-wide cache.
pub fn compile(source: &str) -> Result<Arc<CompiledPattern>> {
    PatternCache::global().compile(source)
}

pub fn match_at(pattern: impl Pattern, text: &str, start: usize) -> Result<Option<Match>> {
    pattern.with_compiled(|p| p.match_at(text, start))
}

pub fn match_prefix(pattern: impl Pattern, text: &str) -> Result<Option<Match>> {
    match_at(pattern, text, 0)
}

pub fn search(pattern: impl Pattern, text: &str) -> Result<Option<Match>> {
    pattern.with_compiled(|p| p.search(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_is_cached_globally() {
        let source = "global-cache-(probe)";
        let first = compile(source).unwrap();
        let second = compile(source).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn functions_accept_source_or_pattern() {
        let pattern = compile("(test)").unwrap();

        let m = match_prefix("(test)", "test").unwrap().unwrap();
        assert_eq!(m.groups(), ["test", "test"]);
        let m = match_prefix(&pattern, "test").unwrap().unwrap();
        assert_eq!(m.groups(), ["test", "test"]);
        let m = match_prefix(&*pattern, "test").unwrap().unwrap();
        assert_eq!(m.group(1).unwrap(), "test");

        let source = String::from("test");
        assert!(search(&source, "xxtest").unwrap().is_some());
    }

    #[test]
    fn search_reports_leftmost_offset() {
        let m = search("test", "xxtest").unwrap().unwrap();
        assert_eq!(m.start(), 2);
        assert_eq!(m.end(), 6);
    }

    #[test]
    fn no_match_is_not_an_error() {
        assert_eq!(match_prefix("abc", "abd"), Ok(None));
        assert_eq!(match_at("b", "ab", 0), Ok(None));
        assert!(match_at("b", "ab", 1).unwrap().is_some());
    }

    #[test]
    fn bad_source_surfaces_compile_error() {
        assert!(matches!(
            search("a{5,2}", "aaaaa"),
            Err(Error::InvalidRepeatBounds { .. })
        ));
    }

    #[test]
    fn pattern_methods() {
        let pattern = compile("a.").unwrap();
        assert!(pattern.is_match("xxab"));
        assert!(!pattern.is_match("xxa"));
        assert_eq!(pattern.group_count(), 0);
        let all: Vec<String> = pattern
            .find_iter("a1a2a")
            .map(|m| m.as_str().to_string())
            .collect();
        assert_eq!(all, ["a1", "a2"]);
        assert_eq!(pattern.match_prefix("ab").unwrap().as_str(), "ab");
    }
}
