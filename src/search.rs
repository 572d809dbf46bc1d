use std::io::{self, Write};

use bytes::{BufMut, BytesMut};
use yre::{CompiledPattern, Match};

use crate::output::put_match;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub only_matching: bool,
    pub use_color: bool,
    pub anchored: bool,
}

/// Writes the matching lines (or matched parts) of `content` to `out`.
/// Returns whether anything matched.
pub fn process_input<W: Write>(
    content: &str,
    pattern: &CompiledPattern,
    filename: Option<&str>,
    opts: &SearchOptions,
    out: &mut W,
) -> io::Result<bool> {
    let prefix = filename.map(|f| format!("{f}:")).unwrap_or_default();
    let mut buf = BytesMut::with_capacity(256);
    let mut any_matched = false;

    for line in content.lines() {
        let matches: Vec<Match> = if opts.anchored {
            pattern.match_prefix(line).into_iter().collect()
        } else {
            pattern.find_iter(line).collect()
        };
        if matches.is_empty() {
            continue;
        }
        any_matched = true;

        buf.clear();
        if opts.only_matching {
            for m in matches.iter().filter(|m| !m.is_empty()) {
                buf.put_slice(prefix.as_bytes());
                put_match(&mut buf, m.as_str(), opts.use_color);
                buf.put_u8(b'\n');
            }
        } else {
            buf.put_slice(prefix.as_bytes());
            let mut last_end = 0;
            for m in &matches {
                buf.put_slice(line[last_end..m.start()].as_bytes());
                put_match(&mut buf, m.as_str(), opts.use_color && !m.is_empty());
                last_end = m.end();
            }
            buf.put_slice(line[last_end..].as_bytes());
            buf.put_u8(b'\n');
        }
        out.write_all(&buf)?;
    }

    Ok(any_matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        pattern: &str,
        content: &str,
        filename: Option<&str>,
        opts: SearchOptions,
    ) -> (bool, String) {
        let pattern = yre::compile(pattern).unwrap();
        let mut out = Vec::new();
        let matched = process_input(content, &pattern, filename, &opts, &mut out).unwrap();
        (matched, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prints_matching_lines() {
        let (matched, out) = run("b(a|o)g", "bag\ncat\nbog\n", None, SearchOptions::default());
        assert!(matched);
        assert_eq!(out, "bag\nbog\n");
    }

    #[test]
    fn reports_no_match() {
        let (matched, out) = run("dog", "bag\ncat\n", None, SearchOptions::default());
        assert!(!matched);
        assert_eq!(out, "");
    }

    #[test]
    fn only_matching_prints_each_match() {
        let opts = SearchOptions {
            only_matching: true,
            ..Default::default()
        };
        let (_, out) = run("[123]", "a1b2\nc\n3", Some("f.txt"), opts);
        assert_eq!(out, "f.txt:1\nf.txt:2\nf.txt:3\n");
    }

    #[test]
    fn anchored_only_tries_line_start() {
        let opts = SearchOptions {
            anchored: true,
            ..Default::default()
        };
        let (_, out) = run("ab", "abc\ncab\n", None, opts);
        assert_eq!(out, "abc\n");
    }

    #[test]
    fn colors_every_match_in_line() {
        let opts = SearchOptions {
            use_color: true,
            ..Default::default()
        };
        let (_, out) = run("o", "foo", None, opts);
        assert_eq!(out, "f\x1b[01;31mo\x1b[m\x1b[01;31mo\x1b[m\n");
    }

    #[test]
    fn empty_matches_keep_the_line_but_print_nothing_alone() {
        let (matched, out) = run("x*", "abc", None, SearchOptions::default());
        assert!(matched);
        assert_eq!(out, "abc\n");

        let opts = SearchOptions {
            only_matching: true,
            ..Default::default()
        };
        let (_, out) = run("x*", "abc", None, opts);
        assert_eq!(out, "");
    }
}
