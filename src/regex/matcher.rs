use std::iter;
use std::ops::Range;

use crate::regex::ast::{CompiledPattern, Node};
use crate::regex::error::{Error, Result};

// Byte range of each capturing group, indexed by group number (slot 0 unused).
type Captures = Vec<Option<(usize, usize)>>;

// What to do with the rest of the pattern once a node has matched up to a
// position. Returning false asks the caller to backtrack.
type Continuation<'k> = dyn FnMut(usize, &mut Captures) -> bool + 'k;

/// A successful match, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    source: String,
    start: usize,
    end: usize,
    // groups[0] is the whole match
    groups: Vec<String>,
}

impl Match {
    /// The text the pattern was matched against.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn as_str(&self) -> &str {
        &self.groups[0]
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Text of group `n`; 0 is the whole match. Groups that took no part in
    /// the match are empty.
    pub fn group(&self, n: usize) -> Result<&str> {
        self.get(n).ok_or(Error::NoSuchGroup {
            index: n,
            len: self.groups.len(),
        })
    }

    pub fn get(&self, n: usize) -> Option<&str> {
        self.groups.get(n).map(String::as_str)
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

struct Matcher<'t> {
    text: &'t str,
}

impl Matcher<'_> {
    fn char_at(&self, pos: usize) -> Option<char> {
        self.text[pos..].chars().next()
    }

    fn seq(
        &self,
        nodes: &[Node],
        pos: usize,
        caps: &mut Captures,
        k: &mut Continuation<'_>,
    ) -> bool {
        match nodes.split_first() {
            None => k(pos, caps),
            Some((first, rest)) => {
                self.node(first, pos, caps, &mut |next: usize, caps: &mut Captures| {
                    self.seq(rest, next, caps, k)
                })
            }
        }
    }

    // Every path that returns false leaves `caps` as it found it.
    fn node(
        &self,
        node: &Node,
        pos: usize,
        caps: &mut Captures,
        k: &mut Continuation<'_>,
    ) -> bool {
        match node {
            Node::Literal(text) => {
                self.text[pos..].starts_with(text.as_str()) && k(pos + text.len(), caps)
            }
            Node::AnyChar => match self.char_at(pos) {
                Some(c) => k(pos + c.len_utf8(), caps),
                None => false,
            },
            Node::CharClass { members, negated } => match self.char_at(pos) {
                Some(c) if members.contains(&c) != *negated => k(pos + c.len_utf8(), caps),
                _ => false,
            },
            Node::Group { children, index } => {
                let index = *index;
                self.seq(children, pos, caps, &mut |end: usize, caps: &mut Captures| {
                    let saved = caps[index].replace((pos, end));
                    if k(end, caps) {
                        return true;
                    }
                    caps[index] = saved;
                    false
                })
            }
            // Leftmost branch that lets the rest of the pattern match wins
            Node::Alternation(branches) => branches
                .iter()
                .any(|branch| self.seq(branch, pos, caps, k)),
            Node::Repeat { child, min, max } if child.is_single_path() => {
                self.repeat_single_path(child, *min, *max, pos, caps, k)
            }
            Node::Repeat { child, min, max } => self.repeat(child, *min, *max, 0, pos, caps, k),
        }
    }

    // Where a single-path node ends when matched at `pos`, without running
    // any continuation.
    fn step(&self, node: &Node, pos: usize) -> Option<usize> {
        match node {
            Node::Literal(text) => self.text[pos..]
                .starts_with(text.as_str())
                .then(|| pos + text.len()),
            Node::AnyChar => self.char_at(pos).map(|c| pos + c.len_utf8()),
            Node::CharClass { members, negated } => self
                .char_at(pos)
                .filter(|c| members.contains(c) != *negated)
                .map(|c| pos + c.len_utf8()),
            Node::Group { children, .. } => children
                .iter()
                .try_fold(pos, |at, child| self.step(child, at)),
            Node::Alternation(_) | Node::Repeat { .. } => None,
        }
    }

    // Repetition of a child that matches at most one way. The end of every
    // step is collected up front, then counts are tried from the most down to
    // `min`, so stack depth doesn't grow with the input.
    fn repeat_single_path(
        &self,
        child: &Node,
        min: usize,
        max: Option<usize>,
        pos: usize,
        caps: &mut Captures,
        k: &mut Continuation<'_>,
    ) -> bool {
        // ends[n] is the position after n repetitions
        let mut ends = vec![pos];
        let mut zero_width = false;
        let mut at = pos;
        while max.is_none_or(|max| ends.len() <= max) {
            match self.step(child, at) {
                Some(next) if next == at => {
                    zero_width = true;
                    break;
                }
                Some(next) => {
                    ends.push(next);
                    at = next;
                }
                None => break,
            }
        }

        // The last step is replayed through `node` so its captures get set.
        if zero_width && self.node(child, at, caps, k) {
            return true;
        }
        let most = ends.len() - 1;
        (min..=most).rev().any(|count| match count {
            0 => k(pos, caps),
            _ => self.node(child, ends[count - 1], caps, k),
        })
    }

    // Greedy: try one more repetition before handing over to the continuation.
    #[allow(clippy::too_many_arguments)]
    fn repeat(
        &self,
        child: &Node,
        min: usize,
        max: Option<usize>,
        count: usize,
        pos: usize,
        caps: &mut Captures,
        k: &mut Continuation<'_>,
    ) -> bool {
        if max.is_none_or(|max| count < max) {
            let matched = self.node(child, pos, caps, &mut |next: usize, caps: &mut Captures| {
                if next == pos {
                    // A zero-width step would repeat forever; it ends the
                    // repetition and counts for whatever minimum is left.
                    return k(next, caps);
                }
                self.repeat(child, min, max, count + 1, next, caps, k)
            });
            if matched {
                return true;
            }
        }
        count >= min && k(pos, caps)
    }
}

/// Anchored match: succeeds only if the pattern matches starting exactly at
/// `start`. Trailing input is left alone.
pub fn match_at(pattern: &CompiledPattern, text: &str, start: usize) -> Option<Match> {
    if !text.is_char_boundary(start) {
        return None;
    }

    let matcher = Matcher { text };
    let mut caps: Captures = vec![None; pattern.group_count() + 1];
    let mut end = None;
    let mut accept = |pos: usize, _: &mut Captures| {
        end = Some(pos);
        true
    };
    let matched = matcher.seq(pattern.root(), start, &mut caps, &mut accept);
    let end = end.filter(|_| matched)?;

    let groups = iter::once(text[start..end].to_string())
        .chain(caps.iter().skip(1).map(|cap| {
            cap.map(|(s, e)| text[s..e].to_string()).unwrap_or_default()
        }))
        .collect();

    Some(Match {
        source: text.to_string(),
        start,
        end,
        groups,
    })
}

/// Leftmost match at or after `from`.
pub fn search_from(pattern: &CompiledPattern, text: &str, from: usize) -> Option<Match> {
    if !text.is_char_boundary(from) {
        return None;
    }
    text[from..]
        .char_indices()
        .map(|(i, _)| from + i)
        .chain(iter::once(text.len()))
        .find_map(|start| match_at(pattern, text, start))
}

/// Successive non-overlapping matches, left to right.
pub struct Matches<'p, 't> {
    pattern: &'p CompiledPattern,
    text: &'t str,
    next: Option<usize>,
}

impl<'p, 't> Matches<'p, 't> {
    pub(crate) fn new(pattern: &'p CompiledPattern, text: &'t str) -> Self {
        Matches {
            pattern,
            text,
            next: Some(0),
        }
    }
}

impl Iterator for Matches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let from = self.next?;
        let Some(found) = search_from(self.pattern, self.text, from) else {
            self.next = None;
            return None;
        };

        self.next = if found.is_empty() {
            // Step over one character so an empty match isn't found again
            self.text[found.end()..]
                .chars()
                .next()
                .map(|c| found.end() + c.len_utf8())
        } else {
            Some(found.end())
        };
        Some(found)
    }
}
