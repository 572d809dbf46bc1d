use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(String), // abc
    AnyChar,         // .
    // [abc], [^abc]
    CharClass {
        members: Vec<char>,
        negated: bool,
    },
    // (...), index is 1-based in opening-paren order
    Group {
        children: Vec<Node>,
        index: usize,
    },
    Alternation(Vec<Vec<Node>>), // a|b|c
    // ?, *, {m}, {m,}, {m,n}; max of None is unbounded
    Repeat {
        child: Box<Node>,
        min: usize,
        max: Option<usize>,
    },
}

impl Node {
    /// Whether a quantifier may be attached directly to this node.
    pub fn is_quantifiable(&self) -> bool {
        matches!(
            self,
            Node::Literal(_) | Node::AnyChar | Node::CharClass { .. } | Node::Group { .. }
        )
    }

    /// Whether the node can match in at most one way at a given position,
    /// i.e. there is no alternation or repetition anywhere inside it.
    pub fn is_single_path(&self) -> bool {
        match self {
            Node::Literal(_) | Node::AnyChar | Node::CharClass { .. } => true,
            Node::Group { children, .. } => children.iter().all(Node::is_single_path),
            Node::Alternation(_) | Node::Repeat { .. } => false,
        }
    }
}

/// A parsed pattern. Never mutated once built; the cache hands out shared
/// references to it.
pub struct CompiledPattern {
    source: String,
    root: Vec<Node>,
    group_count: usize,
}

impl CompiledPattern {
    pub(crate) fn new(source: impl Into<String>, root: Vec<Node>, group_count: usize) -> Self {
        CompiledPattern {
            source: source.into(),
            root,
            group_count,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &[Node] {
        &self.root
    }

    /// Number of capturing groups, not counting the implicit whole-match group.
    pub fn group_count(&self) -> usize {
        self.group_count
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "yre::compile({:?})", self.source)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_shows_compile_call() {
        let pattern = CompiledPattern::new("a(b)", vec![], 1);
        assert_eq!(format!("{pattern:?}"), "yre::compile(\"a(b)\")");
        assert_eq!(pattern.to_string(), "a(b)");
    }

    #[test]
    fn repeats_are_not_quantifiable() {
        let repeat = Node::Repeat {
            child: Box::new(Node::AnyChar),
            min: 0,
            max: None,
        };
        assert!(!repeat.is_quantifiable());
        assert!(!Node::Alternation(vec![]).is_quantifiable());
        assert!(Node::Literal("a".into()).is_quantifiable());
    }

    #[test]
    fn single_path_excludes_choices() {
        let plain_group = Node::Group {
            children: vec![Node::Literal("ab".into()), Node::AnyChar],
            index: 1,
        };
        assert!(plain_group.is_single_path());

        let with_choice = Node::Group {
            children: vec![Node::Alternation(vec![vec![], vec![Node::AnyChar]])],
            index: 1,
        };
        assert!(!with_choice.is_single_path());

        let nested_repeat = Node::Group {
            children: vec![Node::Repeat {
                child: Box::new(Node::AnyChar),
                min: 0,
                max: Some(1),
            }],
            index: 1,
        };
        assert!(!nested_repeat.is_single_path());
    }
}
