use log::trace;

use crate::regex::ast::{CompiledPattern, Node};
use crate::regex::error::{Error, Result};
use crate::regex::lexer::{Token, TokenKind, tokenize};

/// Kinds that may start an atom, reported when something else turns up.
const ATOM_KINDS: [TokenKind; 5] = [
    TokenKind::String,
    TokenKind::Dot,
    TokenKind::LBracket,
    TokenKind::LParen,
    TokenKind::Comma,
];

// One scope: the top level or a group body.
struct Frame {
    branches: Vec<Vec<Node>>,
    children: Vec<Node>,
    // Position of the '(' and the group index; unused for the top level
    open_position: usize,
    index: usize,
}

impl Frame {
    fn new(open_position: usize, index: usize) -> Self {
        Frame {
            branches: Vec::new(),
            children: Vec::new(),
            open_position,
            index,
        }
    }

    // If a '|' was seen the branches collapse into one Alternation node.
    fn finish(mut self) -> Vec<Node> {
        if self.branches.is_empty() {
            self.children
        } else {
            self.branches.push(self.children);
            vec![Node::Alternation(self.branches)]
        }
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    cursor: usize,
    end_position: usize,
    top: Frame,
    open: Vec<Frame>,
    group_count: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        let end_position = tokens
            .last()
            .map(|t| t.position + t.text.len())
            .unwrap_or(0);
        Parser {
            tokens,
            cursor: 0,
            end_position,
            top: Frame::new(0, 0),
            open: Vec::new(),
            group_count: 0,
        }
    }

    // Past the last token every read yields END.
    fn next(&mut self) -> Token {
        let token = self.tokens.get(self.cursor).cloned().unwrap_or_else(|| Token {
            kind: TokenKind::End,
            text: String::new(),
            position: self.end_position,
        });
        self.cursor += 1;
        token
    }

    fn current(&mut self) -> &mut Frame {
        self.open.last_mut().unwrap_or(&mut self.top)
    }

    fn push(&mut self, node: Node) {
        self.current().children.push(node);
    }

    fn scope_kinds(&self) -> Vec<TokenKind> {
        let mut expected = ATOM_KINDS.to_vec();
        expected.push(TokenKind::Pipe);
        expected.push(if self.open.is_empty() {
            TokenKind::End
        } else {
            TokenKind::RParen
        });
        expected
    }

    fn run(mut self) -> Result<(Vec<Node>, usize)> {
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::String => self.push(Node::Literal(token.text)),
                TokenKind::Dot => self.push(Node::AnyChar),
                // Outside of braces a comma is just text
                TokenKind::Comma => self.push(Node::Literal(token.text)),
                TokenKind::LBracket => {
                    let class = self.char_class(token.position)?;
                    self.push(class);
                }
                TokenKind::LParen => {
                    self.group_count += 1;
                    self.open.push(Frame::new(token.position, self.group_count));
                }
                TokenKind::RParen => {
                    let Some(frame) = self.open.pop() else {
                        return Err(Error::UnmatchedCloseParen {
                            position: token.position,
                        });
                    };
                    let index = frame.index;
                    let children = frame.finish();
                    self.push(Node::Group { children, index });
                }
                TokenKind::Question => self.quantify(&token, 0, Some(1))?,
                TokenKind::Asterisk => self.quantify(&token, 0, None)?,
                TokenKind::LBrace => {
                    let child = self.take_quantifiable(&token)?;
                    let (min, max) = self.repeat_bounds(token.position)?;
                    self.push(Node::Repeat {
                        child: Box::new(child),
                        min,
                        max,
                    });
                }
                TokenKind::Pipe => {
                    let frame = self.current();
                    let branch = std::mem::take(&mut frame.children);
                    frame.branches.push(branch);
                }
                TokenKind::End => {
                    if let Some(frame) = self.open.last() {
                        return Err(Error::UnmatchedOpenParen {
                            position: frame.open_position,
                        });
                    }
                    return Ok((self.top.finish(), self.group_count));
                }
                TokenKind::RBrace | TokenKind::RBracket => {
                    return Err(Error::Syntax {
                        position: token.position,
                        found: token.kind,
                        expected: self.scope_kinds(),
                    });
                }
            }
        }
    }

    fn quantify(&mut self, token: &Token, min: usize, max: Option<usize>) -> Result<()> {
        let child = self.take_quantifiable(token)?;
        self.push(Node::Repeat {
            child: Box::new(child),
            min,
            max,
        });
        Ok(())
    }

    // Pops the node a quantifier applies to. For a literal run that is only
    // its last character.
    fn take_quantifiable(&mut self, token: &Token) -> Result<Node> {
        let children = &mut self.current().children;
        match children.pop() {
            Some(Node::Literal(mut text)) if !text.is_empty() => {
                let last = text.pop().map(String::from).unwrap_or_default();
                if !text.is_empty() {
                    children.push(Node::Literal(text));
                }
                Ok(Node::Literal(last))
            }
            Some(node) if node.is_quantifiable() => Ok(node),
            other => {
                children.extend(other);
                Err(Error::Syntax {
                    position: token.position,
                    found: token.kind,
                    expected: ATOM_KINDS.to_vec(),
                })
            }
        }
    }

    fn char_class(&mut self, open: usize) -> Result<Node> {
        let mut members = Vec::new();
        let mut negated = false;
        let mut first = true;

        loop {
            let token = self.next();
            match token.kind {
                TokenKind::RBracket => break,
                TokenKind::String => {
                    let mut text = token.text.as_str();
                    if first && let Some(rest) = text.strip_prefix('^') {
                        negated = true;
                        text = rest;
                    }
                    members.extend(text.chars());
                }
                // Same as outside braces: a comma is just text
                TokenKind::Comma => members.push(','),
                TokenKind::End => return Err(Error::UnterminatedCharClass { position: open }),
                _ => {
                    return Err(Error::Syntax {
                        position: token.position,
                        found: token.kind,
                        expected: vec![TokenKind::String, TokenKind::Comma, TokenKind::RBracket],
                    });
                }
            }
            first = false;
        }

        Ok(Node::CharClass { members, negated })
    }

    // {m}, {m,} or {m,n}, called with the cursor just past '{'.
    fn repeat_bounds(&mut self, open: usize) -> Result<(usize, Option<usize>)> {
        let mut body = Vec::new();
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::RBrace => break,
                TokenKind::End => return Err(Error::UnterminatedBrace { position: open }),
                TokenKind::String | TokenKind::Comma => body.push(token),
                other => {
                    return Err(Error::InvalidRepeatBounds {
                        position: open,
                        reason: format!("unexpected {other} in repetition bounds"),
                    });
                }
            }
        }

        let kinds: Vec<TokenKind> = body.iter().map(|t| t.kind).collect();
        let (min, max) = match kinds.as_slice() {
            [TokenKind::String] => {
                let n = parse_bound(&body[0], open)?;
                (n, Some(n))
            }
            [TokenKind::String, TokenKind::Comma] => (parse_bound(&body[0], open)?, None),
            [TokenKind::String, TokenKind::Comma, TokenKind::String] => (
                parse_bound(&body[0], open)?,
                Some(parse_bound(&body[2], open)?),
            ),
            _ => {
                return Err(Error::InvalidRepeatBounds {
                    position: open,
                    reason: "expected {m}, {m,} or {m,n}".to_string(),
                });
            }
        };

        if let Some(max) = max
            && min > max
        {
            return Err(Error::InvalidRepeatBounds {
                position: open,
                reason: format!("minimum {min} is greater than maximum {max}"),
            });
        }
        Ok((min, max))
    }
}

fn parse_bound(token: &Token, open: usize) -> Result<usize> {
    let invalid = |reason: String| Error::InvalidRepeatBounds {
        position: open,
        reason,
    };
    if !token.text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("{:?} is not a number", token.text)));
    }
    token
        .text
        .parse()
        .map_err(|_| invalid(format!("{} is too large", token.text)))
}

pub fn parse(tokens: &[Token]) -> Result<Vec<Node>> {
    Parser::new(tokens).run().map(|(root, _)| root)
}

/// Tokenizes and parses `source` without touching any cache.
pub(crate) fn build_pattern(source: &str) -> Result<CompiledPattern> {
    let tokens = tokenize(source)?;
    let (root, group_count) = Parser::new(&tokens).run()?;
    trace!("parsed {source:?}: {root:?}");
    Ok(CompiledPattern::new(source, root, group_count))
}
