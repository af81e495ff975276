// expression  := sequence
// sequence    := item*
// item        := literal | alternation
// alternation := '<' sequence ('|' sequence)* '>'
//
// A literal is any run of characters other than `<`, `|` and `>`. There is
// no escape syntax.

use std::str::{Chars, FromStr};

use tracing::trace;

use crate::node::Node;
use crate::utils::{GrammarError, Result};

/// Default limit on how deeply alternations may nest
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Why a sequence stopped accumulating items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// End of input
    End,
    /// A `|` was consumed
    Bar,
    /// A `>` was consumed
    Close,
}

/// Cursor over the characters of one expression
struct Parser<'a> {
    chars: Chars<'a>,
    /// Offset, in characters, of the next unread character
    position: usize,
    /// Number of alternations currently open
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, max_depth: usize) -> Self {
        Parser {
            chars: input.chars(),
            position: 0,
            depth: 0,
            max_depth,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn parse(mut self) -> Result<Node> {
        let (node, stop) = self.sequence()?;
        match stop {
            Stop::End => Ok(node.unwrap_or(Node::Empty)),
            Stop::Bar | Stop::Close => Err(GrammarError::TrailingInput {
                position: self.position - 1,
                found: if stop == Stop::Bar { '|' } else { '>' },
            }),
        }
    }

    /// Accumulate literals and alternations until the end of input or a
    /// branch delimiter, which is consumed and reported.
    fn sequence(&mut self) -> Result<(Option<Node>, Stop)> {
        let mut parts = Vec::new();
        let mut literal = String::new();

        let stop = loop {
            let Some(c) = self.bump() else {
                break Stop::End;
            };
            match c {
                '<' => {
                    flush_literal(&mut literal, &mut parts);
                    let open = self.position - 1;
                    if self.depth >= self.max_depth {
                        return Err(GrammarError::TooDeep {
                            position: open,
                            max_depth: self.max_depth,
                        });
                    }
                    if let Some(node) = self.alternation(open)? {
                        parts.push(node);
                    }
                }
                '|' => break Stop::Bar,
                '>' => break Stop::Close,
                _ => literal.push(c),
            }
        };
        flush_literal(&mut literal, &mut parts);

        let node = match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Node::sequence(parts)),
        };
        Ok((node, stop))
    }

    /// Parse the branches of an alternation whose `<` sat at `open`, up to
    /// and including its closing `>`.
    fn alternation(&mut self, open: usize) -> Result<Option<Node>> {
        self.depth += 1;
        let mut branches = Vec::new();
        loop {
            let (branch, stop) = self.sequence()?;
            branches.extend(branch);
            match stop {
                Stop::Bar => continue,
                Stop::Close => break,
                Stop::End => return Err(GrammarError::UnterminatedAlternation { position: open }),
            }
        }
        self.depth -= 1;

        match branches.len() {
            0 => Ok(None),
            1 => Ok(branches.pop()),
            _ => Node::alternation(branches).map(Some),
        }
    }
}

fn flush_literal(literal: &mut String, parts: &mut Vec<Node>) {
    if !literal.is_empty() {
        parts.push(Node::Term(std::mem::take(literal)));
    }
}

/// Parse one expression into a tree.
///
/// Empty branches and empty sequences are dropped and single-child groups are
/// unwrapped, so `"<plop|>"` yields the plain term `plop`. An expression that
/// collapses to nothing at all yields `Node::Empty`. Alternations may nest up
/// to `DEFAULT_MAX_DEPTH` levels.
pub fn parse_expression(input: &str) -> Result<Node> {
    parse_expression_with_depth(input, DEFAULT_MAX_DEPTH)
}

/// Parse one expression, rejecting alternations nested deeper than `max_depth`
pub fn parse_expression_with_depth(input: &str, max_depth: usize) -> Result<Node> {
    let node = Parser::new(input, max_depth).parse()?;
    trace!(input, count = node.count(), "parsed expression");
    Ok(node)
}

impl FromStr for Node {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self> {
        parse_expression(s)
    }
}
