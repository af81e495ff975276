use std::fmt;

use rand::Rng;
use serde_json::{json, Value};

use crate::utils::{GrammarError, Result};

/// A node of the expression tree, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, emitted verbatim. Must not contain `<`, `|` or `>`.
    Term(String),
    /// Produces nothing
    Empty,
    /// Children expanded in order and concatenated
    Sequence(Sequence),
    /// Exactly one child expanded, chosen by weight
    Alternation(Alternation),
}

/// Concatenation of child nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    items: Vec<Node>,
    count: u64,
}

impl Sequence {
    /// Create a sequence, caching the product of the child counts
    pub fn new(items: Vec<Node>) -> Self {
        let count = items
            .iter()
            .fold(1u64, |acc, item| acc.saturating_mul(item.count()));
        Sequence { items, count }
    }

    /// Get the children in expansion order
    pub fn items(&self) -> &[Node] {
        &self.items
    }
}

/// Weighted choice between child nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternation {
    items: Vec<Node>,
    /// Running total of the branch counts, up to and including each branch.
    /// Wide enough that saturated `u64` counts never collapse a range.
    cumulative: Vec<u128>,
}

impl Alternation {
    /// Build an alternation, rejecting an empty branch list
    pub fn new(items: Vec<Node>) -> Result<Self> {
        if items.is_empty() {
            return Err(GrammarError::EmptyAlternation);
        }

        let mut total = 0u128;
        let cumulative = items
            .iter()
            .map(|item| {
                total += u128::from(item.count());
                total
            })
            .collect();

        Ok(Alternation { items, cumulative })
    }

    /// Get the branches in declaration order
    pub fn items(&self) -> &[Node] {
        &self.items
    }

    /// Total weight of all branches, saturating at `u64::MAX`
    pub fn count(&self) -> u64 {
        u64::try_from(self.weight()).unwrap_or(u64::MAX)
    }

    /// Exact sum of the branch counts
    fn weight(&self) -> u128 {
        // Never empty, see `new`
        self.cumulative.last().copied().unwrap_or(1)
    }

    /// Pick the branch owning `draw`, for `draw` below the sum of the
    /// branch counts.
    ///
    /// Branch `i` owns the half-open range `[before_i, after_i)` of the
    /// running sums, so its share of the draws equals its own count.
    pub fn select(&self, draw: u128) -> &Node {
        let idx = self.cumulative.partition_point(|&after| after <= draw);
        &self.items[idx.min(self.items.len() - 1)]
    }
}

impl Node {
    /// Create a literal node
    pub fn term(text: impl Into<String>) -> Node {
        Node::Term(text.into())
    }

    /// Create a sequence node
    pub fn sequence(items: Vec<Node>) -> Node {
        Node::Sequence(Sequence::new(items))
    }

    /// Create an alternation node, failing on an empty branch list
    pub fn alternation(items: Vec<Node>) -> Result<Node> {
        Alternation::new(items).map(Node::Alternation)
    }

    /// Append one random expansion of this node to `out`
    pub fn expand<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut String) {
        match self {
            Node::Term(text) => out.push_str(text),
            Node::Empty => {}
            Node::Sequence(seq) => {
                for item in &seq.items {
                    item.expand(rng, out);
                }
            }
            Node::Alternation(alt) => {
                let draw = rng.gen_range(0..alt.weight());
                alt.select(draw).expand(rng, out);
            }
        }
    }

    /// Append the canonical expression text of this node to `out`
    pub fn encode(&self, out: &mut String) {
        match self {
            Node::Term(text) => out.push_str(text),
            Node::Empty => {}
            Node::Sequence(seq) => {
                for item in &seq.items {
                    item.encode(out);
                }
            }
            Node::Alternation(alt) => {
                out.push('<');
                for (idx, item) in alt.items.iter().enumerate() {
                    if idx > 0 {
                        out.push('|');
                    }
                    item.encode(out);
                }
                out.push('>');
            }
        }
    }

    /// Structured dump of the tree, for inspection only
    pub fn debug_json(&self) -> Value {
        match self {
            Node::Term(text) => Value::String(text.clone()),
            Node::Empty => Value::Null,
            Node::Sequence(seq) => json!({
                "type": "sequence",
                "items": seq.items.iter().map(Node::debug_json).collect::<Vec<_>>(),
            }),
            Node::Alternation(alt) => json!({
                "type": "choice",
                "items": alt.items.iter().map(Node::debug_json).collect::<Vec<_>>(),
            }),
        }
    }

    /// Length in bytes of the longest string this node can produce
    pub fn max_length(&self) -> usize {
        match self {
            Node::Term(text) => text.len(),
            Node::Empty => 0,
            Node::Sequence(seq) => seq.items.iter().map(Node::max_length).sum(),
            Node::Alternation(alt) => alt.items.iter().map(Node::max_length).max().unwrap_or(0),
        }
    }

    /// Number of distinct expansions, saturating at `u64::MAX`
    pub fn count(&self) -> u64 {
        match self {
            Node::Term(_) | Node::Empty => 1,
            Node::Sequence(seq) => seq.count,
            Node::Alternation(alt) => alt.count(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.encode(&mut out);
        f.write_str(&out)
    }
}
