use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::corpus::{load_corpus_file, parse_corpus_with, CorpusConfig};
use crate::node::Node;
use crate::parser::parse_expression;
use crate::utils::Result;

/// Width of the time slot during which the default seed stays the same
pub const DEFAULT_TIME_SLOT: Duration = Duration::from_secs(5 * 60);

/// A built expression tree, ready for repeated expansion.
///
/// The tree is immutable and the type is `Send + Sync`, so one instance can
/// serve any number of threads, each expanding with its own random stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    root: Node,
}

impl Generator {
    /// Wrap an already built tree
    pub fn new(root: Node) -> Self {
        Generator { root }
    }

    /// Build from corpus text, one expression per line
    pub fn build(corpus_text: &str) -> Result<Self> {
        Self::build_with(corpus_text, &CorpusConfig::default())
    }

    /// Build from corpus text with custom configuration
    pub fn build_with(corpus_text: &str, config: &CorpusConfig) -> Result<Self> {
        parse_corpus_with(corpus_text, config).map(Generator::new)
    }

    /// Build from a single expression
    pub fn from_expression(expression: &str) -> Result<Self> {
        parse_expression(expression).map(Generator::new)
    }

    /// Build from a corpus file
    pub fn from_file<P: AsRef<Path>>(path: P, config: &CorpusConfig) -> Result<Self> {
        load_corpus_file(path, config).map(Generator::new)
    }

    /// Get the root of the tree
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Consume the generator, returning its tree
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Expand with a fresh random stream derived from `seed`.
    ///
    /// The same seed on the same tree always gives the same string.
    pub fn expand(&self, seed: u64) -> String {
        let mut rng = StdRng::seed_from_u64(seed);
        self.expand_with(&mut rng)
    }

    /// Expand with a caller-supplied random stream
    pub fn expand_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut out = String::with_capacity(self.root.max_length());
        self.root.expand(rng, &mut out);
        out
    }

    /// Number of distinct outputs, saturating at `u64::MAX`
    pub fn count(&self) -> u64 {
        self.root.count()
    }

    /// Length in bytes of the longest possible output
    pub fn max_length(&self) -> usize {
        self.root.max_length()
    }

    /// Compact JSON dump of the tree
    pub fn debug_json(&self) -> String {
        self.root.debug_json().to_string()
    }

    /// Canonical expression text of the tree
    pub fn encode(&self) -> String {
        self.root.to_string()
    }
}

impl From<Node> for Generator {
    fn from(root: Node) -> Self {
        Generator::new(root)
    }
}

/// Seed shared by every request made during the same time slot.
///
/// Returns the Unix time of `now` in nanoseconds, rounded down to a multiple
/// of `slot`. A zero `slot` disables the rounding. Times before the epoch map
/// to zero.
pub fn time_slot_seed(now: SystemTime, slot: Duration) -> u64 {
    let nanos = now
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let slot = slot.as_nanos();
    let truncated = if slot == 0 { nanos } else { nanos - nanos % slot };
    truncated as u64
}
