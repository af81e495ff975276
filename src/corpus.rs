use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::node::Node;
use crate::parser::{parse_expression_with_depth, DEFAULT_MAX_DEPTH};
use crate::utils::Result;

/// Configuration options for corpus loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Lines starting with this character (after trimming) are comments
    pub comment_prefix: char,
    /// Whether blank lines are dropped instead of becoming empty branches
    pub skip_blank_lines: bool,
    /// Deepest alternation nesting accepted on a single line
    pub max_depth: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            comment_prefix: '#',
            skip_blank_lines: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CorpusConfig {
    /// Parse options from JSON, missing fields take their default
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read options from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        debug!(?config, "loaded corpus configuration");
        Ok(config)
    }
}

fn trim_line(line: &str) -> &str {
    line.trim_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Parse a corpus with the default configuration.
///
/// Every non-comment line is an expression and becomes one branch of the
/// returned alternation. Blank lines are kept as branches producing nothing.
pub fn parse_corpus(text: &str) -> Result<Node> {
    parse_corpus_with(text, &CorpusConfig::default())
}

/// Parse a corpus, one expression per line.
///
/// The first invalid line aborts loading; its error is wrapped with the
/// 1-based line number. A corpus without any expression line is rejected as
/// an empty alternation.
pub fn parse_corpus_with(text: &str, config: &CorpusConfig) -> Result<Node> {
    let mut branches = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_num = idx + 1;
        let line = trim_line(raw);

        if line.starts_with(config.comment_prefix) {
            trace!(line = line_num, "skipping comment");
            continue;
        }
        if line.is_empty() && config.skip_blank_lines {
            trace!(line = line_num, "skipping blank line");
            continue;
        }

        let branch = parse_expression_with_depth(line, config.max_depth)
            .map_err(|e| e.at_line(line_num))?;
        branches.push(branch);
    }

    let corpus = Node::alternation(branches)?;
    debug!(
        count = corpus.count(),
        max_length = corpus.max_length(),
        "corpus loaded"
    );
    Ok(corpus)
}

/// Load a corpus from a file
pub fn load_corpus_file<P: AsRef<Path>>(path: P, config: &CorpusConfig) -> Result<Node> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading corpus");
    let text = fs::read_to_string(path)?;
    parse_corpus_with(&text, config)
}
