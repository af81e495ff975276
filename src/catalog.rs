use std::fmt;
use std::str::FromStr;

use crate::corpus::parse_corpus;
use crate::generator::Generator;
use crate::node::Node;
use crate::parser::parse_expression;
use crate::utils::{GrammarError, Result};

const MEETING_STATEMENTS: &str = "<I cannot attend the daily|going to miss the meeting|gonna miss the meeting|No daily meeting for me>, ";
const MEETING_CAUSES: &str = include_str!("../data/meeting.txt");

const OOO_STATEMENTS: &str = "<I'm going to be OOO|I need to be OOO today|I can't show up today>, ";
const OOO_CAUSES: &str = include_str!("../data/ooo.txt");

/// A bundled excuse generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    /// Excuses for skipping the daily meeting
    Meeting,
    /// Excuses for being out of office
    Ooo,
    /// Any of the above, weighted by how many excuses each can produce
    Any,
}

impl Catalog {
    /// Every catalog, in display order
    pub const ALL: [Catalog; 3] = [Catalog::Meeting, Catalog::Ooo, Catalog::Any];

    /// Name accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Catalog::Meeting => "meeting",
            Catalog::Ooo => "ooo",
            Catalog::Any => "any",
        }
    }

    /// Build the generator: the catalog's opening statement followed by a
    /// cause drawn from its bundled corpus.
    pub fn build(self) -> Result<Generator> {
        let root = match self {
            Catalog::Meeting => excuse(MEETING_STATEMENTS, MEETING_CAUSES)?,
            Catalog::Ooo => excuse(OOO_STATEMENTS, OOO_CAUSES)?,
            Catalog::Any => Node::alternation(vec![
                Catalog::Meeting.build()?.into_root(),
                Catalog::Ooo.build()?.into_root(),
            ])?,
        };
        Ok(Generator::new(root))
    }
}

fn excuse(statements: &str, causes: &str) -> Result<Node> {
    let statement = parse_expression(statements)?;
    let cause = parse_corpus(causes)?;
    Ok(Node::sequence(vec![statement, cause]))
}

impl FromStr for Catalog {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self> {
        Catalog::ALL
            .into_iter()
            .find(|catalog| catalog.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GrammarError::UnknownCatalog(s.to_string()))
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
