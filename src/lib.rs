//! Excuse-Gen expands compact grammar expressions into random text.
//!
//! An expression mixes literal text with alternations written
//! `<first|second|...>`. Alternations nest and sit anywhere inside literal
//! text. Each expansion picks one branch per alternation, weighted by how many
//! distinct strings the branch can produce, so every possible output is
//! equally likely.
//!
//! # Example
//!
//! ```rust
//! use excuse_gen::Generator;
//!
//! let generator = Generator::from_expression("Hello <world|Rust <programmers|users>>").unwrap();
//! assert_eq!(generator.count(), 3);
//!
//! let text = generator.expand(42);
//! assert!(["Hello world", "Hello Rust programmers", "Hello Rust users"].contains(&text.as_str()));
//! assert_eq!(text, generator.expand(42));
//! ```

pub mod catalog;
pub mod corpus;
pub mod generator;
pub mod node;
pub mod parser;
pub mod utils;

pub use catalog::Catalog;
pub use corpus::{load_corpus_file, parse_corpus, parse_corpus_with, CorpusConfig};
pub use generator::{time_slot_seed, Generator, DEFAULT_TIME_SLOT};
pub use node::{Alternation, Node, Sequence};
pub use parser::{parse_expression, parse_expression_with_depth, DEFAULT_MAX_DEPTH};
pub use utils::{GrammarError, Result};
