//! Story generation pipeline.
//!
//! [`tree`] holds the transient model output, [`parser`] and [`prompt`] talk
//! to the model, [`materializer`] turns a tree into rows through the
//! [`store::StoryStore`] seam, and [`generator`] ties the steps together.

pub mod generator;
pub mod materializer;
pub mod parser;
pub mod prompt;
pub mod records;
pub mod store;
pub mod tree;

pub use generator::StoryGenerator;
pub use materializer::materialize;
pub use parser::{JsonStoryParser, ResponseParser};
pub use records::{NewStoryNode, StoredOption, StoryNodeRecord, StoryRecord};
pub use store::{SqliteStoryStore, StoryStore};
pub use tree::{StoryLlmResponse, TreeNode, TreeOption};
