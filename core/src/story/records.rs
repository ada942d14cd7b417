use serde::{Deserialize, Serialize};

/// A persisted story. Owns the node graph rooted at its single root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: i64,
    pub title: String,
    pub session_id: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryNodeRecord {
    pub id: i64,
    pub story_id: i64,
    pub content: String,
    pub is_root: bool,
    pub is_ending: bool,
    pub is_winning_ending: bool,
    pub options: Vec<StoredOption>,
}

/// An option as stored on its owning node. `node_id` is `None` only when the
/// model supplied a choice without a follow-up node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOption {
    pub text: String,
    pub node_id: Option<i64>,
}

/// Column values for a node insert. Options are attached afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStoryNode {
    pub story_id: i64,
    pub content: String,
    pub is_root: bool,
    pub is_ending: bool,
    pub is_winning_ending: bool,
}
