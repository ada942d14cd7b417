//! Transient story tree as returned by the model.
//!
//! The tree is an owned, acyclic value: every child belongs to exactly one
//! option of exactly one parent. It lives only between parsing and
//! materialization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryLlmResponse {
    pub title: String,
    pub root_node: TreeNode,
}

impl StoryLlmResponse {
    pub fn node_count(&self) -> usize {
        self.root_node.node_count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub content: String,
    #[serde(default)]
    pub is_ending: bool,
    #[serde(default)]
    pub is_winning_ending: bool,
    #[serde(default)]
    pub options: Vec<TreeOption>,
}

impl TreeNode {
    pub fn ending(content: impl Into<String>, winning: bool) -> Self {
        Self {
            content: content.into(),
            is_ending: true,
            is_winning_ending: winning,
            options: Vec::new(),
        }
    }

    pub fn branch(content: impl Into<String>, options: Vec<TreeOption>) -> Self {
        Self {
            content: content.into(),
            is_ending: false,
            is_winning_ending: false,
            options,
        }
    }

    /// This node plus every node reachable through its options.
    pub fn node_count(&self) -> usize {
        1 + self
            .options
            .iter()
            .filter_map(|option| option.next_node.as_deref())
            .map(TreeNode::node_count)
            .sum::<usize>()
    }
}

/// A choice offered to the reader. `next_node` is `None` only for
/// malformed model output; it is persisted as an option without a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeOption {
    pub text: String,
    #[serde(default)]
    pub next_node: Option<Box<TreeNode>>,
}

impl TreeOption {
    pub fn to(text: impl Into<String>, next: TreeNode) -> Self {
        Self {
            text: text.into(),
            next_node: Some(Box::new(next)),
        }
    }

    pub fn dangling(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_node: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_fields() {
        let raw = r#"{
            "title": "Forest Adventure",
            "rootNode": {
                "content": "You wake up in a forest.",
                "isEnding": false,
                "isWinningEnding": false,
                "options": [
                    {
                        "text": "Go left",
                        "nextNode": {
                            "content": "You find a treasure.",
                            "isEnding": true,
                            "isWinningEnding": true,
                            "options": []
                        }
                    },
                    { "text": "Stay put", "nextNode": null }
                ]
            }
        }"#;
        let response: StoryLlmResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.title, "Forest Adventure");
        assert_eq!(response.root_node.options.len(), 2);
        let leaf = response.root_node.options[0].next_node.as_deref().unwrap();
        assert!(leaf.is_ending && leaf.is_winning_ending);
        assert!(response.root_node.options[1].next_node.is_none());
        assert_eq!(response.node_count(), 2);
    }

    #[test]
    fn missing_flags_default_to_false() {
        let node: TreeNode = serde_json::from_str(r#"{ "content": "Dead end" }"#).unwrap();
        assert!(!node.is_ending);
        assert!(!node.is_winning_ending);
        assert!(node.options.is_empty());
    }

    #[test]
    fn counts_nested_nodes() {
        let tree = TreeNode::branch(
            "start",
            vec![
                TreeOption::to(
                    "a",
                    TreeNode::branch("mid", vec![TreeOption::to("c", TreeNode::ending("win", true))]),
                ),
                TreeOption::to("b", TreeNode::ending("lose", false)),
                TreeOption::dangling("nowhere"),
            ],
        );
        assert_eq!(tree.node_count(), 4);
    }
}
