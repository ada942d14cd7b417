use super::records::{NewStoryNode, StoredOption};
use super::store::StoryStore;
use super::tree::TreeNode;
use crate::errors::Result;

/// Persist `node` and its whole subtree under `story_id`, returning the id of
/// the row created for `node`.
///
/// The walk is depth-first and pre-order: the node row is inserted first so
/// it has an identity, each child is then materialized in option order, and
/// only once every child id is known is the node's option list written.
/// Ending nodes never receive options; any the model attached are dropped.
pub fn materialize<S>(store: &mut S, story_id: i64, node: TreeNode, is_root: bool) -> Result<i64>
where
    S: StoryStore + ?Sized,
{
    let TreeNode {
        content,
        is_ending,
        is_winning_ending,
        options,
    } = node;

    let node_id = store.insert_node(&NewStoryNode {
        story_id,
        content,
        is_root,
        is_ending,
        is_winning_ending,
    })?;

    if is_ending && !options.is_empty() {
        log::warn!(
            "story {story_id}: ending node {node_id} carried {} option(s); dropping them",
            options.len()
        );
        store.set_node_options(node_id, &[])?;
        return Ok(node_id);
    }

    let mut stored = Vec::with_capacity(options.len());
    for option in options {
        let target = match option.next_node {
            Some(child) => Some(materialize(store, story_id, *child, false)?),
            None => {
                log::debug!("story {story_id}: option {:?} has no follow-up node", option.text);
                None
            }
        };
        stored.push(StoredOption {
            text: option.text,
            node_id: target,
        });
    }

    store.set_node_options(node_id, &stored)?;
    Ok(node_id)
}
