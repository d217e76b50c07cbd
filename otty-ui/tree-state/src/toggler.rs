use std::sync::Arc;

use log::debug;

use crate::error::{Result, TreeError};
use crate::model::{FlatTree, NodeId};
use crate::walker::{WalkOptions, map_tree};

/// Open or close node `id` and recompute visibility below it.
///
/// When the node already has the requested state the very same snapshot
/// is returned, so `result.ptr_eq(tree)` holds. Otherwise a new snapshot
/// is produced; records whose state does not change stay shared with the
/// input, which is never modified.
pub fn toggle_tree_node<Id: NodeId>(
    tree: &FlatTree<Id>,
    id: &Id,
    is_open: bool,
) -> Result<FlatTree<Id>> {
    let target = tree.get(id).ok_or_else(|| TreeError::node_not_found(id))?;
    if target.is_open == is_open {
        return Ok(tree.clone());
    }

    // Preorder: every parent is recomputed before its children.
    let descendants =
        map_tree(tree, WalkOptions::starting_at(id.clone()), |node, _| {
            node.id.clone()
        })?
        .unwrap_or_default();

    let mut nodes = tree.shared_nodes().clone();
    if let Some(record) = nodes.get_mut(id) {
        Arc::make_mut(record).is_open = is_open;
    }

    let mut updated = 0usize;
    for descendant in &descendants {
        let Some(parent_id) =
            nodes.get(descendant).and_then(|node| node.parent.clone())
        else {
            continue;
        };
        let parent = nodes
            .get(&parent_id)
            .ok_or_else(|| TreeError::node_not_found(&parent_id))?;
        let is_hidden = !parent.is_open || parent.is_hidden;

        if let Some(record) = nodes.get_mut(descendant) {
            if record.is_hidden != is_hidden {
                Arc::make_mut(record).is_hidden = is_hidden;
                updated += 1;
            }
        }
    }

    debug!(
        "toggled {id:?} to {}, {updated} of {} descendants changed visibility",
        if is_open { "open" } else { "closed" },
        descendants.len()
    );

    Ok(FlatTree::from_parts(nodes, tree.root_id().cloned()))
}
