use std::collections::HashSet;

use crate::error::{Result, TreeError};
use crate::model::{FlatNode, FlatTree, NodeId};

/// Where [`map_tree`] starts and whether the start node is visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions<Id> {
    /// Start node, the tree root when `None`.
    pub start: Option<Id>,
    /// Visit the start node itself, not only its descendants.
    pub include_start: bool,
}

impl<Id> Default for WalkOptions<Id> {
    fn default() -> Self {
        Self {
            start: None,
            include_start: false,
        }
    }
}

impl<Id> WalkOptions<Id> {
    /// Walk the descendants of `start`.
    pub fn starting_at(start: Id) -> Self {
        Self {
            start: Some(start),
            include_start: false,
        }
    }

    /// Visit the start node too.
    pub fn including_start(mut self) -> Self {
        self.include_start = true;
        self
    }
}

/// Depth-first preorder walk collecting `visit` results.
///
/// A node is visited before its descendants and the whole subtree of a
/// child is visited before its next sibling. Returns `Ok(None)` for an
/// empty tree.
///
/// Fails with [`TreeError::RootNotFound`] when the start node is missing,
/// with [`TreeError::NodeNotFound`] on a dangling child link and with
/// [`TreeError::CycleDetected`] when a node is reached twice.
pub fn map_tree<Id, T, F>(
    tree: &FlatTree<Id>,
    options: WalkOptions<Id>,
    mut visit: F,
) -> Result<Option<Vec<T>>>
where
    Id: NodeId,
    F: FnMut(&FlatNode<Id>, &FlatTree<Id>) -> T,
{
    if tree.is_empty() {
        return Ok(None);
    }

    let start = match options.start.as_ref().or(tree.root_id()) {
        Some(id) => {
            tree.get(id).ok_or_else(|| TreeError::root_not_found(id))?
        },
        None => {
            return Err(TreeError::RootNotFound {
                id: String::from("<none>"),
            });
        },
    };

    let mut results = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        if !visited.insert(&node.id) {
            return Err(TreeError::cycle_detected(&node.id));
        }

        if options.include_start || !std::ptr::eq(node, start) {
            results.push(visit(node, tree));
        }

        for child_id in node.children.iter().rev() {
            let child = tree
                .get(child_id)
                .ok_or_else(|| TreeError::node_not_found(child_id))?;
            stack.push(child);
        }
    }

    Ok(Some(results))
}

/// Ids of the rows a renderer shows, in display order.
///
/// Hidden nodes are skipped. The root comes first when `include_root` is
/// set.
pub fn visible_ids<Id: NodeId>(
    tree: &FlatTree<Id>,
    include_root: bool,
) -> Result<Vec<Id>> {
    let options = WalkOptions {
        start: None,
        include_start: include_root,
    };
    let rows = map_tree(tree, options, |node, _| {
        (!node.is_hidden).then(|| node.id.clone())
    })?;

    Ok(rows.unwrap_or_default().into_iter().flatten().collect())
}
