use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use log::debug;

use crate::error::{Result, TreeError};
use crate::model::{FlatNode, FlatTree, TreeNode};

/// State inherited by a child from its already visited parent.
struct ParentLink<Id> {
    id: Id,
    level: usize,
    is_open: bool,
    is_hidden: bool,
}

struct Pending<'a, N: TreeNode> {
    node: &'a N,
    parent: Option<ParentLink<N::Id>>,
    index: usize,
}

/// Convert a nested tree into a [`FlatTree`].
///
/// Every node is visited once using an explicit work list, so very deep
/// trees do not grow the call stack. A node starts hidden when its parent
/// is closed or hidden itself; the root is never hidden.
///
/// Fails with [`TreeError::DuplicateId`] when two nodes share an id.
pub fn build_flat_tree<N: TreeNode>(root: &N) -> Result<FlatTree<N::Id>> {
    let root_id = root.id();
    let mut nodes: HashMap<N::Id, Arc<FlatNode<N::Id>>> = HashMap::new();
    let mut pending = vec![Pending {
        node: root,
        parent: None,
        index: 0,
    }];

    while let Some(Pending {
        node,
        parent,
        index,
    }) = pending.pop()
    {
        let id = node.id();
        let children = node.children();
        let is_open = node.is_open_by_default();
        let (parent, level, is_hidden) = match parent {
            Some(link) => (
                Some(link.id),
                link.level + 1,
                !link.is_open || link.is_hidden,
            ),
            None => (None, 0, false),
        };

        // Reversed so the first child is popped first.
        for (child_index, child) in children.iter().enumerate().rev() {
            pending.push(Pending {
                node: child,
                parent: Some(ParentLink {
                    id: id.clone(),
                    level,
                    is_open,
                    is_hidden,
                }),
                index: child_index,
            });
        }

        let record = FlatNode {
            id: id.clone(),
            parent,
            children: children.iter().map(N::id).collect(),
            index,
            level,
            is_leaf: children.is_empty(),
            is_open,
            is_hidden,
        };

        match nodes.entry(id) {
            Entry::Occupied(entry) => {
                return Err(TreeError::duplicate_id(entry.key()));
            },
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(record));
            },
        }
    }

    debug!("built flat tree with {} nodes", nodes.len());
    Ok(FlatTree::from_parts(nodes, Some(root_id)))
}
