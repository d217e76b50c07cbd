use log::{debug, warn};

use crate::builder::build_flat_tree;
use crate::error::{Result, TreeError};
use crate::model::{FlatTree, NodeId, TreeNode};
use crate::navigator::{NavigationCommand, NavigatorOptions, next_active_node};
use crate::toggler::toggle_tree_node;
use crate::walker::visible_ids;

/// Current tree snapshot together with the active node.
///
/// This is the glue a widget keeps in its state: key presses go through
/// [`TreeState::handle`], which asks the navigator where to move and
/// applies the toggles it requests. A toggle request flips the node, so
/// Enter opens a closed branch and closes an open one.
#[derive(Debug, Clone)]
pub struct TreeState<Id: NodeId> {
    tree: FlatTree<Id>,
    active: Option<Id>,
    options: NavigatorOptions,
}

impl<Id: NodeId> TreeState<Id> {
    /// Wrap an existing snapshot.
    ///
    /// The first visible row becomes active. Nothing is active when no row
    /// is shown, e.g. below a closed root that is excluded.
    pub fn new(tree: FlatTree<Id>, options: NavigatorOptions) -> Self {
        let active = first_row(&tree, options);

        Self {
            tree,
            active,
            options,
        }
    }

    /// Build the snapshot from a nested tree.
    pub fn from_root<N>(root: &N, options: NavigatorOptions) -> Result<Self>
    where
        N: TreeNode<Id = Id>,
    {
        Ok(Self::new(build_flat_tree(root)?, options))
    }

    /// Current snapshot.
    pub fn tree(&self) -> &FlatTree<Id> {
        &self.tree
    }

    /// Active node, `None` while no row is shown.
    pub fn active(&self) -> Option<&Id> {
        self.active.as_ref()
    }

    /// Options passed to the navigator.
    pub fn options(&self) -> NavigatorOptions {
        self.options
    }

    /// Move focus to a rendered row.
    ///
    /// Fails with [`TreeError::NodeNotFound`] for an unknown id and with
    /// [`TreeError::NotVisible`] for a hidden node or an excluded root.
    pub fn set_active(&mut self, id: Id) -> Result<()> {
        if !self.tree.contains(&id) {
            return Err(TreeError::node_not_found(&id));
        }
        if !self.is_row(&id) {
            return Err(TreeError::not_visible(&id));
        }
        self.active = Some(id);
        Ok(())
    }

    /// Open or close a node. Returns `true` when the snapshot changed.
    ///
    /// When this change hides the active row, focus moves to its nearest
    /// visible ancestor; it stays put when that ancestor is an excluded
    /// root. With nothing active, the first row shown becomes active.
    pub fn set_open(&mut self, id: &Id, is_open: bool) -> Result<bool> {
        let was_shown =
            self.active.as_ref().is_some_and(|active| self.is_row(active));

        let next = toggle_tree_node(&self.tree, id, is_open)?;
        if next.ptr_eq(&self.tree) {
            return Ok(false);
        }
        self.tree = next;

        if was_shown {
            self.reveal_active();
        } else if self.active.is_none() {
            self.active = first_row(&self.tree, self.options);
        }
        Ok(true)
    }

    /// Flip the open state of a node.
    pub fn toggle(&mut self, id: &Id) -> Result<bool> {
        let is_open = self
            .tree
            .get(id)
            .map(|node| node.is_open)
            .ok_or_else(|| TreeError::node_not_found(id))?;
        self.set_open(id, !is_open)
    }

    /// Apply a navigation command.
    ///
    /// Returns `true` when the active node or the snapshot changed.
    pub fn handle(&mut self, command: NavigationCommand) -> Result<bool> {
        let Some(active) = self.active.clone() else {
            debug!("no active node, ignoring {command}");
            return Ok(false);
        };
        if !self.is_row(&active) {
            debug!("active node {active:?} is hidden, ignoring {command}");
            return Ok(false);
        }

        let mut requested = Vec::new();
        let next = next_active_node(
            &self.tree,
            &active,
            command,
            self.options,
            |id| requested.push(id.clone()),
        )?;

        let mut changed = next != active;
        if changed {
            debug!("active node {active:?} -> {next:?}");
        }
        self.active = Some(next);

        for id in &requested {
            changed |= self.toggle(id)?;
        }

        Ok(changed)
    }

    /// Ids of the rendered rows in display order.
    pub fn visible_ids(&self) -> Result<Vec<Id>> {
        visible_ids(&self.tree, !self.options.exclude_root)
    }

    fn is_row(&self, id: &Id) -> bool {
        self.tree.get(id).is_some_and(|node| {
            !node.is_hidden && !(self.options.exclude_root && node.is_root())
        })
    }

    fn reveal_active(&mut self) {
        let Some(mut current) =
            self.active.as_ref().and_then(|id| self.tree.get(id))
        else {
            return;
        };

        // Bounded by the tree size so corrupted parent links can not spin.
        for _ in 0..self.tree.len() {
            if !current.is_hidden {
                break;
            }
            match current.parent.as_ref().and_then(|id| self.tree.get(id)) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        let excluded = self.options.exclude_root && current.is_root();
        if current.is_hidden || excluded {
            return;
        }
        if self.active.as_ref() != Some(&current.id) {
            debug!("active node hidden, moving to {:?}", current.id);
            self.active = Some(current.id.clone());
        }
    }
}

fn first_row<Id: NodeId>(
    tree: &FlatTree<Id>,
    options: NavigatorOptions,
) -> Option<Id> {
    match visible_ids(tree, !options.exclude_root) {
        Ok(rows) => rows.into_iter().next(),
        Err(err) => {
            warn!("can not list tree rows: {err}");
            None
        },
    }
}
