//! Keyboard navigation over a [`FlatTree`].
//!
//! Implements the usual accessible tree interaction: vertical arrows move
//! through visible rows, horizontal arrows expand/collapse or move between
//! parent and child, and Enter toggles the active branch. The navigator
//! never changes the tree itself. Expanding and collapsing are requested
//! through a callback, and the caller decides how to apply them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::model::{FlatNode, FlatTree, NodeId};

/// Navigation command produced by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationCommand {
    /// Previous visible row.
    Up,
    /// Next visible row.
    Down,
    /// Expand a closed branch or enter an open one.
    Right,
    /// Collapse an open branch or move to the parent.
    Left,
    /// Toggle the active branch.
    Activate,
}

impl NavigationCommand {
    /// Map a key name to a command.
    ///
    /// Both DOM style (`ArrowUp`) and short (`Up`) names are accepted.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "Up" => Some(Self::Up),
            "ArrowDown" | "Down" => Some(Self::Down),
            "ArrowRight" | "Right" => Some(Self::Right),
            "ArrowLeft" | "Left" => Some(Self::Left),
            "Enter" => Some(Self::Activate),
            _ => None,
        }
    }
}

impl FromStr for NavigationCommand {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key(s)
            .ok_or_else(|| TreeError::UnknownCommand(s.to_owned()))
    }
}

impl fmt::Display for NavigationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Right => "right",
            Self::Left => "left",
            Self::Activate => "activate",
        };
        write!(f, "{s}")
    }
}

/// Knobs that change how the navigator treats the tree root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorOptions {
    /// The root is not rendered as a row and can not become active.
    pub exclude_root: bool,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self { exclude_root: true }
    }
}

/// Compute the node that becomes active after `command`.
///
/// For expand, collapse and activate the navigator calls
/// `request_toggle` with the node to toggle and keeps `active` in place.
/// An `active` id missing from the tree is logged and returned as is.
///
/// Fails with [`TreeError::CycleDetected`] when walking the ancestors or
/// the last descendants revisits a node, and with
/// [`TreeError::NodeNotFound`] on dangling links.
pub fn next_active_node<Id, F>(
    tree: &FlatTree<Id>,
    active: &Id,
    command: NavigationCommand,
    options: NavigatorOptions,
    mut request_toggle: F,
) -> Result<Id>
where
    Id: NodeId,
    F: FnMut(&Id),
{
    let Some(node) = tree.get(active) else {
        warn!("active node {active:?} is not in the tree");
        return Ok(active.clone());
    };

    let next = match command {
        NavigationCommand::Down => next_row(tree, node)?,
        NavigationCommand::Up => previous_row(tree, node, options)?,
        NavigationCommand::Right => {
            if node.is_leaf {
                node.id.clone()
            } else if node.is_open {
                first_child(node)
            } else {
                request_toggle(&node.id);
                node.id.clone()
            }
        },
        NavigationCommand::Left => {
            if node.is_expanded() {
                request_toggle(&node.id);
                node.id.clone()
            } else {
                parent_row(tree, node, options)?
            }
        },
        NavigationCommand::Activate => {
            if !node.is_leaf {
                request_toggle(&node.id);
            }
            node.id.clone()
        },
    };

    trace!("{command}: {active:?} -> {next:?}");
    Ok(next)
}

fn lookup<'a, Id: NodeId>(
    tree: &'a FlatTree<Id>,
    id: &Id,
) -> Result<&'a FlatNode<Id>> {
    tree.get(id).ok_or_else(|| TreeError::node_not_found(id))
}

fn first_child<Id: NodeId>(node: &FlatNode<Id>) -> Id {
    node.children.first().unwrap_or(&node.id).clone()
}

fn next_row<Id: NodeId>(
    tree: &FlatTree<Id>,
    node: &FlatNode<Id>,
) -> Result<Id> {
    if node.is_expanded() {
        return Ok(first_child(node));
    }

    // Climb until some ancestor has a next sibling.
    let mut visited = HashSet::new();
    let mut current = node;
    while let Some(parent_id) = current.parent.as_ref() {
        if !visited.insert(&current.id) {
            return Err(TreeError::cycle_detected(&current.id));
        }

        let parent = lookup(tree, parent_id)?;
        if let Some(sibling) = parent.children.get(current.index + 1) {
            return Ok(sibling.clone());
        }
        current = parent;
    }

    Ok(node.id.clone())
}

fn previous_row<Id: NodeId>(
    tree: &FlatTree<Id>,
    node: &FlatNode<Id>,
    options: NavigatorOptions,
) -> Result<Id> {
    let Some(parent_id) = node.parent.as_ref() else {
        return Ok(node.id.clone());
    };
    let parent = lookup(tree, parent_id)?;

    if node.index == 0 {
        if options.exclude_root && parent.is_root() {
            return Ok(node.id.clone());
        }
        return Ok(parent.id.clone());
    }

    let sibling = parent
        .children
        .get(node.index - 1)
        .ok_or_else(|| TreeError::node_not_found(&node.id))?;
    last_visible_descendant(tree, lookup(tree, sibling)?)
}

fn last_visible_descendant<Id: NodeId>(
    tree: &FlatTree<Id>,
    node: &FlatNode<Id>,
) -> Result<Id> {
    let mut visited = HashSet::new();
    let mut current = node;
    while current.is_expanded() {
        if !visited.insert(&current.id) {
            return Err(TreeError::cycle_detected(&current.id));
        }
        let Some(last) = current.children.last() else {
            break;
        };
        current = lookup(tree, last)?;
    }

    Ok(current.id.clone())
}

fn parent_row<Id: NodeId>(
    tree: &FlatTree<Id>,
    node: &FlatNode<Id>,
    options: NavigatorOptions,
) -> Result<Id> {
    let Some(parent_id) = node.parent.as_ref() else {
        return Ok(node.id.clone());
    };
    let parent = lookup(tree, parent_id)?;

    if options.exclude_root && parent.is_root() {
        Ok(node.id.clone())
    } else {
        Ok(parent.id.clone())
    }
}
