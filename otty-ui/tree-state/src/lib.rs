//! Tree state helpers for collapsible tree widgets.
//!
//! This crate keeps the UI-agnostic state of a tree view: which nodes are
//! open, which are hidden behind a collapsed ancestor and which one is
//! active under keyboard navigation. It is split into small layers:
//! - [`build_flat_tree`] turns a nested [`TreeNode`] into an id-indexed
//!   [`FlatTree`] snapshot;
//! - [`map_tree`] walks a snapshot in preorder and [`visible_ids`] lists
//!   the rows a renderer shows;
//! - [`toggle_tree_node`] opens or closes a node and returns a new
//!   snapshot;
//! - [`next_active_node`] maps a [`NavigationCommand`] to the next active
//!   node and requests toggles through a callback;
//! - [`TreeState`] ties the above together for widgets.
//!
//! Snapshots are immutable. Every change produces a new [`FlatTree`], so a
//! widget can compare handles with [`FlatTree::ptr_eq`] to skip redraws.
//!
//! # Quick Example
//!
//! ```
//! use otty_ui_tree_state::{
//!     NavigationCommand, NavigatorOptions, NestedNode, TreeState,
//! };
//!
//! let root = NestedNode::new("settings").opened().with_children(vec![
//!     NestedNode::new("general").with_children(vec![
//!         NestedNode::new("theme"),
//!         NestedNode::new("fonts"),
//!     ]),
//!     NestedNode::new("terminal"),
//! ]);
//!
//! let mut state = TreeState::from_root(&root, NavigatorOptions::default())?;
//! assert_eq!(state.active(), Some(&"general"));
//!
//! // expand in place, then step into the first child
//! state.handle(NavigationCommand::Right)?;
//! state.handle(NavigationCommand::Right)?;
//! assert_eq!(state.active(), Some(&"theme"));
//! assert_eq!(
//!     state.visible_ids()?,
//!     vec!["general", "theme", "fonts", "terminal"]
//! );
//! # Ok::<(), otty_ui_tree_state::TreeError>(())
//! ```

mod builder;
mod error;
mod model;
mod navigator;
mod state;
mod toggler;
mod walker;

pub use builder::build_flat_tree;
pub use error::{Result, TreeError};
pub use model::{FlatNode, FlatTree, Iter, NestedNode, NodeId, TreeNode};
pub use navigator::{NavigationCommand, NavigatorOptions, next_active_node};
pub use state::TreeState;
pub use toggler::toggle_tree_node;
pub use walker::{WalkOptions, map_tree, visible_ids};
