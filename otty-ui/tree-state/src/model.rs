use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TreeError};

/// Bounds every node identifier has to satisfy.
pub trait NodeId: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> NodeId for T {}

/// Trait implemented by nested tree nodes consumable by this crate.
///
/// The nested form is only read once, when the flat tree is built with
/// [`build_flat_tree`](crate::build_flat_tree).
pub trait TreeNode {
    /// Identifier type shared by every node of the tree.
    type Id: NodeId;

    /// Identifier, unique across the whole tree.
    fn id(&self) -> Self::Id;
    /// Whether the node starts open.
    fn is_open_by_default(&self) -> bool {
        false
    }
    /// Ordered children of the node.
    fn children(&self) -> &[Self]
    where
        Self: Sized;
}

/// Owned nested node, convenient for trees loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedNode<Id> {
    /// Identifier, unique across the whole tree.
    pub id: Id,
    /// Whether the node starts open.
    #[serde(default, alias = "isOpenByDefault")]
    pub is_open_by_default: bool,
    /// Ordered children, empty for a leaf.
    #[serde(default)]
    pub children: Vec<NestedNode<Id>>,
}

impl<Id> NestedNode<Id> {
    /// Create a closed node without children.
    pub fn new(id: Id) -> Self {
        Self {
            id,
            is_open_by_default: false,
            children: Vec::new(),
        }
    }

    /// Mark the node as open by default.
    pub fn opened(mut self) -> Self {
        self.is_open_by_default = true;
        self
    }

    /// Replace the node children.
    pub fn with_children(mut self, children: Vec<NestedNode<Id>>) -> Self {
        self.children = children;
        self
    }
}

impl<Id: NodeId> TreeNode for NestedNode<Id> {
    type Id = Id;

    fn id(&self) -> Id {
        self.id.clone()
    }

    fn is_open_by_default(&self) -> bool {
        self.is_open_by_default
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Per-node state of a flat tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatNode<Id> {
    /// Identifier, also the key of the record in its tree.
    pub id: Id,
    /// Parent id, `None` only for the root.
    pub parent: Option<Id>,
    /// Child ids in sibling order.
    pub children: Vec<Id>,
    /// Position among siblings.
    pub index: usize,
    /// Depth from the root (`0` for the root).
    pub level: usize,
    /// Whether the node has no children.
    pub is_leaf: bool,
    /// Stored for leaves too, even though it has no effect there.
    pub is_open: bool,
    /// Whether some ancestor is closed.
    pub is_hidden: bool,
}

impl<Id> FlatNode<Id> {
    /// Whether the node discloses its children.
    pub fn is_expanded(&self) -> bool {
        !self.is_leaf && self.is_open
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Immutable id-indexed snapshot of a tree.
///
/// Cloning is cheap: the map and its records are shared. Operations that
/// change the state return a new snapshot and never touch the original,
/// so [`FlatTree::ptr_eq`] can be used to detect changes.
#[derive(Debug, Clone)]
pub struct FlatTree<Id: NodeId> {
    nodes: Arc<HashMap<Id, Arc<FlatNode<Id>>>>,
    root: Option<Id>,
}

impl<Id: NodeId> FlatTree<Id> {
    pub(crate) fn from_parts(
        nodes: HashMap<Id, Arc<FlatNode<Id>>>,
        root: Option<Id>,
    ) -> Self {
        Self {
            nodes: Arc::new(nodes),
            root,
        }
    }

    pub(crate) fn shared_nodes(&self) -> &HashMap<Id, Arc<FlatNode<Id>>> {
        &self.nodes
    }

    /// Assemble a tree from records produced elsewhere.
    ///
    /// Exactly one record of a non-empty set must lack a parent. Other
    /// links and orderings are taken as is; the walker and navigator
    /// report corrupted links when they reach them.
    ///
    /// Fails with [`TreeError::MultipleRoots`] when several records have
    /// no parent, with [`TreeError::RootNotFound`] when none has and with
    /// [`TreeError::DuplicateId`] when two records share an id.
    pub fn from_records(
        records: impl IntoIterator<Item = FlatNode<Id>>,
    ) -> Result<Self> {
        let mut root: Option<Id> = None;
        let mut nodes: HashMap<Id, Arc<FlatNode<Id>>> = HashMap::new();

        for node in records {
            if node.parent.is_none() {
                if let Some(first) = root.as_ref() {
                    return Err(TreeError::multiple_roots(first, &node.id));
                }
                root = Some(node.id.clone());
            }
            match nodes.entry(node.id.clone()) {
                hash_map::Entry::Occupied(entry) => {
                    return Err(TreeError::duplicate_id(entry.key()));
                },
                hash_map::Entry::Vacant(entry) => {
                    entry.insert(Arc::new(node));
                },
            }
        }

        if root.is_none() && !nodes.is_empty() {
            return Err(TreeError::RootNotFound {
                id: String::from("<none>"),
            });
        }

        Ok(Self::from_parts(nodes, root))
    }

    /// An empty tree.
    pub fn empty() -> Self {
        Self::from_parts(HashMap::new(), None)
    }

    /// Id of the only record without a parent.
    pub fn root_id(&self) -> Option<&Id> {
        self.root.as_ref()
    }

    /// Record of the root node.
    pub fn root(&self) -> Option<&FlatNode<Id>> {
        self.root.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &Id) -> Option<&FlatNode<Id>> {
        self.nodes.get(id).map(Arc::as_ref)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over records in arbitrary order.
    pub fn iter(&self) -> Iter<'_, Id> {
        Iter {
            inner: self.nodes.iter(),
        }
    }

    /// Whether both handles point to the same snapshot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }
}

impl<Id: NodeId> Default for FlatTree<Id> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Id: NodeId> PartialEq for FlatTree<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.root == other.root && self.nodes == other.nodes)
    }
}

impl<Id: NodeId> Eq for FlatTree<Id> {}

/// Iterator over the records of a [`FlatTree`].
pub struct Iter<'a, Id> {
    inner: hash_map::Iter<'a, Id, Arc<FlatNode<Id>>>,
}

impl<'a, Id> Iterator for Iter<'a, Id> {
    type Item = &'a FlatNode<Id>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, node)| node.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, Id: NodeId> IntoIterator for &'a FlatTree<Id> {
    type Item = &'a FlatNode<Id>;
    type IntoIter = Iter<'a, Id>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<Id: NodeId + Serialize> Serialize for FlatTree<Id> {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.nodes.iter().map(|(id, node)| (id, node.as_ref())),
        )
    }
}

impl<'de, Id> Deserialize<'de> for FlatTree<Id>
where
    Id: NodeId + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let nodes = HashMap::<Id, FlatNode<Id>>::deserialize(deserializer)?;
        let mismatch = nodes.iter().find(|(key, node)| **key != node.id);
        if let Some((key, node)) = mismatch {
            let err = TreeError::key_mismatch(key, &node.id);
            return Err(D::Error::custom(err));
        }
        Self::from_records(nodes.into_values()).map_err(D::Error::custom)
    }
}
