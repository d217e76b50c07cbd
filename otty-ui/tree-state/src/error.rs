use thiserror::Error;

/// Errors produced while building, walking or navigating a flat tree.
///
/// Node ids are carried in their `Debug` form so the error stays
/// independent of the id type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("duplicate node id {id}")]
    DuplicateId { id: String },

    #[error("root node {id} not found")]
    RootNotFound { id: String },

    #[error("node {id} not found")]
    NodeNotFound { id: String },

    #[error("cycle detected at node {id}")]
    CycleDetected { id: String },

    #[error("more than one root: {first} and {second}")]
    MultipleRoots { first: String, second: String },

    #[error("record {id} stored under key {key}")]
    KeyMismatch { key: String, id: String },

    #[error("node {id} is not a visible row")]
    NotVisible { id: String },

    #[error("unknown navigation command: {0}")]
    UnknownCommand(String),
}

impl TreeError {
    pub(crate) fn duplicate_id(id: &impl std::fmt::Debug) -> Self {
        Self::DuplicateId { id: format!("{id:?}") }
    }

    pub(crate) fn root_not_found(id: &impl std::fmt::Debug) -> Self {
        Self::RootNotFound { id: format!("{id:?}") }
    }

    pub(crate) fn node_not_found(id: &impl std::fmt::Debug) -> Self {
        Self::NodeNotFound { id: format!("{id:?}") }
    }

    pub(crate) fn cycle_detected(id: &impl std::fmt::Debug) -> Self {
        Self::CycleDetected { id: format!("{id:?}") }
    }

    pub(crate) fn multiple_roots(
        first: &impl std::fmt::Debug,
        second: &impl std::fmt::Debug,
    ) -> Self {
        Self::MultipleRoots {
            first: format!("{first:?}"),
            second: format!("{second:?}"),
        }
    }

    pub(crate) fn key_mismatch(
        key: &impl std::fmt::Debug,
        id: &impl std::fmt::Debug,
    ) -> Self {
        Self::KeyMismatch {
            key: format!("{key:?}"),
            id: format!("{id:?}"),
        }
    }

    pub(crate) fn not_visible(id: &impl std::fmt::Debug) -> Self {
        Self::NotVisible { id: format!("{id:?}") }
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
