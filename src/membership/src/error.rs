//! Error types for the membership resolver

use thiserror::Error;

/// Membership resolver errors
///
/// Every variant is a rejected caller action. A failed operation never
/// leaves the graph partially modified.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Name already registered as a user or a group
    #[error("Duplicate principal name: {0}")]
    DuplicateName(String),

    /// Name is not registered
    #[error("Unknown principal: {0}")]
    UnknownPrincipal(String),

    /// A principal cannot be a member of itself
    #[error("Principal '{0}' cannot be a member of itself")]
    SelfMembership(String),

    /// Adding the edge would close a containment cycle
    #[error("Circular group membership: {0}")]
    Cycle(String),

    /// Member is already a direct member of the group
    #[error("'{member}' is already a direct member of '{group}'")]
    DuplicateEdge { member: String, group: String },

    /// Name is empty (after trimming, when trimming is enabled)
    #[error("Principal name cannot be empty")]
    EmptyName,

    /// Name exceeds the configured maximum length
    #[error("Principal name '{name}' exceeds {max} characters")]
    NameTooLong { name: String, max: usize },

    /// Container of a membership edge is a user, not a group
    #[error("'{0}' is a user and cannot contain members")]
    NotAGroup(String),

    /// Snapshot document could not be parsed or written
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for membership operations
pub type Result<T> = std::result::Result<T, MembershipError>;
