//! Membership type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a registered principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Group,
}

impl PrincipalKind {
    pub fn is_group(self) -> bool {
        matches!(self, Self::Group)
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// One group a principal effectively belongs to
///
/// `path` runs from the direct container of the queried principal to
/// `group` itself, so a direct membership has `path == [group]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveMembership {
    /// Group name
    pub group: String,

    /// Discovered containment path ending at `group`
    pub path: Vec<String>,

    /// Whether `group` directly contains the queried principal
    pub direct: bool,
}

impl EffectiveMembership {
    /// Render the path as `a → b → c`
    pub fn path_display(&self) -> String {
        self.path.join(" → ")
    }
}

/// Graph size counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Registered users
    pub users: usize,
    /// Registered groups
    pub groups: usize,
    /// All membership edges
    pub edges: usize,
    /// Edges whose member is itself a group
    pub nested_edges: usize,
}

/// Direct members of one group, split by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDetail {
    pub name: String,
    pub user_members: Vec<String>,
    pub group_members: Vec<String>,
}

impl GroupDetail {
    pub fn member_count(&self) -> usize {
        self.user_members.len() + self.group_members.len()
    }
}

/// Listing of the whole configuration in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigurationView {
    pub users: Vec<String>,
    pub groups: Vec<GroupDetail>,
}

impl ConfigurationView {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}
