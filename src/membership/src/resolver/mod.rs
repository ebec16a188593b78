//! Group membership resolver
//!
//! Models users, groups and nested group containment, and computes effective
//! membership through nesting.
//!
//! # Features
//!
//! - **Cycle Prevention**: every nesting edge is checked with a depth-first
//!   search before insertion, with the offending chain in the error
//! - **Effective Membership**: transitive closure with one discovery path per
//!   group and a direct/indirect flag
//! - **Reverse Index**: containers of each principal kept in group
//!   registration order, no rescans of the full edge set
//! - **Membership Tree**: bottom-up containment tree for display
//!
//! # Example
//!
//! ```rust
//! use adsim_membership::resolver::MembershipGraph;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = MembershipGraph::new();
//! graph.add_user("alice")?;
//! graph.add_group("Eng")?;
//! graph.add_group("AllStaff")?;
//!
//! graph.add_membership("alice", "Eng")?;
//! graph.add_membership("Eng", "AllStaff")?;
//!
//! // AllStaff cannot become a member of Eng any more
//! assert!(graph.add_membership("AllStaff", "Eng").is_err());
//!
//! let groups: Vec<String> = graph
//!     .effective_memberships("alice")?
//!     .into_iter()
//!     .map(|m| m.group)
//!     .collect();
//! assert_eq!(groups, vec!["AllStaff", "Eng"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod graph;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tests;

pub use graph::MembershipGraph;
pub use tree::MembershipTree;
pub use types::{ConfigurationView, EffectiveMembership, GraphStats, GroupDetail, PrincipalKind};
