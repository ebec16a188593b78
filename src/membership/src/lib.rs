//! # ADSim Membership Resolver
//!
//! Active-Directory-style users, groups and nested group membership.
//!
//! ## Features
//!
//! - **Nested groups** with cycle prevention on every insertion
//! - **Effective membership** with one discovery path per reachable group
//! - **Membership trees** for bottom-up display of containment
//! - **JSON snapshots** that re-validate on load
//!
//! ## Example
//!
//! ```rust
//! use adsim_membership::{MembershipGraph, MembershipError};
//!
//! let mut graph = MembershipGraph::new();
//! graph.add_user("alice").unwrap();
//! graph.add_group("Eng").unwrap();
//! graph.add_group("AllStaff").unwrap();
//! graph.add_membership("alice", "Eng").unwrap();
//! graph.add_membership("Eng", "AllStaff").unwrap();
//!
//! for membership in graph.effective_memberships("alice").unwrap() {
//!     println!("{} via {}", membership.group, membership.path_display());
//! }
//!
//! assert!(matches!(
//!     graph.add_membership("AllStaff", "Eng"),
//!     Err(MembershipError::Cycle(_))
//! ));
//! ```

pub mod config;
pub mod error;
pub mod resolver;
pub mod snapshot;

// Re-export commonly used types
pub use config::ResolverConfig;
pub use error::{MembershipError, Result};
pub use resolver::{
    ConfigurationView, EffectiveMembership, GraphStats, GroupDetail, MembershipGraph,
    MembershipTree, PrincipalKind,
};
pub use snapshot::{GraphSnapshot, GroupMembers};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
