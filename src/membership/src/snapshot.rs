//! JSON snapshots of a membership graph
//!
//! Import replays every entry through the validating graph operations, so a
//! hand-edited document that introduces a cycle or a duplicate is rejected
//! with the regular error.

use crate::config::ResolverConfig;
use crate::error::Result;
use crate::resolver::MembershipGraph;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Direct members of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembers {
    pub group: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Serializable form of a `MembershipGraph`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Users in registration order
    #[serde(default)]
    pub users: Vec<String>,

    /// Groups in registration order
    #[serde(default)]
    pub groups: Vec<String>,

    /// Direct members per group, members in insertion order
    #[serde(default)]
    pub memberships: Vec<GroupMembers>,
}

impl GraphSnapshot {
    /// Parse a snapshot document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl MembershipGraph {
    /// Export users, groups and memberships
    ///
    /// Groups without members are listed in `groups` only.
    pub fn snapshot(&self) -> GraphSnapshot {
        let users = self.users().into_iter().map(str::to_string).collect();
        let groups: Vec<String> = self.groups().into_iter().map(str::to_string).collect();

        let memberships = groups
            .iter()
            .filter_map(|group| {
                let members = self.direct_members(group).ok()?;
                (!members.is_empty()).then(|| GroupMembers {
                    group: group.clone(),
                    members: members.to_vec(),
                })
            })
            .collect();

        GraphSnapshot {
            users,
            groups,
            memberships,
        }
    }

    /// Rebuild a graph from a snapshot
    ///
    /// Users are registered first, then groups, then each group's members in
    /// document order.
    pub fn from_snapshot(snapshot: &GraphSnapshot, config: ResolverConfig) -> Result<Self> {
        let mut graph = Self::with_config(config);

        for user in &snapshot.users {
            graph.add_user(user)?;
        }
        for group in &snapshot.groups {
            graph.add_group(group)?;
        }
        for entry in &snapshot.memberships {
            for member in &entry.members {
                graph.add_membership(member, &entry.group)?;
            }
        }

        let stats = graph.stats();
        info!(
            users = stats.users,
            groups = stats.groups,
            edges = stats.edges,
            "Loaded membership snapshot"
        );
        Ok(graph)
    }

    /// Parse and load a JSON snapshot
    pub fn from_json(json: &str, config: ResolverConfig) -> Result<Self> {
        let snapshot = GraphSnapshot::from_json(json)?;
        Self::from_snapshot(&snapshot, config)
    }

    /// Export as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        self.snapshot().to_json()
    }
}
