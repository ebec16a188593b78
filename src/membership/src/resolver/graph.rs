//! Containment graph for users and nested groups
//!
//! The graph stores, for every group, its direct members in insertion order,
//! and keeps a reverse index (principal -> groups directly containing it)
//! ordered by group registration. Edges are validated before insertion so the
//! group-to-group part of the graph is always acyclic.

use super::types::{ConfigurationView, EffectiveMembership, GraphStats, GroupDetail, PrincipalKind};
use crate::config::ResolverConfig;
use crate::error::{MembershipError, Result};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Registered principal record
#[derive(Debug, Clone)]
struct PrincipalEntry {
    kind: PrincipalKind,

    /// Registration position, used to order the reverse index
    ordinal: usize,
}

/// Users, groups and membership edges of one session
///
/// # Example
///
/// ```
/// use adsim_membership::{MembershipGraph, PrincipalKind};
///
/// let mut graph = MembershipGraph::new();
/// graph.add_principal("alice", PrincipalKind::User).unwrap();
/// graph.add_principal("Eng", PrincipalKind::Group).unwrap();
/// graph.add_principal("AllStaff", PrincipalKind::Group).unwrap();
///
/// graph.add_membership("alice", "Eng").unwrap();
/// graph.add_membership("Eng", "AllStaff").unwrap();
///
/// let effective = graph.effective_memberships("alice").unwrap();
/// assert_eq!(effective.len(), 2);
/// assert_eq!(effective[0].group, "AllStaff");
/// assert_eq!(effective[0].path, vec!["Eng", "AllStaff"]);
/// assert!(effective[1].direct);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MembershipGraph {
    /// Name validation settings
    config: ResolverConfig,

    /// All principals by name
    principals: HashMap<String, PrincipalEntry>,

    /// Principal names in registration order
    registration: Vec<String>,

    /// Group -> direct members (insertion order)
    members: HashMap<String, Vec<String>>,

    /// Principal -> groups directly containing it (group registration order)
    containers: HashMap<String, Vec<String>>,
}

impl MembershipGraph {
    /// Create an empty graph with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with custom name validation
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Register a user or group
    ///
    /// # Errors
    ///
    /// - `EmptyName` / `NameTooLong` if the name fails validation
    /// - `DuplicateName` if the name is already taken by a user or a group
    pub fn add_principal(&mut self, name: &str, kind: PrincipalKind) -> Result<()> {
        let name = match self.validate_name(name) {
            Ok(name) => name,
            Err(e) => {
                warn!(%kind, error = %e, "Rejected principal");
                return Err(e);
            }
        };

        if self.principals.contains_key(name) {
            warn!(%kind, name, "Rejected principal: name already registered");
            return Err(MembershipError::DuplicateName(name.to_string()));
        }

        let ordinal = self.registration.len();
        self.principals
            .insert(name.to_string(), PrincipalEntry { kind, ordinal });
        self.registration.push(name.to_string());

        if kind.is_group() {
            self.members.insert(name.to_string(), Vec::new());
        }

        debug!(%kind, name, ordinal, "Registered principal");
        Ok(())
    }

    /// Register a user
    pub fn add_user(&mut self, name: &str) -> Result<()> {
        self.add_principal(name, PrincipalKind::User)
    }

    /// Register a group
    pub fn add_group(&mut self, name: &str) -> Result<()> {
        self.add_principal(name, PrincipalKind::Group)
    }

    /// Make `member` a direct member of `group`
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - `SelfMembership` if both names are equal
    /// - `UnknownPrincipal` if either name is not registered
    /// - `NotAGroup` if `group` is a user
    /// - `Cycle` if `group` is already a transitive member of `member`
    /// - `DuplicateEdge` if the edge already exists
    pub fn add_membership(&mut self, member: &str, group: &str) -> Result<()> {
        let result = self.insert_membership(member, group);
        if let Err(e) = &result {
            warn!(member, group, error = %e, "Rejected membership");
        }
        result
    }

    fn insert_membership(&mut self, member: &str, group: &str) -> Result<()> {
        let member = self.lookup_key(member);
        let group = self.lookup_key(group);

        if member == group {
            return Err(MembershipError::SelfMembership(member.to_string()));
        }

        let member_kind = self.require(member)?.kind;
        let group_entry = self.require(group)?;
        if !group_entry.kind.is_group() {
            return Err(MembershipError::NotAGroup(group.to_string()));
        }
        let group_ordinal = group_entry.ordinal;

        if member_kind.is_group() {
            if let Some(chain) = self.containment_path(group, member) {
                // chain runs member ⊇ ... ⊇ group; render it in "is member of" order
                let cycle: Vec<&str> = chain
                    .iter()
                    .rev()
                    .map(String::as_str)
                    .chain(std::iter::once(group))
                    .collect();
                return Err(MembershipError::Cycle(cycle.join(" -> ")));
            }
        }

        let direct = self.members.entry(group.to_string()).or_default();
        if direct.iter().any(|m| m == member) {
            return Err(MembershipError::DuplicateEdge {
                member: member.to_string(),
                group: group.to_string(),
            });
        }
        direct.push(member.to_string());

        let principals = &self.principals;
        let containing = self.containers.entry(member.to_string()).or_default();
        let position = containing
            .partition_point(|g| principals.get(g).map_or(0, |e| e.ordinal) < group_ordinal);
        containing.insert(position, group.to_string());

        debug!(member, group, nested = member_kind.is_group(), "Added membership");
        Ok(())
    }

    /// Whether `candidate` is a direct or transitive member of `group`
    ///
    /// Only group-to-group edges are followed below the first level, so a
    /// user is found only as a direct member of some group on the way down.
    pub fn is_descendant(&self, candidate: &str, group: &str) -> bool {
        let candidate = self.lookup_key(candidate);
        let group = self.lookup_key(group);
        self.containment_path(candidate, group).is_some()
    }

    /// Depth-first search down from `ancestor` for `descendant`
    ///
    /// Returns the chain `[ancestor, ..., descendant]` where every element
    /// directly contains the next one. Iterative, so nesting depth is bounded
    /// by memory rather than by the call stack.
    fn containment_path(&self, descendant: &str, ancestor: &str) -> Option<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::from([ancestor]);
        let mut path = vec![ancestor.to_string()];
        // (direct members of the node at the same depth in `path`, next index)
        let mut stack: Vec<(&[String], usize)> = vec![(self.members_of(ancestor), 0)];

        while let Some(frame) = stack.last_mut() {
            let (direct, index) = *frame;
            let Some(member) = direct.get(index) else {
                stack.pop();
                path.pop();
                continue;
            };
            frame.1 += 1;

            if member == descendant {
                path.push(member.clone());
                return Some(path);
            }
            if self.kind_of(member).is_some_and(PrincipalKind::is_group)
                && visited.insert(member.as_str())
            {
                path.push(member.clone());
                stack.push((self.members_of(member), 0));
            }
        }

        None
    }

    /// Every group `principal` belongs to, directly or through nesting
    ///
    /// Each group carries the path through which it was first discovered by
    /// a depth-first walk over the containing groups (stored order). Direct
    /// containers are seeded before the walk, so they always report
    /// `direct = true` with a single-element path. Paths are discovery paths,
    /// not necessarily the shortest ones. Sorted by group name.
    ///
    /// # Errors
    ///
    /// `UnknownPrincipal` if `principal` is not registered.
    pub fn effective_memberships(&self, principal: &str) -> Result<Vec<EffectiveMembership>> {
        let principal = self.lookup_key(principal);
        self.require(principal)?;

        let direct = self.containers_of(principal);
        let mut discovered: HashMap<&str, Vec<String>> = direct
            .iter()
            .map(|g| (g.as_str(), vec![g.clone()]))
            .collect();

        for group in direct {
            let mut path = vec![group.clone()];
            // (containers of the node at the same depth in `path`, next index)
            let mut stack: Vec<(&[String], usize)> = vec![(self.containers_of(group), 0)];

            while let Some(frame) = stack.last_mut() {
                let (containing, index) = *frame;
                let Some(container) = containing.get(index) else {
                    stack.pop();
                    path.pop();
                    continue;
                };
                frame.1 += 1;

                if discovered.contains_key(container.as_str()) {
                    continue;
                }
                path.push(container.clone());
                discovered.insert(container.as_str(), path.clone());
                stack.push((self.containers_of(container), 0));
            }
        }

        let mut result: Vec<EffectiveMembership> = discovered
            .into_iter()
            .map(|(group, path)| EffectiveMembership {
                group: group.to_string(),
                direct: path.len() == 1,
                path,
            })
            .collect();
        result.sort_by(|a, b| a.group.cmp(&b.group));

        debug!(
            principal,
            groups = result.len(),
            direct = result.iter().filter(|m| m.direct).count(),
            "Resolved effective memberships"
        );
        Ok(result)
    }

    /// Groups directly containing `group`, skipping names in `exclude_path`
    ///
    /// Used to expand one level of a bottom-up containment tree; the caller
    /// passes the ancestors already shown on the current branch.
    pub fn descendants_of<S: AsRef<str>>(
        &self,
        group: &str,
        exclude_path: &[S],
    ) -> Result<Vec<String>> {
        let group = self.lookup_key(group);
        self.require(group)?;

        Ok(self
            .containers_of(group)
            .iter()
            .filter(|c| !exclude_path.iter().any(|e| e.as_ref() == c.as_str()))
            .cloned()
            .collect())
    }

    /// Groups directly containing `principal`, in group registration order
    pub fn direct_groups_of(&self, principal: &str) -> Result<&[String]> {
        let principal = self.lookup_key(principal);
        self.require(principal)?;
        Ok(self.containers_of(principal))
    }

    /// Direct members of `group`, in insertion order
    pub fn direct_members(&self, group: &str) -> Result<&[String]> {
        let group = self.lookup_key(group);
        if !self.require(group)?.kind.is_group() {
            return Err(MembershipError::NotAGroup(group.to_string()));
        }
        Ok(self.members_of(group))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.principals.contains_key(self.lookup_key(name))
    }

    pub fn kind_of(&self, name: &str) -> Option<PrincipalKind> {
        self.principals.get(self.lookup_key(name)).map(|e| e.kind)
    }

    /// Registered users in registration order
    pub fn users(&self) -> Vec<&str> {
        self.names_of_kind(PrincipalKind::User)
    }

    /// Registered groups in registration order
    pub fn groups(&self) -> Vec<&str> {
        self.names_of_kind(PrincipalKind::Group)
    }

    fn names_of_kind(&self, kind: PrincipalKind) -> Vec<&str> {
        self.registration
            .iter()
            .filter(|name| self.principals.get(name.as_str()).map(|e| e.kind) == Some(kind))
            .map(String::as_str)
            .collect()
    }

    /// Users and groups with their direct members split by kind
    pub fn configuration(&self) -> ConfigurationView {
        let users = self.users().into_iter().map(str::to_string).collect();

        let groups = self
            .groups()
            .into_iter()
            .map(|group| {
                let (group_members, user_members): (Vec<String>, Vec<String>) = self
                    .members
                    .get(group)
                    .into_iter()
                    .flatten()
                    .cloned()
                    .partition(|m| self.kind_of(m).is_some_and(PrincipalKind::is_group));

                GroupDetail {
                    name: group.to_string(),
                    user_members,
                    group_members,
                }
            })
            .collect();

        ConfigurationView { users, groups }
    }

    pub fn stats(&self) -> GraphStats {
        let users = self.users().len();
        let groups = self.registration.len() - users;
        let mut edges = 0;
        let mut nested_edges = 0;

        for direct in self.members.values() {
            edges += direct.len();
            nested_edges += direct
                .iter()
                .filter(|m| self.kind_of(m).is_some_and(PrincipalKind::is_group))
                .count();
        }

        GraphStats {
            users,
            groups,
            edges,
            nested_edges,
        }
    }

    /// Number of registered principals
    pub fn len(&self) -> usize {
        self.registration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registration.is_empty()
    }

    /// Remove all principals and memberships, keeping the configuration
    pub fn clear(&mut self) {
        let stats = self.stats();
        self.principals.clear();
        self.registration.clear();
        self.members.clear();
        self.containers.clear();

        info!(
            users = stats.users,
            groups = stats.groups,
            edges = stats.edges,
            "Cleared membership graph"
        );
    }

    fn members_of(&self, group: &str) -> &[String] {
        self.members.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn containers_of(&self, name: &str) -> &[String] {
        self.containers.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Normalized name and kind of a registered principal
    pub(crate) fn resolve<'a>(&self, name: &'a str) -> Result<(&'a str, PrincipalKind)> {
        let name = self.lookup_key(name);
        Ok((name, self.require(name)?.kind))
    }

    fn require(&self, name: &str) -> Result<&PrincipalEntry> {
        self.principals
            .get(name)
            .ok_or_else(|| MembershipError::UnknownPrincipal(name.to_string()))
    }

    pub(crate) fn lookup_key<'a>(&self, name: &'a str) -> &'a str {
        if self.config.trim_names {
            name.trim()
        } else {
            name
        }
    }

    fn validate_name<'a>(&self, name: &'a str) -> Result<&'a str> {
        let name = self.lookup_key(name);

        if name.is_empty() {
            return Err(MembershipError::EmptyName);
        }

        if let Some(max) = self.config.max_name_len {
            if name.chars().count() > max {
                return Err(MembershipError::NameTooLong {
                    name: name.to_string(),
                    max,
                });
            }
        }

        Ok(name)
    }
}
