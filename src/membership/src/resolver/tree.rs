//! Bottom-up containment tree
//!
//! The root is the queried principal; the children of every node are the
//! groups that directly contain it. A group already shown on the current
//! branch is not expanded again.

use super::graph::MembershipGraph;
use super::types::PrincipalKind;
use crate::error::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// One node of a membership tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipTree {
    pub name: String,
    pub kind: PrincipalKind,
    pub children: Vec<MembershipTree>,
}

impl MembershipTree {
    fn new(name: String, kind: PrincipalKind) -> Self {
        Self {
            name,
            kind,
            children: Vec::new(),
        }
    }

    /// Total number of nodes, root included
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(&node.children);
        }
        count
    }

    /// Longest root-to-leaf edge count
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.children.iter().map(|c| (c, level + 1)));
        }
        deepest
    }
}

impl fmt::Display for MembershipTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![(self, 0)];
        while let Some((node, level)) = pending.pop() {
            writeln!(f, "{:indent$}{} ({})", "", node.name, node.kind, indent = level * 2)?;
            pending.extend(node.children.iter().rev().map(|c| (c, level + 1)));
        }
        Ok(())
    }
}

// Flatten before dropping; the derived drop recurses once per level.
impl Drop for MembershipTree {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Group node under construction
struct TreeFrame<'a> {
    node: MembershipTree,
    parents: Vec<&'a String>,
    next: usize,
}

impl MembershipGraph {
    /// Build the containment tree above `principal`
    ///
    /// Diamond-shaped nesting shows up once per branch.
    ///
    /// # Performance
    ///
    /// The tree is not deduplicated, so its size is the number of distinct
    /// upward paths from `principal`. Layered hierarchies where every group
    /// belongs to every group of the next layer grow as `width^layers`; use
    /// `effective_memberships` when only the set of groups is needed.
    pub fn membership_tree(&self, principal: &str) -> Result<MembershipTree> {
        let (name, kind) = self.resolve(principal)?;
        let mut root = MembershipTree::new(name.to_string(), kind);

        for group in self.containers_of(name) {
            // names on the current branch, root included
            let mut on_path: HashSet<&str> = HashSet::from([name, group.as_str()]);
            let mut stack = vec![self.tree_frame(group, &on_path)];

            while let Some(frame) = stack.last_mut() {
                if let Some(&parent) = frame.parents.get(frame.next) {
                    frame.next += 1;
                    on_path.insert(parent.as_str());
                    let next = self.tree_frame(parent, &on_path);
                    stack.push(next);
                    continue;
                }

                if let Some(done) = stack.pop() {
                    on_path.remove(done.node.name.as_str());
                    match stack.last_mut() {
                        Some(up) => up.node.children.push(done.node),
                        None => root.children.push(done.node),
                    }
                }
            }
        }

        Ok(root)
    }

    fn tree_frame<'a>(&'a self, group: &'a String, on_path: &HashSet<&str>) -> TreeFrame<'a> {
        let parents = self
            .containers_of(group)
            .iter()
            .filter(|c| !on_path.contains(c.as_str()))
            .collect();

        TreeFrame {
            node: MembershipTree::new(group.clone(), PrincipalKind::Group),
            parents,
            next: 0,
        }
    }
}
