//! Scenario tests for membership resolution
//!
//! Covers effective membership paths, discovery order, nesting chains and
//! the guarantee that rejected operations leave the graph untouched.

use super::graph::MembershipGraph;
use super::types::{EffectiveMembership, PrincipalKind};
use crate::error::MembershipError;

fn membership(group: &str, path: &[&str]) -> EffectiveMembership {
    EffectiveMembership {
        group: group.to_string(),
        path: path.iter().map(|s| s.to_string()).collect(),
        direct: path.len() == 1,
    }
}

fn build(users: &[&str], groups: &[&str], edges: &[(&str, &str)]) -> MembershipGraph {
    let mut graph = MembershipGraph::new();
    for user in users {
        graph.add_principal(user, PrincipalKind::User).unwrap();
    }
    for group in groups {
        graph.add_principal(group, PrincipalKind::Group).unwrap();
    }
    for (member, group) in edges {
        graph.add_membership(member, group).unwrap();
    }
    graph
}

// ============================================================================
// Effective Membership Tests
// ============================================================================

#[test]
fn test_alice_engineering_scenario() {
    let graph = build(
        &["alice"],
        &["Eng", "AllStaff"],
        &[("alice", "Eng"), ("Eng", "AllStaff")],
    );

    let effective = graph.effective_memberships("alice").unwrap();
    assert_eq!(
        effective,
        vec![
            membership("AllStaff", &["Eng", "AllStaff"]),
            membership("Eng", &["Eng"]),
        ]
    );
    assert!(effective[1].direct);
    assert!(!effective[0].direct);
}

#[test]
fn test_no_memberships_is_empty() {
    let graph = build(&["alice", "bob"], &["Eng"], &[("alice", "Eng")]);

    assert!(graph.effective_memberships("bob").unwrap().is_empty());
    // a top-level group belongs to nothing
    assert!(graph.effective_memberships("Eng").unwrap().is_empty());
}

#[test]
fn test_unknown_principal_query() {
    let graph = MembershipGraph::new();
    assert!(matches!(
        graph.effective_memberships("ghost"),
        Err(MembershipError::UnknownPrincipal(_))
    ));
}

#[test]
fn test_group_effective_memberships() {
    let graph = build(
        &[],
        &["g1", "g2", "g3"],
        &[("g1", "g2"), ("g2", "g3")],
    );

    let effective = graph.effective_memberships("g1").unwrap();
    assert_eq!(
        effective,
        vec![membership("g2", &["g2"]), membership("g3", &["g2", "g3"])]
    );
}

#[test]
fn test_long_chain_path() {
    let groups = ["l1", "l2", "l3", "l4", "l5"];
    let mut edges = vec![("u", "l1")];
    for pair in groups.windows(2) {
        edges.push((pair[0], pair[1]));
    }
    let graph = build(&["u"], &groups, &edges);

    let effective = graph.effective_memberships("u").unwrap();
    let top = effective.iter().find(|m| m.group == "l5").unwrap();
    assert_eq!(top.path, vec!["l1", "l2", "l3", "l4", "l5"]);
    assert_eq!(effective.len(), 5);
}

#[test]
fn test_discovery_path_is_not_shortest() {
    // u ∈ a, u ∈ b; a ∈ mid ∈ top; b ∈ top
    // Depth-first through `a` reaches top via mid before `b` is explored.
    let graph = build(
        &["u"],
        &["a", "b", "mid", "top"],
        &[("u", "a"), ("u", "b"), ("a", "mid"), ("mid", "top"), ("b", "top")],
    );

    let effective = graph.effective_memberships("u").unwrap();
    let top = effective.iter().find(|m| m.group == "top").unwrap();
    assert_eq!(top.path, vec!["a", "mid", "top"]);
}

#[test]
fn test_discovery_follows_group_registration_order() {
    // `b` is registered before `a`, so the walk goes through `b` first
    let graph = build(
        &["u"],
        &["b", "a", "top"],
        &[("u", "a"), ("u", "b"), ("a", "top"), ("b", "top")],
    );

    let effective = graph.effective_memberships("u").unwrap();
    let top = effective.iter().find(|m| m.group == "top").unwrap();
    assert_eq!(top.path, vec!["b", "top"]);
}

#[test]
fn test_direct_container_stays_direct() {
    // `second` is reachable through `first`, but is also a direct container
    let graph = build(
        &["u"],
        &["first", "second"],
        &[("u", "first"), ("u", "second"), ("first", "second")],
    );

    let effective = graph.effective_memberships("u").unwrap();
    assert_eq!(
        effective,
        vec![membership("first", &["first"]), membership("second", &["second"])]
    );
}

#[test]
fn test_results_sorted_by_group_name() {
    let graph = build(
        &["u"],
        &["zeta", "alpha", "Mid"],
        &[("u", "zeta"), ("u", "alpha"), ("alpha", "Mid")],
    );

    let names: Vec<String> = graph
        .effective_memberships("u")
        .unwrap()
        .into_iter()
        .map(|m| m.group)
        .collect();
    assert_eq!(names, vec!["Mid", "alpha", "zeta"]);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_reverse_edge_rejected() {
    let mut graph = build(&[], &["a", "b"], &[("a", "b")]);
    assert!(matches!(graph.add_membership("b", "a"), Err(MembershipError::Cycle(_))));
}

#[test]
fn test_indirect_cycle_rejected() {
    let mut graph = build(
        &[],
        &["a", "b", "c", "d"],
        &[("a", "b"), ("b", "c"), ("c", "d")],
    );

    assert!(matches!(graph.add_membership("d", "a"), Err(MembershipError::Cycle(_))));
    assert!(matches!(graph.add_membership("c", "a"), Err(MembershipError::Cycle(_))));
    // shortcut in the same direction is fine
    graph.add_membership("a", "d").unwrap();
}

#[test]
fn test_user_in_many_groups_is_not_a_cycle() {
    let mut graph = build(&["u"], &["a", "b"], &[("u", "a"), ("a", "b")]);
    graph.add_membership("u", "b").unwrap();
    assert_eq!(graph.stats().edges, 3);
}

#[test]
fn test_rejections_leave_graph_unchanged() {
    let mut graph = build(
        &["alice"],
        &["Eng", "AllStaff"],
        &[("alice", "Eng"), ("Eng", "AllStaff")],
    );
    let before = graph.configuration();
    let effective_before = graph.effective_memberships("alice").unwrap();

    assert!(graph.add_principal("Eng", PrincipalKind::User).is_err());
    assert!(graph.add_membership("AllStaff", "Eng").is_err());
    assert!(graph.add_membership("alice", "Eng").is_err());
    assert!(graph.add_membership("Eng", "Eng").is_err());
    assert!(graph.add_membership("alice", "Nope").is_err());
    assert!(graph.add_membership("Eng", "alice").is_err());

    assert_eq!(graph.configuration(), before);
    assert_eq!(graph.effective_memberships("alice").unwrap(), effective_before);
}

// ============================================================================
// Tree Rendering Tests
// ============================================================================

#[test]
fn test_descendants_walk_builds_tree() {
    let graph = build(
        &["alice"],
        &["Eng", "AllStaff", "Contractors"],
        &[("alice", "Eng"), ("Eng", "AllStaff"), ("alice", "Contractors")],
    );

    let mut path = vec!["alice".to_string(), "Eng".to_string()];
    let parents = graph.descendants_of("Eng", path.as_slice()).unwrap();
    assert_eq!(parents, vec!["AllStaff"]);

    path.push("AllStaff".to_string());
    assert!(graph.descendants_of("AllStaff", path.as_slice()).unwrap().is_empty());

    let tree = graph.membership_tree("alice").unwrap();
    let top: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(top, vec!["Eng", "Contractors"]);
}

// ============================================================================
// Deep Nesting Tests
// ============================================================================

const DEEP_CHAIN: usize = 20_000;

fn level(i: usize) -> String {
    format!("level-{}", i)
}

/// `u ∈ level-0 ∈ level-1 ∈ ... ∈ level-(depth - 1)`
fn deep_chain(depth: usize) -> MembershipGraph {
    let mut graph = MembershipGraph::new();
    graph.add_user("u").unwrap();
    for i in 0..depth {
        graph.add_group(&level(i)).unwrap();
    }
    // top-down keeps each cycle check to the (still empty) member list
    for i in (1..depth).rev() {
        graph.add_membership(&level(i - 1), &level(i)).unwrap();
    }
    graph.add_membership("u", &level(0)).unwrap();
    graph
}

#[test]
fn test_deep_chain_cycle_check() {
    let mut graph = deep_chain(DEEP_CHAIN);
    let top = level(DEEP_CHAIN - 1);

    assert!(graph.is_descendant("u", &top));
    assert!(graph.is_descendant(&level(0), &top));
    assert!(!graph.is_descendant(&top, &level(0)));

    match graph.add_membership(&top, &level(0)) {
        Err(MembershipError::Cycle(msg)) => {
            assert!(msg.starts_with("level-0 -> level-1 -> "));
            assert_eq!(msg.matches(" -> ").count(), DEEP_CHAIN);
        }
        other => panic!("Expected Cycle error, got {:?}", other),
    }
}

#[test]
fn test_deep_chain_membership_tree() {
    let graph = deep_chain(DEEP_CHAIN);

    let tree = graph.membership_tree("u").unwrap();
    assert_eq!(tree.depth(), DEEP_CHAIN);
    assert_eq!(tree.node_count(), DEEP_CHAIN + 1);
    assert_eq!(tree.children[0].name, "level-0");
}

#[test]
fn test_deep_chain_effective_memberships_on_small_stack() {
    // Output holds one path per level, so the chain is shorter here; the
    // small stack would not fit one frame per level.
    let depth = 1_000;
    let graph = deep_chain(depth);

    let effective = std::thread::Builder::new()
        .stack_size(64 * 1024)
        .spawn(move || graph.effective_memberships("u").unwrap())
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(effective.len(), depth);
    let top = effective.iter().find(|m| m.group == level(depth - 1)).unwrap();
    assert_eq!(top.path.len(), depth);
    assert_eq!(top.path[0], "level-0");
    assert!(effective.iter().find(|m| m.group == "level-0").unwrap().direct);
}
