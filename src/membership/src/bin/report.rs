//! # Membership Report
//!
//! Loads a membership snapshot and prints the effective group memberships of
//! one principal, followed by its containment tree.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG` - Log level (default: info)
//! - `ADSIM_TRIM_NAMES` - Trim principal names (default: true)
//! - `ADSIM_MAX_NAME_LEN` - Maximum principal name length (default: unlimited)

use adsim_membership::{MembershipGraph, ResolverConfig};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Effective group membership report
#[derive(Parser)]
#[command(name = "membership-report")]
#[command(about = "Resolve nested group memberships from a snapshot")]
#[command(version)]
struct Cli {
    /// Path to the JSON snapshot
    #[arg(env = "ADSIM_SNAPSHOT")]
    snapshot: PathBuf,

    /// User or group to resolve
    principal: String,

    /// Skip the containment tree
    #[arg(long)]
    no_tree: bool,

    /// Print the configuration listing before the report
    #[arg(long)]
    show_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting membership report v{}", adsim_membership::VERSION);

    let config = ResolverConfig::from_env();
    let json = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("Failed to read snapshot {}", cli.snapshot.display()))?;
    let graph = MembershipGraph::from_json(&json, config).context("Failed to load snapshot")?;

    if cli.show_config {
        print_configuration(&graph);
    }

    let effective = graph
        .effective_memberships(&cli.principal)
        .with_context(|| format!("Failed to resolve memberships of '{}'", cli.principal))?;

    if effective.is_empty() {
        println!("{} is not a member of any groups", cli.principal);
        return Ok(());
    }

    println!(
        "{} is effectively a member of {} group(s):",
        cli.principal,
        effective.len()
    );
    for membership in &effective {
        let kind = if membership.direct { "Direct" } else { "Indirect" };
        println!("  {:<24} {:<8} {}", membership.group, kind, membership.path_display());
    }

    if !cli.no_tree {
        let tree = graph
            .membership_tree(&cli.principal)
            .context("Failed to build membership tree")?;
        println!();
        print!("{}", tree);
    }

    Ok(())
}

fn print_configuration(graph: &MembershipGraph) {
    let view = graph.configuration();
    if view.is_empty() {
        println!("No users or groups configured");
        return;
    }

    println!("Users ({}): {}", view.users.len(), view.users.join(", "));
    println!("Groups ({}):", view.groups.len());
    for group in &view.groups {
        println!("  {} - {} member(s)", group.name, group.member_count());
        if !group.user_members.is_empty() {
            println!("    Users: {}", group.user_members.join(", "));
        }
        if !group.group_members.is_empty() {
            println!("    Groups: {}", group.group_members.join(", "));
        }
    }
    println!();
}
