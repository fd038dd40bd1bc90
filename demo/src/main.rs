//! davacl-demo: drive the DAV ACL engine from the command line.
//!
//! Loads a TOML fixture (tree plus optional privilege declarations), then
//! either applies an ACL body to one resource, prints the privilege
//! hierarchy a resource supports, or replays the reference scenarios.
//!
//! Usage:
//!   cargo run -p demo -- apply --fixture demo/fixtures/calendar.toml \
//!       --path /dav/calendars/work --body demo/fixtures/share-with-team.json
//!   cargo run -p demo -- privileges --fixture demo/fixtures/calendar.toml \
//!       --path /dav/calendars/work
//!   cargo run -p demo -- scenarios

mod scenarios;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use davacl_contracts::{
    ace::decode_acl_body,
    error::{AclError, AclResult},
    privilege::{PrivilegeHierarchy, PrivilegeName},
};
use davacl_core::{normalize_href, AclEngine, ResourceTree};
use davacl_memory::{InMemoryTree, TreeFixture};
use davacl_privilege::TomlPrivilegeContribution;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Validate and commit WebDAV ACL replacements against a fixture tree.
#[derive(Parser)]
#[command(
    name = "davacl-demo",
    about = "DAV ACL engine demo",
    long_about = "Applies ACL replacement requests to an in-memory resource tree,\n\
                  showing privilege validation, principal lookup, and\n\
                  protected-entry enforcement."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replace the ACL of one resource with a JSON body.
    Apply {
        /// TOML fixture describing the tree and extra privileges.
        #[arg(long)]
        fixture: PathBuf,
        /// Resource path or href to modify.
        #[arg(long)]
        path: String,
        /// JSON array of ACEs. Omit it to send a request without a body.
        #[arg(long)]
        body: Option<PathBuf>,
    },
    /// Print the privilege hierarchy a resource supports.
    Privileges {
        #[arg(long)]
        fixture: PathBuf,
        #[arg(long)]
        path: String,
    },
    /// Replay the reference scenarios against fresh trees.
    Scenarios,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Apply { fixture, path, body } => run_apply(&fixture, &path, body.as_deref()),
        Command::Privileges { fixture, path } => run_privileges(&fixture, &path),
        Command::Scenarios => {
            if scenarios::run_all() > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("davacl-demo: {} [{:?}]", e, e.kind());
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Build the tree and an engine configured from the same fixture file.
fn load(fixture: &Path) -> AclResult<(InMemoryTree, AclEngine)> {
    let tree_fixture = TreeFixture::from_file(fixture)?;
    let tree = tree_fixture.build()?;
    let privileges = TomlPrivilegeContribution::from_file(fixture)?;
    let engine =
        AclEngine::new(vec![Box::new(privileges)]).with_base_uri(tree_fixture.base_uri.as_str());

    debug!(
        fixture = %fixture.display(),
        nodes = tree.len(),
        base_uri = %engine.base_uri(),
        "fixture loaded"
    );
    Ok((tree, engine))
}

fn run_apply(fixture: &Path, path: &str, body: Option<&Path>) -> AclResult<()> {
    let (tree, engine) = load(fixture)?;

    let proposed = match body {
        Some(file) => {
            let raw = std::fs::read_to_string(file).map_err(|e| AclError::BadRequest {
                reason: format!("failed to read body '{}': {}", file.display(), e),
            })?;
            Some(decode_acl_body(Some(&raw))?)
        }
        None => None,
    };

    let target = normalize_href(engine.base_uri(), path);
    let before = tree.acl_digest(&target).unwrap_or_default();

    let receipt = engine.handle_acl_mutation(&tree, path, proposed)?;

    println!("ACL of '{}' replaced at {}", receipt.path, receipt.committed_at);
    println!(
        "  {} entries ({} protected), {} dropped",
        receipt.entries,
        receipt.protected,
        receipt.dropped.len()
    );
    for ace in tree.acl(&target).unwrap_or_default().iter() {
        let marker = if ace.protected { " [protected]" } else { "" };
        println!("  + {} {}{}", ace.principal, ace.privilege, marker);
    }
    for ace in &receipt.dropped {
        println!("  - {} {}", ace.principal, ace.privilege);
    }
    let after = tree.acl_digest(&target).unwrap_or_default();
    println!("  digest {} -> {}", short(&before), short(&after));

    Ok(())
}

fn run_privileges(fixture: &Path, path: &str) -> AclResult<()> {
    let (tree, engine) = load(fixture)?;

    let target = normalize_href(engine.base_uri(), path);
    let resource = tree
        .lookup(&target)
        .ok_or_else(|| AclError::NotFound { path: target.clone() })?;
    let hierarchy = engine.privileges(resource.as_ref());

    println!("Supported privileges for '{}' ({}):", target, hierarchy.len());
    for root in hierarchy.roots() {
        print_privilege(&hierarchy, root, 1);
    }

    Ok(())
}

fn print_privilege(hierarchy: &PrivilegeHierarchy, name: &PrivilegeName, depth: usize) {
    let indent = "  ".repeat(depth);
    let Some(privilege) = hierarchy.get(name) else {
        println!("{}{} (undeclared)", indent, name);
        return;
    };

    if privilege.is_abstract {
        let stands_in = hierarchy
            .concrete(name)
            .map(|c| format!(", granted via {}", c))
            .unwrap_or_default();
        println!("{}{} (abstract{})", indent, name, stands_in);
    } else {
        println!("{}{}", indent, name);
    }

    // Aggregation graphs from configuration may be cyclic; cap the depth.
    if depth > hierarchy.len() {
        return;
    }
    for child in &privilege.aggregates {
        print_privilege(hierarchy, child, depth + 1);
    }
}

fn short(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
