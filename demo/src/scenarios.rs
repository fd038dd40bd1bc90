//! Reference scenarios replayed by `davacl-demo scenarios`.
//!
//! Each scenario builds a fresh tree, submits one body to `/test`, and
//! compares the outcome with the expected error kind.

use davacl_contracts::{
    ace::{decode_acl_body, Ace, Acl},
    error::ErrorKind,
    privilege::PrivilegeName,
};
use davacl_core::AclEngine;
use davacl_memory::{InMemoryTree, MemoryNode};
use tracing::debug;

struct Scenario {
    name: &'static str,
    tree: fn() -> InMemoryTree,
    body: &'static str,
    expected: Result<(), ErrorKind>,
}

/// `test` holding `stored`, with principals `foo` and `baz`.
fn acl_tree(stored: Vec<Ace>) -> InMemoryTree {
    InMemoryTree::new()
        .with_node(MemoryNode::acl_node("test", Acl::new(stored)))
        .with_node(MemoryNode::principal("principals/foo"))
        .with_node(MemoryNode::principal("principals/baz"))
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "A: resource without ACL support",
            tree: || InMemoryTree::new().with_node(MemoryNode::collection("test")),
            body: "[]",
            expected: Err(ErrorKind::MethodNotAllowed),
        },
        Scenario {
            name: "B: empty list over empty ACL",
            tree: || acl_tree(vec![]),
            body: "[]",
            expected: Ok(()),
        },
        Scenario {
            name: "C: unknown principal",
            tree: || acl_tree(vec![]),
            body: r#"[{ "principal": "/principals/notfound", "privilege": "{DAV:}read" }]"#,
            expected: Err(ErrorKind::NotRecognizedPrincipal),
        },
        Scenario {
            name: "D: unsupported privilege",
            tree: || acl_tree(vec![]),
            body: r#"[{ "principal": "/principals/notfound", "privilege": "{DAV:}bananas" }]"#,
            expected: Err(ErrorKind::NotSupportedPrivilege),
        },
        Scenario {
            name: "E: protected entry kept, grant added",
            tree: || {
                acl_tree(vec![
                    Ace::protected("principals/foo", PrivilegeName::dav("write")),
                    Ace::new("principals/bar", PrivilegeName::dav("read")),
                ])
            },
            body: r#"[
                { "principal": "/principals/foo", "privilege": "{DAV:}write", "protected": true },
                { "principal": "/principals/baz", "privilege": "{DAV:}write" }
            ]"#,
            expected: Ok(()),
        },
        Scenario {
            name: "F: protected entry missing",
            tree: || {
                acl_tree(vec![Ace::protected(
                    "principals/notfound",
                    PrivilegeName::dav("write"),
                )])
            },
            body: r#"[{ "principal": "/principals/notfound", "privilege": "{DAV:}read" }]"#,
            expected: Err(ErrorKind::AceConflict),
        },
        Scenario {
            name: "abstract privilege",
            tree: || acl_tree(vec![]),
            body: r#"[{ "principal": "/principals/foo", "privilege": "{DAV:}all" }]"#,
            expected: Err(ErrorKind::NoAbstract),
        },
    ]
}

fn run(engine: &AclEngine, scenario: &Scenario) -> Result<(), ErrorKind> {
    let tree = (scenario.tree)();
    let proposed = decode_acl_body(Some(scenario.body)).map_err(|e| e.kind())?;
    let outcome = engine
        .handle_acl_mutation(&tree, "/test", Some(proposed))
        .map(|_| ())
        .map_err(|e| e.kind());

    debug!(scenario = scenario.name, outcome = ?outcome, "scenario replayed");
    outcome
}

/// Replay every scenario and print one line per outcome.
///
/// Returns the number of scenarios whose outcome differed.
pub fn run_all() -> usize {
    let engine = AclEngine::default();
    let mut diverged = 0;

    for scenario in scenarios() {
        let outcome = run(&engine, &scenario);
        let status = if outcome == scenario.expected {
            "ok  "
        } else {
            diverged += 1;
            "FAIL"
        };
        println!("[{}] {:<40} {:?}", status, scenario.name, outcome);
    }

    println!();
    println!("{} scenarios, {} diverged", scenarios().len(), diverged);
    diverged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_scenario_matches() {
        let engine = AclEngine::default();
        for scenario in scenarios() {
            assert_eq!(run(&engine, &scenario), scenario.expected, "{}", scenario.name);
        }
    }
}
