//! Integration tests for graph building and level scheduling
//!
//! Covers the end-to-end path from package metadata to an ordered group
//! sequence: foundation node injection, dependency leveling, cycle-group
//! collapsing, and cycle detection.

use std::collections::BTreeMap;

use boostforge::core::graph::{build_graph, BASE_NODE, BUILD_NODE};
use boostforge::core::metadata::PackageSet;
use boostforge::core::schedule::schedule;
use boostforge::error::ScheduleError;
use proptest::prelude::*;

fn plan(json: &str) -> Vec<Vec<String>> {
    let packages = PackageSet::from_json(json).expect("valid package data");
    let graph = build_graph(&packages).expect("graph");
    schedule(graph)
        .expect("schedule")
        .into_iter()
        .map(|group| group.into_iter().collect())
        .collect()
}

#[test]
fn test_foundation_nodes_lead_the_plan() {
    let groups = plan(r#"{"a": {}, "b": {"b2_requires": ["a"]}}"#);
    assert_eq!(
        groups,
        vec![
            vec![BUILD_NODE.to_string()],
            vec![BASE_NODE.to_string()],
            vec!["a".to_string()],
            vec!["b".to_string()],
        ]
    );
}

#[test]
fn test_independent_packages_share_a_wave() {
    let groups = plan(r#"{"a": {}, "b": {}, "c": {"b2_requires": ["a", "b"]}}"#);
    assert_eq!(groups[2], vec!["a".to_string(), "b".to_string()]);
    assert_eq!(groups[3], vec!["c".to_string()]);
}

#[test]
fn test_declared_cycle_group_schedules() {
    // p and q depend on each other, but the declared group absorbs the
    // cycle: the group builds first, the member shims follow.
    let groups = plan(
        r#"{
            "grp1": {"is_cycle_group": true, "lib_short_names": ["p", "q"]},
            "p": {"cycle_group": "grp1", "b2_requires": ["q"]},
            "q": {"cycle_group": "grp1", "b2_requires": ["p"]},
            "user": {"b2_requires": ["p"]}
        }"#,
    );

    let index = |name: &str| {
        groups
            .iter()
            .position(|group| group.iter().any(|n| n == name))
            .unwrap_or_else(|| panic!("{name} missing from plan"))
    };
    assert!(index("grp1") < index("p"));
    assert!(index("grp1") < index("q"));
    assert!(index("p") < index("user"));
    assert_eq!(index("p"), index("q"));
}

#[test]
fn test_undeclared_cycle_fails_instead_of_dropping_packages() {
    let packages = PackageSet::from_json(
        r#"{
            "a": {"b2_requires": ["b"]},
            "b": {"b2_requires": ["a"]}
        }"#,
    )
    .expect("valid package data");
    let graph = build_graph(&packages).expect("graph");

    let err = schedule(graph).expect_err("must fail");
    let ScheduleError::CyclicDependency { residual } = err;
    assert!(residual.contains_key("a"));
    assert!(residual.contains_key("b"));
}

/// Metadata strategy producing acyclic dependency declarations: package i
/// may only require packages with a smaller index.
fn metadata_strategy() -> impl Strategy<Value = PackageSet> {
    (1usize..10).prop_flat_map(|n| {
        let edges = proptest::collection::vec(proptest::bool::ANY, n * n);
        edges.prop_map(move |edges| {
            let names: Vec<String> = (0..n).map(|i| format!("pkg{i}")).collect();
            let mut entries = BTreeMap::new();
            for (i, name) in names.iter().enumerate() {
                let requires: Vec<String> = (0..i)
                    .filter(|j| edges[i * n + j])
                    .map(|j| format!("\"{}\"", names[j]))
                    .collect();
                entries.insert(name.clone(), format!("{{\"b2_requires\": [{}]}}", requires.join(",")));
            }
            let body: Vec<String> = entries
                .iter()
                .map(|(name, entry)| format!("\"{name}\": {entry}"))
                .collect();
            PackageSet::from_json(&format!("{{{}}}", body.join(",")))
                .expect("generated metadata is valid")
        })
    })
}

proptest! {
    /// Every package (plus the two foundation nodes) lands in exactly one
    /// group, and every dependency is grouped strictly earlier than its
    /// dependents.
    #[test]
    fn prop_plan_partitions_and_respects_dependencies(packages in metadata_strategy()) {
        let graph = build_graph(&packages).expect("graph");
        let original = graph.clone();
        let groups = schedule(graph).expect("acyclic metadata always schedules");

        let mut group_index = BTreeMap::new();
        for (index, group) in groups.iter().enumerate() {
            for name in group {
                prop_assert!(group_index.insert(name.clone(), index).is_none());
            }
        }
        prop_assert_eq!(group_index.len(), packages.len() + 2);

        for (name, deps) in &original {
            for dep in deps {
                prop_assert!(group_index[dep] < group_index[name]);
            }
        }
    }
}
