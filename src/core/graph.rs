//! Dependency graph construction
//!
//! Converts package metadata into a name -> direct-dependency-set mapping,
//! anchored on two synthetic foundation nodes: every package transitively
//! depends on `base`, which depends on `build`.
//!
//! Declared cycle groups are collapsed here, before scheduling: a group node
//! absorbs the external dependencies of its members, and each member keeps
//! only the group (plus `base`) as its dependencies. Mutual edges between
//! members disappear into the group node, so a declared cycle never reaches
//! the scheduler.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::metadata::{PackageKind, PackageSet};
use crate::error::GraphError;

/// Synthetic root node everything bootstraps from
pub const BUILD_NODE: &str = "build";

/// Synthetic foundation node every real package depends on
pub const BASE_NODE: &str = "base";

/// Mapping from package name to the set of names it still depends on.
/// Destructively consumed by the scheduler, so callers hand over an owned
/// copy and keep the [`PackageSet`] as the source of truth.
pub type DependencyGraph = BTreeMap<String, BTreeSet<String>>;

fn is_synthetic(name: &str) -> bool {
    name == BUILD_NODE || name == BASE_NODE
}

/// Build the dependency graph for a package set.
///
/// Pure function of its input: the same metadata always yields a
/// structurally identical graph.
pub fn build_graph(packages: &PackageSet) -> Result<DependencyGraph, GraphError> {
    // Member package name -> owning group name, for dependency rewriting.
    let mut member_group: BTreeMap<&str, &str> = BTreeMap::new();
    for (name, package) in packages.iter() {
        if let PackageKind::CycleGroupMember { group } = &package.kind {
            match packages.get(group) {
                None => {
                    return Err(GraphError::UnknownCycleGroup {
                        package: name.clone(),
                        group: group.clone(),
                    });
                }
                Some(owner) if owner.kind != PackageKind::CycleGroup => {
                    return Err(GraphError::NotACycleGroup {
                        package: name.clone(),
                        group: group.clone(),
                    });
                }
                Some(_) => {
                    member_group.insert(name.as_str(), group.as_str());
                }
            }
        }
    }

    let mut graph: DependencyGraph = BTreeMap::new();
    graph.insert(BUILD_NODE.to_string(), BTreeSet::new());
    graph.insert(
        BASE_NODE.to_string(),
        [BUILD_NODE.to_string()].into_iter().collect(),
    );

    for (name, package) in packages.iter() {
        let declared = package
            .b2_requires
            .iter()
            .chain(package.b2_build_requires.iter())
            .chain(package.source_only_deps.iter());

        let mut deps: BTreeSet<String> = BTreeSet::new();
        deps.insert(BASE_NODE.to_string());
        for dep in declared {
            if !is_synthetic(dep) && !packages.contains(dep) {
                return Err(GraphError::MissingDependency {
                    package: name.clone(),
                    dependency: dep.clone(),
                });
            }
            deps.insert(dep.clone());
        }

        match &package.kind {
            // A member schedules strictly after its group; its own deps were
            // absorbed by the group below.
            PackageKind::CycleGroupMember { group } => {
                let mut member_deps = BTreeSet::new();
                member_deps.insert(BASE_NODE.to_string());
                member_deps.insert(group.clone());
                graph.insert(name.clone(), member_deps);

                let group_deps = graph.entry(group.clone()).or_default();
                for dep in deps {
                    group_deps.insert(dep);
                }
            }
            PackageKind::Standalone | PackageKind::CycleGroup => {
                let entry = graph.entry(name.clone()).or_default();
                for dep in deps {
                    entry.insert(dep);
                }
            }
        }
    }

    // Rewrite any dependency on a member to the member's group and drop
    // self-edges the absorption may have produced.
    let names: Vec<String> = graph.keys().cloned().collect();
    for name in names {
        let deps = graph.get(&name).cloned().unwrap_or_default();
        let rewritten: BTreeSet<String> = deps
            .into_iter()
            .map(|dep| {
                if name != BASE_NODE {
                    if let Some(group) = member_group.get(dep.as_str()) {
                        // Only group-internal edges collapse; an outside
                        // package may keep depending on the member shim.
                        if member_group.get(name.as_str()) == Some(group)
                            || name == **group
                        {
                            return (*group).to_string();
                        }
                    }
                }
                dep
            })
            .filter(|dep| dep != &name)
            .collect();
        graph.insert(name, rewritten);
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::PackageSet;

    fn set(json: &str) -> PackageSet {
        PackageSet::from_json(json).expect("valid package data")
    }

    #[test]
    fn test_synthetic_nodes_are_injected() {
        let graph = build_graph(&set("{}")).expect("graph");

        assert!(graph.get(BUILD_NODE).expect("build node").is_empty());
        let base = graph.get(BASE_NODE).expect("base node");
        assert_eq!(base.iter().collect::<Vec<_>>(), vec![BUILD_NODE]);
    }

    #[test]
    fn test_every_package_depends_on_base() {
        let graph = build_graph(&set(r#"{"a": {}, "b": {"b2_requires": ["a"]}}"#)).expect("graph");

        assert!(graph.get("a").expect("a").contains(BASE_NODE));
        let b = graph.get("b").expect("b");
        assert!(b.contains(BASE_NODE));
        assert!(b.contains("a"));
    }

    #[test]
    fn test_source_only_and_build_requires_are_edges() {
        let data = r#"{
            "a": {},
            "b": {},
            "c": {"b2_build_requires": ["a"], "source_only_deps": ["b"]}
        }"#;
        let graph = build_graph(&set(data)).expect("graph");
        let c = graph.get("c").expect("c");
        assert!(c.contains("a"));
        assert!(c.contains("b"));
    }

    #[test]
    fn test_dangling_dependency_is_a_configuration_error() {
        let err = build_graph(&set(r#"{"a": {"b2_requires": ["ghost"]}}"#)).expect_err("must fail");
        assert!(matches!(
            err,
            GraphError::MissingDependency { package, dependency }
                if package == "a" && dependency == "ghost"
        ));
    }

    #[test]
    fn test_build_graph_is_idempotent() {
        let packages = set(r#"{"a": {}, "b": {"b2_requires": ["a"]}}"#);
        let first = build_graph(&packages).expect("graph");
        let second = build_graph(&packages).expect("graph");
        assert_eq!(first, second);
    }

    #[test]
    fn test_cycle_group_collapses_member_edges() {
        let data = r#"{
            "ext": {},
            "grp1": {"is_cycle_group": true, "lib_short_names": ["p", "q"]},
            "p": {"cycle_group": "grp1", "b2_requires": ["q", "ext"]},
            "q": {"cycle_group": "grp1", "b2_requires": ["p"]}
        }"#;
        let graph = build_graph(&set(data)).expect("graph");

        // Members keep only base + their group.
        let p = graph.get("p").expect("p");
        assert_eq!(
            p.iter().cloned().collect::<Vec<_>>(),
            vec![BASE_NODE.to_string(), "grp1".to_string()]
        );

        // The group absorbed the members' external deps, not their mutual ones.
        let grp = graph.get("grp1").expect("grp1");
        assert!(grp.contains("ext"));
        assert!(grp.contains(BASE_NODE));
        assert!(!grp.contains("p"));
        assert!(!grp.contains("q"));
    }

    #[test]
    fn test_outside_dependency_on_member_is_kept() {
        let data = r#"{
            "grp1": {"is_cycle_group": true, "lib_short_names": ["p"]},
            "p": {"cycle_group": "grp1"},
            "user": {"b2_requires": ["p"]}
        }"#;
        let graph = build_graph(&set(data)).expect("graph");
        assert!(graph.get("user").expect("user").contains("p"));
    }

    #[test]
    fn test_unknown_cycle_group_is_rejected() {
        let err =
            build_graph(&set(r#"{"p": {"cycle_group": "ghost"}}"#)).expect_err("must fail");
        assert!(matches!(err, GraphError::UnknownCycleGroup { .. }));
    }

    #[test]
    fn test_member_of_non_group_is_rejected() {
        let data = r#"{"plain": {}, "p": {"cycle_group": "plain"}}"#;
        let err = build_graph(&set(data)).expect_err("must fail");
        assert!(matches!(err, GraphError::NotACycleGroup { .. }));
    }
}
