//! Level scheduling
//!
//! Decimates the dependency graph into an ordered sequence of groups. Every
//! package in one group has all of its dependencies satisfied by earlier
//! groups, so packages within a group are mutually independent.

use std::collections::BTreeSet;

use crate::core::graph::DependencyGraph;
use crate::error::ScheduleError;

/// One level of the schedule: packages with no unresolved dependency at
/// extraction time. Iteration order within a group carries no meaning.
pub type Group = BTreeSet<String>;

/// Compute the ordered group sequence for a dependency graph.
///
/// The graph is consumed; callers keep their canonical copy and pass a
/// disposable one. Fails with [`ScheduleError::CyclicDependency`] when no
/// zero-dependency package remains in a non-empty graph, reporting the
/// residual graph for diagnosis.
pub fn schedule(mut graph: DependencyGraph) -> Result<Vec<Group>, ScheduleError> {
    let mut groups = Vec::new();

    while !graph.is_empty() {
        let group: Group = graph
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        if group.is_empty() {
            return Err(ScheduleError::CyclicDependency { residual: graph });
        }

        for name in &group {
            graph.remove(name);
        }
        for deps in graph.values_mut() {
            for name in &group {
                deps.remove(name);
            }
        }

        tracing::debug!("group {}: {:?}", groups.len(), group);
        groups.push(group);
    }

    Ok(groups)
}
