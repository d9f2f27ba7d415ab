//! Per-edge translation.

use tracing::debug;

use super::cypher::{self, NodePattern, RelationshipPattern};
use super::statements::{EdgeMatch, StatementCollection};
use crate::template::{Edge, Template};

/// Variable counters for a single translation.
///
/// Each translation owns a fresh set, so independent templates can be
/// translated concurrently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariableCounters {
    pub paths: usize,
    pub relations: usize,
}

impl VariableCounters {
    pub fn next_path(&mut self) -> String {
        let name = format!("p{}", self.paths);
        self.paths += 1;
        name
    }

    pub fn next_relation(&mut self) -> String {
        let name = format!("r{}", self.relations);
        self.relations += 1;
        name
    }

    /// The most recently allocated path variable.
    fn last_path(&self) -> String {
        // Template validation guarantees a path before any missing edge.
        format!("p{}", self.paths.saturating_sub(1))
    }

    /// Path variables allocated so far, in allocation order.
    pub fn path_variables(&self) -> Vec<String> {
        (0..self.paths).map(|i| format!("p{}", i)).collect()
    }
}

/// Translate one edge of `template` into a statement fragment.
pub fn compile_edge(
    template: &Template,
    edge: &Edge,
    counters: &mut VariableCounters,
) -> StatementCollection {
    let (from, to) = template.endpoints(edge);
    let mut fragment = StatementCollection::new();

    fragment.match_vertex(NodePattern::from_vertex(from), false);
    // the target may not be part of the graph at all
    fragment.match_vertex(NodePattern::from_vertex(to), edge.missing);

    // allocated on both branches so relation names don't depend on `missing`
    let relation = counters.next_relation();

    if edge.missing {
        fragment
            .constraints
            .push(cypher::absence_constraint(&counters.last_path(), &to.id));
        fragment.absent_targets.push(to.id.clone());
    } else {
        fragment.edge_matches.push(EdgeMatch {
            path_variable: counters.next_path(),
            relationship: RelationshipPattern {
                variable: relation.clone(),
                from: from.id.clone(),
                to: to.id.clone(),
                lower: edge.lower,
                upper: edge.upper,
            },
        });
    }

    if let Some(condition) = &edge.condition {
        fragment
            .constraints
            .push(cypher::condition_constraint(&relation, condition));
    }

    for vertex in [from, to] {
        if let Some(group) = vertex.placeholder_group() {
            fragment.add_placeholder(group, &vertex.id);
        }
    }

    debug!(
        from = %edge.from,
        to = %edge.to,
        missing = edge.missing,
        relation = %relation,
        "compiled edge"
    );

    fragment
}
