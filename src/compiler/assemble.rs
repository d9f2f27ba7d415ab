//! Query assembly.
//!
//! Turns a fully merged [`StatementCollection`] into query text. Match lines are
//! ordered mandatory vertices first, then relationships, then optional vertices,
//! so an optional match never precedes the matches it depends on.

use super::cypher;
use super::statements::{StatementCollection, VertexMatch};

/// Build the full anti-pattern query.
pub fn full_query(statements: &StatementCollection, path_variables: &[String]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.extend(statements.mandatory_vertices().map(VertexMatch::render));
    lines.extend(statements.edge_matches.iter().map(|m| m.render()));
    lines.extend(statements.optional_vertices().map(VertexMatch::render));

    let mut constraints = statements.constraints.clone();
    constraints.extend(placeholder_constraints(statements));

    if !constraints.is_empty() {
        lines.push(format!("WHERE {}", constraints.join("\nAND ")));
    }

    lines.push(format!("RETURN {}", path_variables.join(",")));
    lines.join("\n")
}

/// Equality constraints for placeholder groups.
///
/// Placeholders in a group do not necessarily share an edge, so they are resolved
/// here rather than per edge. Only the first two members of a group are compared;
/// single-member groups are unconstrained.
fn placeholder_constraints(statements: &StatementCollection) -> Vec<String> {
    statements
        .placeholders
        .values()
        .filter_map(|members| match members.as_slice() {
            [first, second, ..] => Some(cypher::labels_equal(first, second)),
            _ => None,
        })
        .collect()
}

/// Build the predecessor query, which checks that the targets of missing edges
/// exist in the graph at all.
///
/// Lists every vertex whose final directive is optional together with every
/// missing-edge target, in vertex order. Targets later matched as mandatory are
/// still rendered as `OPTIONAL MATCH` here. Returns `None` when nothing is listed.
pub fn predecessor_query(statements: &StatementCollection) -> Option<String> {
    let targets: Vec<VertexMatch> = statements
        .vertex_matches
        .iter()
        .filter(|(id, m)| m.optional || statements.absent_targets.contains(*id))
        .map(|(_, m)| VertexMatch {
            node: m.node.clone(),
            optional: true,
        })
        .collect();

    if targets.is_empty() {
        return None;
    }

    let variables: Vec<&str> = targets.iter().map(|t| t.node.variable.as_str()).collect();
    let mut lines: Vec<String> = targets.iter().map(VertexMatch::render).collect();
    lines.push(format!("RETURN {}", variables.join(",")));
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::cypher::NodePattern;
    use crate::template::{Vertex, VertexType};
    use rstest::rstest;

    fn node(id: &str) -> NodePattern {
        NodePattern::from_vertex(&Vertex::new(id, VertexType::Activity, "X"))
    }

    #[rstest]
    fn test_full_query_without_constraints() {
        let mut statements = StatementCollection::new();
        statements.match_vertex(node("a"), false);

        let query = full_query(&statements, &["p0".to_string()]);
        assert_eq!(query, "MATCH (a:X:ACTIVITY)\nRETURN p0");
    }

    #[rstest]
    fn test_constraints_joined_with_and() {
        let mut statements = StatementCollection::new();
        statements.match_vertex(node("a"), false);
        statements.constraints.push("c1".to_string());
        statements.constraints.push("c2".to_string());
        statements.add_placeholder("S", "a");
        statements.add_placeholder("S", "b");

        let query = full_query(&statements, &["p0".to_string(), "p1".to_string()]);
        assert!(query.ends_with("WHERE c1\nAND c2\nAND labels(a)=labels(b)\nRETURN p0,p1"));
    }

    #[rstest]
    fn test_predecessor_lists_optional_vertices() {
        let mut statements = StatementCollection::new();
        statements.match_vertex(node("a"), false);
        statements.match_vertex(node("b"), true);
        statements.match_vertex(node("c"), true);

        assert_eq!(
            predecessor_query(&statements).as_deref(),
            Some("OPTIONAL MATCH (b:X:ACTIVITY)\nOPTIONAL MATCH (c:X:ACTIVITY)\nRETURN b,c")
        );
    }

    #[rstest]
    fn test_predecessor_falls_back_to_absent_targets() {
        let mut statements = StatementCollection::new();
        statements.match_vertex(node("a"), false);
        statements.absent_targets.push("a".to_string());
        statements.absent_targets.push("a".to_string());

        assert_eq!(
            predecessor_query(&statements).as_deref(),
            Some("OPTIONAL MATCH (a:X:ACTIVITY)\nRETURN a")
        );
    }

    #[rstest]
    fn test_no_predecessor_without_absent_targets() {
        let mut statements = StatementCollection::new();
        statements.match_vertex(node("a"), false);
        assert_eq!(predecessor_query(&statements), None);
    }

    #[rstest]
    fn test_predecessor_lists_mandatory_and_optional_absent_targets() {
        // v was made mandatory by a later edge, w is still optional
        let mut statements = StatementCollection::new();
        statements.match_vertex(node("a"), false);
        statements.match_vertex(node("v"), false);
        statements.match_vertex(node("w"), true);
        statements.absent_targets.push("v".to_string());
        statements.absent_targets.push("w".to_string());

        assert_eq!(
            predecessor_query(&statements).as_deref(),
            Some("OPTIONAL MATCH (v:X:ACTIVITY)\nOPTIONAL MATCH (w:X:ACTIVITY)\nRETURN v,w")
        );
    }
}
