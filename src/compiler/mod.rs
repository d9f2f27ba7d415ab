//! Template-to-Cypher compiler.
//!
//! Compiles an anti-pattern [`Template`] into one or two Cypher queries.
//!
//! # Architecture
//!
//! Translation is a single pass over the template's edges:
//!
//! 1. **Edge compilation** - `edge::compile_edge` turns one edge into a statement
//!    fragment, allocating path and relation variables from per-call counters
//! 2. **Merging** - `StatementCollection::merge` folds fragments into a running
//!    collection (vertex matches overwrite by id, everything else accumulates)
//! 3. **Assembly** - `assemble` orders the collection into query text
//!
//! # Two-phase queries
//!
//! A template with a missing edge compiles to a predecessor query followed by the
//! full query. A single match cannot tell "the target vertex does not exist" (which
//! already implies the anti-pattern) from "it exists but is not connected", so the
//! caller runs the predecessor first and only runs the full query if it returns
//! rows. See [`crate::detect`] for that protocol.
//!
//! The compiler performs no I/O and holds no state between calls.

pub mod assemble;
pub mod cypher;
pub mod edge;
pub mod statements;

use serde::Serialize;
use tracing::debug;

use crate::template::Template;
use edge::{compile_edge, VariableCounters};
use statements::StatementCollection;

/// The compiled queries for one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPattern {
    /// Existence check for the targets of missing edges, run first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predecessor: Option<String>,
    /// The anti-pattern query; rows present means the anti-pattern was found
    pub query: String,
}

impl CompiledPattern {
    pub fn is_two_phase(&self) -> bool {
        self.predecessor.is_some()
    }

    /// Queries in execution order.
    pub fn into_queries(self) -> Vec<String> {
        match self.predecessor {
            Some(predecessor) => vec![predecessor, self.query],
            None => vec![self.query],
        }
    }
}

/// Compile a template into its predecessor (if any) and full query.
pub fn compile(template: &Template) -> CompiledPattern {
    let mut counters = VariableCounters::default();
    let mut statements = StatementCollection::new();

    for edge in template.edges() {
        statements.merge(compile_edge(template, edge, &mut counters));
    }

    let predecessor = if template.has_missing_edges() {
        assemble::predecessor_query(&statements)
    } else {
        None
    };
    let query = assemble::full_query(&statements, &counters.path_variables());

    debug!(
        edges = template.edges().len(),
        paths = counters.paths,
        two_phase = predecessor.is_some(),
        "translated template"
    );

    CompiledPattern { predecessor, query }
}

/// Translate a template into query text, in execution order.
///
/// Returns `[full]` for templates without missing edges and
/// `[predecessor, full]` otherwise.
pub fn translate(template: &Template) -> Vec<String> {
    compile(template).into_queries()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Edge, UpperBound, Vertex, VertexType};
    use rstest::rstest;

    fn activity(id: &str, variant: &str) -> Vertex {
        Vertex::new(id, VertexType::Activity, variant)
    }

    #[rstest]
    fn test_double_optimization() {
        let template = Template::builder()
            .vertex(activity("opt1", "NW_OPT"))
            .vertex(activity("opt2", "NW_OPT"))
            .edge(Edge::new("opt1", "opt2"))
            .build()
            .unwrap();

        let queries = translate(&template);
        assert_eq!(
            queries,
            vec![
                "MATCH (opt1:NW_OPT:ACTIVITY)\n\
                 MATCH (opt2:NW_OPT:ACTIVITY)\n\
                 MATCH p0=(opt1)-[r0]->(opt2)\n\
                 RETURN p0"
            ]
        );
    }

    #[rstest]
    fn test_missing_reversal() {
        let template = Template::builder()
            .vertex(activity("red", "NW_RED"))
            .vertex(activity("rev", "NW_RR"))
            .vertex(Vertex::new("end", VertexType::Event, "END"))
            .edge(Edge::new("red", "end").upper(UpperBound::Unbounded))
            .edge(Edge::new("red", "rev").upper(UpperBound::Unbounded).missing())
            .build()
            .unwrap();

        let queries = translate(&template);
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0], "OPTIONAL MATCH (rev:NW_RR:ACTIVITY)\nRETURN rev");
        assert_eq!(
            queries[1],
            "MATCH (red:NW_RED:ACTIVITY)\n\
             MATCH (end:END:EVENT)\n\
             MATCH p0=(red)-[r0*]->(end)\n\
             OPTIONAL MATCH (rev:NW_RR:ACTIVITY)\n\
             WHERE NONE (n IN nodes(p0) WHERE n=rev)\n\
             RETURN p0"
        );
    }

    #[rstest]
    fn test_redundant_services() {
        let template = Template::builder()
            .vertex(Vertex::placeholder("s1", VertexType::Activity, "S"))
            .vertex(Vertex::placeholder("s2", VertexType::Activity, "S"))
            .edge(Edge::new("s1", "s2"))
            .build()
            .unwrap();

        let queries = translate(&template);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].matches("labels(").count(), 2);
        assert_eq!(
            queries[0],
            "MATCH (s1:ACTIVITY)\n\
             MATCH (s2:ACTIVITY)\n\
             MATCH p0=(s1)-[r0]->(s2)\n\
             WHERE labels(s1)=labels(s2)\n\
             RETURN p0"
        );
    }

    #[rstest]
    fn test_placeholder_group_compares_first_two_members_only() {
        let template = Template::builder()
            .vertex(Vertex::placeholder("a", VertexType::Activity, "S"))
            .vertex(Vertex::placeholder("b", VertexType::Activity, "S"))
            .vertex(Vertex::placeholder("c", VertexType::Activity, "S"))
            .edge(Edge::new("a", "b"))
            .edge(Edge::new("b", "c"))
            .build()
            .unwrap();

        let query = translate(&template).remove(0);
        assert_eq!(query.matches("labels(a)=labels(b)").count(), 1);
        assert!(!query.contains("labels(c)"));
        assert_eq!(query.matches("WHERE").count(), 1);
    }

    #[rstest]
    fn test_single_member_placeholder_group_is_unconstrained() {
        let template = Template::builder()
            .vertex(activity("opt", "NW_OPT"))
            .vertex(Vertex::placeholder("s", VertexType::Activity, ""))
            .edge(Edge::new("opt", "s"))
            .build()
            .unwrap();

        let query = translate(&template).remove(0);
        assert!(!query.contains("WHERE"));
        assert!(query.contains("MATCH (s:ACTIVITY)"));
    }

    #[rstest]
    fn test_condition_and_multiple_paths() {
        let template = Template::builder()
            .vertex(activity("opt", "NW_OPT"))
            .vertex(Vertex::new("gw", VertexType::Gateway, "EXCLUSIVE"))
            .vertex(activity("tf", "VIS_TOP"))
            .edge(Edge::new("opt", "gw").upper(UpperBound::Unbounded))
            .edge(Edge::new("gw", "tf").condition("incorrect topology"))
            .build()
            .unwrap();

        let queries = translate(&template);
        assert_eq!(
            queries,
            vec![
                "MATCH (opt:NW_OPT:ACTIVITY)\n\
                 MATCH (gw:EXCLUSIVE:GATEWAY)\n\
                 MATCH (tf:VIS_TOP:ACTIVITY)\n\
                 MATCH p0=(opt)-[r0*]->(gw)\n\
                 MATCH p1=(gw)-[r1]->(tf)\n\
                 WHERE r1.condition=\"incorrect topology\"\n\
                 RETURN p0,p1"
            ]
        );
    }

    #[rstest]
    fn test_later_edge_decides_optionality_mandatory_wins() {
        // v is first optional (missing target), then mandatory (source of a present edge)
        let template = Template::builder()
            .vertex(activity("a", "A"))
            .vertex(activity("b", "B"))
            .vertex(activity("v", "V"))
            .edge(Edge::new("a", "b"))
            .edge(Edge::new("a", "v").missing())
            .edge(Edge::new("v", "b"))
            .build()
            .unwrap();

        let queries = translate(&template);
        assert_eq!(queries.len(), 2);
        let full = &queries[1];
        assert!(full.contains("\nMATCH (v:V:ACTIVITY)"));
        assert!(!full.contains("OPTIONAL MATCH (v"));
        assert!(full.contains("WHERE NONE (n IN nodes(p0) WHERE n=v)"));
        assert!(full.ends_with("RETURN p0,p1"));
        // the predecessor still checks the absent target exists
        assert_eq!(queries[0], "OPTIONAL MATCH (v:V:ACTIVITY)\nRETURN v");
    }

    #[rstest]
    fn test_later_edge_decides_optionality_optional_wins() {
        let template = Template::builder()
            .vertex(activity("a", "A"))
            .vertex(activity("b", "B"))
            .vertex(activity("v", "V"))
            .edge(Edge::new("v", "b"))
            .edge(Edge::new("a", "v").missing())
            .build()
            .unwrap();

        let queries = translate(&template);
        let full = &queries[1];
        assert!(full.contains("OPTIONAL MATCH (v:V:ACTIVITY)"));
        assert!(!full.contains("\nMATCH (v:V:ACTIVITY)"));
        assert!(!full.starts_with("MATCH (v"));
        // optional matches come after every relationship match
        let optional_at = full.find("OPTIONAL MATCH").unwrap();
        let edge_at = full.find("MATCH p0=").unwrap();
        assert!(edge_at < optional_at);
    }

    #[rstest]
    fn test_missing_edge_count_decides_query_count() {
        let base = Template::builder()
            .vertex(activity("a", "A"))
            .vertex(activity("b", "B"))
            .vertex(activity("c", "C"));

        let single = base.clone().edge(Edge::new("a", "b")).build().unwrap();
        assert_eq!(translate(&single).len(), 1);

        let double = base
            .edge(Edge::new("a", "b"))
            .edge(Edge::new("b", "c").missing())
            .build()
            .unwrap();
        let queries = translate(&double);
        assert_eq!(queries.len(), 2);
        assert!(queries[0].starts_with("OPTIONAL MATCH"));
        assert!(!queries[0].contains("WHERE"));
    }

    #[rstest]
    fn test_relation_counter_advances_on_missing_edges() {
        let template = Template::builder()
            .vertex(activity("a", "A"))
            .vertex(activity("b", "B"))
            .vertex(activity("c", "C"))
            .vertex(activity("d", "D"))
            .edge(Edge::new("a", "b"))
            .edge(Edge::new("a", "c").missing())
            .edge(Edge::new("b", "d"))
            .build()
            .unwrap();

        let full = translate(&template).remove(1);
        assert!(full.contains("MATCH p0=(a)-[r0]->(b)"));
        assert!(full.contains("MATCH p1=(b)-[r2]->(d)"));
    }

    #[rstest]
    fn test_compile_is_deterministic() {
        let template = Template::builder()
            .vertex(Vertex::placeholder("s1", VertexType::Activity, "S"))
            .vertex(Vertex::placeholder("s2", VertexType::Activity, "S"))
            .edge(Edge::new("s1", "s2").bounds(2, UpperBound::Bounded(5)))
            .build()
            .unwrap();

        let first = compile(&template);
        let second = compile(&template);
        assert_eq!(first, second);
        assert!(!first.is_two_phase());
        assert!(first.query.contains("[r0*2..5]"));
    }
}
