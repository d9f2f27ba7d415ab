//! Cypher text forms used by the compiler.
//!
//! Every piece of query text the compiler emits is produced here, so the grammar
//! lives in one place:
//! - Node pattern: `(var[:variant]:TYPE)`
//! - Relationship pattern: `(from)-[rel[repeat]]->(to)`
//! - Match lines: `[OPTIONAL ]MATCH pattern`, `MATCH pN=relationship`
//! - Constraints: absence, condition and placeholder equality

use crate::template::{UpperBound, Vertex, VertexType};

/// A vertex as it appears in a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePattern {
    pub variable: String,
    pub variant: Option<String>,
    pub vertex_type: VertexType,
}

impl NodePattern {
    pub fn from_vertex(vertex: &Vertex) -> Self {
        Self {
            variable: vertex.id.clone(),
            variant: vertex.label_variant().map(str::to_string),
            vertex_type: vertex.vertex_type,
        }
    }

    pub fn render(&self) -> String {
        match &self.variant {
            Some(variant) => format!("({}:{}:{})", self.variable, variant, self.vertex_type),
            None => format!("({}:{})", self.variable, self.vertex_type),
        }
    }
}

/// A relationship between two bound vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipPattern {
    pub variable: String,
    pub from: String,
    pub to: String,
    pub lower: u32,
    pub upper: UpperBound,
}

impl RelationshipPattern {
    pub fn render(&self) -> String {
        format!(
            "({})-[{}{}]->({})",
            self.from,
            self.variable,
            repeat_modifier(self.lower, self.upper),
            self.to
        )
    }
}

/// Variable-length modifier for a relationship with the given repetition bounds.
pub fn repeat_modifier(lower: u32, upper: UpperBound) -> String {
    match (lower, upper) {
        (1, UpperBound::Bounded(1)) => String::new(),
        (1, UpperBound::Unbounded) => "*".to_string(),
        (l, UpperBound::Unbounded) if l > 1 => format!("*{}..", l),
        (l, u) => format!("*{}..{}", l, upper_text(u)),
    }
}

fn upper_text(upper: UpperBound) -> String {
    match upper {
        UpperBound::Bounded(n) => n.to_string(),
        // Only reachable for lower 0, which Cypher spells as an open range.
        UpperBound::Unbounded => String::new(),
    }
}

pub fn vertex_match(node: &NodePattern, optional: bool) -> String {
    format!("{}MATCH {}", if optional { "OPTIONAL " } else { "" }, node.render())
}

pub fn edge_match(path_variable: &str, relationship: &RelationshipPattern) -> String {
    format!("MATCH {}={}", path_variable, relationship.render())
}

/// No vertex equal to `vertex` lies on the path bound to `path_variable`.
pub fn absence_constraint(path_variable: &str, vertex: &str) -> String {
    format!("NONE (n IN nodes({}) WHERE n={})", path_variable, vertex)
}

pub fn condition_constraint(relation_variable: &str, condition: &str) -> String {
    format!("{}.condition=\"{}\"", relation_variable, escape_string(condition))
}

pub fn labels_equal(first: &str, second: &str) -> String {
    format!("labels({})=labels({})", first, second)
}

/// Escape a string for use inside a double-quoted Cypher string literal.
pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}
