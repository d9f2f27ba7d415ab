//! Statement collections and fragment merging.

use indexmap::IndexMap;

use super::cypher::{self, NodePattern, RelationshipPattern};

/// A vertex that must (or may) be matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexMatch {
    pub node: NodePattern,
    pub optional: bool,
}

impl VertexMatch {
    pub fn render(&self) -> String {
        cypher::vertex_match(&self.node, self.optional)
    }
}

/// A relationship match bound to a path variable that is returned later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMatch {
    pub path_variable: String,
    pub relationship: RelationshipPattern,
}

impl EdgeMatch {
    pub fn render(&self) -> String {
        cypher::edge_match(&self.path_variable, &self.relationship)
    }
}

/// Statements that can be assembled into a query.
///
/// Produced per edge by the edge compiler and folded into one running
/// collection with [`StatementCollection::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementCollection {
    /// Vertex matches keyed by vertex id, in first-insertion order
    pub vertex_matches: IndexMap<String, VertexMatch>,
    pub edge_matches: Vec<EdgeMatch>,
    pub constraints: Vec<String>,
    /// Placeholder group name -> ids of the vertices seen in that group
    pub placeholders: IndexMap<String, Vec<String>>,
    /// Targets of missing edges, in arrival order
    pub absent_targets: Vec<String>,
}

impl StatementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vertex match, replacing any earlier match for the same vertex.
    pub fn match_vertex(&mut self, node: NodePattern, optional: bool) {
        self.vertex_matches
            .insert(node.variable.clone(), VertexMatch { node, optional });
    }

    pub fn add_placeholder(&mut self, group: &str, vertex: &str) {
        self.placeholders
            .entry(group.to_string())
            .or_default()
            .push(vertex.to_string());
    }

    /// Fold `other` into this collection.
    ///
    /// Vertex matches overwrite by id: the last edge touching a vertex decides its
    /// label pattern and optionality, while the vertex keeps its original position.
    /// Everything else accumulates in arrival order.
    pub fn merge(&mut self, other: StatementCollection) {
        for (id, vertex_match) in other.vertex_matches {
            self.vertex_matches.insert(id, vertex_match);
        }
        self.edge_matches.extend(other.edge_matches);
        self.constraints.extend(other.constraints);
        for (group, members) in other.placeholders {
            self.placeholders.entry(group).or_default().extend(members);
        }
        self.absent_targets.extend(other.absent_targets);
    }

    pub fn mandatory_vertices(&self) -> impl Iterator<Item = &VertexMatch> {
        self.vertex_matches.values().filter(|m| !m.optional)
    }

    pub fn optional_vertices(&self) -> impl Iterator<Item = &VertexMatch> {
        self.vertex_matches.values().filter(|m| m.optional)
    }
}
