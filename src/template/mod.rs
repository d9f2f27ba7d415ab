//! Anti-pattern templates.
//!
//! A template is a small pattern graph of typed vertices and edges describing a
//! known structural flaw in a process model. Templates are validated eagerly when
//! they are built, so the compiler only ever sees well-formed input.
//!
//! # Example
//!
//! ```
//! use antipattern_search::template::{Edge, Template, UpperBound, Vertex, VertexType};
//!
//! let template = Template::builder()
//!     .vertex(Vertex::new("red", VertexType::Activity, "NW_RED"))
//!     .vertex(Vertex::new("end", VertexType::Event, "END"))
//!     .edge(Edge::new("red", "end").upper(UpperBound::Unbounded))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(template.edges().len(), 1);
//! ```

mod models;

pub use models::{EdgeDef, TemplateDef, TemplateParseError, UpperDef, VertexDef};

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed vertex types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VertexType {
    Activity,
    Event,
    Gateway,
}

impl VertexType {
    /// Returns the graph label used for this type.
    pub fn label(&self) -> &'static str {
        match self {
            VertexType::Activity => "ACTIVITY",
            VertexType::Event => "EVENT",
            VertexType::Gateway => "GATEWAY",
        }
    }
}

impl fmt::Display for VertexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A vertex of an anti-pattern template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    /// Unique id within the template, also used as the query variable
    pub id: String,
    pub vertex_type: VertexType,
    /// Secondary label, or the placeholder group name when `placeholder` is set
    pub variant: String,
    pub placeholder: bool,
}

impl Vertex {
    pub fn new(id: impl Into<String>, vertex_type: VertexType, variant: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vertex_type,
            variant: variant.into(),
            placeholder: false,
        }
    }

    /// Create a placeholder vertex belonging to the placeholder group `group`.
    ///
    /// Its concrete label is left open, but must equal the label of the other
    /// vertices in the same group.
    pub fn placeholder(id: impl Into<String>, vertex_type: VertexType, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vertex_type,
            variant: group.into(),
            placeholder: true,
        }
    }

    /// The variant that constrains the vertex label, if any.
    ///
    /// Placeholders never constrain their label, and an empty variant adds nothing.
    pub fn label_variant(&self) -> Option<&str> {
        if self.placeholder || self.variant.is_empty() {
            None
        } else {
            Some(&self.variant)
        }
    }

    /// Placeholder group name, for placeholder vertices only.
    pub fn placeholder_group(&self) -> Option<&str> {
        self.placeholder.then_some(self.variant.as_str())
    }
}

/// Upper repetition bound of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UpperBound {
    Bounded(u32),
    Unbounded,
}

impl UpperBound {
    fn admits(&self, lower: u32) -> bool {
        match self {
            UpperBound::Bounded(upper) => lower <= *upper,
            UpperBound::Unbounded => true,
        }
    }
}

impl fmt::Display for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpperBound::Bounded(n) => write!(f, "{}", n),
            UpperBound::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// An edge of an anti-pattern template.
///
/// Defaults to `[1..1]` repetition, not missing and no condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub lower: u32,
    pub upper: UpperBound,
    /// The connection must not exist in the matched data
    pub missing: bool,
    /// Required value of the relationship's `condition` property
    pub condition: Option<String>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            lower: 1,
            upper: UpperBound::Bounded(1),
            missing: false,
            condition: None,
        }
    }

    pub fn lower(mut self, lower: u32) -> Self {
        self.lower = lower;
        self
    }

    pub fn upper(mut self, upper: UpperBound) -> Self {
        self.upper = upper;
        self
    }

    pub fn bounds(self, lower: u32, upper: UpperBound) -> Self {
        self.lower(lower).upper(upper)
    }

    pub fn missing(mut self) -> Self {
        self.missing = true;
        self
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Broad classification of template construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateErrorKind {
    /// An edge points at a vertex that is not part of the template
    Reference,
    /// The template is structurally invalid
    Validation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Edge {edge} references unknown vertex '{vertex}'")]
    UnknownVertex { edge: usize, vertex: String },

    #[error("Edge {edge} has invalid bounds: lower {lower} exceeds upper {upper}")]
    InvalidBounds { edge: usize, lower: u32, upper: UpperBound },

    #[error("Edge {edge} has negative {bound} bound {value}")]
    NegativeBound { edge: usize, bound: &'static str, value: i64 },

    #[error("Edge {edge} has {bound} bound {value} out of range (maximum {max})", max = u32::MAX)]
    BoundOutOfRange { edge: usize, bound: &'static str, value: i64 },

    #[error("Edge {edge} has invalid upper bound '{value}' (expected a number, \"unbounded\" or \"*\")")]
    InvalidUpperBound { edge: usize, value: String },

    #[error("Invalid {field} '{value}': expected letters, digits or '_', not starting with a digit")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("Duplicate vertex id '{id}'")]
    DuplicateVertex { id: String },

    #[error("Template has no edges")]
    NoEdges,

    #[error("Missing edge {edge} has no preceding edge to anchor its absence check")]
    UnanchoredMissingEdge { edge: usize },
}

impl TemplateError {
    pub fn kind(&self) -> TemplateErrorKind {
        match self {
            TemplateError::UnknownVertex { .. } => TemplateErrorKind::Reference,
            _ => TemplateErrorKind::Validation,
        }
    }
}

/// A validated, immutable anti-pattern graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    vertices: IndexMap<String, Vertex>,
    edges: Vec<Edge>,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether the template tests for the absence of a connection.
    pub fn has_missing_edges(&self) -> bool {
        self.edges.iter().any(|e| e.missing)
    }

    /// Look up both endpoints of an edge.
    ///
    /// Endpoints always exist for edges of this template.
    pub(crate) fn endpoints(&self, edge: &Edge) -> (&Vertex, &Vertex) {
        (&self.vertices[edge.from.as_str()], &self.vertices[edge.to.as_str()])
    }
}

/// Collects vertices and edges and validates them into a [`Template`].
#[derive(Debug, Default, Clone)]
pub struct TemplateBuilder {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl TemplateBuilder {
    pub fn vertex(mut self, vertex: Vertex) -> Self {
        self.vertices.push(vertex);
        self
    }

    pub fn edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Validate and build the template.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A vertex id, variant or placeholder group is not a plain identifier
    /// - Two vertices share an id
    /// - There are no edges
    /// - An edge references an unknown vertex
    /// - An edge has `lower > upper`
    /// - A missing edge comes before any present edge
    pub fn build(self) -> Result<Template, TemplateError> {
        let mut vertices = IndexMap::with_capacity(self.vertices.len());
        for vertex in self.vertices {
            check_identifier("vertex id", &vertex.id)?;
            if !vertex.variant.is_empty() {
                let field = if vertex.placeholder {
                    "placeholder group"
                } else {
                    "variant"
                };
                check_identifier(field, &vertex.variant)?;
            }
            if vertices.contains_key(&vertex.id) {
                return Err(TemplateError::DuplicateVertex { id: vertex.id });
            }
            vertices.insert(vertex.id.clone(), vertex);
        }

        if self.edges.is_empty() {
            return Err(TemplateError::NoEdges);
        }

        let mut anchored = false;
        for (index, edge) in self.edges.iter().enumerate() {
            for id in [&edge.from, &edge.to] {
                if !vertices.contains_key(id) {
                    return Err(TemplateError::UnknownVertex {
                        edge: index,
                        vertex: id.clone(),
                    });
                }
            }

            if !edge.upper.admits(edge.lower) {
                return Err(TemplateError::InvalidBounds {
                    edge: index,
                    lower: edge.lower,
                    upper: edge.upper,
                });
            }

            // The absence check refers to the last path matched before it.
            if edge.missing && !anchored {
                return Err(TemplateError::UnanchoredMissingEdge { edge: index });
            }
            anchored |= !edge.missing;
        }

        Ok(Template {
            vertices,
            edges: self.edges,
        })
    }
}

/// Ids and variants become Cypher variables and labels, so they must match
/// `[A-Za-z_][A-Za-z0-9_]*`.
fn check_identifier(field: &'static str, value: &str) -> Result<(), TemplateError> {
    let mut chars = value.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(TemplateError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}
