//! JSON structures for template files.
//!
//! These are the raw, unvalidated shapes read from disk. Converting a
//! [`TemplateDef`] into a [`Template`] runs the same validation as the builder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Edge, Template, TemplateError, UpperBound, Vertex, VertexType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDef {
    pub vertices: Vec<VertexDef>,
    pub edges: Vec<EdgeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexDef {
    pub id: String,
    #[serde(rename = "type")]
    pub vertex_type: VertexType,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub placeholder: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDef {
    pub from: String,
    pub to: String,
    #[serde(default = "default_lower")]
    pub lower: i64,
    #[serde(default)]
    pub upper: UpperDef,
    #[serde(default)]
    pub missing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// Upper bound as written in JSON: a number, `"unbounded"` or `"*"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpperDef {
    Count(i64),
    Keyword(String),
}

impl Default for UpperDef {
    fn default() -> Self {
        UpperDef::Count(1)
    }
}

fn default_lower() -> i64 {
    1
}

fn bound_value(edge: usize, bound: &'static str, value: i64) -> Result<u32, TemplateError> {
    if value < 0 {
        return Err(TemplateError::NegativeBound { edge, bound, value });
    }
    u32::try_from(value).map_err(|_| TemplateError::BoundOutOfRange { edge, bound, value })
}

impl UpperDef {
    fn resolve(&self, edge: usize) -> Result<UpperBound, TemplateError> {
        match self {
            UpperDef::Count(n) => Ok(UpperBound::Bounded(bound_value(edge, "upper", *n)?)),
            UpperDef::Keyword(k) if k == "unbounded" || k == "*" => Ok(UpperBound::Unbounded),
            UpperDef::Keyword(k) => Err(TemplateError::InvalidUpperBound {
                edge,
                value: k.clone(),
            }),
        }
    }
}

impl TryFrom<TemplateDef> for Template {
    type Error = TemplateError;

    fn try_from(def: TemplateDef) -> Result<Self, Self::Error> {
        let mut builder = Template::builder();

        for v in def.vertices {
            builder = builder.vertex(Vertex {
                id: v.id,
                vertex_type: v.vertex_type,
                variant: v.variant,
                placeholder: v.placeholder,
            });
        }

        for (index, e) in def.edges.into_iter().enumerate() {
            let lower = bound_value(index, "lower", e.lower)?;
            let upper = e.upper.resolve(index)?;
            builder = builder.edge(Edge {
                from: e.from,
                to: e.to,
                lower,
                upper,
                missing: e.missing,
                condition: e.condition,
            });
        }

        builder.build()
    }
}

/// Failure to read a template from JSON text.
#[derive(Error, Debug)]
pub enum TemplateParseError {
    #[error("Failed to parse template JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] TemplateError),
}

impl Template {
    /// Parse and validate a template from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, TemplateParseError> {
        let def: TemplateDef = serde_json::from_str(json)?;
        Ok(Template::try_from(def)?)
    }
}
