//! Anti-pattern catalogue.
//!
//! Holds the built-in anti-pattern templates and loads additional catalogues
//! from JSON files of the form:
//!
//! ```json
//! {
//!   "patterns": [
//!     {"id": "apDoubleOpt", "name": "Double optimization", "template": {...}}
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::template::{Edge, Template, TemplateDef, TemplateError, UpperBound, Vertex, VertexType};

pub const DOUBLE_OPT: &str = "apDoubleOpt";
pub const REDUNDANT_SERVICES: &str = "apRedundantServices";
pub const NO_CONDITION: &str = "apNoCondition";
pub const MISSING_REVERSAL: &str = "apMissingReversal";
pub const ABUSING_OPT: &str = "apAbusingOpt";

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Failed to read catalogue file '{path}': {message}")]
    FileReadFailed { path: String, message: String },

    #[error("Failed to parse catalogue JSON: {message}")]
    JsonParseFailed { message: String },

    #[error("Invalid template for pattern '{id}': {source}")]
    InvalidTemplate {
        id: String,
        #[source]
        source: TemplateError,
    },

    #[error("Duplicate pattern id '{id}'")]
    DuplicatePattern { id: String },

    #[error("Unknown pattern '{id}'")]
    UnknownPattern { id: String },
}

/// A named anti-pattern template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub id: String,
    pub name: String,
    pub template: Template,
}

#[derive(Debug, Deserialize)]
struct CatalogueFile {
    patterns: Vec<PatternDef>,
}

#[derive(Debug, Deserialize)]
struct PatternDef {
    id: String,
    name: String,
    template: TemplateDef,
}

/// An ordered set of anti-pattern templates with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in anti-patterns for network analysis process models.
    pub fn builtin() -> Result<Self, CatalogueError> {
        let mut catalogue = Catalogue::new();
        catalogue.add(DOUBLE_OPT, "Double optimization", double_opt())?;
        catalogue.add(REDUNDANT_SERVICES, "Redundant services", redundant_services())?;
        catalogue.add(
            NO_CONDITION,
            "No conditional processing of optimization output",
            no_condition(),
        )?;
        catalogue.add(
            MISSING_REVERSAL,
            "Missing reversal of network reduction",
            missing_reversal(),
        )?;
        catalogue.add(
            ABUSING_OPT,
            "Using optimization for identification of topology faults",
            abusing_opt(),
        )?;
        Ok(catalogue)
    }

    /// Load a catalogue from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogueError> {
        let content = fs::read_to_string(path).map_err(|e| CatalogueError::FileReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let file: CatalogueFile =
            serde_json::from_str(json).map_err(|e| CatalogueError::JsonParseFailed {
                message: e.to_string(),
            })?;

        let mut catalogue = Catalogue::new();
        for pattern in file.patterns {
            let id = pattern.id;
            catalogue.add(&id, &pattern.name, Template::try_from(pattern.template))?;
        }
        debug!(patterns = catalogue.len(), "loaded catalogue");
        Ok(catalogue)
    }

    fn add(
        &mut self,
        id: &str,
        name: &str,
        template: Result<Template, TemplateError>,
    ) -> Result<(), CatalogueError> {
        let template = template.map_err(|source| CatalogueError::InvalidTemplate {
            id: id.to_string(),
            source,
        })?;
        self.insert(CatalogueEntry {
            id: id.to_string(),
            name: name.to_string(),
            template,
        })
    }

    pub fn insert(&mut self, entry: CatalogueEntry) -> Result<(), CatalogueError> {
        if self.get(&entry.id).is_some() {
            return Err(CatalogueError::DuplicatePattern { id: entry.id });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Append every entry of `other`, rejecting ids that already exist.
    pub fn extend(&mut self, other: Catalogue) -> Result<(), CatalogueError> {
        for entry in other.entries {
            self.insert(entry)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&CatalogueEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Select entries by id, in the order given. An empty selection means all.
    pub fn select(&self, ids: &[String]) -> Result<Vec<&CatalogueEntry>, CatalogueError> {
        if ids.is_empty() {
            return Ok(self.entries.iter().collect());
        }
        ids.iter()
            .map(|id| {
                self.get(id)
                    .ok_or_else(|| CatalogueError::UnknownPattern { id: id.clone() })
            })
            .collect()
    }

    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn double_opt() -> Result<Template, TemplateError> {
    Template::builder()
        .vertex(Vertex::new("opt1", VertexType::Activity, "NW_OPT"))
        .vertex(Vertex::new("opt2", VertexType::Activity, "NW_OPT"))
        .edge(Edge::new("opt1", "opt2"))
        .build()
}

fn redundant_services() -> Result<Template, TemplateError> {
    Template::builder()
        .vertex(Vertex::placeholder("s1", VertexType::Activity, "S"))
        .vertex(Vertex::placeholder("s2", VertexType::Activity, "S"))
        .edge(Edge::new("s1", "s2"))
        .build()
}

fn no_condition() -> Result<Template, TemplateError> {
    Template::builder()
        .vertex(Vertex::new("opt", VertexType::Activity, "NW_OPT"))
        .vertex(Vertex::placeholder("s", VertexType::Activity, ""))
        .edge(Edge::new("opt", "s"))
        .build()
}

fn missing_reversal() -> Result<Template, TemplateError> {
    Template::builder()
        .vertex(Vertex::new("red", VertexType::Activity, "NW_RED"))
        .vertex(Vertex::new("rev", VertexType::Activity, "NW_RR"))
        .vertex(Vertex::new("end", VertexType::Event, "END"))
        .edge(Edge::new("red", "end").upper(UpperBound::Unbounded))
        .edge(Edge::new("red", "rev").upper(UpperBound::Unbounded).missing())
        .build()
}

fn abusing_opt() -> Result<Template, TemplateError> {
    Template::builder()
        .vertex(Vertex::new("opt", VertexType::Activity, "NW_OPT"))
        .vertex(Vertex::new("gw", VertexType::Gateway, "EXCLUSIVE"))
        .vertex(Vertex::new("tf", VertexType::Activity, "VIS_TOP"))
        .edge(Edge::new("opt", "gw").upper(UpperBound::Unbounded))
        .edge(Edge::new("gw", "tf").condition("incorrect topology"))
        .build()
}
