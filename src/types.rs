//! Result types shared by the commands.

use serde::Serialize;

use crate::catalogue::CatalogueEntry;
use crate::compiler::{self, CompiledPattern};
use crate::template::Template;

/// The compiled queries of one named template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternQueries {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predecessor: Option<String>,
    pub query: String,
}

impl PatternQueries {
    pub fn compile(id: &str, name: &str, template: &Template) -> Self {
        let CompiledPattern { predecessor, query } = compiler::compile(template);
        Self {
            id: id.to_string(),
            name: name.to_string(),
            predecessor,
            query,
        }
    }

    pub fn from_entry(entry: &CatalogueEntry) -> Self {
        Self::compile(&entry.id, &entry.name, &entry.template)
    }
}

/// Compiled queries for a list of templates.
#[derive(Debug, Default, Serialize)]
pub struct QueriesResult {
    pub patterns: Vec<PatternQueries>,
}
