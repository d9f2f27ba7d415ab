use std::error::Error;

use serde::Serialize;

use super::ListCmd;
use crate::catalogue::{Catalogue, CatalogueEntry};
use crate::commands::Execute;

/// Summary of one catalogue pattern
#[derive(Debug, Clone, Serialize)]
pub struct PatternSummary {
    pub id: String,
    pub name: String,
    pub vertices: usize,
    pub edges: usize,
    pub two_phase: bool,
}

impl From<&CatalogueEntry> for PatternSummary {
    fn from(entry: &CatalogueEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            vertices: entry.template.vertex_count(),
            edges: entry.template.edges().len(),
            two_phase: entry.template.has_missing_edges(),
        }
    }
}

/// Result of the list command execution
#[derive(Debug, Default, Serialize)]
pub struct ListResult {
    pub patterns: Vec<PatternSummary>,
}

impl Execute for ListCmd {
    type Output = ListResult;

    fn execute(self, catalogue: &Catalogue) -> Result<Self::Output, Box<dyn Error>> {
        Ok(ListResult {
            patterns: catalogue.entries().iter().map(PatternSummary::from).collect(),
        })
    }
}
