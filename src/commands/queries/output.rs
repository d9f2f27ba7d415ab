//! Output formatting for compiled queries.

use crate::output::Outputable;
use crate::types::{PatternQueries, QueriesResult};

impl PatternQueries {
    fn to_block(&self) -> String {
        let divider = "-".repeat(self.name.chars().count());
        let mut lines = vec![self.name.clone(), divider.clone()];

        if let Some(predecessor) = &self.predecessor {
            lines.push("> First query (existence of target nodes)".to_string());
            lines.push(String::new());
            lines.push(predecessor.clone());
            lines.push(String::new());
            lines.push("> Second query (existence of anti-pattern)".to_string());
            lines.push(String::new());
        }

        lines.push(self.query.clone());
        lines.push(divider);
        lines.join("\n")
    }
}

impl Outputable for QueriesResult {
    fn to_table(&self) -> String {
        if self.patterns.is_empty() {
            return "No patterns.".to_string();
        }

        self.patterns
            .iter()
            .map(PatternQueries::to_block)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
