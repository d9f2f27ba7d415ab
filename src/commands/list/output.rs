//! Output formatting for the catalogue listing.

use super::execute::ListResult;
use crate::output::Outputable;

impl Outputable for ListResult {
    fn to_table(&self) -> String {
        let mut lines = vec![format!("Anti-patterns ({}):", self.patterns.len())];

        if self.patterns.is_empty() {
            lines.push(String::new());
            lines.push("No patterns.".to_string());
            return lines.join("\n");
        }

        for p in &self.patterns {
            let phases = if p.two_phase { ", two-phase" } else { "" };
            lines.push(format!(
                "  {} - {} ({} vertices, {} edges{})",
                p.id, p.name, p.vertices, p.edges, phases
            ));
        }

        lines.join("\n")
    }
}
