use std::error::Error;

use super::QueriesCmd;
use crate::catalogue::Catalogue;
use crate::commands::Execute;
use crate::types::{PatternQueries, QueriesResult};

impl Execute for QueriesCmd {
    type Output = QueriesResult;

    fn execute(self, catalogue: &Catalogue) -> Result<Self::Output, Box<dyn Error>> {
        let patterns = catalogue
            .select(&self.patterns)?
            .into_iter()
            .map(PatternQueries::from_entry)
            .collect();

        Ok(QueriesResult { patterns })
    }
}
