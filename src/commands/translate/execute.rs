use std::error::Error;
use std::fs;

use thiserror::Error;

use super::TranslateCmd;
use crate::catalogue::Catalogue;
use crate::commands::Execute;
use crate::template::{Template, TemplateError, TemplateParseError};
use crate::types::{PatternQueries, QueriesResult};

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Failed to read template file '{path}': {message}")]
    FileReadFailed { path: String, message: String },

    #[error("Failed to parse template JSON: {message}")]
    JsonParseFailed { message: String },

    #[error("Invalid template '{path}': {source}")]
    InvalidTemplate {
        path: String,
        #[source]
        source: TemplateError,
    },
}

impl Execute for TranslateCmd {
    type Output = QueriesResult;

    fn execute(self, _catalogue: &Catalogue) -> Result<Self::Output, Box<dyn Error>> {
        let path = self.file.display().to_string();

        let content = fs::read_to_string(&self.file).map_err(|e| TranslateError::FileReadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let template = Template::from_json(&content).map_err(|e| match e {
            TemplateParseError::Json(e) => TranslateError::JsonParseFailed {
                message: e.to_string(),
            },
            TemplateParseError::Invalid(source) => TranslateError::InvalidTemplate {
                path: path.clone(),
                source,
            },
        })?;

        let stem = self
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        let name = self.name.unwrap_or_else(|| stem.clone());

        Ok(QueriesResult {
            patterns: vec![PatternQueries::compile(&stem, &name, &template)],
        })
    }
}
