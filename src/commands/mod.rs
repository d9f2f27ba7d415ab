//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - `execute.rs` producing a serializable result
//! - `output.rs` with its table formatting

mod list;
mod queries;
mod translate;

pub use list::ListCmd;
pub use queries::QueriesCmd;
pub use translate::TranslateCmd;

use clap::Subcommand;
use enum_dispatch::enum_dispatch;
use std::error::Error;

use crate::catalogue::Catalogue;
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, catalogue: &Catalogue) -> Result<Self::Output, Box<dyn Error>>;
}

/// Execute a command and format its result.
#[enum_dispatch]
pub trait CommandRunner {
    fn run(self, catalogue: &Catalogue, format: OutputFormat) -> Result<String, Box<dyn Error>>;
}

#[enum_dispatch(CommandRunner)]
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the compiled queries of catalogue anti-patterns
    Queries(QueriesCmd),

    /// Compile a template JSON file into queries
    Translate(TranslateCmd),

    /// List the anti-patterns in the catalogue
    List(ListCmd),
}

impl CommandRunner for QueriesCmd {
    fn run(self, catalogue: &Catalogue, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        Ok(self.execute(catalogue)?.format(format))
    }
}

impl CommandRunner for TranslateCmd {
    fn run(self, catalogue: &Catalogue, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        Ok(self.execute(catalogue)?.format(format))
    }
}

impl CommandRunner for ListCmd {
    fn run(self, catalogue: &Catalogue, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        Ok(self.execute(catalogue)?.format(format))
    }
}
