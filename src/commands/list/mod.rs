mod execute;
mod output;

use clap::Args;

/// List the anti-patterns in the catalogue
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  antipattern_search list             # All catalogue patterns
  antipattern_search -o toon list     # Token-efficient listing")]
pub struct ListCmd {}
