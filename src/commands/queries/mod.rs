mod execute;
mod output;

use clap::Args;

/// Print the compiled queries of catalogue anti-patterns
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  antipattern_search queries                          # Queries for every catalogue pattern
  antipattern_search queries -p apMissingReversal     # Queries for one pattern
  antipattern_search -o json queries -p apDoubleOpt   # As JSON")]
pub struct QueriesCmd {
    /// Pattern ids to compile (all patterns if omitted)
    #[arg(short, long = "pattern")]
    pub patterns: Vec<String>,
}
