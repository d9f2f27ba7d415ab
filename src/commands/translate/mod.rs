mod execute;

use std::path::PathBuf;

use clap::Args;

fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("File not found: {}", path.display()))
    }
}

/// Compile a template JSON file into queries
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  antipattern_search translate -f template.json              # Compile one template
  antipattern_search translate -f t.json -n 'Double opt'     # With a display name")]
pub struct TranslateCmd {
    /// Path to the template JSON file
    #[arg(short, long, value_parser = validate_file_exists)]
    pub file: PathBuf,

    /// Display name (defaults to the file stem)
    #[arg(short, long)]
    pub name: Option<String>,
}
