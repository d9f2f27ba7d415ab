use clap::Parser;
use tracing_subscriber::EnvFilter;

use antipattern_search::cli::Args;
use antipattern_search::commands::CommandRunner;
use antipattern_search::config::ConfigFile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ConfigFile::resolve(args.config.as_deref())?;
    let catalogue = config.catalogue.load()?;

    let output = args.command.run(&catalogue, args.format)?;
    println!("{}", output);
    Ok(())
}
