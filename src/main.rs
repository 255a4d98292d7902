use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use flagscope::config::{EngineOptions, DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_FILE};
use flagscope::logging::init_tracing;
use flagscope::project::ProjectIndexCache;
use flagscope::{FlagsResponse, Resolver};

#[derive(Debug, Parser)]
#[command(name = "flagscope", version, about = "Resolve compiler flags for source and header files")]
struct Cli {
    /// Print a JSON object keyed by file instead of one line per file
    #[arg(long)]
    json: bool,

    /// Compilation database file name to search for
    #[arg(long, value_name = "NAME", default_value = DEFAULT_DATABASE_FILE)]
    database_file: String,

    /// Project config file name to search for
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    /// Files to resolve
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let cache = ProjectIndexCache::with_options(EngineOptions {
        database_file: cli.database_file,
        config_file: cli.config_file,
    });
    let resolver = Resolver::new(cache);

    let responses: Vec<(String, FlagsResponse)> = cli
        .files
        .iter()
        .map(|file| (file.display().to_string(), resolver.flags_for_file(file)))
        .collect();
    let all_resolved = responses.iter().all(|(_, r)| !r.flags.is_empty());

    if cli.json {
        let by_file: BTreeMap<_, _> = responses.into_iter().collect();
        let out = serde_json::to_string_pretty(&by_file).context("failed to encode flags as JSON")?;
        println!("{out}");
    } else {
        for (file, response) in &responses {
            println!("{}: {}", file, response.flags.join(" "));
        }
    }

    Ok(if all_resolved {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
