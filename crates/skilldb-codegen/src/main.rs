//! Regenerates the skill database C++ sources from `data/database_skills.json`.
//!
//! Takes no arguments. Paths are fixed unless overridden by `./skilldb.toml`.

use std::path::Path;
use std::process::ExitCode;

use skilldb_codegen::config::CONFIG_PATH;
use skilldb_codegen::{load_config, logging, run};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(logging::env_filter())
        .with_writer(std::io::stderr)
        .init();

    let result = load_config(Path::new(CONFIG_PATH)).and_then(|config| run(&config));

    match result {
        Ok(summary) => {
            tracing::info!(
                skills = summary.skills,
                set_bonuses = summary.set_bonuses,
                "skill database regenerated"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
