//! End-to-end generation: load, build, render, write.

use skilldb_data::{build_database, load_schema};

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::render::{GeneratedSources, render};
use crate::sink::write_sources;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub skills: usize,
    pub set_bonuses: usize,
    pub declarations_bytes: usize,
    pub definitions_bytes: usize,
}

/// Load the schema and render both documents without touching the outputs.
pub fn generate(config: &GeneratorConfig) -> Result<(GeneratedSources, RunSummary), CodegenError> {
    let raw = load_schema(&config.input)?;
    let db = build_database(&raw)?;
    let sources = render(&db, &config.render)?;

    let summary = RunSummary {
        skills: db.skills().len(),
        set_bonuses: db.set_bonuses().len(),
        declarations_bytes: sources.declarations.len(),
        definitions_bytes: sources.definitions.len(),
    };
    Ok((sources, summary))
}

/// Run the whole pipeline. Nothing is written unless every earlier stage
/// succeeded.
pub fn run(config: &GeneratorConfig) -> Result<RunSummary, CodegenError> {
    tracing::info!(input = %config.input.display(), "regenerating skill database");
    let (sources, summary) = generate(config)?;
    write_sources(&sources, &config.output)?;
    Ok(summary)
}
