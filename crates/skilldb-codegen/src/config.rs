//! Generator configuration.
//!
//! The generator takes no arguments. Every setting has a fixed default; an
//! optional `skilldb.toml` in the working directory may override them.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use skilldb_data::model::is_valid_identifier;

use crate::error::CodegenError;

/// Location of the optional override file.
pub const CONFIG_PATH: &str = "./skilldb.toml";

pub const DEFAULT_INPUT_PATH: &str = "./data/database_skills.json";
pub const DEFAULT_DECLARATIONS_PATH: &str = "./src/database/database_skills.h";
pub const DEFAULT_DEFINITIONS_PATH: &str = "./src/database/autogenerated/database_skills.cpp";

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Schema file to read.
    pub input: PathBuf,
    pub output: OutputPaths,
    pub render: RenderOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: OutputPaths::default(),
            render: RenderOptions::default(),
        }
    }
}

/// Where the two generated documents are written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPaths {
    pub declarations: PathBuf,
    pub definitions: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            declarations: PathBuf::from(DEFAULT_DECLARATIONS_PATH),
            definitions: PathBuf::from(DEFAULT_DEFINITIONS_PATH),
        }
    }
}

/// Names baked into the generated C++.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Namespace wrapping the generated records and functions.
    pub namespace: String,
    /// Namespace declaring the `Skill` and `SetBonus` structs.
    pub core_namespace: String,
    /// Include path of the header declaring `Skill` and `SetBonus`.
    pub core_header: String,
    /// Include path of the declarations document, relative to the definitions document.
    pub header_include: String,
    pub include_guard: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            namespace: "SkillsDatabase".to_string(),
            core_namespace: "MHWIBuildSearch".to_string(),
            core_header: "../core/core.h".to_string(),
            header_include: "../database_skills.h".to_string(),
            include_guard: "SKILLS_DATABASE_H".to_string(),
        }
    }
}

impl RenderOptions {
    /// Check that every option can be emitted verbatim.
    pub fn validate(&self, file: &Path) -> Result<(), CodegenError> {
        let config_err = |detail: String| CodegenError::Config {
            file: file.to_path_buf(),
            detail,
        };

        for (key, value) in [
            ("namespace", &self.namespace),
            ("core_namespace", &self.core_namespace),
            ("include_guard", &self.include_guard),
        ] {
            if !is_valid_identifier(value) {
                return Err(config_err(format!(
                    "render.{key} '{value}' is not a valid identifier"
                )));
            }
        }
        for (key, value) in [
            ("core_header", &self.core_header),
            ("header_include", &self.header_include),
        ] {
            if value.is_empty() || value.chars().any(|c| c == '"' || c.is_control()) {
                return Err(config_err(format!(
                    "render.{key} '{value}' is not a usable include path"
                )));
            }
        }
        Ok(())
    }
}

/// Load the configuration from `path`, or fall back to defaults if the file
/// does not exist.
pub fn load_config(path: &Path) -> Result<GeneratorConfig, CodegenError> {
    if !path.exists() {
        tracing::debug!(file = %path.display(), "no config file, using defaults");
        return Ok(GeneratorConfig::default());
    }

    let config_err = |detail: String| CodegenError::Config {
        file: path.to_path_buf(),
        detail,
    };
    let content = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
    let config: GeneratorConfig = toml::from_str(&content).map_err(|e| config_err(e.to_string()))?;
    config.render.validate(path)?;

    tracing::info!(file = %path.display(), "loaded generator config");
    Ok(config)
}
