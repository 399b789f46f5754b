use std::path::PathBuf;

use skilldb_data::DataLoadError;

/// Errors that can occur while generating the skill database sources.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// Loading the schema or building the model failed.
    #[error(transparent)]
    Data(#[from] DataLoadError),

    /// The generator configuration is unreadable or invalid.
    #[error("config error in {file}: {detail}")]
    Config { file: PathBuf, detail: String },

    /// A string field cannot be emitted as a C++ string literal.
    #[error("{owner}: field '{field}' contains unsupported character {character:?}")]
    UnsupportedCharacter {
        owner: String,
        field: &'static str,
        character: char,
    },

    /// Writing a generated document failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
