//! Schema loading: format detection, file parsing, and the error taxonomy
//! shared by the loading and model-building stages.
//!
//! Loading is purely syntactic. A file that parses is handed to the model
//! builder as a [`RawValue`] tree, with no field checked yet.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::EntityKind;
use crate::raw::RawValue;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a schema and building the model.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// The source could not be read, or is not syntactically valid.
    #[error("failed to read schema {file}: {detail}")]
    SchemaRead { file: PathBuf, detail: String },

    /// A required field is absent.
    #[error("{owner}: missing required field '{field}'")]
    MissingField { owner: String, field: String },

    /// A field is present but holds the wrong kind of value.
    #[error("{owner}: field '{field}' must be {expected}, found {found}")]
    InvalidField {
        owner: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Two entities of the same kind share an id.
    #[error("duplicate {kind} id '{id}'")]
    DuplicateIdentifier { kind: EntityKind, id: String },

    /// An id cannot be turned into a valid symbol name.
    #[error("{kind} id '{id}' does not derive a valid symbol name")]
    InvalidSymbol { kind: EntityKind, id: String },

    /// An id derives a symbol the generated sources already use for a
    /// lookup table.
    #[error("{kind} id '{id}' derives symbol '{symbol}', which is reserved")]
    ReservedSymbol {
        kind: EntityKind,
        id: String,
        symbol: String,
    },

    /// More entities of one kind than a `u32` handle can index.
    #[error("too many {kind} entries: {count}")]
    CapacityExceeded { kind: EntityKind, count: usize },

    /// Two distinct ids derive the same symbol name.
    #[error("{kind} ids '{first}' and '{second}' both derive symbol '{symbol}'")]
    SymbolCollision {
        kind: EntityKind,
        symbol: String,
        first: String,
        second: String,
    },

    /// A set bonus stage names a skill that does not exist.
    #[error("set bonus '{set_bonus}' references unknown skill '{skill}'")]
    UnresolvedReference { set_bonus: String, skill: String },
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Ron,
    Toml,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Parse `content` in the given format.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::SchemaRead {
        file: file.to_path_buf(),
        detail,
    };

    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| DataLoadError::SchemaRead {
        file: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    deserialize_str(&content, format, path)
}

/// Load a schema file into a generic value tree.
pub fn load_schema(path: &Path) -> Result<RawValue, DataLoadError> {
    let value: RawValue = deserialize_file(path)?;
    tracing::debug!(file = %path.display(), "parsed schema");
    Ok(value)
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a skill name in a map, returning an `UnresolvedReference` error
/// naming the owning set bonus if not found.
pub fn resolve_skill<'a, V>(
    map: &'a HashMap<String, V>,
    skill: &str,
    set_bonus: &str,
) -> Result<&'a V, DataLoadError> {
    map.get(skill).ok_or_else(|| DataLoadError::UnresolvedReference {
        set_bonus: set_bonus.to_string(),
        skill: skill.to_string(),
    })
}

/// Check whether an id already exists in a map, returning a
/// `DuplicateIdentifier` error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    id: &str,
    kind: EntityKind,
) -> Result<(), DataLoadError> {
    if map.contains_key(id) {
        Err(DataLoadError::DuplicateIdentifier {
            kind,
            id: id.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
