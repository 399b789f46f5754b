//! Writes generated documents to disk.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::OutputPaths;
use crate::error::CodegenError;
use crate::render::GeneratedSources;

/// Sibling temporary path used while a document is being written.
fn temp_path(path: &Path) -> Option<PathBuf> {
    let mut name: OsString = path.file_name()?.to_os_string();
    name.push(".tmp");
    Some(path.with_file_name(name))
}

/// Replace the file at `path` with `contents`.
///
/// The document is written to a temporary sibling file and renamed over the
/// target, so the target holds either its previous contents or the complete
/// new document. The parent directory must already exist.
pub fn write_document(path: &Path, contents: &str) -> Result<(), CodegenError> {
    let write_err = |source: io::Error| CodegenError::Write {
        path: path.to_path_buf(),
        source,
    };

    let temp_path = temp_path(path).ok_or_else(|| {
        write_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "output path has no file name",
        ))
    })?;

    if let Err(e) = fs::write(&temp_path, contents) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(e));
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(e));
    }

    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote generated document");
    Ok(())
}

/// Write both documents, declarations first.
///
/// The two writes are independent: if the second fails, the first has
/// already been replaced, and the run as a whole must be treated as failed.
pub fn write_sources(sources: &GeneratedSources, paths: &OutputPaths) -> Result<(), CodegenError> {
    write_document(&paths.declarations, &sources.declarations)?;
    write_document(&paths.definitions, &sources.definitions)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "skilldb_sink_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn temp_path_is_sibling() {
        assert_eq!(
            temp_path(Path::new("src/database/database_skills.h")),
            Some(PathBuf::from("src/database/database_skills.h.tmp"))
        );
        assert_eq!(temp_path(Path::new("/")), None);
    }

    #[test]
    fn write_document_overwrites() {
        let dir = make_test_dir("overwrite");
        let path = dir.join("database_skills.h");
        fs::write(&path, "old contents that are longer than the new ones").unwrap();

        write_document(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.join("database_skills.h.tmp").exists());

        cleanup(&dir);
    }

    #[test]
    fn write_document_missing_directory() {
        let dir = make_test_dir("missing_dir");
        let path = dir.join("autogenerated").join("database_skills.cpp");

        let result = write_document(&path, "x");
        assert!(matches!(
            result,
            Err(CodegenError::Write { path: ref p, .. }) if *p == path
        ));
        assert!(!path.exists());

        cleanup(&dir);
    }

    #[test]
    fn write_sources_writes_both() {
        let dir = make_test_dir("both");
        let paths = OutputPaths {
            declarations: dir.join("skills.h"),
            definitions: dir.join("skills.cpp"),
        };
        let sources = GeneratedSources {
            declarations: "header".to_string(),
            definitions: "source".to_string(),
        };

        write_sources(&sources, &paths).unwrap();
        assert_eq!(fs::read_to_string(&paths.declarations).unwrap(), "header");
        assert_eq!(fs::read_to_string(&paths.definitions).unwrap(), "source");

        cleanup(&dir);
    }
}
