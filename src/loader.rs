//! Schema directory loading
//!
//! Collects every `*.json` file directly inside the schema directory.
//! Subdirectories are ignored and files come back sorted by name, so two runs
//! over the same directory ingest in the same order.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{GenError, Result};

/// Raw contents of one schema file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFile {
    /// Base name, e.g. `Person.json`
    pub name: String,
    pub contents: Vec<u8>,
}

impl SchemaFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Read every `*.json` file in `dir` (non-recursive)
pub fn load_directory(dir: &Path) -> Result<Vec<SchemaFile>> {
    if !dir.is_dir() {
        return Err(GenError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "schema directory not found"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk error"));
            GenError::io(path, source)
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if path.extension().map(|ext| ext != "json").unwrap_or(true) {
            continue;
        }

        let contents = fs::read(path).map_err(|e| GenError::io(path, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        files.push(SchemaFile::new(name, contents));
    }

    Ok(files)
}
