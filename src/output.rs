//! Writing generated units
//!
//! Files are written to a temporary file in the output directory and then
//! renamed over the target, so a failed write never leaves a truncated model
//! behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use similar::TextDiff;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::checksum::Checksum;
use crate::codegen::GeneratedUnit;
use crate::error::{GenError, Result};

/// Create the output directory if it does not exist yet
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        info!(dir = %dir.display(), "creating output directory");
        fs::create_dir_all(dir).map_err(|e| GenError::io(dir, e))?;
    }
    Ok(())
}

/// Atomically write one unit into `dir`
pub fn write_unit(dir: &Path, unit: &GeneratedUnit) -> Result<PathBuf> {
    let target = dir.join(&unit.file_name);
    let temp_dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };

    let mut temp = NamedTempFile::new_in(temp_dir).map_err(|e| GenError::io(temp_dir, e))?;
    temp.write_all(unit.source.as_bytes())
        .map_err(|e| GenError::io(temp.path(), e))?;
    temp.persist(&target)
        .map_err(|e| GenError::io(&target, e.error))?;

    debug!(file = %target.display(), "wrote model");
    Ok(target)
}

/// A generated unit that differs from what is on disk
#[derive(Debug, Clone)]
pub struct Drift {
    pub path: PathBuf,
    /// Unified diff from the file on disk to the generated text
    pub diff: String,
}

/// Compare a unit with the file it would overwrite
pub fn check_unit(dir: &Path, unit: &GeneratedUnit) -> Result<Option<Drift>> {
    let path = dir.join(&unit.file_name);
    let existing = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(GenError::io(&path, e)),
    };

    if Checksum::of_str(&unit.source).verify(&existing) {
        return Ok(None);
    }

    let label = path.display().to_string();
    let generated_label = format!("{} (generated)", label);
    let text_diff = TextDiff::from_lines(existing.as_str(), unit.source.as_str());
    let diff = text_diff
        .unified_diff()
        .context_radius(3)
        .header(&label, &generated_label)
        .to_string();
    Ok(Some(Drift { path, diff }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn unit(source: &str) -> GeneratedUnit {
        GeneratedUnit {
            model_name: "Person".to_string(),
            file_name: "Person.go".to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_write_and_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = write_unit(dir.path(), &unit("package main\n")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "package main\n");

        write_unit(dir.path(), &unit("package models\n")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "package models\n");

        // no temporary files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("models").join("v1");
        ensure_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_check_unit() {
        let dir = TempDir::new().unwrap();
        let missing = check_unit(dir.path(), &unit("package main\n")).unwrap();
        assert!(missing.is_some());

        write_unit(dir.path(), &unit("package main\n")).unwrap();
        assert!(check_unit(dir.path(), &unit("package main\n")).unwrap().is_none());

        let drift = check_unit(dir.path(), &unit("package models\n")).unwrap().unwrap();
        assert!(drift.diff.contains("-package main"));
        assert!(drift.diff.contains("+package models"));
    }
}
