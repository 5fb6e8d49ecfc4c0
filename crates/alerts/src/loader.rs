//! YAML alert definition loading.
//!
//! A path may point at a single definition file or at a directory. In a
//! directory every `*.yml` / `*.yaml` file is loaded, dotfiles are
//! skipped, and files are read in name order so runs are reproducible.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::definition::AlertDefinition;
use crate::error::{AlertError, Result};

/// Load and validate one definition file.
pub fn load_file(path: &Path) -> Result<AlertDefinition> {
    let content = fs::read_to_string(path)?;
    let def: AlertDefinition = serde_yaml::from_str(&content)
        .map_err(|e| AlertError::Definition(format!("{}: {e}", path.display())))?;
    def.validate()?;
    info!(alert = %def.id, path = %path.display(), "loaded alert definition");
    Ok(def)
}

/// Load a definition file, or every definition in a directory.
///
/// # Errors
///
/// Fails on the first unreadable or invalid file, and on duplicate ids.
pub fn load_path(path: &Path) -> Result<Vec<AlertDefinition>> {
    if !path.is_dir() {
        return Ok(vec![load_file(path)?]);
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(path)? {
        let file = entry?.path();
        let name = file.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.starts_with('.') || !file.is_file() || !is_yaml(&file) {
            debug!(path = %file.display(), "skipping non-definition file");
            continue;
        }
        files.push(file);
    }
    files.sort();

    let mut seen = HashSet::new();
    let mut defs = Vec::with_capacity(files.len());
    for file in files {
        let def = load_file(&file)?;
        if !seen.insert(def.id.clone()) {
            return Err(AlertError::Definition(format!(
                "duplicate alert id '{}' in {}",
                def.id,
                file.display()
            )));
        }
        defs.push(def);
    }
    Ok(defs)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUICK: &str = "id: quick\nsheet_name: s\naverage_threshold: 3\n";

    #[test]
    fn loads_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quick.yaml");
        fs::write(&path, QUICK).unwrap();

        let defs = load_path(&path).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].id, "quick");
        assert_eq!(defs[0].average_threshold, 3.0);
    }

    #[test]
    fn directory_load_skips_dotfiles_and_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yml"), QUICK.replace("quick", "b")).unwrap();
        fs::write(dir.path().join("a.yaml"), QUICK.replace("quick", "a")).unwrap();
        fs::write(dir.path().join(".hidden.yaml"), "not: [valid").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ids: Vec<String> = load_path(dir.path()).unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.yaml"), QUICK).unwrap();
        fs::write(dir.path().join("two.yaml"), QUICK).unwrap();

        let err = load_path(dir.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate alert id 'quick'"), "got: {err}");
    }

    #[test]
    fn invalid_definition_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "id: x\n").unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, AlertError::Definition(_)));
        assert!(err.to_string().contains("broken.yaml"), "got: {err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, AlertError::Io(_)));
    }
}
