//! CSV-backed workbook: one CSV export per sheet in a single directory.
//!
//! Layout:
//!
//! ```text
//! data/
//!   workbook.yaml      # optional: spreadsheet url + per-sheet file/gid
//!   在庫管理.csv
//! ```
//!
//! Sheets without a manifest entry resolve to `<name>.csv` with gid `0`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SheetError;
use crate::sheet::{Sheet, SheetSource};

const BOM: char = '\u{feff}';

/// Contents of `workbook.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkbookManifest {
    /// Spreadsheet URL used as the base of row links.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub sheets: HashMap<String, SheetEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SheetEntry {
    /// CSV file name relative to the workbook directory.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub gid: u64,
}

/// Directory of CSV sheet exports.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
    manifest: WorkbookManifest,
}

impl CsvWorkbook {
    pub const MANIFEST_FILE: &'static str = "workbook.yaml";

    /// Open a workbook directory, reading `workbook.yaml` when present.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, SheetError> {
        let dir = dir.into();
        let manifest_path = dir.join(Self::MANIFEST_FILE);
        let manifest = if manifest_path.is_file() {
            let content = fs::read_to_string(&manifest_path)?;
            serde_yaml::from_str(&content)?
        } else {
            debug!(path = %manifest_path.display(), "no workbook manifest, using defaults");
            WorkbookManifest::default()
        };
        Ok(Self { dir, manifest })
    }

    /// Override the spreadsheet URL from the manifest.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.manifest.url = url.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn base_url(&self) -> &str {
        &self.manifest.url
    }

    fn locate(&self, name: &str) -> (PathBuf, u64) {
        match self.manifest.sheets.get(name) {
            Some(entry) => {
                let file = entry
                    .file
                    .clone()
                    .unwrap_or_else(|| format!("{name}.csv"));
                (self.dir.join(file), entry.gid)
            }
            None => (self.dir.join(format!("{name}.csv")), 0),
        }
    }
}

impl SheetSource for CsvWorkbook {
    fn sheet(&self, name: &str) -> Result<Sheet, SheetError> {
        let (path, gid) = self.locate(name);
        if !path.is_file() {
            return Err(SheetError::NotFound(name.to_string()));
        }

        let values = read_grid(&path)?;
        debug!(
            sheet = %name,
            path = %path.display(),
            rows = values.len(),
            "loaded sheet"
        );

        Ok(Sheet::new(name, gid, self.manifest.url.clone()).with_values(values))
    }
}

/// Read a CSV file as a raw grid. Record lengths may vary.
fn read_grid(path: &Path) -> Result<Vec<Vec<String>>, SheetError> {
    let csv_err = |source: csv::Error| SheetError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        values.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if let Some(first) = values.first_mut().and_then(|row| row.first_mut()) {
        if first.starts_with(BOM) {
            *first = first.trim_start_matches(BOM).to_string();
        }
    }

    Ok(values)
}
