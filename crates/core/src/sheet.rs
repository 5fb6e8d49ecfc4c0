//! Tabular sheet snapshot and the [`SheetSource`] trait.
//!
//! A sheet is read once per alert run as a 2D grid of raw cell text,
//! header row included. Sources only need to hand back that grid plus
//! the identifiers used to build per-row links.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SheetError;

/// A read-only snapshot of one sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sheet {
    /// Sheet (tab) name.
    pub name: String,
    /// Stable sheet identifier (`gid` in spreadsheet URLs).
    pub id: u64,
    /// Base URL of the containing spreadsheet, without fragment.
    pub base_url: String,
    /// Raw cell values; `values[0]` is the header row.
    pub values: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, id: u64, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id,
            base_url: base_url.into(),
            values: Vec::new(),
        }
    }

    /// Replace the cell grid.
    pub fn with_values(mut self, values: Vec<Vec<String>>) -> Self {
        self.values = values;
        self
    }

    pub fn header(&self) -> Option<&[String]> {
        self.values.first().map(|r| r.as_slice())
    }

    /// Data rows paired with their 1-based sheet row number.
    ///
    /// The header occupies row 1, so the first data row is row 2.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.values
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, row)| (i + 1, row.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Link that opens the spreadsheet with a single row selected.
    pub fn row_link(&self, row_number: usize) -> String {
        format!(
            "{}#gid={}&range={}:{}",
            self.base_url, self.id, row_number, row_number
        )
    }
}

/// Anything that can hand out sheet snapshots by name.
pub trait SheetSource: Send + Sync {
    /// Fetch the full grid of the named sheet.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::NotFound`] when no sheet carries that name.
    fn sheet(&self, name: &str) -> Result<Sheet, SheetError>;
}

/// In-memory sheet source.
#[derive(Debug, Default, Clone)]
pub struct MemorySheets {
    sheets: HashMap<String, Sheet>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: Sheet) {
        self.sheets.insert(sheet.name.clone(), sheet);
    }

    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.insert(sheet);
        self
    }
}

impl SheetSource for MemorySheets {
    fn sheet(&self, name: &str) -> Result<Sheet, SheetError> {
        self.sheets
            .get(name)
            .cloned()
            .ok_or_else(|| SheetError::NotFound(name.to_string()))
    }
}
