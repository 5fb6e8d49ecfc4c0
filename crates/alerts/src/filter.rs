//! Row predicates.
//!
//! Anything implementing [`RowPredicate`] can gate rows before averaging.
//! Closures work directly; [`FlagFilter`] is the declarative form used by
//! YAML definitions.

use serde::{Deserialize, Serialize};

use crate::row::RowView;
use crate::schema::Column;

/// Decides whether a row is considered for an alert.
pub trait RowPredicate: Send + Sync {
    fn matches(&self, row: &RowView<'_>) -> bool;
}

impl<F> RowPredicate for F
where
    F: Fn(&RowView<'_>) -> bool + Send + Sync,
{
    fn matches(&self, row: &RowView<'_>) -> bool {
        self(row)
    }
}

/// Pin a closure to the predicate signature so its argument lifetimes
/// are inferred as higher-ranked.
pub fn from_fn<F>(f: F) -> F
where
    F: Fn(&RowView<'_>) -> bool + Send + Sync,
{
    f
}

/// Required values for the two flag columns. `None` accepts either value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlagFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_within_4y: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_excluded: Option<bool>,
}

impl FlagFilter {
    /// Human-readable condition lines, e.g. `輸入対象外 = FALSE`.
    pub fn describe(&self) -> Vec<String> {
        let line = |col: Column, v: bool| {
            format!("{} = {}", col.header(), if v { "TRUE" } else { "FALSE" })
        };

        let mut lines = Vec::new();
        if let Some(v) = self.shipped_within_4y {
            lines.push(line(Column::ShippedWithin4y, v));
        }
        if let Some(v) = self.import_excluded {
            lines.push(line(Column::ImportExcluded, v));
        }
        lines
    }
}

impl RowPredicate for FlagFilter {
    fn matches(&self, row: &RowView<'_>) -> bool {
        self.shipped_within_4y
            .map_or(true, |want| row.shipped_within_4y == want)
            && self
                .import_excluded
                .map_or(true, |want| row.import_excluded == want)
    }
}
