//! Alert evaluation and dispatch.
//!
//! One run is a single pass: load the sheet, resolve the columns, scan
//! the rows, and send at most one mail. There is no retry and no partial
//! output; a run either sends nothing or one fully rendered mail.

use std::sync::Arc;

use serde::Serialize;
use stockmon_core::{Sheet, SheetSource};
use stockmon_notify::Notifier;
use tracing::{debug, info};

use crate::definition::AlertConfig;
use crate::digest::{Digest, DigestRenderer};
use crate::error::{AlertError, Result};
use crate::schema::{RowAccessor, SchemaError};

/// A row that passed both the predicate and the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertHit {
    pub name: String,
    /// Average stock months.
    pub average: f64,
    /// Link selecting the row in the spreadsheet.
    pub link: String,
    pub row_number: usize,
}

/// Outcome of scanning one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Data rows scanned (header excluded).
    pub rows_scanned: usize,
    /// Rows that passed the predicate.
    pub predicate_matches: usize,
    /// Hits in sheet order.
    pub hits: Vec<AlertHit>,
}

/// Scan a sheet against an alert config.
///
/// A sheet with no rows at all yields an empty evaluation without
/// checking the schema.
///
/// # Errors
///
/// Returns [`SchemaError::MissingColumns`] before any row is read when
/// required columns are absent.
pub fn evaluate(
    sheet: &Sheet,
    config: &AlertConfig,
) -> std::result::Result<Evaluation, SchemaError> {
    let Some(header) = sheet.header() else {
        return Ok(Evaluation::default());
    };
    let accessor = RowAccessor::resolve(header)?;

    let mut eval = Evaluation::default();
    for (row_number, cells) in sheet.data_rows() {
        eval.rows_scanned += 1;

        let row = accessor.view(row_number, cells);
        if !config.predicate.matches(&row) {
            continue;
        }
        eval.predicate_matches += 1;

        let average = row.average_stock_months();
        if average <= config.average_threshold {
            eval.hits.push(AlertHit {
                name: row.name.to_string(),
                average,
                link: sheet.row_link(row_number),
                row_number,
            });
        }
    }

    Ok(eval)
}

/// Result of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing matched; no mail was sent.
    NoHits,
    /// One mail was sent.
    Sent {
        total: usize,
        shown: usize,
        omitted: usize,
    },
}

/// Runs alert configs against a sheet source and delivers the digest.
pub struct AlertEngine {
    source: Arc<dyn SheetSource>,
    notifier: Arc<dyn Notifier>,
    renderer: DigestRenderer,
}

impl AlertEngine {
    pub fn new(source: Arc<dyn SheetSource>, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let renderer = DigestRenderer::new().map_err(AlertError::Render)?;
        Ok(Self {
            source,
            notifier,
            renderer,
        })
    }

    /// Evaluate `config` and send at most one mail.
    ///
    /// # Errors
    ///
    /// - [`AlertError::Sheet`] if the sheet cannot be loaded
    /// - [`AlertError::Schema`] if required columns are missing
    /// - [`AlertError::Render`] if the mail cannot be rendered
    /// - [`AlertError::Delivery`] if the notifier rejects the mail
    pub async fn run(&self, config: &AlertConfig) -> Result<RunOutcome> {
        let sheet = self.source.sheet(&config.sheet_name)?;
        let eval = evaluate(&sheet, config)?;

        debug!(
            sheet = %config.sheet_name,
            rows = eval.rows_scanned,
            matched = eval.predicate_matches,
            hits = eval.hits.len(),
            "sheet evaluated"
        );

        if eval.hits.is_empty() {
            info!(sheet = %config.sheet_name, threshold = config.average_threshold, "no alert hits");
            return Ok(RunOutcome::NoHits);
        }

        let digest = Digest::new(eval.hits, config.digest_max);
        let notification = self
            .renderer
            .notification(&digest, config)
            .map_err(AlertError::Render)?;

        self.notifier
            .send(&notification)
            .await
            .map_err(AlertError::Delivery)?;

        info!(
            sheet = %config.sheet_name,
            channel = self.notifier.channel_name(),
            recipient = %config.recipient,
            total = digest.total,
            omitted = digest.omitted,
            "alert sent"
        );

        Ok(RunOutcome::Sent {
            total: digest.total,
            shown: digest.shown.len(),
            omitted: digest.omitted,
        })
    }
}
