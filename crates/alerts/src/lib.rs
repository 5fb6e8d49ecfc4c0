//! Average stock-month alerts over an inventory sheet.
//!
//! A run reads one sheet, keeps rows that pass the alert's predicate and
//! whose average stock months are at or below the threshold, and mails a
//! capped digest of those rows to a single recipient.
//!
//! - [`schema`]: required column resolution
//! - [`row`]: lenient typed row view
//! - [`filter`]: row predicates
//! - [`definition`]: alert definitions, runtime config, built-in presets
//! - [`loader`]: YAML definition loading
//! - [`engine`]: evaluation and dispatch
//! - [`digest`]: subject, TSV and HTML rendering

pub mod definition;
pub mod digest;
pub mod engine;
pub mod error;
pub mod filter;
pub mod loader;
pub mod row;
pub mod schema;

pub use definition::{presets, AlertConfig, AlertDefinition};
pub use digest::{Digest, DigestRenderer};
pub use engine::{evaluate, AlertEngine, AlertHit, Evaluation, RunOutcome};
pub use error::{AlertError, Result};
pub use filter::{FlagFilter, RowPredicate};
pub use row::RowView;
pub use schema::{Column, RowAccessor, SchemaError};
