//! Notification delivery for stock alerts.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable delivery sinks
//! - SMTP email and console notifier implementations
//! - Minijinja template rendering for notification bodies

pub mod console;
pub mod email;
pub mod templating;
pub mod traits;

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;
pub use templating::TemplateRenderer;
pub use traits::{Notification, Notifier, NotifyError};
