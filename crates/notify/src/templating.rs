//! Minijinja template rendering for notification messages.
//!
//! Templates are registered by name up front. Names ending in `.html`
//! are rendered with HTML auto-escaping, so user-supplied cell text can
//! be interpolated directly.

use serde::Serialize;

use crate::traits::NotifyError;

/// Renders notification templates using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: minijinja::Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer with the custom filters and no templates.
    pub fn new() -> Self {
        Self {
            env: Self::build_env(),
        }
    }

    /// Build a configured minijinja environment with custom filters.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        // Overrides the builtin `round`, which returns a float and drops trailing zeros.
        env.add_filter("round", round_filter);
        env
    }

    /// Register a named template.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template has syntax errors.
    pub fn add_template(
        &mut self,
        name: &'static str,
        source: &'static str,
    ) -> Result<(), NotifyError> {
        self.env
            .add_template(name, source)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Render a registered template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is unknown or
    /// rendering fails.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, NotifyError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        template
            .render(ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Format `value` with exactly `decimals` fractional digits.
///
/// The exact binary value is rounded, so `1.45` (stored just below 1.45)
/// gives `"1.4"`. Values that sit exactly halfway between two outputs
/// round away from zero: `2.25` gives `"2.3"`.
pub fn format_fixed(value: f64, decimals: u32) -> String {
    let prec = decimals as usize;
    if value == 0.0 {
        return format!("{:.prec$}", 0.0);
    }
    if is_exact_tie(value, decimals) {
        let factor = 10f64.powi(decimals as i32);
        return format!("{:.prec$}", (value * factor).round() / factor);
    }
    format!("{:.prec$}", value)
}

/// `value * 10^decimals` ends in exactly `.5` iff `value * 2^(decimals + 1)`
/// is an odd integer. Scaling by a power of two is exact.
fn is_exact_tie(value: f64, decimals: u32) -> bool {
    let scaled = value * 2f64.powi(decimals as i32 + 1);
    scaled.fract() == 0.0 && scaled.abs() % 2.0 == 1.0
}

/// Custom filter: round a float to N decimal places.
fn round_filter(value: f64, decimals: Option<u32>) -> String {
    format_fixed(value, decimals.unwrap_or(0))
}
