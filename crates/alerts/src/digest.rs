//! Mail rendering for alert hits.
//!
//! A [`Digest`] is the capped hit list plus the count of hits left out.
//! It renders to three things: the subject line, a tab-separated block
//! for pasting into a spreadsheet, and the HTML body.

use serde::Serialize;
use stockmon_notify::templating::format_fixed;
use stockmon_notify::{Notification, NotifyError, TemplateRenderer};

use crate::definition::AlertConfig;
use crate::engine::AlertHit;

const EMAIL_TEMPLATE: &str = "alert_email.html";
const EMAIL_TEMPLATE_SRC: &str = include_str!("../templates/alert_email.html");

/// Hits selected for the mail, in sheet order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digest {
    /// Number of hits before capping.
    pub total: usize,
    pub shown: Vec<AlertHit>,
    pub omitted: usize,
}

impl Digest {
    /// Keep the first `digest_max` hits. Order is preserved as given.
    pub fn new(mut hits: Vec<AlertHit>, digest_max: usize) -> Self {
        let total = hits.len();
        hits.truncate(digest_max);
        let omitted = total - hits.len();
        Self {
            total,
            shown: hits,
            omitted,
        }
    }

    /// One `name<TAB>link<TAB>average` line per shown hit.
    pub fn tsv(&self) -> String {
        self.shown
            .iter()
            .map(tsv_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn tsv_line(hit: &AlertHit) -> String {
    format!(
        "{}\t{}\t{}",
        tsv_cell(&hit.name),
        hit.link,
        format_fixed(hit.average, 1)
    )
}

/// Tabs and line breaks would add columns or rows; they become spaces.
fn tsv_cell(text: &str) -> String {
    text.replace(&['\t', '\r', '\n'][..], " ")
}

/// Threshold as written in the subject and body: `4`, `3.9`.
pub fn format_threshold(threshold: f64) -> String {
    threshold.to_string()
}

pub fn subject(config: &AlertConfig, total: usize) -> String {
    format!(
        "【在庫アラート】{} 平均在庫月数 ≤ {}：{}件",
        config.subject_prefix,
        format_threshold(config.average_threshold),
        total
    )
}

#[derive(Serialize)]
struct EmailContext<'a> {
    total: usize,
    conditions: &'a [String],
    threshold: String,
    digest_max: usize,
    hits: &'a [AlertHit],
    omitted: usize,
    tsv: String,
}

/// Renders digests into notifications.
#[derive(Debug)]
pub struct DigestRenderer {
    renderer: TemplateRenderer,
}

impl DigestRenderer {
    pub fn new() -> Result<Self, NotifyError> {
        let mut renderer = TemplateRenderer::new();
        renderer.add_template(EMAIL_TEMPLATE, EMAIL_TEMPLATE_SRC)?;
        Ok(Self { renderer })
    }

    pub fn render_html(
        &self,
        digest: &Digest,
        config: &AlertConfig,
    ) -> Result<String, NotifyError> {
        let ctx = EmailContext {
            total: digest.total,
            conditions: &config.condition_descriptions,
            threshold: format_threshold(config.average_threshold),
            digest_max: config.digest_max,
            hits: &digest.shown,
            omitted: digest.omitted,
            tsv: digest.tsv(),
        };
        self.renderer.render(EMAIL_TEMPLATE, &ctx)
    }

    /// Subject and body addressed to the configured recipient.
    pub fn notification(
        &self,
        digest: &Digest,
        config: &AlertConfig,
    ) -> Result<Notification, NotifyError> {
        Ok(Notification {
            to: config.recipient.clone(),
            subject: subject(config, digest.total),
            html_body: self.render_html(digest, config)?,
        })
    }
}
