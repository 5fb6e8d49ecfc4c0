//! Alert definitions and the runtime [`AlertConfig`].
//!
//! An [`AlertDefinition`] is the serializable part of an alert: which
//! sheet, which threshold, which rows. It carries no recipient. Binding
//! it to a recipient at call time yields an [`AlertConfig`], the value
//! the engine actually runs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AlertError, Result};
use crate::filter::{FlagFilter, RowPredicate};

/// Serializable alert definition (YAML).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertDefinition {
    /// Unique identifier, also the CLI name of the alert.
    pub id: String,
    pub sheet_name: String,
    /// Rows whose average stock months are at or below this value are hits.
    pub average_threshold: f64,
    /// Maximum number of hits listed in the mail.
    #[serde(default = "default_digest_max")]
    pub digest_max: usize,
    /// Text inserted into the subject after the alert tag.
    #[serde(default)]
    pub subject_prefix: String,
    #[serde(default)]
    pub filter: FlagFilter,
    /// Condition lines shown in the mail. Derived from `filter` when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

fn default_digest_max() -> usize {
    100
}

impl AlertDefinition {
    /// Check the definition can be run.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::Definition`] for an empty id or sheet name, a
    /// non-finite threshold, or a zero digest cap.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AlertError::Definition("id must not be empty".to_string()));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(AlertError::Definition(format!(
                "{}: sheet_name must not be empty",
                self.id
            )));
        }
        if !self.average_threshold.is_finite() {
            return Err(AlertError::Definition(format!(
                "{}: average_threshold must be a finite number",
                self.id
            )));
        }
        if self.digest_max == 0 {
            return Err(AlertError::Definition(format!(
                "{}: digest_max must be at least 1",
                self.id
            )));
        }
        Ok(())
    }

    /// Condition lines for the mail body.
    pub fn condition_lines(&self) -> Vec<String> {
        if self.conditions.is_empty() {
            self.filter.describe()
        } else {
            self.conditions.clone()
        }
    }

    /// Bind the definition to a recipient.
    pub fn into_config(self, recipient: impl Into<String>) -> Result<AlertConfig> {
        self.validate()?;
        let recipient = recipient.into();
        if recipient.trim().is_empty() {
            return Err(AlertError::Definition(format!(
                "{}: recipient must not be empty",
                self.id
            )));
        }

        let condition_descriptions = self.condition_lines();
        Ok(AlertConfig {
            sheet_name: self.sheet_name,
            recipient,
            average_threshold: self.average_threshold,
            digest_max: self.digest_max,
            subject_prefix: self.subject_prefix,
            predicate: Arc::new(self.filter),
            condition_descriptions,
        })
    }
}

/// Everything one alert run needs. Immutable for the duration of a run.
#[derive(Clone)]
pub struct AlertConfig {
    pub sheet_name: String,
    pub recipient: String,
    pub average_threshold: f64,
    pub digest_max: usize,
    pub subject_prefix: String,
    pub predicate: Arc<dyn RowPredicate>,
    pub condition_descriptions: Vec<String>,
}

impl std::fmt::Debug for AlertConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertConfig")
            .field("sheet_name", &self.sheet_name)
            .field("recipient", &self.recipient)
            .field("average_threshold", &self.average_threshold)
            .field("digest_max", &self.digest_max)
            .field("subject_prefix", &self.subject_prefix)
            .field("condition_descriptions", &self.condition_descriptions)
            .finish_non_exhaustive()
    }
}

/// Built-in alert definitions.
pub mod presets {
    use super::AlertDefinition;
    use crate::filter::FlagFilter;

    /// Sheet both built-in alerts read.
    pub const INVENTORY_SHEET: &str = "在庫管理";

    pub const IMPORT_LOW_STOCK: &str = "import-low-stock";
    pub const NON_IMPORT_LOW_STOCK: &str = "non-import-low-stock";

    /// Low stock among import items shipped in the last four years.
    pub fn import_low_stock() -> AlertDefinition {
        let filter = FlagFilter {
            shipped_within_4y: Some(true),
            import_excluded: Some(false),
        };
        AlertDefinition {
            id: IMPORT_LOW_STOCK.to_string(),
            sheet_name: INVENTORY_SHEET.to_string(),
            average_threshold: 4.0,
            digest_max: 100,
            subject_prefix: "（輸入対象）".to_string(),
            conditions: filter.describe(),
            filter,
        }
    }

    /// Low stock among non-import items shipped in the last four years.
    pub fn non_import_low_stock() -> AlertDefinition {
        let filter = FlagFilter {
            shipped_within_4y: Some(true),
            import_excluded: Some(true),
        };
        AlertDefinition {
            id: NON_IMPORT_LOW_STOCK.to_string(),
            sheet_name: INVENTORY_SHEET.to_string(),
            average_threshold: 2.0,
            digest_max: 100,
            subject_prefix: "（非輸入）".to_string(),
            conditions: filter.describe(),
            filter,
        }
    }

    pub fn all() -> Vec<AlertDefinition> {
        vec![import_low_stock(), non_import_low_stock()]
    }

    pub fn by_id(id: &str) -> Option<AlertDefinition> {
        all().into_iter().find(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::RowView;

    fn row(shipped: bool, excluded: bool) -> RowView<'static> {
        RowView {
            row_number: 2,
            name: "x",
            stock_months_1y: 1.0,
            stock_months_3y: 1.0,
            shipped_within_4y: shipped,
            import_excluded: excluded,
        }
    }

    #[test]
    fn import_preset_matches_shipped_import_items() {
        let cfg = presets::import_low_stock()
            .into_config("buyer@example.com")
            .unwrap();
        assert_eq!(cfg.average_threshold, 4.0);
        assert_eq!(cfg.digest_max, 100);
        assert_eq!(cfg.subject_prefix, "（輸入対象）");
        assert!(cfg.predicate.matches(&row(true, false)));
        assert!(!cfg.predicate.matches(&row(true, true)));
        assert!(!cfg.predicate.matches(&row(false, false)));
        assert_eq!(
            cfg.condition_descriptions,
            vec!["4年以内に出荷があったか = TRUE", "輸入対象外 = FALSE"]
        );
    }

    #[test]
    fn non_import_preset_matches_shipped_excluded_items() {
        let cfg = presets::non_import_low_stock()
            .into_config("buyer@example.com")
            .unwrap();
        assert_eq!(cfg.average_threshold, 2.0);
        assert_eq!(cfg.subject_prefix, "（非輸入）");
        assert!(cfg.predicate.matches(&row(true, true)));
        assert!(!cfg.predicate.matches(&row(true, false)));
        assert_eq!(
            cfg.condition_descriptions,
            vec!["4年以内に出荷があったか = TRUE", "輸入対象外 = TRUE"]
        );
    }

    #[test]
    fn presets_lookup_by_id() {
        assert!(presets::by_id("import-low-stock").is_some());
        assert!(presets::by_id("non-import-low-stock").is_some());
        assert!(presets::by_id("unknown").is_none());
    }

    #[test]
    fn explicit_conditions_override_filter_description() {
        let mut def = presets::import_low_stock();
        def.conditions = vec!["custom".to_string()];
        assert_eq!(def.condition_lines(), vec!["custom"]);

        def.conditions.clear();
        assert_eq!(def.condition_lines(), def.filter.describe());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut def = presets::import_low_stock();
        def.digest_max = 0;
        assert!(matches!(def.validate(), Err(AlertError::Definition(_))));

        let mut def = presets::import_low_stock();
        def.average_threshold = f64::NAN;
        assert!(def.validate().is_err());

        let mut def = presets::import_low_stock();
        def.sheet_name = " ".to_string();
        assert!(def.validate().is_err());
    }

    #[test]
    fn empty_recipient_is_rejected() {
        let err = presets::import_low_stock().into_config("").unwrap_err();
        assert!(err.to_string().contains("recipient"), "got: {err}");
    }

    #[test]
    fn yaml_defaults_apply() {
        let def: AlertDefinition = serde_yaml::from_str(
            r#"
id: quick
sheet_name: 在庫管理
average_threshold: 1.5
"#,
        )
        .unwrap();
        assert_eq!(def.digest_max, 100);
        assert_eq!(def.subject_prefix, "");
        assert_eq!(def.filter, FlagFilter::default());
        assert!(def.conditions.is_empty());
    }
}
