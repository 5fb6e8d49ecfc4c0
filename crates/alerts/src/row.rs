//! Typed view over one inventory row.
//!
//! Parsing is lenient on purpose: a cell that is not a case-insensitive
//! `true` is false, and a cell that is not a finite number is `0.0`.
//! Malformed data never fails a run.

/// One data row with the fields alerts care about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowView<'a> {
    /// 1-based sheet row number (header is row 1).
    pub row_number: usize,
    pub name: &'a str,
    /// Stock months over the last year after arrival.
    pub stock_months_1y: f64,
    /// Stock months over the last three fiscal years after arrival.
    pub stock_months_3y: f64,
    pub shipped_within_4y: bool,
    pub import_excluded: bool,
}

impl RowView<'_> {
    /// Mean of the 1-year and 3-year stock months.
    pub fn average_stock_months(&self) -> f64 {
        (self.stock_months_1y + self.stock_months_3y) / 2.0
    }
}

/// `true` only for a case-insensitive literal `"true"`.
pub fn parse_flag(cell: &str) -> bool {
    cell.eq_ignore_ascii_case("true")
}

/// Parse a numeric cell; blank, unparsable and non-finite values give `0.0`.
pub fn parse_number(cell: &str) -> f64 {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_accepts_only_literal_true() {
        for v in ["TRUE", "true", "True", "tRuE"] {
            assert!(parse_flag(v), "{v:?} should be true");
        }
        for v in ["FALSE", "false", "", "1", "yes", " true", "true ", "t"] {
            assert!(!parse_flag(v), "{v:?} should be false");
        }
    }

    #[test]
    fn number_parses_plain_values() {
        assert_eq!(parse_number("3"), 3.0);
        assert_eq!(parse_number("2.5"), 2.5);
        assert_eq!(parse_number(" 4.25 "), 4.25);
        assert_eq!(parse_number("-1"), -1.0);
        assert_eq!(parse_number("1e1"), 10.0);
    }

    #[test]
    fn number_defaults_to_zero() {
        for v in ["", "   ", "abc", "1,234", "NaN", "inf", "-infinity", "3ヶ月"] {
            assert_eq!(parse_number(v), 0.0, "{v:?} should parse as 0");
        }
    }

    #[test]
    fn average_is_mean_of_both_periods() {
        let row = RowView {
            row_number: 2,
            name: "Widget",
            stock_months_1y: 3.0,
            stock_months_3y: 5.0,
            shipped_within_4y: true,
            import_excluded: false,
        };
        assert_eq!(row.average_stock_months(), 4.0);
    }
}
