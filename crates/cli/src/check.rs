//! `stockmon check`: schema and match reports that never send mail.

use anyhow::{Context, Result};

use stockmon_alerts::{evaluate, AlertConfig, Column, RowAccessor};
use stockmon_core::SheetSource;
use stockmon_notify::templating::format_fixed;

/// Resolve the required columns of one sheet and count its data rows.
pub fn sheet_report(source: &dyn SheetSource, sheet_name: &str) -> Result<Vec<String>> {
    let sheet = source.sheet(sheet_name)?;
    let Some(header) = sheet.header() else {
        return Ok(vec![format!("{sheet_name}: empty sheet")]);
    };
    let accessor =
        RowAccessor::resolve(header).with_context(|| format!("sheet '{sheet_name}'"))?;

    let mut lines = vec![format!(
        "{sheet_name}: rows={} columns={}",
        sheet.data_rows().count(),
        header.len()
    )];
    for col in Column::ALL {
        lines.push(format!("  {:>3}  {}", accessor.index_of(col) + 1, col));
    }
    Ok(lines)
}

/// Evaluate one alert and list the hits that would be mailed.
pub fn alert_report(
    source: &dyn SheetSource,
    id: &str,
    alert: &AlertConfig,
) -> Result<Vec<String>> {
    let sheet = source
        .sheet(&alert.sheet_name)
        .with_context(|| format!("alert '{id}'"))?;
    if sheet.is_empty() {
        return Ok(vec![format!("{id}: sheet={} is empty", alert.sheet_name)]);
    }
    let eval = evaluate(&sheet, alert).with_context(|| format!("alert '{id}'"))?;

    let mut lines = vec![format!(
        "{id}: sheet={} rows={} matched={} hits={} (threshold ≤ {}, cap {})",
        alert.sheet_name,
        eval.rows_scanned,
        eval.predicate_matches,
        eval.hits.len(),
        alert.average_threshold,
        alert.digest_max
    )];
    for hit in eval.hits.iter().take(alert.digest_max) {
        lines.push(format!(
            "  row {:>5}  {:>6}  {}",
            hit.row_number,
            format_fixed(hit.average, 1),
            hit.name
        ));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockmon_alerts::presets;
    use stockmon_core::{MemorySheets, Sheet};

    const HEADER: [&str; 6] = [
        "商品名",
        "メモ",
        "入荷後の直近1年在庫月数",
        "入荷後の直近3年度在庫月数",
        "4年以内に出荷があったか",
        "輸入対象外",
    ];

    fn workbook(rows: &[[&str; 6]]) -> MemorySheets {
        let mut values = vec![HEADER.iter().map(|s| s.to_string()).collect::<Vec<_>>()];
        values.extend(rows.iter().map(|r| r.iter().map(|s| s.to_string()).collect()));
        MemorySheets::new().with_sheet(
            Sheet::new("在庫管理", 7, "https://sheet.example.com/d/x/edit").with_values(values),
        )
    }

    fn alert() -> AlertConfig {
        presets::import_low_stock().into_config("(none)").unwrap()
    }

    #[test]
    fn sheet_report_lists_resolved_columns() {
        let source = workbook(&[
            ["Bolt", "", "1", "2", "TRUE", "FALSE"],
            ["Nut", "", "9", "9", "TRUE", "FALSE"],
        ]);
        let lines = sheet_report(&source, "在庫管理").unwrap();

        assert_eq!(lines[0], "在庫管理: rows=2 columns=6");
        assert_eq!(lines[1], "    1  商品名");
        assert_eq!(lines[2], "    3  入荷後の直近1年在庫月数");
        assert_eq!(lines[5], "    6  輸入対象外");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn sheet_report_names_missing_columns() {
        let source = MemorySheets::new().with_sheet(
            Sheet::new("在庫管理", 0, "u").with_values(vec![vec!["商品名".to_string()]]),
        );
        let err = sheet_report(&source, "在庫管理").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("sheet '在庫管理'"), "got: {msg}");
        assert!(msg.contains("輸入対象外"), "got: {msg}");
    }

    #[test]
    fn sheet_report_on_empty_and_unknown_sheets() {
        let source = MemorySheets::new().with_sheet(Sheet::new("在庫管理", 0, "u"));
        assert_eq!(
            sheet_report(&source, "在庫管理").unwrap(),
            vec!["在庫管理: empty sheet"]
        );
        assert!(sheet_report(&source, "別シート").is_err());
    }

    #[test]
    fn alert_report_uses_mail_rounding() {
        let source = workbook(&[
            ["Bolt", "", "2.9", "0", "TRUE", "FALSE"],
            ["Nut", "", "9", "9", "TRUE", "FALSE"],
            ["Washer", "", "0", "0", "TRUE", "TRUE"],
        ]);
        let lines = alert_report(&source, "import-low-stock", &alert()).unwrap();

        assert_eq!(
            lines[0],
            "import-low-stock: sheet=在庫管理 rows=3 matched=2 hits=1 (threshold ≤ 4, cap 100)"
        );
        assert_eq!(lines[1], "  row     2     1.4  Bolt");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn alert_report_respects_cap() {
        let source = workbook(&[
            ["a", "", "1", "1", "TRUE", "FALSE"],
            ["b", "", "1", "1", "TRUE", "FALSE"],
            ["c", "", "1", "1", "TRUE", "FALSE"],
        ]);
        let mut cfg = alert();
        cfg.digest_max = 2;
        let lines = alert_report(&source, "x", &cfg).unwrap();

        assert!(lines[0].contains("hits=3"));
        assert_eq!(lines.len(), 3);
    }
}
