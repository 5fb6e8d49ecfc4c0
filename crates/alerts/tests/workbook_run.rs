//! End-to-end runs against CSV workbooks, plus a check that the YAML
//! definitions in `data/alerts/` match the built-in presets.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use stockmon_alerts::{loader, presets, AlertEngine, AlertError, RunOutcome};
use stockmon_core::CsvWorkbook;
use stockmon_notify::{Notification, Notifier, NotifyError};

/// Resolve a path under the workspace `data/` directory.
/// Integration tests run from the crate directory, so we go up two levels.
fn data_dir(sub: &str) -> PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../data").join(sub)
}

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait::async_trait]
impl Notifier for Outbox {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
    fn channel_name(&self) -> &str {
        "outbox"
    }
}

fn sample_engine(outbox: Arc<Outbox>) -> AlertEngine {
    let workbook = CsvWorkbook::open(data_dir("sample")).unwrap();
    AlertEngine::new(Arc::new(workbook), outbox).unwrap()
}

// ── sample workbook ─────────────────────────────────────────

#[tokio::test]
async fn import_alert_on_sample_workbook() {
    let outbox = Arc::new(Outbox::default());
    let cfg = presets::import_low_stock()
        .into_config("buyer@example.com")
        .unwrap();

    let outcome = sample_engine(outbox.clone()).run(&cfg).await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Sent {
            total: 3,
            shown: 3,
            omitted: 0
        }
    );

    let sent = outbox.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let mail = &sent[0];
    assert_eq!(mail.subject, "【在庫アラート】（輸入対象） 平均在庫月数 ≤ 4：3件");
    assert!(mail.html_body.contains("<b>ステンレスボルト M6</b>（平均 4.0 ヶ月）"));
    assert!(mail.html_body.contains("<b>ナイロンナット M6</b>（平均 1.8 ヶ月）"));
    assert!(mail.html_body.contains("<b>アルミ角パイプ</b>（平均 0.0 ヶ月）"));
    assert!(!mail.html_body.contains("真鍮スペーサー"));
    assert!(!mail.html_body.contains("国内仕入れ"));
    assert!(mail.html_body.contains("gid=1748392011&amp;range=7:7"));
}

#[tokio::test]
async fn non_import_alert_on_sample_workbook() {
    let outbox = Arc::new(Outbox::default());
    let cfg = presets::non_import_low_stock()
        .into_config("buyer@example.com")
        .unwrap();

    let outcome = sample_engine(outbox.clone()).run(&cfg).await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Sent {
            total: 1,
            shown: 1,
            omitted: 0
        }
    );

    let sent = outbox.sent.lock().unwrap();
    assert!(sent[0].html_body.contains("国内仕入れワッシャー"));
    assert!(!sent[0].html_body.contains("国内仕入れクランプ"));
}

// ── ad-hoc workbooks ────────────────────────────────────────

#[tokio::test]
async fn missing_columns_abort_without_mail() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("在庫管理.csv"),
        "商品名,入荷後の直近1年在庫月数\nWidget,1\n",
    )
    .unwrap();

    let outbox = Arc::new(Outbox::default());
    let engine = AlertEngine::new(Arc::new(CsvWorkbook::open(dir.path()).unwrap()), outbox.clone())
        .unwrap();
    let cfg = presets::import_low_stock()
        .into_config("buyer@example.com")
        .unwrap();

    let err = engine.run(&cfg).await.unwrap_err();
    assert!(matches!(err, AlertError::Schema(_)), "got: {err:?}");
    let msg = err.to_string();
    assert!(msg.contains("入荷後の直近3年度在庫月数, 4年以内に出荷があったか, 輸入対象外"), "got: {msg}");
    assert!(outbox.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_export_sends_nothing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("在庫管理.csv"), "").unwrap();

    let outbox = Arc::new(Outbox::default());
    let engine = AlertEngine::new(Arc::new(CsvWorkbook::open(dir.path()).unwrap()), outbox.clone())
        .unwrap();
    let cfg = presets::import_low_stock()
        .into_config("buyer@example.com")
        .unwrap();

    assert_eq!(engine.run(&cfg).await.unwrap(), RunOutcome::NoHits);
    assert!(outbox.sent.lock().unwrap().is_empty());
}

// ── data/alerts definitions ─────────────────────────────────

#[test]
fn shipped_definitions_match_presets() {
    let defs = loader::load_path(&data_dir("alerts")).unwrap();
    let ids: Vec<&str> = defs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["import-low-stock", "non-import-low-stock"]);

    assert_eq!(defs[0], presets::import_low_stock());
    assert_eq!(defs[1], presets::non_import_low_stock());
}
