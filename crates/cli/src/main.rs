mod check;
mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};

use stockmon_alerts::{loader, presets, AlertDefinition, AlertEngine, RunOutcome};
use stockmon_core::config::load_dotenv;
use stockmon_core::{Config, CsvWorkbook};
use stockmon_notify::{ConsoleNotifier, EmailNotifier, Notifier};

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let config = Config::from_env();

    match &args.command {
        Command::ImportLowStock => {
            send_alerts(&args, &config, vec![presets::import_low_stock()]).await
        }
        Command::NonImportLowStock => {
            send_alerts(&args, &config, vec![presets::non_import_low_stock()]).await
        }
        Command::Run { definition, id } => {
            let path = definition
                .clone()
                .or_else(|| config.alerts.definitions_dir.clone());
            let defs = match (path, id) {
                (Some(path), id) => {
                    let mut defs = load_definitions(&path)?;
                    if let Some(id) = id {
                        defs.retain(|d| &d.id == id);
                        if defs.is_empty() {
                            bail!("no alert definition with id '{id}' in {}", path.display());
                        }
                    }
                    defs
                }
                (None, Some(id)) => vec![presets::by_id(id)
                    .with_context(|| format!("no built-in alert with id '{id}'"))?],
                (None, None) => bail!(
                    "no definitions: pass --definition or --id, or set STOCKMON_DEFINITIONS_DIR"
                ),
            };
            send_alerts(&args, &config, defs).await
        }
        Command::Check { sheet, definition } => {
            let workbook = open_workbook(&args, &config)?;
            let lines = match sheet {
                Some(name) => check::sheet_report(&workbook, name)?,
                None => {
                    let defs = match definition {
                        Some(p) => load_definitions(p)?,
                        None => presets::all(),
                    };
                    check_alerts(&args, &config, &workbook, defs)?
                }
            };
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
        Command::Presets => {
            for def in presets::all() {
                println!("---");
                print!("{}", serde_yaml::to_string(&def)?);
            }
            Ok(())
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
            Ok(())
        }
    }
}

fn load_definitions(path: &Path) -> Result<Vec<AlertDefinition>> {
    loader::load_path(path)
        .with_context(|| format!("failed to load alert definitions from {}", path.display()))
}

fn open_workbook(args: &CliArgs, config: &Config) -> Result<CsvWorkbook> {
    let dir = args.workbook.as_ref().unwrap_or(&config.workbook.dir);
    let mut workbook = CsvWorkbook::open(dir)
        .with_context(|| format!("failed to open workbook {}", dir.display()))?;
    if let Some(url) = &config.workbook.url {
        workbook = workbook.with_base_url(url.clone());
    }
    debug!(dir = %workbook.dir().display(), url = workbook.base_url(), "workbook opened");
    Ok(workbook)
}

fn recipient(args: &CliArgs, config: &Config) -> Result<String> {
    args.to
        .clone()
        .or_else(|| config.alerts.recipient.clone())
        .context("no recipient: pass --to or set STOCKMON_RECIPIENT")
}

fn build_notifier(args: &CliArgs, config: &Config) -> Result<Arc<dyn Notifier>> {
    if args.dry_run {
        return Ok(Arc::new(ConsoleNotifier::stdout()));
    }

    let smtp = &config.smtp;
    let (Some(host), Some(from)) = (&smtp.host, &smtp.from) else {
        bail!("SMTP is not configured: set SMTP_HOST and SMTP_FROM, or use --dry-run");
    };
    let notifier = EmailNotifier::from_config(host, Some(smtp.port), Some(smtp.tls), from)
        .context("failed to configure SMTP notifier")?;
    Ok(Arc::new(notifier))
}

async fn send_alerts(args: &CliArgs, config: &Config, defs: Vec<AlertDefinition>) -> Result<()> {
    config.log_summary();

    let to = recipient(args, config)?;
    let workbook = open_workbook(args, config)?;
    let notifier = build_notifier(args, config)?;
    let engine = AlertEngine::new(Arc::new(workbook), notifier)?;

    for def in defs {
        let id = def.id.clone();
        let alert = def.into_config(to.clone())?;
        let outcome = engine
            .run(&alert)
            .await
            .with_context(|| format!("alert '{id}' failed"))?;

        match outcome {
            RunOutcome::NoHits => info!(alert = %id, "nothing to report"),
            RunOutcome::Sent {
                total,
                shown,
                omitted,
            } => info!(alert = %id, total, shown, omitted, dry_run = args.dry_run, "alert delivered"),
        }
    }
    Ok(())
}

fn check_alerts(
    args: &CliArgs,
    config: &Config,
    workbook: &CsvWorkbook,
    defs: Vec<AlertDefinition>,
) -> Result<Vec<String>> {
    // Nothing is sent, so a recipient is optional here.
    let to = recipient(args, config).unwrap_or_else(|_| "(none)".to_string());

    let mut lines = Vec::new();
    for def in defs {
        let id = def.id.clone();
        let alert = def.into_config(to.clone())?;
        lines.extend(check::alert_report(workbook, &id, &alert)?);
    }
    Ok(lines)
}
