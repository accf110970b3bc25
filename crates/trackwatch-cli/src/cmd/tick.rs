use crate::output::print_json;
use anyhow::Context;
use std::path::Path;
use std::time::Duration;
use trackwatch_core::config::Config;
use trackwatch_core::engine::{PollOutcome, TickReport};
use trackwatch_core::notify::TelegramNotifier;
use trackwatch_core::orchestrator::Orchestrator;
use trackwatch_core::provider::WoncaClient;
use trackwatch_core::store::Store;

fn build(config_path: &Path) -> anyhow::Result<Orchestrator<WoncaClient, TelegramNotifier>> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    config.validate().context("configuration incomplete")?;

    let provider = WoncaClient::new(&config.provider.api_url, &config.provider.api_key)
        .context("failed to build provider client")?;
    let notifier = TelegramNotifier::new(
        TelegramNotifier::DEFAULT_BASE_URL,
        &config.telegram.token,
        &config.telegram.chat_id,
    )
    .context("failed to build notifier")?;

    Ok(Orchestrator::new(
        Store::new(&config.store_path),
        config.policy(),
        provider,
        notifier,
    ))
}

fn print_report(report: &TickReport, json: bool) -> anyhow::Result<()> {
    if json {
        let outcomes: Vec<_> = report
            .outcomes
            .iter()
            .map(|(code, outcome)| match outcome {
                PollOutcome::StatusChanged { status, delivered } => serde_json::json!({
                    "code": code, "outcome": "changed",
                    "status": status, "delivered": delivered,
                }),
                PollOutcome::Unchanged => {
                    serde_json::json!({"code": code, "outcome": "unchanged"})
                }
                PollOutcome::Failed(e) => serde_json::json!({
                    "code": code, "outcome": "failed", "error": e.to_string(),
                }),
            })
            .collect();
        print_json(&outcomes)?;
        return Ok(());
    }

    println!(
        "Polled {} item(s): {} changed, {} failed",
        report.outcomes.len(),
        report.changed(),
        report.failed()
    );
    for (code, outcome) in &report.outcomes {
        match outcome {
            PollOutcome::StatusChanged { status, delivered } => {
                let mark = if *delivered { " (delivered)" } else { "" };
                println!("  {code}: {status}{mark}");
            }
            PollOutcome::Unchanged => println!("  {code}: no change"),
            PollOutcome::Failed(e) => println!("  {code}: unreachable ({e})"),
        }
    }
    Ok(())
}

pub fn run_once(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let mut orchestrator = build(config_path)?;
    let report = orchestrator.tick().context("tick failed")?;
    print_report(&report, json)
}

pub fn watch(config_path: &Path, every_secs: u64) -> anyhow::Result<()> {
    let mut orchestrator = build(config_path)?;
    tracing::info!(every_secs, "watching");

    loop {
        // Store corruption or I/O failure is fatal; per-item lookup
        // failures are already contained in the report.
        let report = orchestrator.tick().context("tick failed")?;
        if !report.outcomes.is_empty() {
            print_report(&report, false)?;
        }
        std::thread::sleep(Duration::from_secs(every_secs));
    }
}
