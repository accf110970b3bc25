use anyhow::Context;
use std::path::Path;
use trackwatch_core::config::Config;
use trackwatch_core::notify::TelegramNotifier;
use trackwatch_core::provider::WoncaClient;
use trackwatch_core::store::Store;

/// Code used for the provider probe when nothing is tracked yet.
const FALLBACK_PROBE_CODE: &str = "AA361812099BR";

pub fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    config.validate().context("configuration incomplete")?;

    // Probe with a real tracked code when one exists.
    let items = Store::new(&config.store_path).load()?;
    let probe_code = items
        .keys()
        .next()
        .map(String::as_str)
        .unwrap_or(FALLBACK_PROBE_CODE)
        .to_string();

    let provider = WoncaClient::new(&config.provider.api_url, &config.provider.api_key)?;
    match provider.probe(&probe_code) {
        Ok(()) => println!("provider: ok"),
        Err(detail) => println!("provider: FAILED — {detail}"),
    }

    let notifier = TelegramNotifier::new(
        TelegramNotifier::DEFAULT_BASE_URL,
        &config.telegram.token,
        &config.telegram.chat_id,
    )?;
    match notifier.probe() {
        Ok(()) => println!("telegram: ok"),
        Err(detail) => println!("telegram: FAILED — {detail}"),
    }

    Ok(())
}
