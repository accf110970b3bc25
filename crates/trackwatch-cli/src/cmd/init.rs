use anyhow::Context;
use std::path::Path;
use trackwatch_core::config::Config;
use trackwatch_core::io::write_if_missing;

pub fn run(config_path: &Path) -> anyhow::Result<()> {
    let template = serde_yaml::to_string(&Config::default())
        .context("failed to render default configuration")?;
    let written = write_if_missing(config_path, template.as_bytes())
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    if written {
        println!("Wrote {}", config_path.display());
        println!("Fill in provider.api_key, telegram.token, and telegram.chat_id.");
    } else {
        println!("{} already exists, leaving it alone.", config_path.display());
    }
    Ok(())
}
