use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use trackwatch_core::config::Config;
use trackwatch_core::item::TrackedItem;
use trackwatch_core::store::Store;

fn open_store(config_path: &Path) -> anyhow::Result<Store> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    Ok(Store::new(config.store_path))
}

pub fn add(
    config_path: &Path,
    code: &str,
    label: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let code = code.trim().to_uppercase();
    let label = label.unwrap_or_else(|| code.clone());
    let item = TrackedItem::new(code.clone(), label.clone());

    let store = open_store(config_path)?;
    store
        .upsert(item.clone())
        .with_context(|| format!("failed to add '{code}'"))?;

    if json {
        print_json(&item)?;
    } else {
        println!("Tracking {code} — {label}");
    }
    Ok(())
}

pub fn remove(config_path: &Path, code: &str) -> anyhow::Result<()> {
    let code = code.trim().to_uppercase();
    let store = open_store(config_path)?;
    let existed = store
        .remove(&code)
        .with_context(|| format!("failed to remove '{code}'"))?;

    if existed {
        println!("Removed {code}");
    } else {
        println!("Not tracking {code}");
    }
    Ok(())
}

pub fn list(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(config_path)?;
    let items = store.load().context("failed to load tracked items")?;

    if json {
        let values: Vec<_> = items.values().collect();
        print_json(&values)?;
        return Ok(());
    }

    if items.is_empty() {
        println!("No tracked items yet. Add one with: trackwatch add <CODE> --label <NAME>");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = items
        .values()
        .map(|i| {
            vec![
                i.code.clone(),
                i.status.clone(),
                if i.delivered { "yes".to_string() } else { String::new() },
                i.last_checked_at
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "never".to_string()),
                i.label.clone(),
            ]
        })
        .collect();
    print_table(&["CODE", "STATUS", "DELIVERED", "LAST CHECKED", "LABEL"], rows);
    Ok(())
}
