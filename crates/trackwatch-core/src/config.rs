use crate::error::{Result, TrackError};
use crate::schedule::{FixedInterval, QuotaDerivedInterval, SchedulingPolicy, DAYS_PER_MONTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "trackwatch.yaml";

const DEFAULT_API_URL: &str =
    "https://api-labs.wonca.com.br/wonca.labs.v1.LabsService/Track";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_monthly_calls")]
    pub monthly_calls: u32,
    /// Calls per day held back from the derived allowance so manual
    /// probes never push usage over the budget.
    #[serde(default = "default_safety_margin")]
    pub safety_margin: u32,
}

fn default_monthly_calls() -> u32 {
    1000
}

fn default_safety_margin() -> u32 {
    1
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            monthly_calls: default_monthly_calls(),
            safety_margin: default_safety_margin(),
        }
    }
}

impl QuotaConfig {
    pub fn daily_allowance(&self) -> u32 {
        (self.monthly_calls / DAYS_PER_MONTH).max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    /// When set, polls every item at this fixed cadence instead of the
    /// quota-derived one. Development switch only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_interval_minutes: Option<u32>,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_version() -> u32 {
    1
}

fn default_store_path() -> PathBuf {
    PathBuf::from("tracked-items.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            provider: ProviderConfig::default(),
            telegram: TelegramConfig::default(),
            quota: QuotaConfig::default(),
            debug_interval_minutes: None,
            store_path: default_store_path(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TrackError::NotInitialized);
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    /// Credentials are required before the first tick; a missing key
    /// must fail startup rather than fail every lookup.
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key.trim().is_empty() {
            return Err(TrackError::MissingConfig("provider.api_key".to_string()));
        }
        if self.telegram.token.trim().is_empty() {
            return Err(TrackError::MissingConfig("telegram.token".to_string()));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(TrackError::MissingConfig("telegram.chat_id".to_string()));
        }
        Ok(())
    }

    /// Select the scheduling policy once, at startup.
    pub fn policy(&self) -> Box<dyn SchedulingPolicy> {
        match self.debug_interval_minutes {
            Some(minutes) => Box::new(FixedInterval(minutes)),
            None => Box::new(QuotaDerivedInterval::new(
                self.quota.daily_allowance(),
                self.quota.safety_margin,
            )),
        }
    }
}
