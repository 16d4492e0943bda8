//! Account and schedule configuration loaded from a TOML file.
//!
//! Configuration failures are fatal at startup: the loader validates account
//! ids, credentials, and schedule times before anything touches the network.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub id: String,
    /// Pre-obtained credential forwarded verbatim on every request.
    pub credential: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub schedule: ScheduleEntry,
}

fn default_enabled() -> bool {
    true
}

/// Daily firing times for one account. Each `HH:MM` entry becomes one
/// recurring timer while the scheduler runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub times: Vec<String>,
    #[serde(default)]
    pub run_on_start: bool,
}

impl BotConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.base_url.trim().is_empty() {
            bail!("service.base_url must be non-empty");
        }
        if self.accounts.is_empty() {
            bail!("at least one account must be configured");
        }
        let mut seen = HashSet::new();
        for account in &self.accounts {
            let id = account.id.trim();
            if id.is_empty() {
                bail!("account id must be non-empty");
            }
            if !seen.insert(id.to_string()) {
                bail!("duplicate account id '{}'", id);
            }
            if !account.enabled {
                continue;
            }
            if account.credential.trim().is_empty() {
                bail!("account '{}' is enabled but has an empty credential", id);
            }
            if account.schedule.times.is_empty() {
                bail!("account '{}' is enabled but has no schedule times", id);
            }
            for time in &account.schedule.times {
                parse_schedule_time(time).with_context(|| {
                    format!("account '{}' has an invalid schedule time '{}'", id, time)
                })?;
            }
        }
        Ok(())
    }

    pub fn enabled_accounts(&self) -> impl Iterator<Item = &AccountConfig> {
        self.accounts.iter().filter(|account| account.enabled)
    }

    pub fn account(&self, id: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|account| account.id == id)
    }
}

/// Parses an `HH:MM` schedule entry into `(hour, minute)`.
pub fn parse_schedule_time(value: &str) -> Result<(u32, u32)> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|err| anyhow!("expected HH:MM, got '{}': {}", value, err))?;
    Ok((time.hour(), time.minute()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> BotConfig {
        BotConfig {
            service: ServiceConfig {
                base_url: "https://community.example.com/api".to_string(),
                request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            },
            accounts: vec![AccountConfig {
                id: "main".to_string(),
                credential: "token-abc".to_string(),
                enabled: true,
                schedule: ScheduleEntry {
                    times: vec!["08:00".to_string(), "12:30".to_string()],
                    run_on_start: true,
                },
            }],
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        sample_config().validate().expect("valid config");
    }

    #[test]
    fn rejects_duplicate_account_ids() {
        let mut config = sample_config();
        config.accounts.push(config.accounts[0].clone());
        let err = config.validate().expect_err("duplicate ids");
        assert!(err.to_string().contains("duplicate account id"));
    }

    #[test]
    fn rejects_empty_credential_on_enabled_account() {
        let mut config = sample_config();
        config.accounts[0].credential = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn disabled_account_skips_credential_and_schedule_checks() {
        let mut config = sample_config();
        config.accounts[0].enabled = false;
        config.accounts[0].credential = String::new();
        config.accounts[0].schedule.times.clear();
        config.validate().expect("disabled accounts are not validated");
    }

    #[test]
    fn rejects_malformed_schedule_times() {
        for bad in ["25:00", "12:61", "noon", "12", ""] {
            let mut config = sample_config();
            config.accounts[0].schedule.times = vec![bad.to_string()];
            assert!(config.validate().is_err(), "expected rejection of '{bad}'");
        }
    }

    #[test]
    fn parse_schedule_time_extracts_components() {
        assert_eq!(parse_schedule_time("08:00").expect("parse"), (8, 0));
        assert_eq!(parse_schedule_time("23:59").expect("parse"), (23, 59));
    }

    #[test]
    fn loads_from_toml_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("perk.toml");
        std::fs::write(
            &path,
            r#"
[service]
base_url = "https://community.example.com/api"

[[accounts]]
id = "main"
credential = "token-abc"

[accounts.schedule]
times = ["08:00"]
run_on_start = true
"#,
        )
        .expect("write config");

        let config = BotConfig::load(&path).expect("load config");
        assert_eq!(config.accounts.len(), 1);
        assert!(config.accounts[0].enabled, "enabled defaults to true");
        assert!(config.accounts[0].schedule.run_on_start);
        assert_eq!(config.service.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn load_rejects_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(BotConfig::load(&dir.path().join("absent.toml")).is_err());
    }
}
