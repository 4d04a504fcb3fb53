//! Bot configuration from the environment (after `.env` is loaded).

use anyhow::{Context, Result};
use role_service::{LifecycleConfig, RetryPolicy, SweeperConfig, DEFAULT_EPHEMERAL_DELAY};
use rolebot_telegram::TelegramConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, warn};

pub struct BotConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub database_url: String,
    pub log_file: String,
    /// User ids allowed to run admin commands.
    pub admin_ids: Vec<i64>,
    /// Home chat checked at start-up.
    pub chat_id: Option<i64>,
    pub activity_timeout_minutes: u64,
    pub sweep_interval_secs: u64,
    pub message_delete_delay_secs: u64,
    pub promotion_settle_secs: u64,
    pub title_retry_attempts: u32,
    pub title_retry_delay_secs: u64,
}

impl BotConfig {
    /// Loads from the environment. `token` overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok()
            .filter(|url| !url.trim().is_empty());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./rolebot.db".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/rolebot.log".to_string());
        let admin_ids = env::var("ADMIN_IDS")
            .map(|raw| parse_admin_ids(&raw))
            .unwrap_or_default();
        let chat_id = env::var("CHAT_ID").ok().and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            raw.parse().ok().or_else(|| {
                warn!(value = %raw, "CHAT_ID is not a number, ignoring");
                None
            })
        });

        Ok(Self {
            bot_token,
            telegram_api_url,
            database_url,
            log_file,
            admin_ids,
            chat_id,
            activity_timeout_minutes: env_number("ACTIVITY_TIMEOUT_MINUTES", 5)?,
            sweep_interval_secs: env_number("SWEEP_INTERVAL_SECS", 60)?,
            message_delete_delay_secs: env_number(
                "MESSAGE_DELETE_DELAY_SECS",
                DEFAULT_EPHEMERAL_DELAY.as_secs(),
            )?,
            promotion_settle_secs: env_number("PROMOTION_SETTLE_SECS", 2)?,
            title_retry_attempts: env_number("TITLE_RETRY_ATTEMPTS", 3)?,
            title_retry_delay_secs: env_number("TITLE_RETRY_DELAY_SECS", 2)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.telegram().validate()?;
        if self.activity_timeout_minutes == 0 {
            anyhow::bail!("ACTIVITY_TIMEOUT_MINUTES must be greater than 0");
        }
        if self.sweep_interval_secs == 0 {
            anyhow::bail!("SWEEP_INTERVAL_SECS must be greater than 0");
        }
        if self.title_retry_attempts == 0 {
            anyhow::bail!("TITLE_RETRY_ATTEMPTS must be greater than 0");
        }
        Ok(())
    }

    pub fn telegram(&self) -> TelegramConfig {
        TelegramConfig {
            bot_token: self.bot_token.clone(),
            telegram_api_url: self.telegram_api_url.clone(),
        }
    }

    pub fn lifecycle_config(&self) -> LifecycleConfig {
        LifecycleConfig {
            settle_delay: Duration::from_secs(self.promotion_settle_secs),
            title_retry: RetryPolicy {
                max_attempts: self.title_retry_attempts,
                delay: Duration::from_secs(self.title_retry_delay_secs),
            },
        }
    }

    pub fn sweeper_config(&self) -> SweeperConfig {
        SweeperConfig {
            period: Duration::from_secs(self.sweep_interval_secs),
            inactivity_timeout: Duration::from_secs(self.activity_timeout_minutes * 60),
        }
    }

    pub fn ephemeral_delay(&self) -> Duration {
        Duration::from_secs(self.message_delete_delay_secs)
    }

    /// Bot id encoded in the token prefix (`<id>:<secret>`).
    pub fn token_bot_id(&self) -> Option<i64> {
        self.bot_token.split_once(':')?.0.parse().ok()
    }
}

/// Parses a comma-separated id list. Quotes and blank entries are tolerated; any malformed entry
/// makes the whole list empty.
pub fn parse_admin_ids(raw: &str) -> Vec<i64> {
    let cleaned = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    let parsed: std::result::Result<Vec<i64>, _> = cleaned
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|part| !part.is_empty())
        .map(i64::from_str)
        .collect();
    match parsed {
        Ok(ids) => ids,
        Err(e) => {
            error!(value = %raw, error = %e, "Malformed ADMIN_IDS, no admins configured");
            Vec::new()
        }
    }
}

fn env_number<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got '{}'", name, raw)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "BOT_TOKEN",
        "TELEGRAM_API_URL",
        "TELOXIDE_API_URL",
        "DATABASE_URL",
        "LOG_FILE",
        "ADMIN_IDS",
        "CHAT_ID",
        "ACTIVITY_TIMEOUT_MINUTES",
        "SWEEP_INTERVAL_SECS",
        "MESSAGE_DELETE_DELAY_SECS",
        "PROMOTION_SETTLE_SECS",
        "TITLE_RETRY_ATTEMPTS",
        "TITLE_RETRY_DELAY_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        clear_env();
        env::set_var("BOT_TOKEN", "123456:secret");

        let config = BotConfig::load(None).unwrap();

        assert_eq!(config.bot_token, "123456:secret");
        assert!(config.telegram_api_url.is_none());
        assert_eq!(config.database_url, "sqlite:./rolebot.db");
        assert_eq!(config.log_file, "logs/rolebot.log");
        assert!(config.admin_ids.is_empty());
        assert!(config.chat_id.is_none());
        assert_eq!(config.activity_timeout_minutes, 5);
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.message_delete_delay_secs, 5);
        assert_eq!(config.promotion_settle_secs, 2);
        assert_eq!(config.title_retry_attempts, 3);
        assert_eq!(config.title_retry_delay_secs, 2);
        assert_eq!(config.token_bot_id(), Some(123456));
        assert!(config.validate().is_ok());

        assert_eq!(
            config.sweeper_config().inactivity_timeout,
            Duration::from_secs(300)
        );
        assert_eq!(config.lifecycle_config().title_retry.max_attempts, 3);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_config_with_custom_values() {
        clear_env();
        env::set_var("BOT_TOKEN", "env_token");
        env::set_var("DATABASE_URL", "sqlite::memory:");
        env::set_var("ADMIN_IDS", "\"1, 2,3\"");
        env::set_var("CHAT_ID", "-100123");
        env::set_var("ACTIVITY_TIMEOUT_MINUTES", "10");
        env::set_var("TELOXIDE_API_URL", "http://localhost:8081");

        let config = BotConfig::load(Some("override_token".to_string())).unwrap();

        assert_eq!(config.bot_token, "override_token");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.admin_ids, vec![1, 2, 3]);
        assert_eq!(config.chat_id, Some(-100123));
        assert_eq!(config.activity_timeout_minutes, 10);
        assert_eq!(
            config.telegram_api_url.as_deref(),
            Some("http://localhost:8081")
        );
        assert!(config.validate().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_malformed_values() {
        clear_env();
        env::set_var("BOT_TOKEN", "t");
        env::set_var("CHAT_ID", "home");
        env::set_var("SWEEP_INTERVAL_SECS", "soon");

        assert!(BotConfig::load(None).is_err());

        env::remove_var("SWEEP_INTERVAL_SECS");
        let config = BotConfig::load(None).unwrap();
        assert!(config.chat_id.is_none());
        assert!(config.token_bot_id().is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_validate_rejects_bad_values() {
        clear_env();
        env::set_var("BOT_TOKEN", "t");
        let mut config = BotConfig::load(None).unwrap();

        config.activity_timeout_minutes = 0;
        assert!(config.validate().is_err());
        config.activity_timeout_minutes = 5;

        config.sweep_interval_secs = 0;
        assert!(config.validate().is_err());
        config.sweep_interval_secs = 60;

        config.title_retry_attempts = 0;
        assert!(config.validate().is_err());
        config.title_retry_attempts = 3;

        config.telegram_api_url = Some("::not a url".to_string());
        assert!(config.validate().is_err());
        clear_env();
    }

    #[test]
    fn test_parse_admin_ids() {
        assert_eq!(parse_admin_ids("1,2,3"), vec![1, 2, 3]);
        assert_eq!(parse_admin_ids(" 10 , , 20 "), vec![10, 20]);
        assert_eq!(parse_admin_ids("'5','6'"), vec![5, 6]);
        assert!(parse_admin_ids("").is_empty());
        assert!(parse_admin_ids("1,abc").is_empty());
    }
}
