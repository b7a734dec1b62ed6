//! Application configuration.
//!
//! The configuration is read from environment variables once, at startup,
//! and then passed by reference to whatever needs it. There is no global
//! "current base URL": switching backends means building another
//! [`AppConfig`].
//!
//! # Security Notes
//! - `API_TOKEN` and `LOGFIRE_TOKEN` are sensitive and never logged

use anyhow::{Context, bail};
use chrono::NaiveDate;
use chrono_tz::Tz;
use envconfig::Envconfig;

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Base URL of the shop REST backend (NON-SENSITIVE)
    /// Example: "https://api.parrot-shop.example/v1"
    #[envconfig(default = "http://localhost:8080/api")]
    pub api_base_url: String,

    /// 🔒 SENSITIVE: bearer token sent to the backend
    pub api_token: Option<String>,

    /// Per request timeout in seconds (NON-SENSITIVE)
    #[envconfig(default = "15")]
    pub request_timeout_secs: u64,

    /// IANA timezone used to decide what "today" is for ages and hatch dates
    #[envconfig(default = "Asia/Shanghai")]
    pub shop_timezone: String,

    /// Validity used for share links when none is given (NON-SENSITIVE)
    #[envconfig(default = "7")]
    pub share_link_default_days: u32,

    /// 🔒 SENSITIVE: Logfire write token, logs go to stdout when missing
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Reads and validates the configuration from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::init_from_env().context("failed to read app config from env")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            bail!("API_BASE_URL must start with http:// or https://");
        }

        if self.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        if self.share_link_default_days == 0
            || self.share_link_default_days > crate::consts::MAX_SHARE_LINK_DAYS
        {
            bail!(
                "SHARE_LINK_DEFAULT_DAYS must be between 1 and {}",
                crate::consts::MAX_SHARE_LINK_DAYS
            );
        }

        self.timezone()?;
        Ok(())
    }

    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Full URL for a backend path, joined with a single `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.shop_timezone
            .parse::<Tz>()
            .map_err(|err| anyhow::anyhow!("invalid SHOP_TIMEZONE {}: {}", self.shop_timezone, err))
    }

    /// Current date in the shop timezone.
    pub fn today(&self) -> anyhow::Result<NaiveDate> {
        Ok(chrono::Utc::now()
            .with_timezone(&self.timezone()?)
            .date_naive())
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        env: "local".into(),
        api_base_url: "http://localhost:8080/api/".into(),
        api_token: None,
        request_timeout_secs: 15,
        shop_timezone: "Asia/Shanghai".into(),
        share_link_default_days: 7,
        logfire_token: None,
    }
}
