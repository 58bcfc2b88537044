use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_API_BASE: &str = "https://thecodeworks.in/kalarasa";
const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Which profile backend the profile page uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    Live,
    Offline,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub profile_mode: ProfileMode,
    pub offline_profile_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base = lookup("KALARASA_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let port = match lookup("PORT") {
            Some(p) => p.trim().parse().context("PORT must be a port number")?,
            None => 8080,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let profile_mode = match lookup("PROFILE_SOURCE").as_deref().map(str::trim) {
            None | Some("") | Some("live") => ProfileMode::Live,
            Some("offline") => ProfileMode::Offline,
            Some(other) => bail!("PROFILE_SOURCE must be `live` or `offline`, got `{}`", other),
        };

        let delay_ms: u64 = match lookup("OFFLINE_PROFILE_DELAY_MS") {
            Some(ms) => ms
                .trim()
                .parse()
                .context("OFFLINE_PROFILE_DELAY_MS must be a number of milliseconds")?,
            None => 1000,
        };

        Ok(Self {
            api_base,
            port,
            allowed_origins,
            profile_mode,
            offline_profile_delay: Duration::from_millis(delay_ms),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
