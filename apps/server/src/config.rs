use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use chrono_tz::Tz;
use stockwidget_core::utils::{parse_timezone, DEFAULT_EXCHANGE_TZ};
use stockwidget_market_data::provider::finnhub::BASE_URL;

pub const PREFS_FILE: &str = "prefs.json";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub exchange_tz: Tz,
    pub provider_url: String,
    pub cors_allow: Vec<String>,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("SW_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8088".to_string())
            .parse()
            .context("Invalid SW_LISTEN_ADDR")?;
        let data_dir = std::env::var("SW_DATA_DIR").unwrap_or_else(|_| "./data".into());
        let exchange_tz = match std::env::var("SW_EXCHANGE_TZ") {
            Ok(name) => parse_timezone(&name).ok_or_else(|| anyhow!("Invalid SW_EXCHANGE_TZ: {}", name))?,
            Err(_) => DEFAULT_EXCHANGE_TZ,
        };
        let provider_url = std::env::var("SW_PROVIDER_URL").unwrap_or_else(|_| BASE_URL.into());
        let cors_allow = std::env::var("SW_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let log_json = std::env::var("SW_LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            listen_addr,
            data_dir: PathBuf::from(data_dir),
            exchange_tz,
            provider_url,
            cors_allow,
            log_json,
        })
    }

    /// Defaults with every file under `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8088)),
            data_dir: data_dir.into(),
            exchange_tz: DEFAULT_EXCHANGE_TZ,
            provider_url: BASE_URL.to_string(),
            cors_allow: vec!["*".to_string()],
            log_json: false,
        }
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join(PREFS_FILE)
    }

    pub fn quote_cache_path(&self) -> PathBuf {
        self.data_dir.join(stockwidget_core::constants::QUOTE_CACHE_FILE)
    }
}
