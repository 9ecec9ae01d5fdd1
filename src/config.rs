use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::analysis::{AnalysisSettings, FuelOption};
use crate::domain::TariffSchedule;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
    pub tariff: TariffConfig,
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub fuels: Vec<FuelOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 10,
            enable_cors: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            filter: "info,tower_http=info,hyper=warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: "__SET_VIA_ENV_HPA__AUTH__TOKEN".to_string(),
        }
    }
}

/// Tiers are validated while the config is extracted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TariffConfig {
    pub tiers: TariffSchedule,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    /// Compiled-in defaults, then `config/default.toml`, then `HPA__` env vars.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("HPA__").split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Settings the tariff deserializer cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate().context("invalid [analysis] settings")?;
        for fuel in &self.fuels {
            fuel.validate().with_context(|| format!("invalid fuel {:?}", fuel.name))?;
        }
        Ok(())
    }
}
