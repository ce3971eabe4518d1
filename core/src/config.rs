use crate::network::{Endpoint, Network};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::projection::{
    ProjectionOptions, DEFAULT_CURRENCY_SUFFIX, DEFAULT_DECIMALS, DEFAULT_TRUNCATE_BUDGET,
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::env;
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

pub const ENV_RPC_HOST: &str = "TXPAGE_RPC_HOST";
pub const ENV_RPC_PORT: &str = "TXPAGE_RPC_PORT";
pub const ENV_NETWORK: &str = "TXPAGE_NETWORK";
pub const ENV_OFFLINE: &str = "TXPAGE_OFFLINE";

const fn timeout_secs() -> u64 {
    30
}
const fn page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
const fn truncate_budget() -> usize {
    DEFAULT_TRUNCATE_BUDGET
}
fn currency_suffix() -> String {
    DEFAULT_CURRENCY_SUFFIX.to_string()
}
const fn decimals() -> u32 {
    DEFAULT_DECIMALS
}
const fn fixture_delay_ms() -> u64 {
    500
}
const fn fixture_count() -> u64 {
    45
}
fn log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PagerConfig {
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub rpc_host: Option<String>,
    #[serde(default)]
    pub rpc_port: Option<u16>,
    #[serde(default)]
    pub use_tls: Option<bool>,
    #[serde(default = "timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "page_size")]
    pub page_size: u64,
    #[serde(default = "truncate_budget")]
    pub truncate_budget: usize,
    #[serde(default = "currency_suffix")]
    pub currency_suffix: String,
    #[serde(default = "decimals")]
    pub decimals: u32,
    #[serde(default)]
    pub offline: bool,
    #[serde(default = "fixture_delay_ms")]
    pub fixture_delay_ms: u64,
    /// Size of the generated fixture set when no `fixture_path` is given.
    #[serde(default = "fixture_count")]
    pub fixture_count: u64,
    #[serde(default)]
    pub fixture_path: Option<String>,
    #[serde(default = "log_level")]
    pub log_level: String,
}

impl Default for PagerConfig {
    fn default() -> Self {
        PagerConfig {
            network: Network::default(),
            rpc_host: None,
            rpc_port: None,
            use_tls: None,
            timeout_secs: timeout_secs(),
            page_size: page_size(),
            truncate_budget: truncate_budget(),
            currency_suffix: currency_suffix(),
            decimals: decimals(),
            offline: false,
            fixture_delay_ms: fixture_delay_ms(),
            fixture_count: fixture_count(),
            fixture_path: None,
            log_level: log_level(),
        }
    }
}

impl PagerConfig {
    pub fn save_as_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        fs::write(
            path.as_ref(),
            serde_yaml::to_string(&self).map_err(|e| Error::other(format!("{e:?}")))?,
        )
    }

    /// Applies `TXPAGE_*` environment overrides on top of the loaded values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(network) = env::var(ENV_NETWORK) {
            self.network = Network::from(network);
        }
        if let Ok(host) = env::var(ENV_RPC_HOST) {
            self.rpc_host = Some(host);
        }
        if let Ok(port) = env::var(ENV_RPC_PORT) {
            match port.parse() {
                Ok(port) => self.rpc_port = Some(port),
                Err(e) => warn!("Ignoring {ENV_RPC_PORT}={port}: {e}"),
            }
        }
        if let Ok(offline) = env::var(ENV_OFFLINE) {
            self.offline = matches!(offline.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// The network's default endpoint with any configured host, port or scheme applied.
    pub fn endpoint(&self) -> Endpoint {
        let mut endpoint = self.network.default_endpoint();
        if let Some(host) = &self.rpc_host {
            endpoint.host = host.clone();
        }
        if let Some(port) = self.rpc_port {
            endpoint.port = port;
        }
        if let Some(use_tls) = self.use_tls {
            endpoint.use_tls = use_tls;
        }
        endpoint
    }

    pub fn projection_options(&self) -> ProjectionOptions {
        ProjectionOptions {
            truncate_budget: self.truncate_budget,
            currency_suffix: self.currency_suffix.clone(),
            decimals: self.decimals,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.page_size == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "page_size must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl TryFrom<&Path> for PagerConfig {
    type Error = Error;
    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let config = serde_yaml::from_str::<PagerConfig>(&fs::read_to_string(value)?)
            .map_err(|e| Error::new(ErrorKind::InvalidData, format!("{e:?}")))?;
        config.validate()?;
        Ok(config)
    }
}
impl TryFrom<&PathBuf> for PagerConfig {
    type Error = Error;
    fn try_from(value: &PathBuf) -> Result<Self, Self::Error> {
        Self::try_from(value.as_path())
    }
}
