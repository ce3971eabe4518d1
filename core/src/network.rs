use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Which ledger deployment to read from. `Custom` carries a host name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Local,
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
}

impl Network {
    pub fn default_endpoint(&self) -> Endpoint {
        let (host, port, use_tls) = match self {
            Network::Mainnet => ("fullnode.mainnet.sui.io", 443, true),
            Network::Testnet => ("fullnode.testnet.sui.io", 443, true),
            Network::Devnet => ("fullnode.devnet.sui.io", 443, true),
            Network::Local => ("127.0.0.1", 9000, false),
            Network::Custom(host) => (host.as_str(), 443, true),
        };
        Endpoint {
            host: host.to_string(),
            port,
            use_tls,
        }
    }
}

impl FromStr for Network {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "mainnet" => Network::Mainnet,
            "testnet" => Network::Testnet,
            "devnet" => Network::Devnet,
            "local" | "localnet" => Network::Local,
            _ => Network::Custom(s.trim().to_string()),
        })
    }
}

impl From<String> for Network {
    fn from(value: String) -> Self {
        match Network::from_str(&value) {
            Ok(n) => n,
            Err(never) => match never {},
        }
    }
}

impl From<Network> for String {
    fn from(value: Network) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
            Network::Devnet => f.write_str("devnet"),
            Network::Local => f.write_str("local"),
            Network::Custom(host) => f.write_str(host),
        }
    }
}
