use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResp<T> {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

/// Counts come back either as JSON numbers or as decimal strings, depending on the node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CountResp(pub u64);

impl<'de> Deserialize<'de> for CountResp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(CountResp(n)),
            Raw::Text(s) => s
                .parse()
                .map(CountResp)
                .map_err(|e| D::Error::custom(format!("Invalid count {s}: {e}"))),
        }
    }
}
