use crate::api::ledger::LedgerAPI;
use crate::api::responses::CountResp;
use crate::rpc::{call, get_client, get_url};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::collections::HashMap;
use std::io::{Error, ErrorKind};
use txpage_core::ledger::{Digest, TransactionRecord};
use txpage_core::network::Endpoint;

pub const METHOD_SEQUENCE_COUNT: &str = "ledger_getTotalTransactionCount";
pub const METHOD_DIGESTS_IN_RANGE: &str = "ledger_getTransactionDigestsInRange";
pub const METHOD_MULTI_GET: &str = "ledger_multiGetTransactions";

pub struct LedgerClient {
    client: Client,
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    pub additional_headers: Option<HashMap<String, String>>,
}

impl LedgerClient {
    pub fn new(
        host: &str,
        port: u16,
        use_tls: bool,
        timeout_secs: u64,
        additional_headers: &Option<HashMap<String, String>>,
    ) -> Result<Self, Error> {
        Ok(LedgerClient {
            client: get_client(timeout_secs)?,
            host: host.to_string(),
            port,
            use_tls,
            additional_headers: additional_headers.clone(),
        })
    }
    pub fn from_endpoint(
        endpoint: &Endpoint,
        timeout_secs: u64,
        additional_headers: &Option<HashMap<String, String>>,
    ) -> Result<Self, Error> {
        Self::new(
            &endpoint.host,
            endpoint.port,
            endpoint.use_tls,
            timeout_secs,
            additional_headers,
        )
    }
    pub fn url(&self) -> String {
        get_url(&self.host, self.port, self.use_tls)
    }
}

#[async_trait]
impl LedgerAPI for LedgerClient {
    async fn get_sequence_count(&self) -> Result<u64, Error> {
        Ok(call::<CountResp>(
            &self.client,
            &self.url(),
            METHOD_SEQUENCE_COUNT,
            json!([]),
            &self.additional_headers,
        )
        .await?
        .0)
    }
    async fn get_digests_in_range(&self, start: u64, end: u64) -> Result<Vec<Digest>, Error> {
        if start > end {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid sequence range [{start}, {end})"),
            ));
        }
        call::<Vec<Digest>>(
            &self.client,
            &self.url(),
            METHOD_DIGESTS_IN_RANGE,
            json!([start, end]),
            &self.additional_headers,
        )
        .await
    }
    async fn hydrate(&self, digests: &[Digest]) -> Result<Vec<TransactionRecord>, Error> {
        if digests.is_empty() {
            return Ok(vec![]);
        }
        call::<Vec<TransactionRecord>>(
            &self.client,
            &self.url(),
            METHOD_MULTI_GET,
            json!([digests]),
            &self.additional_headers,
        )
        .await
    }
}
