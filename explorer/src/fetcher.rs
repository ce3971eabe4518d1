use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use txpage_clients::api::ledger::LedgerAPI;
use txpage_clients::fixture::FixtureSet;
use txpage_core::errors::PagerError;
use txpage_core::ledger::{Digest, TransactionRecord};
use txpage_core::network::Network;
use txpage_core::pagination::{clamp_page, compute_range, PageRequest, SequenceRange};

pub const DEFAULT_FIXTURE_DELAY: Duration = Duration::from_millis(500);

/// Where page contents come from. Implementations return the records of
/// `range` in ascending sequence order.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn sequence_count(&self, network: &Network) -> Result<u64, PagerError>;
    async fn fetch_range(
        &self,
        network: &Network,
        range: SequenceRange,
    ) -> Result<Vec<TransactionRecord>, PagerError>;
}

pub type SharedLedger = Arc<dyn LedgerAPI + Send + Sync>;

/// Reads from remote ledger clients, one per network.
#[derive(Default, Clone)]
pub struct RpcSource {
    clients: HashMap<Network, SharedLedger>,
}

impl RpcSource {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn single(network: Network, client: SharedLedger) -> Self {
        Self::new().with_client(network, client)
    }
    pub fn with_client(mut self, network: Network, client: SharedLedger) -> Self {
        self.clients.insert(network, client);
        self
    }
    fn client(&self, network: &Network) -> Result<&SharedLedger, PagerError> {
        self.clients.get(network).ok_or_else(|| {
            PagerError::Transport(format!("No ledger client configured for network {network}"))
        })
    }
}

/// Hydration is all or nothing and must line up with the requested digests.
fn verify_hydration(digests: &[Digest], records: &[TransactionRecord]) -> Result<(), PagerError> {
    if digests.len() != records.len() {
        return Err(PagerError::Transport(format!(
            "Hydrated {} records for {} digests",
            records.len(),
            digests.len()
        )));
    }
    if let Some((d, r)) = digests.iter().zip(records).find(|(d, r)| **d != r.digest) {
        return Err(PagerError::Transport(format!(
            "Hydration out of order: expected {d}, got {}",
            r.digest
        )));
    }
    Ok(())
}

#[async_trait]
impl TransactionSource for RpcSource {
    async fn sequence_count(&self, network: &Network) -> Result<u64, PagerError> {
        Ok(self.client(network)?.get_sequence_count().await?)
    }
    async fn fetch_range(
        &self,
        network: &Network,
        range: SequenceRange,
    ) -> Result<Vec<TransactionRecord>, PagerError> {
        let client = self.client(network)?;
        let digests = client.get_digests_in_range(range.start, range.end).await?;
        if digests.is_empty() {
            return Ok(vec![]);
        }
        let records = client.hydrate(&digests).await?;
        verify_hydration(&digests, &records)?;
        Ok(records)
    }
}

/// Serves a static fixture set after a fixed delay, for demos and offline use.
#[derive(Clone)]
pub struct FixtureSource {
    fixtures: Arc<FixtureSet>,
    delay: Duration,
}

impl FixtureSource {
    pub fn new(fixtures: FixtureSet, delay: Duration) -> Self {
        FixtureSource {
            fixtures: Arc::new(fixtures),
            delay,
        }
    }
    pub fn fixtures(&self) -> &FixtureSet {
        &self.fixtures
    }
}

#[async_trait]
impl TransactionSource for FixtureSource {
    async fn sequence_count(&self, network: &Network) -> Result<u64, PagerError> {
        debug!("Serving fixture count for {network}");
        tokio::time::sleep(self.delay).await;
        Ok(self.fixtures.len() as u64)
    }
    async fn fetch_range(
        &self,
        network: &Network,
        range: SequenceRange,
    ) -> Result<Vec<TransactionRecord>, PagerError> {
        debug!("Serving fixtures [{}, {}) for {network}", range.start, range.end);
        tokio::time::sleep(self.delay).await;
        Ok(self
            .fixtures
            .get_all_fixture_transactions()
            .iter()
            .filter(|t| range.contains(t.sequence_number))
            .cloned()
            .collect())
    }
}

/// Resolves pages into transaction records through an injected source.
#[derive(Clone)]
pub struct TransactionFetcher {
    source: Arc<dyn TransactionSource>,
}

impl TransactionFetcher {
    pub fn new(source: Arc<dyn TransactionSource>) -> Self {
        TransactionFetcher { source }
    }
    pub fn rpc(source: RpcSource) -> Self {
        Self::new(Arc::new(source))
    }
    pub fn fixtures(fixtures: FixtureSet, delay: Duration) -> Self {
        Self::new(Arc::new(FixtureSource::new(fixtures, delay)))
    }

    pub async fn sequence_count(&self, network: &Network) -> Result<u64, PagerError> {
        self.source.sequence_count(network).await
    }

    /// Records on `page`, newest first. Pages past the end are clamped to the
    /// last page; an empty range resolves without touching the source.
    pub async fn fetch(
        &self,
        network: &Network,
        total_count: u64,
        page_size: u64,
        page: Option<i64>,
    ) -> Result<Vec<TransactionRecord>, PagerError> {
        let clamped = clamp_page(page, total_count, page_size);
        if page.is_some_and(|p| p > 0 && p as u64 != clamped) {
            debug!("Clamped page {page:?} to {clamped} of {total_count} transactions");
        }
        let range = compute_range(
            total_count,
            page_size,
            Some(i64::try_from(clamped).unwrap_or(i64::MAX)),
        )?;
        if range.is_empty() {
            return Ok(vec![]);
        }
        let mut records = self.source.fetch_range(network, range).await.map_err(|e| {
            warn!("Failed to fetch [{}, {}) on {network}: {e}", range.start, range.end);
            e
        })?;
        records.reverse();
        Ok(records)
    }

    pub async fn fetch_request(
        &self,
        network: &Network,
        request: &PageRequest,
    ) -> Result<Vec<TransactionRecord>, PagerError> {
        self.fetch(
            network,
            request.total_count,
            request.page_size,
            Some(i64::try_from(request.page).unwrap_or(i64::MAX)),
        )
        .await
    }
}
