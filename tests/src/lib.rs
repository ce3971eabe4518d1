use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use std::io::{Error, ErrorKind};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use txpage_clients::api::ledger::LedgerAPI;
use txpage_clients::fixture::FixtureSet;
use txpage_core::ledger::{Digest, TransactionRecord};

/// Scripted in-memory ledger that counts calls and can delay or fail
/// individual range requests.
#[derive(Default)]
pub struct MockLedger {
    records: Vec<TransactionRecord>,
    delays: DashMap<u64, Duration>,
    failures: DashMap<u64, String>,
    fail_count: AtomicBool,
    reverse_hydration: AtomicBool,
    pub count_calls: AtomicUsize,
    pub range_calls: AtomicUsize,
    pub hydrate_calls: AtomicUsize,
}

impl MockLedger {
    pub fn new(fixtures: &FixtureSet) -> Self {
        MockLedger {
            records: fixtures.get_all_fixture_transactions().to_vec(),
            ..Default::default()
        }
    }
    pub fn seeded(count: u64) -> Self {
        Self::new(&FixtureSet::seeded(count))
    }
    /// Delays range requests starting at `start`.
    pub fn delay_range(&self, start: u64, delay: Duration) {
        self.delays.insert(start, delay);
    }
    /// Fails range requests starting at `start`.
    pub fn fail_range(&self, start: u64, message: &str) {
        self.failures.insert(start, message.to_string());
    }
    pub fn fail_count(&self, fail: bool) {
        self.fail_count.store(fail, Ordering::SeqCst);
    }
    pub fn reverse_hydration(&self, reverse: bool) {
        self.reverse_hydration.store(reverse, Ordering::SeqCst);
    }
    pub fn remote_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
            + self.range_calls.load(Ordering::SeqCst)
            + self.hydrate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerAPI for MockLedger {
    async fn get_sequence_count(&self) -> Result<u64, Error> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(Error::new(ErrorKind::ConnectionRefused, "count unavailable"));
        }
        Ok(self.records.len() as u64)
    }

    async fn get_digests_in_range(&self, start: u64, end: u64) -> Result<Vec<Digest>, Error> {
        self.range_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.get(&start).map(|d| *d);
        if let Some(delay) = delay {
            debug!("Delaying range [{start}, {end}) by {delay:?}");
            tokio::time::sleep(delay).await;
        }
        let failure = self.failures.get(&start).map(|m| m.clone());
        if let Some(message) = failure {
            return Err(Error::new(ErrorKind::ConnectionReset, message));
        }
        Ok(self
            .records
            .iter()
            .filter(|r| (start..end).contains(&r.sequence_number))
            .map(|r| r.digest.clone())
            .collect())
    }

    async fn hydrate(&self, digests: &[Digest]) -> Result<Vec<TransactionRecord>, Error> {
        self.hydrate_calls.fetch_add(1, Ordering::SeqCst);
        let mut hydrated = digests
            .iter()
            .map(|d| {
                self.records
                    .iter()
                    .find(|r| r.digest == *d)
                    .cloned()
                    .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("Unknown digest {d}")))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        if self.reverse_hydration.load(Ordering::SeqCst) {
            hydrated.reverse();
        }
        Ok(hydrated)
    }
}

pub fn init_logger() {
    use simple_logger::SimpleLogger;
    SimpleLogger::new().env().init().unwrap_or_default();
}

pub fn sequence_numbers(records: &[TransactionRecord]) -> Vec<u64> {
    records.iter().map(|r| r.sequence_number).collect()
}
