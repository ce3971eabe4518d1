use async_trait::async_trait;
use std::io::Error;
use txpage_core::ledger::{Digest, TransactionRecord};

/// Read access to a sequence-numbered transaction ledger.
#[async_trait]
pub trait LedgerAPI {
    /// Total number of transactions committed so far.
    async fn get_sequence_count(&self) -> Result<u64, Error>;
    /// Digests of the transactions with sequence numbers in `[start, end)`, in order.
    async fn get_digests_in_range(&self, start: u64, end: u64) -> Result<Vec<Digest>, Error>;
    /// Resolves every digest into its full record, preserving input order.
    /// Either all digests resolve or the call fails.
    async fn hydrate(&self, digests: &[Digest]) -> Result<Vec<TransactionRecord>, Error>;
}
