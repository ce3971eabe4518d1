use hex::encode;
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;
use txpage_core::ledger::{Address, Digest, ExecutionStatus, TransactionKind, TransactionRecord};

const FIXTURE_SEED: u64 = 0x7478_7061_6765;
/// 2023-11-14T22:13:20Z, the timestamp of sequence number 0.
const FIXTURE_EPOCH_MS: u64 = 1_700_000_000_000;
const FIXTURE_INTERVAL_MS: u64 = 1_500;

const KINDS: [TransactionKind; 7] = [
    TransactionKind::Transfer,
    TransactionKind::Call,
    TransactionKind::Transfer,
    TransactionKind::Batch,
    TransactionKind::Publish,
    TransactionKind::Transfer,
    TransactionKind::ConsensusCommitPrologue,
];

/// Static transaction set used in offline mode, ordered by sequence number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureSet {
    transactions: Vec<TransactionRecord>,
}

impl FixtureSet {
    pub fn new(mut transactions: Vec<TransactionRecord>) -> Self {
        transactions.sort_by_key(|t| t.sequence_number);
        FixtureSet { transactions }
    }

    /// `count` deterministic transactions with sequence numbers `0..count`.
    pub fn seeded(count: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);
        let accounts: Vec<Address> = (0..8).map(|_| Address::from(rng.gen::<[u8; 32]>())).collect();
        let transactions = (0..count)
            .map(|seq| {
                let kind = if seq == 0 {
                    TransactionKind::Genesis
                } else {
                    KINDS[(seq as usize) % KINDS.len()]
                };
                let sender = if kind.is_system() {
                    Address::default()
                } else {
                    accounts[rng.gen_range(0..accounts.len())]
                };
                let recipient = match kind {
                    TransactionKind::Transfer | TransactionKind::Call => {
                        Some(accounts[rng.gen_range(0..accounts.len())])
                    }
                    TransactionKind::Publish => Some(Address::from(rng.gen::<[u8; 32]>())),
                    _ => None,
                };
                let status = if seq % 11 == 10 {
                    ExecutionStatus::Failure {
                        error: Some("InsufficientCoinBalance".to_string()),
                    }
                } else {
                    ExecutionStatus::Success
                };
                let amount = match kind {
                    TransactionKind::Transfer => {
                        Some(BigUint::from(rng.gen_range(1_000u64..50_000_000_000_000)))
                    }
                    _ => None,
                };
                TransactionRecord {
                    digest: Digest::new(encode(rng.gen::<[u8; 32]>())),
                    sequence_number: seq,
                    sender,
                    recipient,
                    kind,
                    status,
                    gas_used: if kind.is_system() {
                        0
                    } else {
                        rng.gen_range(500..5_000_000)
                    },
                    amount,
                    timestamp_ms: Some(FIXTURE_EPOCH_MS + seq * FIXTURE_INTERVAL_MS),
                }
            })
            .collect();
        FixtureSet { transactions }
    }

    /// Loads a JSON array of transaction records.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let transactions: Vec<TransactionRecord> =
            serde_json::from_str(&fs::read_to_string(path.as_ref())?).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Failed to parse fixtures {:?}: {e}", path.as_ref()),
                )
            })?;
        Ok(Self::new(transactions))
    }

    pub fn get_all_fixture_transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_set_is_deterministic_and_sequential() {
        let a = FixtureSet::seeded(45);
        let b = FixtureSet::seeded(45);
        assert_eq!(a, b);
        assert_eq!(a.len(), 45);
        for (i, tx) in a.get_all_fixture_transactions().iter().enumerate() {
            assert_eq!(tx.sequence_number, i as u64);
        }
        assert_eq!(
            a.get_all_fixture_transactions()[0].kind,
            TransactionKind::Genesis
        );
    }

    #[test]
    fn new_sorts_by_sequence_number() {
        let mut txs = FixtureSet::seeded(5).get_all_fixture_transactions().to_vec();
        txs.reverse();
        let set = FixtureSet::new(txs);
        let seqs: Vec<u64> = set
            .get_all_fixture_transactions()
            .iter()
            .map(|t| t.sequence_number)
            .collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn loads_json_file() {
        let path = std::env::temp_dir().join(format!("txpage-fixtures-{}.json", std::process::id()));
        let seeded = FixtureSet::seeded(3);
        fs::write(
            &path,
            serde_json::to_string(seeded.get_all_fixture_transactions()).unwrap(),
        )
        .unwrap();
        let loaded = FixtureSet::from_json_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, seeded);
    }
}
