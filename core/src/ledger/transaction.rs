use crate::ledger::address::Address;
use crate::ledger::digest::Digest;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum TransactionKind {
    Transfer,
    Call,
    Publish,
    Batch,
    ChangeEpoch,
    Genesis,
    ConsensusCommitPrologue,
}

impl TransactionKind {
    /// System transactions are issued by the ledger itself rather than by an account.
    pub fn is_system(&self) -> bool {
        matches!(
            self,
            TransactionKind::ChangeEpoch
                | TransactionKind::Genesis
                | TransactionKind::ConsensusCommitPrologue
        )
    }
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Transfer => "Transfer",
            TransactionKind::Call => "Call",
            TransactionKind::Publish => "Publish",
            TransactionKind::Batch => "Batch",
            TransactionKind::ChangeEpoch => "Change Epoch",
            TransactionKind::Genesis => "Genesis",
            TransactionKind::ConsensusCommitPrologue => "Consensus Commit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub digest: Digest,
    pub sequence_number: u64,
    pub sender: Address,
    #[serde(default)]
    pub recipient: Option<Address>,
    pub kind: TransactionKind,
    pub status: ExecutionStatus,
    pub gas_used: u64,
    #[serde(default, with = "amount_string")]
    pub amount: Option<BigUint>,
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
}

/// Amounts travel as decimal strings since they can exceed `u64`.
mod amount_string {
    use num_bigint::BigUint;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(value: &Option<BigUint>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.to_str_radix(10)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigUint>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => BigUint::from_str(s.trim())
                .map(Some)
                .map_err(|e| D::Error::custom(format!("Invalid amount {s}: {e}"))),
            None => Ok(None),
        }
    }
}
