use crate::formatting::{format_amount, format_human, time_ago, truncate_middle, PLACEHOLDER};
use crate::ledger::{ExecutionStatus, TransactionKind, TransactionRecord};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TRUNCATE_BUDGET: usize = 20;
pub const DEFAULT_CURRENCY_SUFFIX: &str = "SUI";
pub const DEFAULT_DECIMALS: u32 = 9;
pub const UNKNOWN_AMOUNT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionOptions {
    pub truncate_budget: usize,
    pub currency_suffix: String,
    pub decimals: u32,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        ProjectionOptions {
            truncate_budget: DEFAULT_TRUNCATE_BUDGET,
            currency_suffix: DEFAULT_CURRENCY_SUFFIX.to_string(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl ProjectionOptions {
    pub fn with_truncate_budget(mut self, budget: usize) -> Self {
        self.truncate_budget = budget;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum LinkTarget {
    Transaction(String),
    Address(String),
    Object(String),
}

impl LinkTarget {
    pub fn path(&self) -> String {
        match self {
            LinkTarget::Transaction(id) => format!("/transactions/{id}"),
            LinkTarget::Address(id) => format!("/addresses/{id}"),
            LinkTarget::Object(id) => format!("/objects/{id}"),
        }
    }
}

/// A possibly shortened identifier together with where it links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierCell {
    pub full: String,
    pub display: String,
    pub link: Option<LinkTarget>,
    pub copyable: bool,
}

impl IdentifierCell {
    fn new(full: String, link: LinkTarget, budget: usize) -> Self {
        IdentifierCell {
            display: truncate_middle(&full, budget),
            full,
            link: Some(link),
            copyable: true,
        }
    }
    pub fn placeholder() -> Self {
        IdentifierCell {
            full: String::new(),
            display: PLACEHOLDER.to_string(),
            link: None,
            copyable: false,
        }
    }
    pub fn is_placeholder(&self) -> bool {
        self.link.is_none()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub age: String,
    pub transaction: IdentifierCell,
    pub sender: IdentifierCell,
    pub recipient: IdentifierCell,
    pub kind: String,
    pub status: RowStatus,
    /// Failure detail, when the ledger reported one.
    pub status_detail: Option<String>,
    pub amount: String,
    pub gas: String,
}

pub fn project_record(
    record: &TransactionRecord,
    options: &ProjectionOptions,
    now_ms: u64,
) -> DisplayRow {
    let budget = options.truncate_budget;
    let recipient = match &record.recipient {
        Some(addr) => {
            let id = addr.to_string();
            let link = if record.kind == TransactionKind::Publish {
                LinkTarget::Object(id.clone())
            } else {
                LinkTarget::Address(id.clone())
            };
            IdentifierCell::new(id, link, budget)
        }
        None => IdentifierCell::placeholder(),
    };
    let (status, status_detail) = match &record.status {
        ExecutionStatus::Success => (RowStatus::Success, None),
        ExecutionStatus::Failure { error } => (RowStatus::Failure, error.clone()),
    };
    DisplayRow {
        age: record
            .timestamp_ms
            .map(|ts| time_ago(ts, now_ms))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        transaction: IdentifierCell::new(
            record.digest.to_string(),
            LinkTarget::Transaction(record.digest.to_string()),
            budget,
        ),
        sender: IdentifierCell::new(
            record.sender.to_string(),
            LinkTarget::Address(record.sender.to_string()),
            budget,
        ),
        recipient,
        kind: record.kind.to_string(),
        status,
        status_detail,
        amount: record
            .amount
            .as_ref()
            .map(|a| format_amount(a, options.decimals, &options.currency_suffix))
            .unwrap_or_else(|| UNKNOWN_AMOUNT.to_string()),
        gas: format_human(record.gas_used),
    }
}

/// Projects records into rows, one row per record in the same order.
pub fn project(
    records: &[TransactionRecord],
    options: &ProjectionOptions,
    now_ms: u64,
) -> Vec<DisplayRow> {
    records
        .iter()
        .map(|r| project_record(r, options, now_ms))
        .collect()
}
