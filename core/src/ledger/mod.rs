pub mod address;
pub mod digest;
pub mod transaction;

pub use address::Address;
pub use digest::Digest;
pub use transaction::{ExecutionStatus, TransactionKind, TransactionRecord};
