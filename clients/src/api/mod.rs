pub mod ledger;
pub mod responses;
