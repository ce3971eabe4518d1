pub mod config;
pub mod errors;
pub mod formatting;
pub mod ledger;
pub mod network;
pub mod pagination;
pub mod projection;
pub mod query;

fn _version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
fn _pkg_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

pub fn version() -> String {
    format!("{}: {}", _pkg_name(), _version())
}

#[test]
fn test_version() {
    println!("{}", version());
}
