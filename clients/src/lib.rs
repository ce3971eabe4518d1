pub mod api;
pub mod fixture;
pub mod rpc;
