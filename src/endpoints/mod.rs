mod openapi;
pub use openapi::*;

pub mod ledger;
