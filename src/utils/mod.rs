pub mod formatting;
pub mod nonce;
pub mod query_arg;
pub mod sanitize;
