pub mod client;
pub mod contracts;
pub mod transactions;
