//! HTTP handlers

pub mod health;
pub mod transfer;
pub mod wallet;

pub use health::health_check;
pub use transfer::{create_transfer, get_transfer, list_transfers};
pub use wallet::{create_wallet, get_wallet};
