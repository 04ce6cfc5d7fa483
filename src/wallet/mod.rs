//! Wallet management
//!
//! One wallet per user, holding a non-negative balance and a type.
//! Balances are only mutated by the atomic transfer unit in
//! [`crate::transfer::atomic`]; this module reads wallets and creates them.

pub mod models;
pub mod repository;
pub mod service;

pub use models::{Wallet, WalletType};
pub use repository::{PgWalletStore, WalletStore, apply_balance_delta, lock_wallets};
pub use service::{WalletError, WalletService};
