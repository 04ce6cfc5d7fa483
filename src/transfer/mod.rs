//! Money transfer engine
//!
//! Moves value from the caller's wallet to another user's wallet.
//!
//! # Flow
//!
//! ```text
//! identity + (payee, value)
//!   → self-transfer check
//!   → load payer, load payee          (WalletStore)
//!   → wallet type, balance checks
//!   → authorization                   (Authorizer, one GET)
//!   → debit + credit + ledger insert  (AtomicTransfer, one DB transaction)
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Non-negative balances**: the atomic unit locks both wallet rows and
//!    guards the debit, so concurrent transfers cannot overdraw a wallet
//! 2. **All-or-nothing**: a ledger row exists iff both balance changes committed
//! 3. **No retries**: every failure is terminal for the attempt

pub mod atomic;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod types;

#[cfg(test)]
mod integration_tests;

pub use atomic::{AtomicTransfer, PgAtomicTransfer};
pub use engine::TransferEngine;
pub use error::TransferError;
pub use ledger::{PgTransferLedger, TransferLedger, insert_transfer};
pub use types::{Transfer, TransferValue, ValueError};
