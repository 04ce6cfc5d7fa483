//! Wallet Transfer - wallet-to-wallet money transfer service
//!
//! Validates a transfer request, consults an external authorizer, then debits
//! the payer, credits the payee and records the transfer as one atomic unit.
//!
//! # Modules
//!
//! - [`core_types`] - Identity types (UserId, TransferId)
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`wallet`] - Wallet model, store and creation service
//! - [`transfer`] - Transfer engine, atomic unit and ledger
//! - [`authorization`] - External authorizer client
//! - [`session`] - Session tokens and the identity middleware
//! - [`memory`] - In-memory store used without PostgreSQL and in tests
//! - [`gateway`] - HTTP API

// Core types - must be first!
pub mod core_types;

pub mod config;
pub mod logging;

// Storage
pub mod db;
pub mod memory;
pub mod wallet;

// Transfer flow
pub mod authorization;
pub mod session;
pub mod transfer;

pub mod gateway;

// Convenient re-exports at crate root
pub use authorization::{AuthorizationDecision, AuthorizationError, Authorizer, HttpAuthorizer};
pub use config::AppConfig;
pub use core_types::{TransferId, UserId};
pub use memory::MemoryStore;
pub use session::{SessionIdentity, SessionVerifier};
pub use transfer::{Transfer, TransferEngine, TransferError, TransferValue};
pub use wallet::{Wallet, WalletService, WalletType};
