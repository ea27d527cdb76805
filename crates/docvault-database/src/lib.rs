//! # docvault-database
//!
//! The transactional record store behind DocVault. [`VaultStore`] is the
//! boundary the service layer talks to; [`PgVaultStore`] implements it on
//! PostgreSQL and [`MemoryVaultStore`] keeps everything in process.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod provider;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryVaultStore;
pub use postgres::PgVaultStore;
pub use provider::StoreManager;
pub use store::{GrantCounter, RecordOutcome, VaultStore};
