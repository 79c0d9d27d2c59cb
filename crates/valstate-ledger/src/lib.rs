//! Ledger replay and validator state projection for valstate.
//!
//! This crate is the heart of valstate. It provides:
//! - The [`LedgerSource`] trait boundary and its implementations
//!   ([`InMemoryLedger`] for files, stdin and tests; [`ReadLedgerCommand`]
//!   for a live node)
//! - A tagged-variant [`RecordDecoder`] for protocol version 1 and 2 records
//! - The [`ValidatorSet`] accumulator and the [`ProjectionBuilder`] fold
//! - Deterministic replay of a full ledger via [`ReplayEngine`]

pub mod command;
pub mod error;
pub mod memory;
pub mod projection;
pub mod records;
pub mod replay;
pub mod traits;

pub use command::{ReadLedgerCommand, ReadLedgerConfig};
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use projection::{ProjectionBuilder, ValidatorSet};
pub use records::{DecodedRecord, RecordDecoder};
pub use replay::{ReplayEngine, ReplayResult};
pub use traits::LedgerSource;
