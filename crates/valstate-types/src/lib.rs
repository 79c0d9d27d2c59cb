//! Foundation types for valstate.
//!
//! Every other valstate crate depends on `valstate-types`.
//!
//! # Key Types
//!
//! - [`Identity`]: Opaque participant identifier (a ledger `dest` or author)
//! - [`ProtocolVersion`]: Wire-encoding variant of a ledger transaction
//! - [`Attribute`]: The fixed schema of tracked validator attributes
//! - [`ValidatorSnapshot`]: Materialized current state of one validator

pub mod attribute;
pub mod error;
pub mod identity;
pub mod protocol;
pub mod snapshot;

pub use attribute::Attribute;
pub use error::TypeError;
pub use identity::Identity;
pub use protocol::ProtocolVersion;
pub use snapshot::ValidatorSnapshot;
