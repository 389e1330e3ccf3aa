//! shardkit: lock-striped concurrent maps and deadline-bound fan-out
//! aggregation.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod ds;
pub mod error;
pub mod store;

#[cfg(feature = "aggregate")]
pub mod aggregate;

pub mod prelude;
