//! Write-ahead log: record grammar, durable store and replay.
//!
//! # Responsibility
//! - Define the line grammar shared by writer and reader.
//! - Append records durably and replay them deterministically.
//!
//! # Invariants
//! - The log is strictly append-only; records are never rewritten.
//! - The in-memory graph must always be derivable by replaying the log in
//!   file order from an initial state.
//! - Lines that do not match the grammar are valid-but-ignored so old
//!   readers survive future record kinds.

pub mod record;
pub mod replay;
pub mod store;
