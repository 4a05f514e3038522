//! Domain model for the live-object graph.
//!
//! # Responsibility
//! - Define the canonical morph record used by every other module.
//! - Keep the model free of persistence and logging concerns.
//!
//! # Invariants
//! - Every morph is identified by a stable `MorphId` assigned exactly once.
//! - Tree edges are id references; the model never holds owning back-links.

pub mod morph;
