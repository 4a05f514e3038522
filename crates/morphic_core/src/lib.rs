//! Core domain logic for Morphic, a persistent live-object graph.
//!
//! A running Morphic process holds a tree of mutable visual objects
//! ("morphs") rooted at a single world morph. Every attribute mutation is
//! appended to a write-ahead log before it lands in memory, so the graph can
//! be reconstructed deterministically after a restart or crash by replaying
//! the log in file order. This crate is the single source of truth for the
//! graph, its identity scheme, the log grammar, and the replay rules.
//!
//! Rendering backends, window plumbing and input sources live outside this
//! crate and reach it only through the [`render::DrawSink`] and
//! [`dispatch::EventHandler`] seams.

pub mod dispatch;
pub mod logging;
pub mod model;
pub mod ops;
pub mod registry;
pub mod render;
pub mod session;
pub mod wal;
pub mod world;

pub use dispatch::{dispatch_event, EventHandler, HitOrder, PointerEvent};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::morph::{Color, Morph, MorphId, MorphLabel};
pub use ops::OpDispatcher;
pub use registry::{MorphRegistry, RegistryError};
pub use render::{render_world, DrawSink};
pub use session::{Session, SessionConfig};
pub use wal::record::{Slot, SlotValue, WalRecord};
pub use wal::replay::{replay, ReplayReport};
pub use wal::store::{WalError, WalStore};
pub use world::{MorphSnapshot, World, WorldError, WORLD_ID};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
