//! Session: the write-ahead-logged mutation surface over one world.
//!
//! # Responsibility
//! - Boot a world, replay its log, and couple every attribute mutation to a
//!   durable log append.
//! - Remain the single writer of the log (mutations take `&mut self`, which
//!   encodes the one-mutation-in-flight discipline).
//!
//! # Invariants
//! - Attribute records are appended before the in-memory update (write
//!   ahead). On append failure the mutation is not applied.
//! - Structural spawn/destroy append their records after the registry has
//!   assigned the id; a failure there leaves memory ahead of the log, the
//!   documented divergence window.
//! - Plain attach/detach of existing morphs emit no record, matching the
//!   original attribute-only history contract.

use crate::dispatch::{dispatch_event, EventHandler, HitOrder, PointerEvent};
use crate::model::morph::{Color, Morph, MorphId};
use crate::render::{render_world, DrawSink};
use crate::wal::record::{Slot, WalRecord};
use crate::wal::replay::{replay, ReplayReport};
use crate::wal::store::WalStore;
use crate::world::{MorphSnapshot, World, WorldResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Boot configuration for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Location of the append-only log file.
    pub wal_path: PathBuf,
}

impl SessionConfig {
    pub fn new(wal_path: impl Into<PathBuf>) -> Self {
        Self {
            wal_path: wal_path.into(),
        }
    }
}

/// A booted world plus its write-ahead log.
#[derive(Debug)]
pub struct Session {
    world: World,
    wal: WalStore,
    boot_report: ReplayReport,
}

impl Session {
    /// Opens the log store, creates the world and replays any existing log.
    pub fn boot(config: &SessionConfig) -> WorldResult<Self> {
        let wal = WalStore::open(&config.wal_path)?;
        let mut world = World::new();
        let boot_report = replay(&mut world, &config.wal_path)?;
        info!(
            "event=world_boot module=session status=ok wal_path={} log_found={} applied={} skipped={} morphs={}",
            config.wal_path.display(),
            boot_report.log_found,
            boot_report.applied,
            boot_report.skipped,
            world.morph_count()
        );
        Ok(Self {
            world,
            wal,
            boot_report,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Structural escape hatch for bootstrap paths that pre-create morphs
    /// outside the logged spawn path (e.g. before replaying an
    /// attribute-only log from an older writer).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Replay outcome observed at boot.
    pub fn boot_report(&self) -> ReplayReport {
        self.boot_report
    }

    /// Registers the morph under `parent` and logs a `SPAWN` record plus the
    /// full initial frame and color, so replay can rebuild the tree and its
    /// attributes from an empty registry.
    pub fn spawn(&mut self, morph: Morph, parent: &str) -> WorldResult<MorphId> {
        let (x, y, width, height, color) =
            (morph.x, morph.y, morph.width, morph.height, morph.color);
        let id = self.world.adopt(morph, parent)?;
        self.wal.append(&WalRecord::Spawn {
            id: id.clone(),
            parent: parent.to_string(),
        })?;
        self.wal.append(&WalRecord::set_scalar(id.as_str(), Slot::X, x))?;
        self.wal.append(&WalRecord::set_scalar(id.as_str(), Slot::Y, y))?;
        self.wal
            .append(&WalRecord::set_scalar(id.as_str(), Slot::Width, width))?;
        self.wal
            .append(&WalRecord::set_scalar(id.as_str(), Slot::Height, height))?;
        self.wal.append(&WalRecord::set_color(id.as_str(), color))?;
        debug!("event=morph_spawn module=session status=ok id={id} parent={parent}");
        Ok(id)
    }

    /// Attaches an existing morph; structural-only, no log record.
    pub fn attach(&mut self, parent: &str, child: &str) -> WorldResult<()> {
        self.world.attach(parent, child)?;
        debug!("event=hierarchy_changed module=session status=ok op=attach parent={parent} child={child}");
        Ok(())
    }

    /// Detaches an existing morph; structural-only, no log record.
    pub fn detach(&mut self, parent: &str, child: &str) -> WorldResult<()> {
        self.world.detach(parent, child)?;
        debug!("event=hierarchy_changed module=session status=ok op=detach parent={parent} child={child}");
        Ok(())
    }

    /// Destroys the subtree and logs a `PRUNE` record.
    pub fn destroy(&mut self, id: &str) -> WorldResult<()> {
        self.world.destroy(id)?;
        self.wal.append(&WalRecord::Prune { id: id.to_string() })?;
        debug!("event=morph_destroy module=session status=ok id={id}");
        Ok(())
    }

    /// Moves the morph; two records (`x`, then `y`) precede the update.
    pub fn move_morph(&mut self, id: &str, x: f64, y: f64) -> WorldResult<()> {
        self.ensure_exists(id)?;
        self.wal.append(&WalRecord::set_scalar(id, Slot::X, x))?;
        self.wal.append(&WalRecord::set_scalar(id, Slot::Y, y))?;
        self.world.set_position(id, x, y)
    }

    /// Resizes the morph; two records (`width`, then `height`).
    pub fn resize(&mut self, id: &str, width: f64, height: f64) -> WorldResult<()> {
        self.ensure_exists(id)?;
        self.wal.append(&WalRecord::set_scalar(id, Slot::Width, width))?;
        self.wal.append(&WalRecord::set_scalar(id, Slot::Height, height))?;
        self.world.set_size(id, width, height)
    }

    /// Recolors the morph; one record with the comma-joined 4-tuple.
    pub fn recolor(&mut self, id: &str, color: Color) -> WorldResult<()> {
        self.ensure_exists(id)?;
        self.wal.append(&WalRecord::set_color(id, color))?;
        self.world.set_color(id, color)
    }

    /// Diagnostic listing of every registered morph in registration order.
    pub fn snapshot(&self) -> Vec<MorphSnapshot> {
        self.world.snapshot()
    }

    /// Feeds the current tree to the drawing sink, depth-first from the root.
    pub fn render(&self, sink: &mut dyn DrawSink) {
        render_world(&self.world, sink);
    }

    /// Routes a pointer event through the tree; returns the handling morph.
    pub fn dispatch(
        &self,
        event: &PointerEvent,
        order: HitOrder,
        handler: &mut dyn EventHandler,
    ) -> Option<MorphId> {
        dispatch_event(&self.world, event, order, handler)
    }

    fn ensure_exists(&self, id: &str) -> WorldResult<()> {
        if self.world.contains(id) {
            Ok(())
        } else {
            Err(crate::world::WorldError::MorphNotFound(id.to_string()))
        }
    }
}
