//! World root and structural graph mutations.
//!
//! # Responsibility
//! - Anchor one live-object graph at a single root morph.
//! - Provide the sole authorized paths for attach/detach/destroy and for
//!   direct attribute application.
//!
//! # Invariants
//! - Exactly one root per world; it cannot be detached or destroyed.
//! - A morph is in at most one parent's child list; `attach` enforces this
//!   by removing the child from any previous parent first.
//! - `destroy` unregisters the whole subtree so the registry never leaks
//!   entries for unreachable morphs.

use crate::model::morph::{Color, Morph, MorphId};
use crate::registry::{MorphRegistry, RegistryError};
use crate::wal::record::{Slot, SlotValue};
use crate::wal::store::WalError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reserved id of the root morph.
pub const WORLD_ID: &str = "world";

pub type WorldResult<T> = Result<T, WorldError>;

/// Errors from graph mutation entry points.
#[derive(Debug)]
pub enum WorldError {
    /// The named morph is not registered in this world.
    MorphNotFound(MorphId),
    /// An operation that requires a booted world ran before boot.
    MissingWorld,
    /// A caller-supplied argument failed validation.
    InvalidArgument(String),
    /// No handler is registered for the operation name.
    UnknownOperation(String),
    Registry(RegistryError),
    Wal(WalError),
}

impl Display for WorldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MorphNotFound(id) => write!(f, "morph not found: {id}"),
            Self::MissingWorld => write!(f, "no world has been booted"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::UnknownOperation(name) => write!(f, "unknown operation: {name}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Wal(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WorldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Wal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistryError> for WorldError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<WalError> for WorldError {
    fn from(value: WalError) -> Self {
        Self::Wal(value)
    }
}

/// Diagnostic projection of one registered morph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MorphSnapshot {
    pub id: MorphId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

/// The distinguished root morph plus the registry that owns the graph.
#[derive(Debug)]
pub struct World {
    registry: MorphRegistry,
}

impl World {
    /// Creates a world containing only the root morph.
    pub fn new() -> Self {
        let mut registry = MorphRegistry::new();
        registry
            .register(Morph::with_id(WORLD_ID))
            .expect("empty registry accepts the root morph");
        Self { registry }
    }

    pub fn root_id(&self) -> &str {
        WORLD_ID
    }

    pub fn root(&self) -> &Morph {
        self.registry
            .lookup(WORLD_ID)
            .expect("root morph is registered for the lifetime of the world")
    }

    /// O(1) lookup by id.
    pub fn morph(&self, id: &str) -> Option<&Morph> {
        self.registry.lookup(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    pub fn morph_count(&self) -> usize {
        self.registry.len()
    }

    /// Registers a morph and attaches it under `parent`.
    ///
    /// Allocates a fresh id when the morph has none. Fails without side
    /// effects when the parent is unknown or the id is invalid/taken.
    pub fn adopt(&mut self, morph: Morph, parent: &str) -> WorldResult<MorphId> {
        if !self.registry.contains(parent) {
            return Err(WorldError::MorphNotFound(parent.to_string()));
        }
        let id = self.registry.register(morph)?;
        self.attach(parent, &id)?;
        Ok(id)
    }

    /// Makes `child` the last entry in `parent`'s child list.
    ///
    /// The child is removed from any previous parent first, so membership
    /// stays exclusive. Re-attaching under the same parent is duplicate-safe:
    /// the list is left untouched and ownership is re-asserted.
    pub fn attach(&mut self, parent: &str, child: &str) -> WorldResult<()> {
        self.require(parent)?;
        self.require(child)?;
        if child == WORLD_ID {
            return Err(WorldError::InvalidArgument(
                "the world root cannot be attached to another morph".to_string(),
            ));
        }

        // The structure must stay a tree rooted at the world: attaching a
        // morph under itself or its own subtree would orphan a cycle. The
        // owner chain is cycle-free here, so the walk terminates.
        let mut ancestor = Some(parent.to_string());
        while let Some(current) = ancestor {
            if current == child {
                return Err(WorldError::InvalidArgument(format!(
                    "cannot attach {child} under its own subtree"
                )));
            }
            ancestor = self.require(&current)?.owner.clone();
        }

        let previous_owner = self.require(child)?.owner.clone();
        if let Some(previous) = previous_owner {
            if previous != parent {
                if let Some(old_parent) = self.registry.lookup_mut(&previous) {
                    old_parent.children.retain(|entry| entry != child);
                }
            }
        }

        let parent_morph = self.require_mut(parent)?;
        if !parent_morph.children.iter().any(|entry| entry == child) {
            parent_morph.children.push(child.to_string());
        }
        self.require_mut(child)?.owner = Some(parent.to_string());
        Ok(())
    }

    /// Removes `child` from `parent`'s child list and clears its owner.
    ///
    /// The registry entry is kept; detached morphs can be re-attached later.
    pub fn detach(&mut self, parent: &str, child: &str) -> WorldResult<()> {
        self.require(parent)?;
        self.require(child)?;
        self.require_mut(parent)?.children.retain(|entry| entry != child);
        self.require_mut(child)?.owner = None;
        Ok(())
    }

    /// Detaches the morph from its parent and unregisters its whole subtree.
    pub fn destroy(&mut self, id: &str) -> WorldResult<()> {
        if id == WORLD_ID {
            return Err(WorldError::InvalidArgument(
                "the world root cannot be destroyed".to_string(),
            ));
        }
        let owner = self.require(id)?.owner.clone();
        if let Some(parent) = owner {
            self.detach(&parent, id)?;
        }
        for member in self.subtree_ids(id) {
            self.registry.unregister(&member);
        }
        Ok(())
    }

    /// Sets the position directly, without any log record.
    pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> WorldResult<()> {
        let morph = self.require_mut(id)?;
        morph.x = x;
        morph.y = y;
        Ok(())
    }

    /// Sets the size directly, without any log record.
    pub fn set_size(&mut self, id: &str, width: f64, height: f64) -> WorldResult<()> {
        let morph = self.require_mut(id)?;
        morph.width = width;
        morph.height = height;
        Ok(())
    }

    /// Sets the color directly, without any log record.
    pub fn set_color(&mut self, id: &str, color: Color) -> WorldResult<()> {
        self.require_mut(id)?.color = color;
        Ok(())
    }

    /// Applies one parsed `SET` record to the target slot.
    ///
    /// Returns `false` when the id is unknown; replay treats that as a stale
    /// record and moves on.
    pub(crate) fn apply_set(&mut self, id: &str, slot: Slot, value: SlotValue) -> bool {
        let Some(morph) = self.registry.lookup_mut(id) else {
            return false;
        };
        match (slot, value) {
            (Slot::X, SlotValue::Scalar(v)) => morph.x = v,
            (Slot::Y, SlotValue::Scalar(v)) => morph.y = v,
            (Slot::Width, SlotValue::Scalar(v)) => morph.width = v,
            (Slot::Height, SlotValue::Scalar(v)) => morph.height = v,
            (Slot::Color, SlotValue::Color(c)) => morph.color = c,
            // Scalar record for the color slot or vice versa; discard whole.
            _ => return false,
        }
        true
    }

    /// Every registered morph's id, position, size and color in
    /// registration order. Purely diagnostic, never used for recovery.
    pub fn snapshot(&self) -> Vec<MorphSnapshot> {
        self.registry
            .iter_ordered()
            .map(|morph| MorphSnapshot {
                id: morph.id.clone(),
                x: morph.x,
                y: morph.y,
                width: morph.width,
                height: morph.height,
                color: morph.color,
            })
            .collect()
    }

    fn require(&self, id: &str) -> WorldResult<&Morph> {
        self.registry
            .lookup(id)
            .ok_or_else(|| WorldError::MorphNotFound(id.to_string()))
    }

    fn require_mut(&mut self, id: &str) -> WorldResult<&mut Morph> {
        self.registry
            .lookup_mut(id)
            .ok_or_else(|| WorldError::MorphNotFound(id.to_string()))
    }

    /// The morph and all transitive children, parent-before-child.
    fn subtree_ids(&self, id: &str) -> Vec<MorphId> {
        let mut collected = Vec::new();
        let mut pending = vec![id.to_string()];
        while let Some(current) = pending.pop() {
            if let Some(morph) = self.registry.lookup(&current) {
                pending.extend(morph.children.iter().cloned());
            }
            collected.push(current);
        }
        collected
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{World, WorldError, WORLD_ID};
    use crate::model::morph::Morph;

    #[test]
    fn adopt_attaches_under_parent_and_sets_owner() {
        let mut world = World::new();
        let id = world.adopt(Morph::new(), WORLD_ID).expect("adopt should succeed");
        let child = world.morph(&id).expect("child should be registered");
        assert_eq!(child.owner.as_deref(), Some(WORLD_ID));
        assert_eq!(world.root().children, vec![id]);
    }

    #[test]
    fn adopt_under_unknown_parent_fails_without_registering() {
        let mut world = World::new();
        let error = world
            .adopt(Morph::with_id("orphan"), "nowhere")
            .expect_err("unknown parent must fail");
        assert!(matches!(error, WorldError::MorphNotFound(id) if id == "nowhere"));
        assert!(!world.contains("orphan"));
    }

    #[test]
    fn attach_is_duplicate_safe() {
        let mut world = World::new();
        let id = world.adopt(Morph::new(), WORLD_ID).expect("adopt should succeed");
        world.attach(WORLD_ID, &id).expect("re-attach should be a no-op");
        assert_eq!(world.root().children.len(), 1);
        assert_eq!(
            world.morph(&id).expect("child exists").owner.as_deref(),
            Some(WORLD_ID)
        );
    }

    #[test]
    fn attach_moves_child_between_parents_exclusively() {
        let mut world = World::new();
        let a = world.adopt(Morph::new(), WORLD_ID).expect("adopt a");
        let b = world.adopt(Morph::new(), WORLD_ID).expect("adopt b");
        let c = world.adopt(Morph::new(), &a).expect("adopt c under a");

        world.attach(&b, &c).expect("reparent c under b");
        assert!(world.morph(&a).expect("a exists").children.is_empty());
        assert_eq!(world.morph(&b).expect("b exists").children, vec![c.clone()]);
        assert_eq!(world.morph(&c).expect("c exists").owner.as_deref(), Some(b.as_str()));
    }

    #[test]
    fn attach_under_own_subtree_is_rejected_without_side_effects() {
        let mut world = World::new();
        let a = world.adopt(Morph::new(), WORLD_ID).expect("adopt a");
        let b = world.adopt(Morph::new(), &a).expect("adopt b under a");

        let error = world
            .attach(&b, &a)
            .expect_err("attaching a morph under its own descendant must fail");
        assert!(matches!(error, WorldError::InvalidArgument(_)));

        // The tree shape is untouched: no owner cycle, subtree still rooted.
        assert_eq!(world.morph(&a).expect("a exists").owner.as_deref(), Some(WORLD_ID));
        assert_eq!(world.morph(&b).expect("b exists").owner.as_deref(), Some(a.as_str()));
        assert_eq!(world.root().children, vec![a.clone()]);
        assert_eq!(world.morph(&a).expect("a exists").children, vec![b]);
    }

    #[test]
    fn attach_to_itself_is_rejected() {
        let mut world = World::new();
        let a = world.adopt(Morph::new(), WORLD_ID).expect("adopt a");
        let error = world
            .attach(&a, &a)
            .expect_err("self-attach must fail");
        assert!(matches!(error, WorldError::InvalidArgument(_)));
        assert_eq!(world.morph(&a).expect("a exists").owner.as_deref(), Some(WORLD_ID));
    }

    #[test]
    fn detach_clears_owner_and_membership() {
        let mut world = World::new();
        let id = world.adopt(Morph::new(), WORLD_ID).expect("adopt should succeed");
        world.detach(WORLD_ID, &id).expect("detach should succeed");
        assert!(world.root().children.is_empty());
        assert!(world.morph(&id).expect("still registered").owner.is_none());
    }

    #[test]
    fn detach_with_absent_argument_fails() {
        let mut world = World::new();
        let error = world
            .detach(WORLD_ID, "ghost")
            .expect_err("absent child must fail");
        assert!(matches!(error, WorldError::MorphNotFound(_)));
    }

    #[test]
    fn destroy_unregisters_whole_subtree() {
        let mut world = World::new();
        let a = world.adopt(Morph::new(), WORLD_ID).expect("adopt a");
        let b = world.adopt(Morph::new(), &a).expect("adopt b under a");
        world.destroy(&a).expect("destroy should succeed");
        assert!(!world.contains(&a));
        assert!(!world.contains(&b));
        assert!(world.root().children.is_empty());
        assert_eq!(world.morph_count(), 1);
    }

    #[test]
    fn root_cannot_be_destroyed_or_reparented() {
        let mut world = World::new();
        let id = world.adopt(Morph::new(), WORLD_ID).expect("adopt should succeed");
        assert!(matches!(
            world.destroy(WORLD_ID),
            Err(WorldError::InvalidArgument(_))
        ));
        assert!(matches!(
            world.attach(&id, WORLD_ID),
            Err(WorldError::InvalidArgument(_))
        ));
    }

    #[test]
    fn snapshot_lists_morphs_in_registration_order() {
        let mut world = World::new();
        let first = world.adopt(Morph::new(), WORLD_ID).expect("adopt first");
        let second = world.adopt(Morph::new(), WORLD_ID).expect("adopt second");
        let ids: Vec<String> = world.snapshot().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![WORLD_ID.to_string(), first, second]);
    }
}
