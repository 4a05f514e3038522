//! Identity registry: id allocation and O(1) morph lookup.
//!
//! # Responsibility
//! - Own every morph in one graph and index it by stable id.
//! - Allocate process-unique `m<serial>` ids for unregistered morphs.
//!
//! # Invariants
//! - An assigned id is never reassigned or reused while registered.
//! - Registration order is tracked so snapshot export is deterministic.
//! - The registry is an explicitly owned object (held by the world), never
//!   process-global state, so independent graphs can coexist in tests.

use crate::model::morph::{Morph, MorphId};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ids must survive the `SET <id>.<slot>` log grammar: no `.`, no whitespace.
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^.\s]+$").expect("id pattern is a valid regex"));

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors from morph registration.
#[derive(Debug)]
pub enum RegistryError {
    /// The id is already registered to another morph.
    DuplicateId(MorphId),
    /// The caller-provided id violates the id grammar.
    InvalidId(MorphId),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "morph id already registered: {id}"),
            Self::InvalidId(id) => {
                write!(f, "invalid morph id `{id}`; ids must not contain `.` or whitespace")
            }
        }
    }
}

impl Error for RegistryError {}

/// Owned arena of morphs keyed by stable id.
///
/// The tree structure (child lists, owner back-references) lives inside the
/// morphs themselves; this registry is the single owner of the records and
/// the flat index used by replay and event routing.
#[derive(Debug, Default)]
pub struct MorphRegistry {
    morphs: HashMap<MorphId, Morph>,
    order: Vec<MorphId>,
    next_serial: u64,
}

impl MorphRegistry {
    pub fn new() -> Self {
        Self {
            morphs: HashMap::new(),
            order: Vec::new(),
            next_serial: 1,
        }
    }

    /// Registers a morph, allocating a fresh id when none is assigned.
    ///
    /// A morph arriving with a pre-assigned id keeps it unchanged; the id is
    /// validated against the id grammar and rejected if already taken.
    /// Returns the id under which the morph is now registered.
    pub fn register(&mut self, mut morph: Morph) -> RegistryResult<MorphId> {
        if morph.id.is_empty() {
            morph.id = self.allocate_id();
        } else {
            if !ID_PATTERN.is_match(&morph.id) {
                return Err(RegistryError::InvalidId(morph.id));
            }
            if self.morphs.contains_key(&morph.id) {
                return Err(RegistryError::DuplicateId(morph.id));
            }
        }

        let id = morph.id.clone();
        self.order.push(id.clone());
        self.morphs.insert(id.clone(), morph);
        Ok(id)
    }

    /// O(1) lookup. `None` means "unknown id"; callers on the replay path
    /// treat that as a stale record and skip it.
    pub fn lookup(&self, id: &str) -> Option<&Morph> {
        self.morphs.get(id)
    }

    pub fn lookup_mut(&mut self, id: &str) -> Option<&mut Morph> {
        self.morphs.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.morphs.contains_key(id)
    }

    /// Evicts a morph from the index and returns it.
    ///
    /// Only the destroy path calls this; plain detach keeps the entry so the
    /// morph can be re-attached under the same id.
    pub fn unregister(&mut self, id: &str) -> Option<Morph> {
        let morph = self.morphs.remove(id)?;
        self.order.retain(|entry| entry != id);
        Some(morph)
    }

    /// Morphs in registration order.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &Morph> {
        self.order.iter().filter_map(|id| self.morphs.get(id))
    }

    pub fn len(&self) -> usize {
        self.morphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.morphs.is_empty()
    }

    fn allocate_id(&mut self) -> MorphId {
        // The serial only moves forward; skip over any tag a caller happened
        // to pre-assign.
        loop {
            let candidate = format!("m{}", self.next_serial);
            self.next_serial += 1;
            if !self.morphs.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MorphRegistry, RegistryError};
    use crate::model::morph::Morph;

    #[test]
    fn register_allocates_distinct_monotonic_ids() {
        let mut registry = MorphRegistry::new();
        let first = registry.register(Morph::new()).expect("register should succeed");
        let second = registry.register(Morph::new()).expect("register should succeed");
        assert_eq!(first, "m1");
        assert_eq!(second, "m2");
        assert_ne!(first, second);
    }

    #[test]
    fn register_keeps_pre_assigned_id() {
        let mut registry = MorphRegistry::new();
        let id = registry
            .register(Morph::with_id("badge"))
            .expect("pre-assigned id should register");
        assert_eq!(id, "badge");
        assert!(registry.lookup("badge").is_some());
    }

    #[test]
    fn allocation_skips_over_taken_tags() {
        let mut registry = MorphRegistry::new();
        registry
            .register(Morph::with_id("m1"))
            .expect("pre-assigned m1 should register");
        let allocated = registry.register(Morph::new()).expect("register should succeed");
        assert_eq!(allocated, "m2");
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut registry = MorphRegistry::new();
        registry
            .register(Morph::with_id("m1"))
            .expect("first registration should succeed");
        let error = registry
            .register(Morph::with_id("m1"))
            .expect_err("duplicate id must be rejected");
        assert!(matches!(error, RegistryError::DuplicateId(id) if id == "m1"));
    }

    #[test]
    fn ids_with_dots_or_whitespace_are_rejected() {
        let mut registry = MorphRegistry::new();
        for bad in ["a.b", "a b", " ", "a\tb"] {
            let error = registry
                .register(Morph::with_id(bad))
                .expect_err("grammar-breaking id must be rejected");
            assert!(matches!(error, RegistryError::InvalidId(_)));
        }
    }

    #[test]
    fn unregister_evicts_entry_and_order() {
        let mut registry = MorphRegistry::new();
        let id = registry.register(Morph::new()).expect("register should succeed");
        assert!(registry.unregister(&id).is_some());
        assert!(registry.lookup(&id).is_none());
        assert_eq!(registry.iter_ordered().count(), 0);
        assert!(registry.unregister(&id).is_none());
    }

    #[test]
    fn iter_ordered_follows_registration_order() {
        let mut registry = MorphRegistry::new();
        registry.register(Morph::with_id("z")).expect("register z");
        registry.register(Morph::with_id("a")).expect("register a");
        let ids: Vec<&str> = registry.iter_ordered().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }
}
