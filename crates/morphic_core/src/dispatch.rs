//! Pointer-event routing through the morph tree.
//!
//! # Responsibility
//! - Walk the tree from the root and offer positioned events to morphs whose
//!   bounding box contains the point.
//! - Keep the sibling scan direction configurable.
//!
//! # Invariants
//! - The walk is depth-first pre-order; a morph is offered the event before
//!   its children.
//! - A declined event continues with the remaining candidates in scan order;
//!   the first accepting morph ends the dispatch.

use crate::model::morph::{Morph, MorphId};
use crate::world::World;

/// A positioned input event from the external event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

/// Sibling scan direction.
///
/// Children paint in list order, so the last child is visually frontmost.
/// `FrontToBack` scans the list reversed (frontmost first); `BackToFront`
/// scans in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOrder {
    FrontToBack,
    BackToFront,
}

/// Per-morph event handler seam.
///
/// Returning `true` consumes the event; `false` lets dispatch keep probing
/// the remaining candidates.
pub trait EventHandler {
    fn on_event(&mut self, morph: &Morph, event: &PointerEvent) -> bool;
}

/// Routes the event through the tree; returns the id of the morph that
/// consumed it, or `None` when every candidate declined.
pub fn dispatch_event(
    world: &World,
    event: &PointerEvent,
    order: HitOrder,
    handler: &mut dyn EventHandler,
) -> Option<MorphId> {
    dispatch_under(world, world.root_id(), event, order, handler)
}

fn dispatch_under(
    world: &World,
    id: &str,
    event: &PointerEvent,
    order: HitOrder,
    handler: &mut dyn EventHandler,
) -> Option<MorphId> {
    let morph = world.morph(id)?;
    if morph.contains(event.x, event.y) && handler.on_event(morph, event) {
        return Some(morph.id.clone());
    }

    match order {
        HitOrder::BackToFront => scan(world, morph.children.iter(), event, order, handler),
        HitOrder::FrontToBack => scan(world, morph.children.iter().rev(), event, order, handler),
    }
}

fn scan<'a>(
    world: &World,
    children: impl Iterator<Item = &'a MorphId>,
    event: &PointerEvent,
    order: HitOrder,
    handler: &mut dyn EventHandler,
) -> Option<MorphId> {
    for child in children {
        if let Some(hit) = dispatch_under(world, child, event, order, handler) {
            return Some(hit);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{dispatch_event, EventHandler, HitOrder, PointerEvent};
    use crate::model::morph::Morph;
    use crate::world::{World, WORLD_ID};

    /// Accepts every offered event and records the offer order.
    #[derive(Default)]
    struct Greedy {
        offered: Vec<String>,
    }

    impl EventHandler for Greedy {
        fn on_event(&mut self, morph: &Morph, _event: &PointerEvent) -> bool {
            self.offered.push(morph.id.clone());
            true
        }
    }

    /// Declines everything; used to observe the full probe order.
    #[derive(Default)]
    struct Decliner {
        offered: Vec<String>,
    }

    impl EventHandler for Decliner {
        fn on_event(&mut self, morph: &Morph, _event: &PointerEvent) -> bool {
            self.offered.push(morph.id.clone());
            false
        }
    }

    fn overlapping_world() -> (World, String, String) {
        let mut world = World::new();
        let back = world
            .adopt(Morph::new().at(0.0, 0.0, 100.0, 100.0), WORLD_ID)
            .expect("adopt back");
        let front = world
            .adopt(Morph::new().at(0.0, 0.0, 100.0, 100.0), WORLD_ID)
            .expect("adopt front");
        (world, back, front)
    }

    #[test]
    fn front_to_back_offers_frontmost_sibling_first() {
        let (world, _back, front) = overlapping_world();
        let mut handler = Greedy::default();
        let hit = dispatch_event(
            &world,
            &PointerEvent { x: 50.0, y: 50.0 },
            HitOrder::FrontToBack,
            &mut handler,
        );
        assert_eq!(hit, Some(front));
    }

    #[test]
    fn back_to_front_offers_rearmost_sibling_first() {
        let (world, back, _front) = overlapping_world();
        let mut handler = Greedy::default();
        let hit = dispatch_event(
            &world,
            &PointerEvent { x: 50.0, y: 50.0 },
            HitOrder::BackToFront,
            &mut handler,
        );
        assert_eq!(hit, Some(back));
    }

    #[test]
    fn declined_events_continue_with_remaining_candidates() {
        let (world, back, front) = overlapping_world();
        let mut handler = Decliner::default();
        let hit = dispatch_event(
            &world,
            &PointerEvent { x: 50.0, y: 50.0 },
            HitOrder::FrontToBack,
            &mut handler,
        );
        assert_eq!(hit, None);
        assert_eq!(handler.offered, vec![front, back]);
    }

    #[test]
    fn point_outside_every_bounding_box_offers_nothing() {
        let (world, _back, _front) = overlapping_world();
        let mut handler = Greedy::default();
        let hit = dispatch_event(
            &world,
            &PointerEvent { x: 500.0, y: 500.0 },
            HitOrder::FrontToBack,
            &mut handler,
        );
        assert_eq!(hit, None);
        assert!(handler.offered.is_empty());
    }
}
