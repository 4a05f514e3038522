//! Drawing-sink seam and the render walk.
//!
//! # Responsibility
//! - Define the narrow interface a rendering backend implements.
//! - Feed the current tree to the sink in deterministic paint order.
//!
//! # Invariants
//! - The sink has no side effects back into the graph (it only sees `&Morph`).
//! - Paint order is depth-first from the root in child-list order, so later
//!   siblings paint over earlier ones.

use crate::model::morph::Morph;
use crate::world::World;

/// Rendering backend seam.
///
/// The core calls `draw` once per morph with its current position, size and
/// color; text-bearing morphs carry their label (text and font size) on the
/// record itself.
pub trait DrawSink {
    fn draw(&mut self, morph: &Morph);
}

/// Walks the tree from the root and draws every reachable morph.
///
/// Detached morphs (registered but not reachable from the root) are not
/// rendered; they still appear in the snapshot export.
pub fn render_world(world: &World, sink: &mut dyn DrawSink) {
    draw_subtree(world, world.root_id(), sink);
}

fn draw_subtree(world: &World, id: &str, sink: &mut dyn DrawSink) {
    let Some(morph) = world.morph(id) else {
        return;
    };
    sink.draw(morph);
    for child in &morph.children {
        draw_subtree(world, child, sink);
    }
}
