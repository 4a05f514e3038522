//! Morph domain model.
//!
//! # Responsibility
//! - Define the canonical visual-object record: position, size, color,
//!   ordered children, weak owner back-reference.
//! - Provide geometry helpers used by event dispatch.
//!
//! # Invariants
//! - `id` is assigned once (empty string means "not yet registered") and is
//!   immutable after registration.
//! - A morph appears in at most one parent's `children` list at a time.
//! - `owner` is a lookup aid only; it never governs lifetime.

use serde::{Deserialize, Serialize};

/// Stable process-unique identifier for a morph.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Ids never contain `.` or whitespace so they can appear verbatim in
/// write-ahead log records.
pub type MorphId = String;

/// RGBA color with components in the 0.0..=1.0 convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Fully specified color.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color; alpha defaults to 1.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
}

/// Text payload for text-bearing morphs, handed to the drawing sink as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphLabel {
    pub text: String,
    pub font_size: f64,
}

/// A single visual entity in the live-object tree.
///
/// Width and height are non-negative by convention but not enforced.
/// Children are owned exclusively through this list; `owner` is the weak
/// back-reference to the parent used only for lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Morph {
    /// Stable id; empty until assigned by the registry.
    pub id: MorphId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
    /// Present only for text-bearing morphs.
    pub label: Option<MorphLabel>,
    /// Ordered child ids, front of the list drawn first (visually rearmost).
    pub children: Vec<MorphId>,
    /// Parent id, `None` for detached morphs and for the world root.
    pub owner: Option<MorphId>,
}

impl Morph {
    /// Creates a morph with no id, zero frame and opaque white color.
    ///
    /// The registry assigns a fresh id at registration time.
    pub fn new() -> Self {
        Self::with_id(String::new())
    }

    /// Creates a morph with a caller-provided stable id.
    ///
    /// Used by bootstrap paths where identity already exists externally
    /// (for example when pre-seeding a registry before replaying an
    /// attribute-only log).
    pub fn with_id(id: impl Into<MorphId>) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            color: Color::WHITE,
            label: None,
            children: Vec::new(),
            owner: None,
        }
    }

    /// Sets the frame in place; convenience for construction sites.
    pub fn at(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the color in place; convenience for construction sites.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Attaches a text label; convenience for construction sites.
    pub fn labeled(mut self, text: impl Into<String>, font_size: f64) -> Self {
        self.label = Some(MorphLabel {
            text: text.into(),
            font_size,
        });
        self
    }

    /// Whether the point lies inside this morph's bounding box.
    ///
    /// Left/top edges are inclusive, right/bottom exclusive, so adjacent
    /// morphs never both claim a shared edge.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

impl Default for Morph {
    fn default() -> Self {
        Self::new()
    }
}
