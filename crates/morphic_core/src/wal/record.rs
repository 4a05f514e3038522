//! WAL line grammar.
//!
//! One record per line, UTF-8:
//!
//! ```text
//! SET <id>.<slot> TO <value>     attribute assignment
//! SPAWN <id> IN <parent-id>      morph created and attached
//! PRUNE <id>                     morph destroyed (subtree removal)
//! ```
//!
//! `<slot>` is one of `x|y|width|height|color`; `<value>` is a decimal, or
//! four comma-joined decimals for `color`. Ids never contain `.` or
//! whitespace. Parsing is deliberately lenient: anything that does not match
//! yields `None` and the reader skips the line, so the log can grow new
//! record kinds without breaking old readers.

use crate::model::morph::{Color, MorphId};
use std::fmt::{Display, Formatter};

/// Loggable attribute slots of a morph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    X,
    Y,
    Width,
    Height,
    Color,
}

impl Slot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Color => "color",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "color" => Some(Self::Color),
            _ => None,
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value payload of a `SET` record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotValue {
    Scalar(f64),
    Color(Color),
}

impl Display for SlotValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Color(c) => write!(f, "{},{},{},{}", c.r, c.g, c.b, c.a),
        }
    }
}

/// One parsed WAL record.
#[derive(Debug, Clone, PartialEq)]
pub enum WalRecord {
    /// Absolute attribute assignment; the only record kind of the original
    /// attribute-history log.
    Set {
        id: MorphId,
        slot: Slot,
        value: SlotValue,
    },
    /// Structural creation: the morph exists and hangs under `parent`.
    Spawn { id: MorphId, parent: MorphId },
    /// Structural removal of the morph and its subtree.
    Prune { id: MorphId },
}

impl WalRecord {
    pub fn set_scalar(id: impl Into<MorphId>, slot: Slot, value: f64) -> Self {
        Self::Set {
            id: id.into(),
            slot,
            value: SlotValue::Scalar(value),
        }
    }

    pub fn set_color(id: impl Into<MorphId>, color: Color) -> Self {
        Self::Set {
            id: id.into(),
            slot: Slot::Color,
            value: SlotValue::Color(color),
        }
    }
}

impl Display for WalRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set { id, slot, value } => write!(f, "SET {id}.{slot} TO {value}"),
            Self::Spawn { id, parent } => write!(f, "SPAWN {id} IN {parent}"),
            Self::Prune { id } => write!(f, "PRUNE {id}"),
        }
    }
}

/// Parses one trimmed log line; `None` means "skip silently".
pub fn parse_line(line: &str) -> Option<WalRecord> {
    if let Some(rest) = line.strip_prefix("SET ") {
        return parse_set(rest);
    }
    if let Some(rest) = line.strip_prefix("SPAWN ") {
        let (id, parent) = rest.split_once(" IN ")?;
        if !is_id_token(id) || !is_id_token(parent) {
            return None;
        }
        return Some(WalRecord::Spawn {
            id: id.to_string(),
            parent: parent.to_string(),
        });
    }
    if let Some(id) = line.strip_prefix("PRUNE ") {
        if !is_id_token(id) {
            return None;
        }
        return Some(WalRecord::Prune { id: id.to_string() });
    }
    None
}

fn parse_set(rest: &str) -> Option<WalRecord> {
    let (lhs, rhs) = rest.split_once(" TO ")?;
    let (id, slot_token) = lhs.split_once('.')?;
    if !is_id_token(id) {
        return None;
    }
    let slot = Slot::parse(slot_token)?;
    let value = match slot {
        Slot::Color => SlotValue::Color(parse_color(rhs)?),
        _ => SlotValue::Scalar(rhs.parse::<f64>().ok()?),
    };
    Some(WalRecord::Set {
        id: id.to_string(),
        slot,
        value,
    })
}

/// Four comma-joined decimals, applied all-or-nothing: a partially
/// parseable color record is discarded wholesale.
fn parse_color(rhs: &str) -> Option<Color> {
    let mut components = [0.0f64; 4];
    let mut count = 0;
    for part in rhs.split(',') {
        if count == 4 {
            return None;
        }
        components[count] = part.parse::<f64>().ok()?;
        count += 1;
    }
    if count < 4 {
        return None;
    }
    Some(Color::rgba(
        components[0],
        components[1],
        components[2],
        components[3],
    ))
}

fn is_id_token(token: &str) -> bool {
    !token.is_empty() && !token.contains('.') && !token.contains(char::is_whitespace)
}
