//! Named-operation dispatch table.
//!
//! # Responsibility
//! - Route operation names from outer surfaces (shells, bridges, scripts)
//!   to session mutations through one explicit table.
//! - Provide the documented fallback for unrecognized operation names.
//!
//! # Invariants
//! - Unknown operations never crash: they log a warning and return
//!   `WorldError::UnknownOperation`.
//! - Every operation except `boot` requires a booted world and fails with
//!   `WorldError::MissingWorld` otherwise.

use crate::model::morph::{Color, Morph};
use crate::session::{Session, SessionConfig};
use crate::world::{WorldError, WorldResult};
use log::{info, warn};
use std::collections::BTreeMap;

type OpHandler = fn(&mut Session, &[&str]) -> WorldResult<String>;

/// Dispatch table over one optional session.
pub struct OpDispatcher {
    session: Option<Session>,
    table: BTreeMap<&'static str, OpHandler>,
}

impl OpDispatcher {
    pub fn new() -> Self {
        let mut table: BTreeMap<&'static str, OpHandler> = BTreeMap::new();
        table.insert("spawn", op_spawn);
        table.insert("attach", op_attach);
        table.insert("detach", op_detach);
        table.insert("destroy", op_destroy);
        table.insert("move", op_move);
        table.insert("resize", op_resize);
        table.insert("recolor", op_recolor);
        table.insert("snapshot", op_snapshot);
        Self {
            session: None,
            table,
        }
    }

    /// Boots the world this dispatcher operates on. Idempotence is not
    /// offered: re-booting an active dispatcher is rejected.
    pub fn boot(&mut self, config: &SessionConfig) -> WorldResult<()> {
        if self.session.is_some() {
            return Err(WorldError::InvalidArgument(
                "a world is already booted in this dispatcher".to_string(),
            ));
        }
        self.session = Some(Session::boot(config)?);
        Ok(())
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Registered operation names in stable order.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }

    /// Routes one named operation with positional string arguments.
    ///
    /// `boot` is not a table entry: it changes which session the table
    /// operates on and is invoked directly via [`OpDispatcher::boot`].
    pub fn dispatch(&mut self, op: &str, args: &[&str]) -> WorldResult<String> {
        if op == "boot" {
            return Err(WorldError::InvalidArgument(
                "boot is invoked directly on the dispatcher, not dispatched by name".to_string(),
            ));
        }
        let Some(handler) = self.table.get(op) else {
            // Fallback path for unrecognized operations: report, never crash.
            warn!("event=op_unknown module=ops status=error op={op}");
            return Err(WorldError::UnknownOperation(op.to_string()));
        };
        let session = self.session.as_mut().ok_or(WorldError::MissingWorld)?;
        let outcome = handler(session, args)?;
        info!("event=op_dispatch module=ops status=ok op={op}");
        Ok(outcome)
    }
}

impl Default for OpDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn arg<'a>(args: &[&'a str], index: usize, name: &str) -> WorldResult<&'a str> {
    args.get(index).copied().ok_or_else(|| {
        WorldError::InvalidArgument(format!("missing argument `{name}` at position {index}"))
    })
}

fn numeric_arg(args: &[&str], index: usize, name: &str) -> WorldResult<f64> {
    let raw = arg(args, index, name)?;
    raw.parse::<f64>().map_err(|_| {
        WorldError::InvalidArgument(format!("argument `{name}` is not a number: `{raw}`"))
    })
}

/// `spawn [parent]` — new morph under `parent` (default: the world root).
fn op_spawn(session: &mut Session, args: &[&str]) -> WorldResult<String> {
    let parent = args
        .first()
        .copied()
        .unwrap_or_else(|| session.world().root_id())
        .to_string();
    let id = session.spawn(Morph::new(), &parent)?;
    Ok(format!("spawned {id} in {parent}"))
}

/// `attach <parent> <child>`
fn op_attach(session: &mut Session, args: &[&str]) -> WorldResult<String> {
    let parent = arg(args, 0, "parent")?;
    let child = arg(args, 1, "child")?;
    session.attach(parent, child)?;
    Ok(format!("attached {child} to {parent}"))
}

/// `detach <parent> <child>`
fn op_detach(session: &mut Session, args: &[&str]) -> WorldResult<String> {
    let parent = arg(args, 0, "parent")?;
    let child = arg(args, 1, "child")?;
    session.detach(parent, child)?;
    Ok(format!("detached {child} from {parent}"))
}

/// `destroy <id>`
fn op_destroy(session: &mut Session, args: &[&str]) -> WorldResult<String> {
    let id = arg(args, 0, "id")?;
    session.destroy(id)?;
    Ok(format!("destroyed {id}"))
}

/// `move <id> <x> <y>`
fn op_move(session: &mut Session, args: &[&str]) -> WorldResult<String> {
    let id = arg(args, 0, "id")?;
    let x = numeric_arg(args, 1, "x")?;
    let y = numeric_arg(args, 2, "y")?;
    session.move_morph(id, x, y)?;
    Ok(format!("moved {id} to {x},{y}"))
}

/// `resize <id> <width> <height>`
fn op_resize(session: &mut Session, args: &[&str]) -> WorldResult<String> {
    let id = arg(args, 0, "id")?;
    let width = numeric_arg(args, 1, "width")?;
    let height = numeric_arg(args, 2, "height")?;
    session.resize(id, width, height)?;
    Ok(format!("resized {id} to {width}x{height}"))
}

/// `recolor <id> <r> <g> <b> [a]` — alpha defaults to 1.
fn op_recolor(session: &mut Session, args: &[&str]) -> WorldResult<String> {
    let id = arg(args, 0, "id")?;
    let r = numeric_arg(args, 1, "r")?;
    let g = numeric_arg(args, 2, "g")?;
    let b = numeric_arg(args, 3, "b")?;
    let a = if args.len() > 4 {
        numeric_arg(args, 4, "a")?
    } else {
        1.0
    };
    session.recolor(id, Color::rgba(r, g, b, a))?;
    Ok(format!("recolored {id} to {r},{g},{b},{a}"))
}

/// `snapshot` — one line per registered morph in registration order.
fn op_snapshot(session: &mut Session, _args: &[&str]) -> WorldResult<String> {
    let mut lines = Vec::new();
    for entry in session.snapshot() {
        lines.push(format!(
            "{} at {},{} size {}x{} color {},{},{},{}",
            entry.id,
            entry.x,
            entry.y,
            entry.width,
            entry.height,
            entry.color.r,
            entry.color.g,
            entry.color.b,
            entry.color.a
        ));
    }
    Ok(lines.join("\n"))
}
