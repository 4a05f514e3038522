//! Replay engine: rebuild in-memory state from the log.
//!
//! # Responsibility
//! - Re-apply records to a world in strict file order.
//! - Absorb unparsable and inapplicable records without escalating.
//!
//! # Invariants
//! - Replay never appends to the log (it applies attributes directly,
//!   bypassing the logged mutation path).
//! - Replay is idempotent: every record is an absolute assignment, so a
//!   second pass over the same log changes nothing.
//! - Last-write-wins per `(id, slot)` in file order.

use crate::wal::record::{self, WalRecord};
use crate::wal::store::{WalError, WalResult};
use crate::world::World;
use log::{debug, info};
use std::path::Path;

/// Outcome of one replay pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    /// Whether a log file existed at all. A fresh world is legitimate.
    pub log_found: bool,
    /// Records parsed and applied to the graph.
    pub applied: usize,
    /// Non-empty lines skipped: unknown verbs, malformed records, records
    /// naming morphs this world does not know.
    pub skipped: usize,
}

/// Replays the log at `path` into `world`.
///
/// A missing file is not an error; the report says `log_found: false` and
/// the world is left untouched. Only real I/O failures surface as errors —
/// every parse-level anomaly is absorbed per the leniency policy.
pub fn replay(world: &mut World, path: &Path) -> WalResult<ReplayReport> {
    if !path.exists() {
        info!("event=wal_replay module=wal status=ok log_found=false");
        return Ok(ReplayReport::default());
    }

    let text = std::fs::read_to_string(path).map_err(WalError::Io)?;
    let mut report = ReplayReport {
        log_found: true,
        applied: 0,
        skipped: 0,
    };

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match record::parse_line(line) {
            Some(record) => {
                if apply(world, record) {
                    report.applied += 1;
                } else {
                    report.skipped += 1;
                }
            }
            None => {
                debug!("event=wal_skip_line module=wal status=ok line_prefix={:.12}", line);
                report.skipped += 1;
            }
        }
    }

    info!(
        "event=wal_replay module=wal status=ok log_found=true applied={} skipped={}",
        report.applied, report.skipped
    );
    Ok(report)
}

/// Applies one record; `false` means the record was inapplicable here.
fn apply(world: &mut World, record: WalRecord) -> bool {
    match record {
        WalRecord::Set { id, slot, value } => world.apply_set(&id, slot, value),
        WalRecord::Spawn { id, parent } => {
            // An id that already exists makes a second pass idempotent; an
            // unknown parent makes the record stale. Both are skips.
            if world.contains(&id) || !world.contains(&parent) {
                return false;
            }
            world
                .adopt(crate::model::morph::Morph::with_id(id), &parent)
                .is_ok()
        }
        WalRecord::Prune { id } => world.destroy(&id).is_ok(),
    }
}
