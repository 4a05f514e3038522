//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `morphic_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use morphic_core::{Color, Morph, Session, SessionConfig, WORLD_ID};

fn main() {
    println!("morphic_core version={}", morphic_core::core_version());

    // Why: boot against a throwaway log so repeated runs stay deterministic
    // and never touch real state.
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let config = SessionConfig::new(dir.path().join("morphic.wal"));
    let mut session = Session::boot(&config).expect("boot should succeed");

    let id = session
        .spawn(
            Morph::new()
                .at(100.0, 100.0, 50.0, 50.0)
                .colored(Color::rgb(1.0, 0.0, 0.0)),
            WORLD_ID,
        )
        .expect("spawn should succeed");
    session
        .move_morph(&id, 200.0, 150.0)
        .expect("move should succeed");

    for entry in session.snapshot() {
        println!(
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
        );
    }
}
