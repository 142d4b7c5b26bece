//! Turn-driving core of a tile-matching puzzle game.
//!
//! One session runs a bounded number of player moves against a grid.
//! Each move walks the grid through selection, despawn, settle, and
//! respawn, suspending on the grid's own completion. Despawns emit match
//! notifications that a decoupled listener turns into score, and
//! spending the last move (or a return-to-menu interrupt) hands the
//! session off to a scene gateway.
//!
//! ## Architecture
//!
//! - [`session::Session`] — phase sequencer owning the move budget
//! - [`score::Keeper`] — listener task applying match rewards to the ledger
//! - [`grid::Grid`] — suspension-capable grid collaborator boundary
//! - [`transition::Gateway`] — scene handoff boundary
//! - [`records::Summary`] — serializable end-of-session record

pub mod grid;
pub mod records;
pub mod score;
pub mod session;
pub mod transition;

/// Cumulative score over one game session.
pub type Score = u64;
/// Player moves, granted or remaining.
pub type Moves = u32;
/// Number of grid elements removed by a single despawn.
pub type MatchCount = usize;

/// Moves granted to a fresh session when the host does not say otherwise.
pub const DEFAULT_MOVES: Moves = 20;
/// Pause between the final move resolving and the game-over handoff.
pub const ENDGAME_DELAY: std::time::Duration = std::time::Duration::from_millis(500);

/// Initialize terminal logging for the demo binary.
/// Debug level shows per-phase traces; the default stays at info.
pub fn log(verbose: bool) {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let level = match verbose {
        true => log::LevelFilter::Debug,
        false => log::LevelFilter::Info,
    };
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}
