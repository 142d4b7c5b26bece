//! Game-flow sequencing.
//!
//! One [`Session`] drives one game: a bounded run of turn cycles against
//! the grid, a brief ending pause, and a scene handoff. The cycle order
//! is fixed — selection, despawn, settle, respawn — and a return-to-menu
//! interrupt preempts any suspension point.
//!
//! - [`Session`] — the sequencer
//! - [`MoveBudget`] / [`FlowConfig`] — the move allotment
//! - [`Phase`] — cursor over the per-turn sequence
//! - [`FlowError`] — what can go wrong and how it routes

mod budget;
mod error;
mod phase;
mod session;

pub use budget::*;
pub use error::*;
pub use phase::*;
pub use session::*;
