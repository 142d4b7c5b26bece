//! Score accumulation, decoupled from the phase loop.
//!
//! The sequencer never threads match counts through its own call chain:
//! the grid notifies, the [`Keeper`] listens, the [`Ledger`] accumulates,
//! and observers hear every [`ScoreChange`].

mod keeper;
mod ledger;

pub use keeper::*;
pub use ledger::*;
