use super::Phase;
use crate::grid::GridError;

/// Failure taxonomy for a session run.
#[derive(Debug)]
pub enum FlowError {
    /// Internal contract breach — a caller or integration bug, never a
    /// runtime condition. Not recoverable.
    Invariant(&'static str),
    /// A grid operation failed to complete. Fatal to the turn cycle;
    /// surfaced to the host immediately, never retried.
    Collaborator { phase: Phase, source: GridError },
    /// A suspension point was abandoned by the return-to-menu interrupt.
    /// Normal control flow: resolved to the menu destination inside the
    /// sequencer, never escapes `run`.
    Cancelled,
}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invariant(s) => write!(f, "invariant violated: {}", s),
            Self::Collaborator { phase, source } => {
                write!(f, "grid failed while {}: {}", phase, source)
            }
            Self::Cancelled => write!(f, "interrupted by return-to-menu request"),
        }
    }
}

impl std::error::Error for FlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Collaborator { source, .. } => Some(source),
            _ => None,
        }
    }
}
