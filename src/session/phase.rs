/// Cursor over the per-turn sequence.
///
/// Phases advance strictly in this order during active play, cycling
/// back to `AwaitingSelection` while moves remain. `Ending` is entered
/// at most once; `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    AwaitingSelection,
    Despawning,
    Settling,
    Respawning,
    Ending,
    Terminated,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::AwaitingSelection => write!(f, "awaiting selection"),
            Self::Despawning => write!(f, "despawning"),
            Self::Settling => write!(f, "settling"),
            Self::Respawning => write!(f, "respawning"),
            Self::Ending => write!(f, "ending"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}
