use crate::MatchCount;

/// Notification that one despawn removed `count` elements.
/// Emitted by the grid zero or more times per move, during or slightly
/// after the despawn phase, and consumed exactly once by the score
/// keeper — independently of the phase loop's own progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchEvent {
    pub count: MatchCount,
}

impl std::fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "match of {}", self.count)
    }
}
