use super::MatchEvent;
use tokio::sync::mpsc::UnboundedSender;

/// A grid phase operation failed to complete.
/// Fatal to the turn cycle: the sequencer surfaces it without retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridError(String);

impl GridError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for GridError {}

/// Suspension-capable grid collaborator.
///
/// The sequencer drives one move through these operations in a fixed
/// order: selection, despawn, settle, respawn. Each suspends until the
/// grid reports the phase complete. Implementations can be engine-side
/// grids, network proxies, or the simulated grid shipped here.
///
/// Operations must be cancel-safe: the sequencer drops the in-flight
/// future when the player bails out to the menu, and resource release
/// rides on `Drop`. The sender handed to `set_up` must live and die
/// with the grid — its closure is how the score keeper learns the
/// session is over.
#[async_trait::async_trait]
pub trait Grid: Send {
    /// Builds the starting grid and installs the despawn channel.
    async fn set_up(&mut self, despawns: UnboundedSender<MatchEvent>) -> Result<(), GridError>;

    /// Suspends until the player commits a selection.
    async fn await_selection(&mut self) -> Result<(), GridError>;

    /// Removes the selected elements, emitting a [`MatchEvent`] per
    /// cleared group on the despawn channel.
    async fn despawn_selection(&mut self) -> Result<(), GridError>;

    /// Suspends until displaced elements finish repositioning.
    async fn await_movement(&mut self) -> Result<(), GridError>;

    /// Refills the cleared cells with new elements.
    async fn respawn_elements(&mut self) -> Result<(), GridError>;
}
