//! Simulated grid for driving the sequencer without a game engine.
use super::Grid;
use super::GridError;
use super::MatchEvent;
use crate::MatchCount;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Make-believe grid: selections land after a short think, each despawn
/// clears one random cluster, settle and respawn take one animation
/// beat. Deterministic under a fixed seed.
///
/// Stands in for the engine-side grid in the demo binary and in tests;
/// it implements timing and notification, never matching logic.
pub struct SimGrid {
    rng: SmallRng,
    beat: Duration,
    despawns: Option<UnboundedSender<MatchEvent>>,
}

impl SimGrid {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            beat: Duration::from_millis(150),
            despawns: None,
        }
    }
    /// Overrides the animation beat shared by despawn, settle, and respawn.
    pub fn with_beat(mut self, beat: Duration) -> Self {
        self.beat = beat;
        self
    }
    fn think(&mut self) -> Duration {
        Duration::from_millis(self.rng.random_range(200..=900))
    }
    fn cluster(&mut self) -> MatchCount {
        self.rng.random_range(2..=6)
    }
}

#[async_trait::async_trait]
impl Grid for SimGrid {
    async fn set_up(&mut self, despawns: UnboundedSender<MatchEvent>) -> Result<(), GridError> {
        self.despawns = Some(despawns);
        Ok(())
    }
    async fn await_selection(&mut self) -> Result<(), GridError> {
        let think = self.think();
        log::debug!("[grid] player thinking for {:?}", think);
        tokio::time::sleep(think).await;
        Ok(())
    }
    async fn despawn_selection(&mut self) -> Result<(), GridError> {
        let event = MatchEvent {
            count: self.cluster(),
        };
        match &self.despawns {
            Some(inbox) => match inbox.send(event) {
                Ok(()) => log::debug!("[grid] despawned {}", event),
                Err(e) => log::warn!("[grid] dropped {}: {:?}", event, e),
            },
            None => log::warn!("[grid] despawn before set_up, nothing to notify"),
        }
        tokio::time::sleep(self.beat).await;
        Ok(())
    }
    async fn await_movement(&mut self) -> Result<(), GridError> {
        tokio::time::sleep(self.beat).await;
        Ok(())
    }
    async fn respawn_elements(&mut self) -> Result<(), GridError> {
        tokio::time::sleep(self.beat).await;
        Ok(())
    }
}
