use super::Ledger;
use super::ScoreChange;
use crate::Score;
use crate::grid::MatchEvent;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Runs the ledger in its own task, decoupled from the phase loop.
///
/// - the grid sends a [`MatchEvent`] whenever a despawn removes elements
/// - the keeper applies the reward and publishes the [`ScoreChange`] to
///   every observer
/// - the watch cell always holds the current score for cheap reads
///
/// The task retires when the despawn channel closes (the grid dropping
/// its sender) and returns the final score. Subscription release is the
/// channel lifetime itself — nothing to unhook by hand.
pub struct Keeper {
    ledger: Ledger,
    despawns: UnboundedReceiver<MatchEvent>,
    current: watch::Sender<Score>,
    observers: Vec<UnboundedSender<ScoreChange>>,
}

impl Keeper {
    pub fn spawn(
        despawns: UnboundedReceiver<MatchEvent>,
        current: watch::Sender<Score>,
        observers: Vec<UnboundedSender<ScoreChange>>,
    ) -> JoinHandle<Score> {
        let keeper = Self {
            ledger: Ledger::default(),
            despawns,
            current,
            observers,
        };
        tokio::spawn(keeper.run())
    }
    async fn run(mut self) -> Score {
        self.ledger.reset();
        while let Some(event) = self.despawns.recv().await {
            let change = self.ledger.on_match(event.count);
            log::debug!("[keeper] {} scores {}", event, change);
            let _ = self.current.send(change.new);
            self.publish(change);
        }
        log::debug!(
            "[keeper] despawn channel closed, final score {}",
            self.ledger.current()
        );
        self.ledger.current()
    }
    fn publish(&self, change: ScoreChange) {
        self.observers
            .iter()
            .enumerate()
            .for_each(|(i, inbox)| match inbox.send(change) {
                Ok(()) => {}
                Err(e) => log::warn!("[keeper] observer {} dropped: {:?}", i, e),
            });
    }
}
