use super::FlowConfig;
use super::FlowError;
use super::MoveBudget;
use super::Phase;
use crate::Moves;
use crate::Score;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::records::Summary;
use crate::score::Keeper;
use crate::score::ScoreChange;
use crate::transition::Destination;
use crate::transition::Gateway;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Sequences one game session.
///
/// Owns the move budget and the phase cursor; holds its collaborators
/// as trait objects injected at construction. Runs the per-turn cycle
/// (selection → despawn → settle → respawn) until the budget is spent,
/// then pauses briefly and hands off to the game-over destination. A
/// return-to-menu interrupt preempts any suspension point and routes
/// the handoff to the menu instead.
///
/// Score flows beside the loop: the grid's despawn notifications feed a
/// [`Keeper`] task, and the session only reads the result — live via
/// the watch cell, finally by draining the keeper before the summary.
pub struct Session {
    id: Uuid,
    grid: Box<dyn Grid>,
    gateway: Box<dyn Gateway>,
    budget: MoveBudget,
    phase: Phase,
    endgame_delay: Duration,
    cancel: CancellationToken,
    observers: Vec<UnboundedSender<ScoreChange>>,
    scoreboard: watch::Receiver<Score>,
    publisher: Option<watch::Sender<Score>>,
    keeper: Option<JoinHandle<Score>>,
}

impl Session {
    /// Builds a session over injected collaborators.
    /// Nothing runs until [`Session::run`].
    pub fn new<G, T>(grid: G, gateway: T, config: FlowConfig) -> Self
    where
        G: Grid + 'static,
        T: Gateway + 'static,
    {
        let (publisher, scoreboard) = watch::channel(0);
        Self {
            id: Uuid::now_v7(),
            grid: Box::new(grid),
            gateway: Box::new(gateway),
            budget: MoveBudget::new(config.moves),
            phase: Phase::Initializing,
            endgame_delay: config.endgame_delay,
            cancel: CancellationToken::new(),
            observers: Vec::new(),
            scoreboard,
            publisher: Some(publisher),
            keeper: None,
        }
    }
    /// Registers a score observer. Call before [`Session::run`].
    pub fn observe(&mut self, inbox: UnboundedSender<ScoreChange>) {
        self.observers.push(inbox);
    }
    /// Handle for the return-to-menu interrupt. Cancelling it preempts
    /// whatever the session is suspended on.
    pub fn interrupter(&self) -> CancellationToken {
        self.cancel.clone()
    }
    /// Score as of the last consumed match event.
    pub fn score(&self) -> Score {
        *self.scoreboard.borrow()
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn moves_remaining(&self) -> Moves {
        self.budget.remaining()
    }
}

impl Session {
    /// Runs the session to completion and reports how it ended.
    ///
    /// `Ok` carries the summary for both normal endings — game over and
    /// menu interrupt. `Err` means an invariant breach or a collaborator
    /// failure; the gateway is not invoked and the host decides where to
    /// abort to.
    pub async fn run(mut self) -> Result<Summary, FlowError> {
        log::debug!(
            "[session {}] starting with {} moves",
            self.id,
            self.budget.remaining()
        );
        let destination = match self.sequence().await {
            Ok(()) => Destination::GameOver,
            Err(FlowError::Cancelled) => {
                log::info!("[session {}] return requested, abandoning turn", self.id);
                Destination::Menu
            }
            Err(fatal) => return Err(fatal),
        };
        self.gateway.load(destination);
        self.enter(Phase::Terminated);
        let id = self.id;
        let moves_used = self.budget.consumed();
        let score = self.retire().await;
        log::info!("[session {}] {} with score {}", id, destination, score);
        Ok(Summary::new(id, destination, score, moves_used))
    }

    /// Initializing through Ending, in order. Every await in here is
    /// preempted by the interrupt.
    async fn sequence(&mut self) -> Result<(), FlowError> {
        self.initialize().await?;
        while !self.budget.is_exhausted() {
            self.cycle().await?;
            self.budget.consume()?;
            log::debug!(
                "[session {}] move spent, {} remaining",
                self.id,
                self.budget.remaining()
            );
        }
        self.finale().await
    }

    /// Spawns the score keeper and sets the grid up with the despawn
    /// channel. Score starts at zero by construction.
    async fn initialize(&mut self) -> Result<(), FlowError> {
        if self.budget.is_exhausted() {
            return Err(FlowError::Invariant("session requires a positive move budget"));
        }
        let publisher = self
            .publisher
            .take()
            .ok_or(FlowError::Invariant("session already ran"))?;
        let (despawn_tx, despawn_rx) = unbounded_channel();
        let observers = std::mem::take(&mut self.observers);
        self.keeper = Some(Keeper::spawn(despawn_rx, publisher, observers));
        suspend(&self.cancel, Phase::Initializing, self.grid.set_up(despawn_tx)).await
    }

    /// One full turn: the four grid phases in their fixed order.
    async fn cycle(&mut self) -> Result<(), FlowError> {
        self.enter(Phase::AwaitingSelection);
        suspend(&self.cancel, self.phase, self.grid.await_selection()).await?;
        self.enter(Phase::Despawning);
        suspend(&self.cancel, self.phase, self.grid.despawn_selection()).await?;
        self.enter(Phase::Settling);
        suspend(&self.cancel, self.phase, self.grid.await_movement()).await?;
        self.enter(Phase::Respawning);
        suspend(&self.cancel, self.phase, self.grid.respawn_elements()).await?;
        Ok(())
    }

    /// Brief pause between the last move resolving and the handoff.
    async fn finale(&mut self) -> Result<(), FlowError> {
        self.enter(Phase::Ending);
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FlowError::Cancelled),
            _ = tokio::time::sleep(self.endgame_delay) => Ok(()),
        }
    }

    /// Closes the despawn channel and drains the keeper, so the summary
    /// reflects every match event emitted before termination.
    async fn retire(self) -> Score {
        let Self {
            id,
            grid,
            keeper,
            scoreboard,
            ..
        } = self;
        drop(grid);
        match keeper {
            Some(handle) => match handle.await {
                Ok(score) => score,
                Err(e) => {
                    log::warn!("[session {}] keeper task failed: {:?}", id, e);
                    *scoreboard.borrow()
                }
            },
            None => *scoreboard.borrow(),
        }
    }

    fn enter(&mut self, next: Phase) {
        log::debug!("[session {}] {} -> {}", self.id, self.phase, next);
        self.phase = next;
    }
}

/// Awaits one collaborator operation under the interrupt. The interrupt
/// wins ties, and the losing future is dropped at the suspension point.
async fn suspend<F>(
    cancel: &CancellationToken,
    phase: Phase,
    operation: F,
) -> Result<(), FlowError>
where
    F: Future<Output = Result<(), GridError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FlowError::Cancelled),
        result = operation => result.map_err(|source| FlowError::Collaborator { phase, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ENDGAME_DELAY;
    use crate::MatchCount;
    use crate::grid::MatchEvent;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::Mutex;

    /// Scripted grid: records every call, completes phases instantly,
    /// and can emit match events, fail, or stall at a named operation.
    struct Script {
        calls: Arc<Mutex<Vec<&'static str>>>,
        emissions: VecDeque<Vec<MatchCount>>,
        fail: Option<&'static str>,
        stall: Option<&'static str>,
        despawns: Option<UnboundedSender<MatchEvent>>,
    }

    impl Script {
        fn new(calls: Arc<Mutex<Vec<&'static str>>>) -> Self {
            Self {
                calls,
                emissions: VecDeque::new(),
                fail: None,
                stall: None,
                despawns: None,
            }
        }
        fn emitting(mut self, emissions: Vec<Vec<MatchCount>>) -> Self {
            self.emissions = emissions.into();
            self
        }
        fn failing_at(mut self, op: &'static str) -> Self {
            self.fail = Some(op);
            self
        }
        fn stalling_at(mut self, op: &'static str) -> Self {
            self.stall = Some(op);
            self
        }
        async fn visit(&mut self, op: &'static str) -> Result<(), GridError> {
            self.calls.lock().unwrap().push(op);
            if self.fail == Some(op) {
                return Err(GridError::new("scripted failure"));
            }
            if self.stall == Some(op) {
                std::future::pending::<()>().await;
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl Grid for Script {
        async fn set_up(&mut self, despawns: UnboundedSender<MatchEvent>) -> Result<(), GridError> {
            self.despawns = Some(despawns);
            self.visit("set_up").await
        }
        async fn await_selection(&mut self) -> Result<(), GridError> {
            self.visit("selection").await
        }
        async fn despawn_selection(&mut self) -> Result<(), GridError> {
            if let (Some(inbox), Some(counts)) = (&self.despawns, self.emissions.pop_front()) {
                for count in counts {
                    let _ = inbox.send(MatchEvent { count });
                }
            }
            self.visit("despawn").await
        }
        async fn await_movement(&mut self) -> Result<(), GridError> {
            self.visit("settle").await
        }
        async fn respawn_elements(&mut self) -> Result<(), GridError> {
            self.visit("respawn").await
        }
    }

    /// Gateway that records every handoff.
    struct Recorder {
        loads: Arc<Mutex<Vec<Destination>>>,
    }

    impl Gateway for Recorder {
        fn load(&mut self, destination: Destination) {
            self.loads.lock().unwrap().push(destination);
        }
    }

    fn config(moves: Moves) -> FlowConfig {
        FlowConfig {
            moves,
            ..FlowConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn one_move_runs_one_cycle_then_game_over() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let loads = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(
            Script::new(calls.clone()),
            Recorder {
                loads: loads.clone(),
            },
            config(1),
        );
        let started = tokio::time::Instant::now();
        let summary = session.run().await.unwrap();
        assert_eq!(started.elapsed(), ENDGAME_DELAY);
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["set_up", "selection", "despawn", "settle", "respawn"]
        );
        assert_eq!(*loads.lock().unwrap(), vec![Destination::GameOver]);
        assert_eq!(summary.destination, Destination::GameOver);
        assert_eq!(summary.moves_used, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cycles_never_skip_or_reorder_phases() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let loads = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(
            Script::new(calls.clone()),
            Recorder {
                loads: loads.clone(),
            },
            config(3),
        );
        let summary = session.run().await.unwrap();
        let calls = calls.lock().unwrap();
        assert_eq!(calls[0], "set_up");
        assert_eq!(calls.len(), 1 + 4 * 3);
        for cycle in calls[1..].chunks(4) {
            assert_eq!(cycle, ["selection", "despawn", "settle", "respawn"]);
        }
        assert_eq!(summary.moves_used, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn match_during_first_despawn_scores_superlinearly() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let loads = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(
            Script::new(calls.clone()).emitting(vec![vec![4]]),
            Recorder {
                loads: loads.clone(),
            },
            config(3),
        );
        let summary = session.run().await.unwrap();
        assert_eq!(summary.score, 12);
        assert_eq!(summary.destination, Destination::GameOver);
        assert_eq!(summary.moves_used, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn score_observers_hear_every_match() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let loads = Arc::new(Mutex::new(Vec::new()));
        let mut session = Session::new(
            Script::new(calls.clone()).emitting(vec![vec![4], vec![1]]),
            Recorder {
                loads: loads.clone(),
            },
            config(2),
        );
        let (scores, mut changes) = unbounded_channel();
        session.observe(scores);
        let summary = session.run().await.unwrap();
        assert_eq!(summary.score, 12);
        assert_eq!(changes.recv().await, Some(ScoreChange { old: 0, new: 12 }));
        assert_eq!(changes.recv().await, Some(ScoreChange { old: 12, new: 12 }));
        assert_eq!(changes.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_while_settling_abandons_the_turn() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let loads = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(
            Script::new(calls.clone()).stalling_at("settle"),
            Recorder {
                loads: loads.clone(),
            },
            config(3),
        );
        let interrupt = session.interrupter();
        let handle = tokio::spawn(session.run());
        while !calls.lock().unwrap().contains(&"settle") {
            tokio::task::yield_now().await;
        }
        interrupt.cancel();
        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.destination, Destination::Menu);
        assert_eq!(summary.moves_used, 0);
        assert!(!calls.lock().unwrap().contains(&"respawn"));
        assert_eq!(*loads.lock().unwrap(), vec![Destination::Menu]);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_before_the_first_phase_skips_the_grid() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let loads = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(
            Script::new(calls.clone()),
            Recorder {
                loads: loads.clone(),
            },
            config(2),
        );
        session.interrupter().cancel();
        let summary = session.run().await.unwrap();
        assert_eq!(summary.destination, Destination::Menu);
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(*loads.lock().unwrap(), vec![Destination::Menu]);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_during_ending_pause_still_reaches_menu() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let loads = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(
            Script::new(calls.clone()),
            Recorder {
                loads: loads.clone(),
            },
            FlowConfig {
                moves: 1,
                endgame_delay: Duration::from_secs(3600),
            },
        );
        let interrupt = session.interrupter();
        let handle = tokio::spawn(session.run());
        while !calls.lock().unwrap().contains(&"respawn") {
            tokio::task::yield_now().await;
        }
        interrupt.cancel();
        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.destination, Destination::Menu);
        assert_eq!(summary.moves_used, 1);
        assert_eq!(*loads.lock().unwrap(), vec![Destination::Menu]);
    }

    #[tokio::test(start_paused = true)]
    async fn grid_failure_surfaces_without_handoff() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let loads = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(
            Script::new(calls.clone()).failing_at("despawn"),
            Recorder {
                loads: loads.clone(),
            },
            config(2),
        );
        let err = session.run().await.unwrap_err();
        match err {
            FlowError::Collaborator { phase, .. } => assert_eq!(phase, Phase::Despawning),
            other => panic!("expected collaborator failure, got {}", other),
        }
        assert!(loads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_move_budget_is_an_invariant_violation() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let loads = Arc::new(Mutex::new(Vec::new()));
        let session = Session::new(
            Script::new(calls.clone()),
            Recorder {
                loads: loads.clone(),
            },
            config(0),
        );
        assert!(matches!(
            session.run().await,
            Err(FlowError::Invariant(_))
        ));
        assert!(calls.lock().unwrap().is_empty());
        assert!(loads.lock().unwrap().is_empty());
    }
}
