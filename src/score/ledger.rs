use crate::MatchCount;
use crate::Score;
use serde::Serialize;

/// Score awarded for clearing `count` elements in one despawn.
/// Rewards larger matches superlinearly; clearing one element (or none)
/// is worth nothing.
pub fn reward(count: MatchCount) -> Score {
    (count * count.saturating_sub(1)) as Score
}

/// Before/after score pair, published once per consumed match event —
/// including zero-delta events, so observers see every match land.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreChange {
    pub old: Score,
    pub new: Score,
}

impl std::fmt::Display for ScoreChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.old, self.new)
    }
}

/// Cumulative score for one session. Mutated only through match events.
#[derive(Debug, Default)]
pub struct Ledger {
    score: Score,
}

impl Ledger {
    /// Zeroes the score for a fresh session.
    pub fn reset(&mut self) {
        self.score = 0;
    }
    /// Applies the reward for one match and returns the before/after pair.
    pub fn on_match(&mut self, count: MatchCount) -> ScoreChange {
        let old = self.score;
        self.score = old + reward(count);
        ScoreChange {
            old,
            new: self.score,
        }
    }
    pub fn current(&self) -> Score {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_score_nothing() {
        assert_eq!(reward(0), 0);
        assert_eq!(reward(1), 0);
    }

    #[test]
    fn reward_is_superlinear() {
        assert_eq!(reward(2), 2);
        assert_eq!(reward(3), 6);
        assert_eq!(reward(4), 12);
        assert_eq!(reward(6), 30);
    }

    #[test]
    fn ledger_accumulates_monotonically() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.on_match(4), ScoreChange { old: 0, new: 12 });
        assert_eq!(ledger.on_match(1), ScoreChange { old: 12, new: 12 });
        assert_eq!(ledger.on_match(3), ScoreChange { old: 12, new: 18 });
        assert_eq!(ledger.current(), 18);
    }

    #[test]
    fn ledger_resets_to_zero() {
        let mut ledger = Ledger::default();
        ledger.on_match(5);
        ledger.reset();
        assert_eq!(ledger.current(), 0);
    }
}
