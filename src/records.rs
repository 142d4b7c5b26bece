//! End-of-session records.
use crate::Moves;
use crate::Score;
use crate::transition::Destination;
use serde::Serialize;
use uuid::Uuid;

/// Immutable record of a finished session, for the host's scoreboard or
/// telemetry. Built once per run, after the score keeper has drained.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub id: Uuid,
    pub destination: Destination,
    pub score: Score,
    pub moves_used: Moves,
}

impl Summary {
    pub fn new(id: Uuid, destination: Destination, score: Score, moves_used: Moves) -> Self {
        Self {
            id,
            destination,
            score,
            moves_used,
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize session summary")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_for_telemetry() {
        let summary = Summary::new(Uuid::now_v7(), Destination::GameOver, 12, 3);
        let json = summary.to_json();
        assert!(json.contains("\"game_over\""));
        assert!(json.contains("\"score\":12"));
        assert!(json.contains("\"moves_used\":3"));
    }
}
