//! Scene handoff boundary.
use colored::Colorize;
use serde::Serialize;

/// Where the session hands control when it ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Player bailed out mid-session.
    Menu,
    /// Move budget exhausted.
    GameOver,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Menu => write!(f, "menu"),
            Self::GameOver => write!(f, "game over"),
        }
    }
}

/// Fire-and-forget scene transition. The sequencer calls `load` at most
/// once per session and performs no phase work afterwards.
pub trait Gateway: Send {
    fn load(&mut self, destination: Destination);
}

/// Demo gateway that announces the handoff on the terminal.
pub struct ConsoleGateway;

impl Gateway for ConsoleGateway {
    fn load(&mut self, destination: Destination) {
        log::info!("[gateway] loading {} scene", destination);
        match destination {
            Destination::Menu => println!("{}", "returning to menu".yellow()),
            Destination::GameOver => println!("{}", "GAME OVER".red().bold()),
        }
    }
}
