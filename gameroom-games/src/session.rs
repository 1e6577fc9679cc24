use crate::engine::GameEngine;
use gameroom_core::{ChannelFrame, GameKind};

/// What applying a remote frame did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Move accepted; the board changed.
    Applied,
    /// Well-formed frame the engine rejected (illegal move, bad payload).
    Rejected,
    /// Move frame for a different game than the active one. Dropped without
    /// touching state — these are stale frames from before a mode switch.
    Stale,
    /// Rematch control frame: the round was reset.
    Rematch,
}

/// The Game Session collaborator: owns the engine and speaks the channel
/// frame protocol on its behalf.
pub struct GameSession {
    engine: GameEngine,
}

impl GameSession {
    pub fn new(kind: GameKind) -> Self {
        Self {
            engine: GameEngine::new(kind),
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn active_game(&self) -> GameKind {
        self.engine.kind()
    }

    pub fn switch_game(&mut self, kind: GameKind) {
        self.engine.set_kind(kind);
    }

    /// Apply one inbound channel frame.
    pub fn apply_frame(&mut self, text: &str) -> SessionUpdate {
        match ChannelFrame::parse(text) {
            Ok(ChannelFrame::Rematch) => {
                self.engine.reset_round();
                SessionUpdate::Rematch
            }
            Ok(ChannelFrame::Move { game, payload }) => {
                if game != self.engine.kind() {
                    return SessionUpdate::Stale;
                }
                match serde_json::from_str::<u32>(&payload) {
                    Ok(mv) if self.engine.make_move(mv) => SessionUpdate::Applied,
                    _ => SessionUpdate::Rejected,
                }
            }
            Err(_) => SessionUpdate::Rejected,
        }
    }

    /// Encode a local move for the wire: `"<gameKind>:<JSON move>"`.
    pub fn serialize_move(&self, mv: u32) -> String {
        ChannelFrame::Move {
            game: self.engine.kind(),
            payload: mv.to_string(),
        }
        .encode()
    }

    pub fn rematch_frame(&self) -> String {
        ChannelFrame::Rematch.encode()
    }
}
