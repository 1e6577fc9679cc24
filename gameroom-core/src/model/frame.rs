use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The three games the shell knows how to run. The tag travels in front of
/// every move frame so a receiver can drop frames from a stale mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Tictactoe,
    Connect4,
    Numguess,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Tictactoe => "tictactoe",
            GameKind::Connect4 => "connect4",
            GameKind::Numguess => "numguess",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Tictactoe => "Tic-Tac-Toe",
            GameKind::Connect4 => "Connect Four",
            GameKind::Numguess => "Number Guessing",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tictactoe" => Ok(GameKind::Tictactoe),
            "connect4" => Ok(GameKind::Connect4),
            "numguess" => Ok(GameKind::Numguess),
            other => Err(FrameError::UnknownGame(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("unknown game kind: {0:?}")]
    UnknownGame(String),
    #[error("malformed channel frame: {0:?}")]
    Malformed(String),
}

/// One text frame on the established data channel.
///
/// Moves travel as `"<gameKind>:<JSON-encoded move>"`; a bare `"rematch"`
/// asks the remote side to reset the session. The payload stays an
/// unparsed string here — only the receiving game engine knows its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelFrame {
    Move { game: GameKind, payload: String },
    Rematch,
}

pub const REMATCH_FRAME: &str = "rematch";

impl ChannelFrame {
    pub fn encode(&self) -> String {
        match self {
            ChannelFrame::Move { game, payload } => format!("{game}:{payload}"),
            ChannelFrame::Rematch => REMATCH_FRAME.to_string(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, FrameError> {
        if text == REMATCH_FRAME {
            return Ok(ChannelFrame::Rematch);
        }
        let Some((kind, payload)) = text.split_once(':') else {
            return Err(FrameError::Malformed(text.to_string()));
        };
        Ok(ChannelFrame::Move {
            game: kind.parse()?,
            payload: payload.to_string(),
        })
    }
}
