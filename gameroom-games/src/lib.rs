pub mod connect4;
pub mod engine;
pub mod numguess;
pub mod session;
pub mod tictactoe;

pub use engine::{GameEngine, MAX_HISTORY, Player, Score, Winner};
pub use session::{GameSession, SessionUpdate};
