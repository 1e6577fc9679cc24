use crate::connect4::Connect4;
use crate::numguess::{GuessOutcome, NumGuess};
use crate::tictactoe::TicTacToe;
use gameroom_core::GameKind;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Cap on the per-round move log.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Player(Player),
    Draw,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub x: u32,
    pub o: u32,
    pub draws: u32,
}

impl Score {
    fn credit(&mut self, winner: Winner) {
        match winner {
            Winner::Player(Player::X) => self.x += 1,
            Winner::Player(Player::O) => self.o += 1,
            Winner::Draw => self.draws += 1,
        }
    }
}

#[derive(Debug, Clone)]
enum Board {
    Tictactoe(TicTacToe),
    Connect4(Connect4),
    Numguess(NumGuess),
}

impl Board {
    fn fresh(kind: GameKind) -> Self {
        match kind {
            GameKind::Tictactoe => Board::Tictactoe(TicTacToe::new()),
            GameKind::Connect4 => Board::Connect4(Connect4::new()),
            GameKind::Numguess => Board::Numguess(NumGuess::new()),
        }
    }
}

/// One rule engine driving whichever game is active. Moves come in as plain
/// numbers — a cell index, a column, or a guess — exactly what travels in a
/// move frame.
#[derive(Debug, Clone)]
pub struct GameEngine {
    kind: GameKind,
    board: Board,
    current: Player,
    outcome: Option<Winner>,
    history: VecDeque<(Player, u32)>,
    score: Score,
}

impl GameEngine {
    pub fn new(kind: GameKind) -> Self {
        Self {
            kind,
            board: Board::fresh(kind),
            current: Player::X,
            outcome: None,
            history: VecDeque::new(),
            score: Score::default(),
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.outcome
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn history(&self) -> impl Iterator<Item = &(Player, u32)> {
        self.history.iter()
    }

    /// Switch games. Clears the score — a new match, not a new round.
    pub fn set_kind(&mut self, kind: GameKind) {
        self.kind = kind;
        self.score = Score::default();
        self.reset_round();
    }

    /// Start the next round of the same game. The running score survives;
    /// this is what a rematch does.
    pub fn reset_round(&mut self) {
        self.board = Board::fresh(self.kind);
        self.current = Player::X;
        self.outcome = None;
        self.history.clear();
    }

    pub fn tictactoe(&self) -> Option<&TicTacToe> {
        match &self.board {
            Board::Tictactoe(game) => Some(game),
            _ => None,
        }
    }

    pub fn connect4(&self) -> Option<&Connect4> {
        match &self.board {
            Board::Connect4(game) => Some(game),
            _ => None,
        }
    }

    pub fn numguess(&self) -> Option<&NumGuess> {
        match &self.board {
            Board::Numguess(game) => Some(game),
            _ => None,
        }
    }

    /// Apply a move for the player whose turn it is. `false` means the move
    /// was illegal or the round is already over; nothing changed.
    pub fn make_move(&mut self, input: u32) -> bool {
        if self.is_over() {
            return false;
        }
        match &mut self.board {
            Board::Tictactoe(_) => self.tictactoe_move(input as usize),
            Board::Connect4(_) => self.connect4_move(input as usize),
            Board::Numguess(_) => self.numguess_move(input),
        }
    }

    fn tictactoe_move(&mut self, index: usize) -> bool {
        let Board::Tictactoe(game) = &mut self.board else {
            return false;
        };
        if !game.place(index, self.current) {
            return false;
        }
        let won = game.is_winning_move(index);
        let full = game.is_full();
        self.record(index as u32);
        self.advance(won, full);
        true
    }

    fn connect4_move(&mut self, col: usize) -> bool {
        let Board::Connect4(game) = &mut self.board else {
            return false;
        };
        let Some(index) = game.drop_piece(col, self.current) else {
            return false;
        };
        let won = game.is_winning_move(index);
        let full = game.is_full();
        self.record(index as u32);
        self.advance(won, full);
        true
    }

    fn numguess_move(&mut self, value: u32) -> bool {
        let Board::Numguess(game) = &mut self.board else {
            return false;
        };
        let Some(outcome) = game.guess(value) else {
            return false;
        };
        let exhausted = game.remaining() == 0;
        self.record(value);

        // Guessing right wins; running out of attempts hands the win to the
        // other player. Turns do not alternate in this game.
        if outcome == GuessOutcome::Correct {
            self.finish(Winner::Player(self.current));
        } else if exhausted {
            self.finish(Winner::Player(self.current.other()));
        }
        true
    }

    fn record(&mut self, index: u32) {
        self.history.push_back((self.current, index));
        if self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
    }

    fn advance(&mut self, won: bool, full: bool) {
        if won {
            self.finish(Winner::Player(self.current));
        } else if full {
            self.finish(Winner::Draw);
        } else {
            self.current = self.current.other();
        }
    }

    fn finish(&mut self, winner: Winner) {
        self.outcome = Some(winner);
        self.score.credit(winner);
    }

    /// Pick a move for the current position, or `None` when nothing is
    /// playable.
    pub fn ai_move(&self) -> Option<u32> {
        if self.is_over() {
            return None;
        }
        match &self.board {
            Board::Tictactoe(game) => game.ai_move().map(|i| i as u32),
            Board::Connect4(game) => game.ai_move().map(|c| c as u32),
            Board::Numguess(game) => Some(game.ai_move()),
        }
    }
}
