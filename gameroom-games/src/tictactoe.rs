use crate::engine::Player;

pub const CELLS: usize = 9;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Default)]
pub struct TicTacToe {
    board: [Option<Player>; CELLS],
}

impl TicTacToe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &[Option<Player>; CELLS] {
        &self.board
    }

    pub fn cell(&self, index: usize) -> Option<Player> {
        self.board.get(index).copied().flatten()
    }

    /// Place a mark. `false` when the cell is taken or out of range.
    pub fn place(&mut self, index: usize, player: Player) -> bool {
        match self.board.get_mut(index) {
            Some(cell) if cell.is_none() => {
                *cell = Some(player);
                true
            }
            _ => false,
        }
    }

    /// Did the mark at `index` complete a line?
    pub fn is_winning_move(&self, index: usize) -> bool {
        LINES.iter().any(|line| {
            line.contains(&index)
                && self.board[line[0]].is_some()
                && self.board[line[0]] == self.board[line[1]]
                && self.board[line[1]] == self.board[line[2]]
        })
    }

    pub fn is_full(&self) -> bool {
        self.board.iter().all(Option::is_some)
    }

    /// Center first, then corners, then anything free.
    pub fn ai_move(&self) -> Option<usize> {
        if self.board[4].is_none() {
            return Some(4);
        }
        for corner in [0, 2, 6, 8] {
            if self.board[corner].is_none() {
                return Some(corner);
            }
        }
        self.board.iter().position(Option::is_none)
    }
}
