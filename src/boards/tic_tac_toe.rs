use crate::board::{Board, GameOutcome, Mark, Move};
use std::fmt;

const SIZE: usize = 3;

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// An implementation of the `Board` trait for the game of Tic-Tac-Toe.
///
/// The board is a 3x3 grid addressed by `(x, y)` where `x` is the row and `y` the column.
/// Cross always moves first.
#[derive(Debug, PartialEq, Clone)]
pub struct TicTacToeBoard {
    current_player: Mark,
    field: [[Option<Mark>; SIZE]; SIZE],
    outcome: GameOutcome,
}

impl TicTacToeBoard {
    /// Builds a position from three row strings, `X` and `O` for marks and anything else for an
    /// empty cell. The player to move is inferred from the number of marks on the board.
    pub fn from_rows(rows: [&str; SIZE]) -> Self {
        let mut field = [[None; SIZE]; SIZE];
        for (x, row) in rows.iter().enumerate() {
            for (y, cell) in row.chars().take(SIZE).enumerate() {
                field[x][y] = match cell {
                    'X' | 'x' => Some(Mark::Cross),
                    'O' | 'o' => Some(Mark::Nought),
                    _ => None,
                };
            }
        }

        let crosses = field.iter().flatten().filter(|c| **c == Some(Mark::Cross)).count();
        let noughts = field.iter().flatten().filter(|c| **c == Some(Mark::Nought)).count();
        let current_player = if crosses > noughts {
            Mark::Nought
        } else {
            Mark::Cross
        };

        let mut board = Self {
            current_player,
            field,
            outcome: GameOutcome::InProgress,
        };
        board.outcome = board.compute_outcome();
        board
    }

    /// Returns the mark of the player whose turn it is.
    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    /// Returns the mark at `(x, y)`, if any.
    pub fn cell(&self, x: usize, y: usize) -> Option<Mark> {
        self.field.get(x).and_then(|row| row.get(y)).copied().flatten()
    }

    fn compute_outcome(&self) -> GameOutcome {
        for line in LINES {
            let [a, b, c] = line.map(|(x, y)| self.field[x][y]);
            if let Some(mark) = a {
                if a == b && a == c {
                    return GameOutcome::Won(mark);
                }
            }
        }

        if self.field.iter().flatten().any(|x| x.is_none()) {
            GameOutcome::InProgress
        } else {
            GameOutcome::Draw
        }
    }
}

impl Default for TicTacToeBoard {
    /// Creates an empty board with Cross to move.
    fn default() -> Self {
        Self {
            current_player: Mark::Cross,
            field: [[None; SIZE]; SIZE],
            outcome: GameOutcome::InProgress,
        }
    }
}

impl Board for TicTacToeBoard {
    fn dimensions(&self) -> (usize, usize) {
        (SIZE, SIZE)
    }

    fn get_outcome(&self) -> GameOutcome {
        self.outcome
    }

    fn get_available_moves(&self) -> Vec<Move> {
        if self.outcome.is_terminal() {
            return Vec::new();
        }

        let mark = self.current_player;
        (0..SIZE)
            .flat_map(|x| (0..SIZE).map(move |y| (x, y)))
            .filter(|&(x, y)| self.field[x][y].is_none())
            .map(|(x, y)| Move::new(x, y, mark))
            .collect()
    }

    fn perform_move(&mut self, b_move: &Move) {
        self.field[b_move.x][b_move.y] = Some(b_move.mark);
        self.current_player = b_move.mark.opponent();
        self.outcome = self.compute_outcome();
    }
}

impl fmt::Display for TicTacToeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.field {
            for cell in row {
                match cell {
                    Some(mark) => write!(f, "{mark}")?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
