use std::fmt;

/// The central trait of the library, defining the interface for a game state.
///
/// The search never looks inside a board; it only asks for legal moves, applies them to
/// independent copies and reads the outcome of terminal positions.
pub trait Board: Clone {
    /// Returns the `(width, height)` of the grid that moves and prior surfaces are indexed by.
    fn dimensions(&self) -> (usize, usize);

    /// Returns the current outcome of the game.
    fn get_outcome(&self) -> GameOutcome;

    /// Returns a list of all legal moves available from the current state.
    ///
    /// Must be empty if and only if the position is terminal.
    fn get_available_moves(&self) -> Vec<Move>;

    /// Applies a given move to the board, modifying its state.
    fn perform_move(&mut self, b_move: &Move);

    /// Returns a new board with `b_move` applied, leaving `self` untouched.
    fn apply(&self, b_move: &Move) -> Self {
        let mut next = self.clone();
        next.perform_move(b_move);
        next
    }
}

/// The mark a player puts on the board. Cross always moves first.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Mark {
    Cross = 1,
    Nought = -1,
}

impl Mark {
    /// Returns `+1.0` for Cross and `-1.0` for Nought.
    pub fn value(self) -> f64 {
        match self {
            Mark::Cross => 1.0,
            Mark::Nought => -1.0,
        }
    }

    pub fn opponent(self) -> Mark {
        match self {
            Mark::Cross => Mark::Nought,
            Mark::Nought => Mark::Cross,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::Cross => write!(f, "X"),
            Mark::Nought => write!(f, "O"),
        }
    }
}

/// A move: the acting player's mark placed on cell `(x, y)`.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Move {
    pub x: usize,
    pub y: usize,
    pub mark: Mark,
}

impl Move {
    pub const fn new(x: usize, y: usize, mark: Mark) -> Self {
        Self { x, y, mark }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@({}, {})", self.mark, self.x, self.y)
    }
}

/// Represents the possible outcomes of a game.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum GameOutcome {
    /// The game is still ongoing.
    InProgress,
    /// The game was won by the given mark.
    Won(Mark),
    /// The game has ended in a draw.
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::InProgress
    }

    /// Scores the outcome from the first mover's (Cross) point of view.
    ///
    /// A win is worth `+1.0` for Cross and `-1.0` for Nought. Draws and unfinished games score `0.0`.
    pub fn score(self) -> f64 {
        match self {
            GameOutcome::Won(mark) => mark.value(),
            GameOutcome::InProgress | GameOutcome::Draw => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GameOutcome, Mark, Move};

    #[test]
    fn scores_are_from_cross_point_of_view() {
        assert_eq!(GameOutcome::Won(Mark::Cross).score(), 1.0);
        assert_eq!(GameOutcome::Won(Mark::Nought).score(), -1.0);
        assert_eq!(GameOutcome::Draw.score(), 0.0);
        assert_eq!(GameOutcome::InProgress.score(), 0.0);
    }

    #[test]
    fn only_in_progress_is_not_terminal() {
        assert!(!GameOutcome::InProgress.is_terminal());
        assert!(GameOutcome::Draw.is_terminal());
        assert!(GameOutcome::Won(Mark::Nought).is_terminal());
    }

    #[test]
    fn marks_alternate() {
        assert_eq!(Mark::Cross.opponent(), Mark::Nought);
        assert_eq!(Mark::Nought.opponent(), Mark::Cross);
        assert_eq!(Mark::Nought.value(), -1.0);
    }

    #[test]
    fn move_display() {
        assert_eq!(Move::new(2, 1, Mark::Nought).to_string(), "O@(2, 1)");
    }
}
