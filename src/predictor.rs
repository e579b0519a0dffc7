//! Predictor trait for position evaluation.
//!
//! A predictor supplies, for a game state, a prior probability per move coordinate and a scalar
//! value estimate. In an AlphaZero-style agent this is the policy/value network. Two predictors
//! that need no model are provided for testing and for plain playout-based search.

use crate::board::{Board, Move};
use crate::random::RandomGenerator;
use ndarray::Array2;
use thiserror::Error;

/// Prior mass given to cells that are not legal moves by the built-in predictors.
pub const MASKED_PRIOR: f64 = 1e-5;

/// Default cap on the number of moves played by a `RolloutPredictor` playout.
pub const DEFAULT_ROLLOUT_DEPTH: u32 = 128;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid prior surface: {0}")]
    InvalidSurface(String),
}

/// Prior probabilities over the board grid, indexed by the `(x, y)` coordinates of a `Move`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorSurface(Array2<f64>);

impl PriorSurface {
    pub fn new(priors: Array2<f64>) -> Self {
        Self(priors)
    }

    /// Builds a surface of shape `(width, height)` from row-major values.
    pub fn from_shape_vec(dim: (usize, usize), values: Vec<f64>) -> Result<Self, PredictorError> {
        Array2::from_shape_vec(dim, values)
            .map(Self)
            .map_err(|e| PredictorError::InvalidSurface(e.to_string()))
    }

    /// A surface spreading the whole probability mass evenly over every cell.
    pub fn uniform(width: usize, height: usize) -> Self {
        let cells = (width * height).max(1) as f64;
        Self(Array2::from_elem((width, height), 1.0 / cells))
    }

    /// A surface spreading the probability mass evenly over the legal moves of `board`.
    /// Every other cell holds `MASKED_PRIOR`.
    pub fn uniform_over_legal<B: Board>(board: &B) -> Self {
        let mut priors = Array2::from_elem(board.dimensions(), MASKED_PRIOR);
        let moves = board.get_available_moves();
        if !moves.is_empty() {
            let share = 1.0 / moves.len() as f64;
            for m in &moves {
                if let Some(cell) = priors.get_mut((m.x, m.y)) {
                    *cell = share;
                }
            }
        }
        Self(priors)
    }

    /// Returns the prior at the coordinates of `b_move`, or `None` if the surface does not cover it.
    pub fn prior(&self, b_move: &Move) -> Option<f64> {
        self.0.get((b_move.x, b_move.y)).copied()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }
}

/// Result of evaluating a game state.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Probability per move coordinate.
    pub priors: PriorSurface,

    /// Value estimate from the first mover's point of view.
    /// Range: -1.0 (certain loss) to +1.0 (certain win).
    pub value: f64,
}

/// Trait for position evaluators.
pub trait Predictor<B: Board> {
    fn evaluate(&mut self, board: &B) -> Result<Prediction, PredictorError>;
}

impl<B, F> Predictor<B> for F
where
    B: Board,
    F: FnMut(&B) -> Result<Prediction, PredictorError>,
{
    fn evaluate(&mut self, board: &B) -> Result<Prediction, PredictorError> {
        self(board)
    }
}

/// Uniform predictor that assigns equal probability to all legal moves.
/// Value is always 0.0 (neutral). Useful for testing the search without a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPredictor;

impl<B: Board> Predictor<B> for UniformPredictor {
    fn evaluate(&mut self, board: &B) -> Result<Prediction, PredictorError> {
        Ok(Prediction {
            priors: PriorSurface::uniform_over_legal(board),
            value: 0.0,
        })
    }
}

/// Predictor that estimates the value by playing random moves to a terminal state.
/// Priors are uniform over the legal moves.
#[derive(Debug, Clone)]
pub struct RolloutPredictor<R: RandomGenerator> {
    random: R,
    max_depth: u32,
}

impl<R: RandomGenerator> Default for RolloutPredictor<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: RandomGenerator> RolloutPredictor<R> {
    pub fn new(random: R) -> Self {
        Self {
            random,
            max_depth: DEFAULT_ROLLOUT_DEPTH,
        }
    }

    /// Sets the maximum number of moves per playout. Playouts cut short score 0.0.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn playout<B: Board>(&mut self, board: &B) -> f64 {
        let mut board = board.clone();
        for _ in 0..self.max_depth {
            let moves = board.get_available_moves();
            match self.random.get_random_from_slice(&moves) {
                Some(random_move) => board.perform_move(random_move),
                None => break,
            }
        }
        board.get_outcome().score()
    }
}

impl<B: Board, R: RandomGenerator> Predictor<B> for RolloutPredictor<R> {
    fn evaluate(&mut self, board: &B) -> Result<Prediction, PredictorError> {
        Ok(Prediction {
            priors: PriorSurface::uniform_over_legal(board),
            value: self.playout(board),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Mark;
    use crate::boards::tic_tac_toe::TicTacToeBoard;
    use crate::random::CustomNumberGenerator;

    #[test]
    fn uniform_over_legal_masks_occupied_cells() {
        let board = TicTacToeBoard::from_rows(["XO.", "...", "..."]);

        let surface = PriorSurface::uniform_over_legal(&board);

        assert_eq!(surface.dim(), (3, 3));
        assert_eq!(surface.prior(&Move::new(0, 0, Mark::Cross)), Some(MASKED_PRIOR));
        assert_eq!(surface.prior(&Move::new(0, 1, Mark::Cross)), Some(MASKED_PRIOR));
        assert!((surface.prior(&Move::new(2, 2, Mark::Cross)).unwrap() - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn prior_outside_surface_is_none() {
        let surface = PriorSurface::uniform(2, 2);
        assert_eq!(surface.prior(&Move::new(1, 1, Mark::Cross)), Some(0.25));
        assert_eq!(surface.prior(&Move::new(2, 0, Mark::Cross)), None);
    }

    #[test]
    fn from_shape_vec_rejects_wrong_length() {
        let result = PriorSurface::from_shape_vec((3, 3), vec![0.1; 8]);
        assert!(matches!(result, Err(PredictorError::InvalidSurface(_))));

        let surface = PriorSurface::from_shape_vec((1, 2), vec![0.3, 0.7]).unwrap();
        assert_eq!(surface.prior(&Move::new(0, 1, Mark::Nought)), Some(0.7));
    }

    #[test]
    fn uniform_predictor_is_neutral() {
        let board = TicTacToeBoard::default();

        let prediction = UniformPredictor.evaluate(&board).unwrap();

        assert_eq!(prediction.value, 0.0);
        let total: f64 = prediction.priors.as_array().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rollout_of_terminal_board_scores_outcome() {
        let board = TicTacToeBoard::from_rows(["OOO", "XX.", "X.."]);
        let mut predictor = RolloutPredictor::new(CustomNumberGenerator::default());

        let prediction = predictor.evaluate(&board).unwrap();

        assert_eq!(prediction.value, -1.0);
    }

    #[test]
    fn rollout_reaches_a_terminal_score() {
        let board = TicTacToeBoard::default();
        let mut predictor = RolloutPredictor::new(CustomNumberGenerator::new(7));

        for _ in 0..20 {
            let value = predictor.evaluate(&board).unwrap().value;
            assert!(value == -1.0 || value == 0.0 || value == 1.0);
        }
    }

    #[test]
    fn zero_depth_rollout_is_neutral() {
        let board = TicTacToeBoard::from_rows(["XX.", "OO.", "..."]);
        let mut predictor = RolloutPredictor::<CustomNumberGenerator>::default().with_max_depth(0);

        assert_eq!(predictor.evaluate(&board).unwrap().value, 0.0);
    }

    #[test]
    fn closures_are_predictors() {
        let mut calls = 0;
        let mut predictor = |board: &TicTacToeBoard| {
            calls += 1;
            Ok::<_, PredictorError>(Prediction {
                priors: PriorSurface::uniform_over_legal(board),
                value: 0.5,
            })
        };

        let value = Predictor::evaluate(&mut predictor, &TicTacToeBoard::default())
            .unwrap()
            .value;

        assert_eq!(value, 0.5);
        assert_eq!(calls, 1);
    }
}
