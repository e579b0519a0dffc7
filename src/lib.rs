//! Policy/value guided Monte Carlo tree search.
//!
//! This library implements the search at the heart of an AlphaZero-style agent. Leaves of the
//! search tree are evaluated by a predictor (usually a policy/value network) that returns a prior
//! probability per move and a value estimate; the priors bias exploration, the values are
//! accumulated along the path of every simulation, and the most visited child of the root is
//! recommended as the move to play.
//!
//! The game rules and the predictor are collaborators supplied by the caller through the
//! [`board::Board`] and [`predictor::Predictor`] traits.
//!
//! # Example
//!
//! ```rust
//! use prior_mcts::board::{Mark, Move};
//! use prior_mcts::boards::tic_tac_toe::TicTacToeBoard;
//! use prior_mcts::config::MctsConfig;
//! use prior_mcts::mcts::run_search;
//! use prior_mcts::predictor::{PriorSurface, UniformPredictor};
//!
//! // Cross to move, and can win immediately in the bottom right corner
//! let board = TicTacToeBoard::from_rows(["...", "OO.", "XX."]);
//! let root_priors = PriorSurface::uniform_over_legal(&board);
//!
//! // Run 100 simulations with a neutral predictor
//! let best_move = run_search(board, root_priors, 100, UniformPredictor, MctsConfig::default())
//!     .expect("position has legal moves");
//!
//! assert_eq!(best_move, Move::new(2, 2, Mark::Cross));
//! ```

/// Contains the `Board` trait and the move, mark and outcome types shared with it.
pub mod board;
/// Contains pre-made implementations of the `Board` trait for common games.
pub mod boards;
/// Contains the `MctsConfig` struct with the search parameters.
pub mod config;
/// Contains the `SearchError` enum and the crate `Result` alias.
pub mod error;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Contains the `Predictor` trait, prior surfaces and the built-in predictors.
pub mod predictor;
/// Contains traits and implementations for random number generation.
pub mod random;

pub use board::{Board, GameOutcome, Mark, Move};
pub use config::MctsConfig;
pub use error::{Result, SearchError};
pub use mcts::{MctsAction, MonteCarloTreeSearch, MonteCarloTreeSearchBuilder, run_search};
pub use mcts_node::{MctsNode, NodeSummary};
pub use predictor::{
    Prediction, Predictor, PredictorError, PriorSurface, RolloutPredictor, UniformPredictor,
};
