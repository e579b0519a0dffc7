use crate::board::{Board, GameOutcome, Mark, Move};
use ego_tree::NodeRef;
use std::fmt;

/// Offset added to the visit count when computing the mean value, so that never-visited nodes
/// have a defined mean value of zero.
pub const MEAN_VALUE_EPSILON: f64 = 1e-5;

/// Represents a single node in the search tree.
///
/// Each node stores the state of the game, the statistics accumulated by the simulations that
/// passed through it, and the move and prior that led to it from its parent. Parent and children
/// are not stored here: the node lives in an `ego_tree::Tree`, which owns the children of every
/// node and answers parent lookups by id.
#[derive(Debug, Clone)]
pub struct MctsNode<T: Board> {
    /// The game state that this node represents.
    pub board: Box<T>,
    /// The move that led to this node's state from its parent. `None` for the root node.
    pub prev_move: Option<Move>,
    /// The probability the predictor assigned to `prev_move` when the parent was expanded.
    pub prior: f64,
    /// Sum of the outcomes backpropagated through this node.
    pub value: f64,
    /// The number of simulations that passed through this node.
    pub visits: u32,
    /// The outcome of the game at this node.
    pub outcome: GameOutcome,
    /// Whether the children of this node have been created.
    pub expanded: bool,
}

impl<T: Board> MctsNode<T> {
    /// Creates an unvisited, unexpanded node.
    pub fn new(boxed_board: Box<T>, prior: f64, prev_move: Option<Move>) -> Self {
        let outcome = boxed_board.get_outcome();
        MctsNode {
            board: boxed_board,
            prev_move,
            prior,
            value: 0.0,
            visits: 0,
            outcome,
            expanded: false,
        }
    }

    /// Creates a root node. The root has no move and a prior of 1.
    pub fn new_root(board: T) -> Self {
        MctsNode::new(Box::new(board), 1.0, None)
    }

    /// Average outcome observed through this node.
    pub fn mean_value(&self) -> f64 {
        self.value / (self.visits as f64 + MEAN_VALUE_EPSILON)
    }

    /// The player to move in this node's state. Cross by convention at the root, otherwise the
    /// opponent of whoever made `prev_move`.
    pub fn next_player(&self) -> Mark {
        match self.prev_move {
            None => Mark::Cross,
            Some(m) => m.mark.opponent(),
        }
    }

    /// Sign that turns a first-mover outcome into the point of view of the player who moved
    /// into this node.
    pub fn perspective(&self) -> f64 {
        self.next_player().opponent().value()
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Interest score of this node given the total visits of its layer.
    pub fn interest(&self, layer_visits: u32, exploration: f64) -> f64 {
        self.mean_value()
            + exploration * self.prior * f64::from(layer_visits).sqrt()
                / (f64::from(self.visits) + 1.0)
    }

    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            prev_move: self.prev_move,
            value: self.value,
            visits: self.visits,
        }
    }
}

/// Sum of the visits of `node`'s parent's children, `node` included.
///
/// The root has no siblings; its own visit count is returned.
pub fn total_sibling_visits<T: Board>(node: NodeRef<'_, MctsNode<T>>) -> u32 {
    match node.parent() {
        Some(parent) => layer_visits(parent),
        None => node.value().visits,
    }
}

/// Sum of the visits of `parent`'s children.
pub fn layer_visits<T: Board>(parent: NodeRef<'_, MctsNode<T>>) -> u32 {
    parent.children().map(|child| child.value().visits).sum()
}

/// Interest score of `node` within its layer.
pub fn interest<T: Board>(node: NodeRef<'_, MctsNode<T>>, exploration: f64) -> f64 {
    node.value()
        .interest(total_sibling_visits(node), exploration)
}

/// Diagnostic record of a node: the move leading to it and its accumulated statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSummary {
    pub prev_move: Option<Move>,
    pub value: f64,
    pub visits: u32,
}

impl fmt::Display for NodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prev_move {
            Some(m) => write!(f, "{m}")?,
            None => write!(f, "root")?,
        }
        write!(f, ", value {}, visits={}", self.value, self.visits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::tic_tac_toe::TicTacToeBoard;
    use ego_tree::Tree;

    fn child(prior: f64, x: usize, y: usize) -> MctsNode<TicTacToeBoard> {
        let b_move = Move::new(x, y, Mark::Cross);
        let board = TicTacToeBoard::default().apply(&b_move);
        MctsNode::new(Box::new(board), prior, Some(b_move))
    }

    #[test]
    fn unvisited_node_has_zero_mean_value() {
        let node = MctsNode::new_root(TicTacToeBoard::default());

        assert_eq!(node.visits, 0);
        assert_eq!(node.mean_value(), 0.0);
        assert!(node.mean_value().is_finite());
    }

    #[test]
    fn mean_value_is_value_over_visits() {
        let mut node = MctsNode::new_root(TicTacToeBoard::default());
        node.value = 3.0;
        node.visits = 4;

        assert!((node.mean_value() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn player_to_move_alternates_from_cross_at_root() {
        let root = MctsNode::new_root(TicTacToeBoard::default());
        let after_cross = child(0.5, 0, 0);

        assert_eq!(root.next_player(), Mark::Cross);
        assert_eq!(root.perspective(), -1.0);
        assert_eq!(after_cross.next_player(), Mark::Nought);
        assert_eq!(after_cross.perspective(), 1.0);
    }

    #[test]
    fn sibling_visits_sum_the_whole_layer() {
        let mut tree = Tree::new(MctsNode::new_root(TicTacToeBoard::default()));
        tree.root_mut().value().visits = 10;
        let mut first = child(0.5, 0, 0);
        first.visits = 3;
        let mut second = child(0.5, 0, 1);
        second.visits = 4;
        let first_id = tree.root_mut().append(first).id();
        let second_id = tree.root_mut().append(second).id();

        assert_eq!(total_sibling_visits(tree.root()), 10);
        assert_eq!(total_sibling_visits(tree.get(first_id).unwrap()), 7);
        assert_eq!(total_sibling_visits(tree.get(second_id).unwrap()), 7);
        assert_eq!(layer_visits(tree.root()), 7);
    }

    #[test]
    fn interest_trades_exploitation_for_exploration() {
        let mut tree = Tree::new(MctsNode::new_root(TicTacToeBoard::default()));
        let mut visited = child(0.2, 0, 0);
        visited.visits = 3;
        visited.value = 1.5;
        let fresh = child(0.8, 0, 1);
        let visited_id = tree.root_mut().append(visited).id();
        let fresh_id = tree.root_mut().append(fresh).id();
        let kappa = std::f64::consts::SQRT_2;

        let visited_score = interest(tree.get(visited_id).unwrap(), kappa);
        let fresh_score = interest(tree.get(fresh_id).unwrap(), kappa);

        let expected_visited = 1.5 / (3.0 + MEAN_VALUE_EPSILON) + kappa * 0.2 * 3f64.sqrt() / 4.0;
        let expected_fresh = kappa * 0.8 * 3f64.sqrt();
        assert!((visited_score - expected_visited).abs() < 1e-12);
        assert!((fresh_score - expected_fresh).abs() < 1e-12);
        assert!(fresh_score > visited_score);
    }

    #[test]
    fn summary_display() {
        let mut node = child(0.1, 1, 2);
        node.value = 2.0;
        node.visits = 5;

        assert_eq!(node.summary().to_string(), "X@(1, 2), value 2, visits=5");
        assert_eq!(
            MctsNode::new_root(TicTacToeBoard::default()).summary().to_string(),
            "root, value 0, visits=0"
        );
    }
}
