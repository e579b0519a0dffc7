use crate::board::{Board, Move};
use crate::config::MctsConfig;
use crate::error::{Result, SearchError};
use crate::mcts_node::{MctsNode, NodeSummary, interest};
use crate::predictor::{Predictor, PriorSurface};
use ego_tree::{NodeId, NodeRef, Tree};
use log::{Level, debug, log_enabled, trace};

/// The main struct for running the policy/value guided Monte Carlo Tree Search.
///
/// It holds the search tree, the predictor used to evaluate leaves, and the configuration for the
/// search. The tree is an arena: every node is addressed by its `NodeId`, children are owned by
/// the arena under their parent, and walking upwards is a lookup by id.
pub struct MonteCarloTreeSearch<T: Board, P: Predictor<T>> {
    tree: Tree<MctsNode<T>>,
    root_id: NodeId,
    predictor: P,
    config: MctsConfig,
    root_priors: Option<PriorSurface>,
    next_action: MctsAction,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
pub struct MonteCarloTreeSearchBuilder<T: Board, P: Predictor<T>> {
    board: T,
    predictor: P,
    config: MctsConfig,
    root_priors: Option<PriorSurface>,
}

impl<T: Board, P: Predictor<T>> MonteCarloTreeSearchBuilder<T, P> {
    /// Creates a new builder with the given initial board state and predictor.
    pub fn new(board: T, predictor: P) -> Self {
        Self {
            board,
            predictor,
            config: MctsConfig::default(),
            root_priors: None,
        }
    }

    /// Replaces the whole search configuration.
    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the exploration constant of the interest score.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.config.exploration = exploration;
        self
    }

    /// Enables or disables negating backpropagated outcomes on alternating plies.
    pub fn with_negate_per_ply(mut self, negate_per_ply: bool) -> Self {
        self.config.negate_per_ply = negate_per_ply;
        self
    }

    /// Priors to expand the root with instead of the ones the predictor returns for it.
    pub fn with_root_priors(mut self, priors: PriorSurface) -> Self {
        self.root_priors = Some(priors);
        self
    }

    /// Builds the `MonteCarloTreeSearch` instance with the configured parameters.
    pub fn build(self) -> MonteCarloTreeSearch<T, P> {
        MonteCarloTreeSearch::new(self.board, self.predictor, self.config, self.root_priors)
    }
}

impl<T: Board, P: Predictor<T>> MonteCarloTreeSearch<T, P> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(board: T, predictor: P) -> MonteCarloTreeSearchBuilder<T, P> {
        MonteCarloTreeSearchBuilder::new(board, predictor)
    }

    /// Creates a new `MonteCarloTreeSearch` instance.
    ///
    /// It is recommended to use the builder pattern via `MonteCarloTreeSearch::builder()` instead.
    pub fn new(
        board: T,
        predictor: P,
        config: MctsConfig,
        root_priors: Option<PriorSurface>,
    ) -> Self {
        let tree = Tree::new(MctsNode::new_root(board));
        let root_id = tree.root().id();

        Self {
            tree,
            root_id,
            predictor,
            config,
            root_priors,
            next_action: MctsAction::Selection { path: vec![] },
        }
    }

    /// Returns an immutable reference to the underlying search tree.
    pub fn get_tree(&self) -> &Tree<MctsNode<T>> {
        &self.tree
    }

    /// Returns the root node of the search tree.
    pub fn get_root(&self) -> NodeRef<'_, MctsNode<T>> {
        self.tree.root()
    }

    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Returns the node with the given id.
    pub fn get_node(&self, node_id: NodeId) -> Result<NodeRef<'_, MctsNode<T>>> {
        self.tree
            .get(node_id)
            .ok_or(SearchError::UnknownNode(node_id))
    }

    /// Returns the next action to be performed. Useful for debugging and visualization.
    pub fn get_next_mcts_action(&self) -> &MctsAction {
        &self.next_action
    }

    /// Executes a single step of the search (Selection, Expansion, or Backpropagation).
    ///
    /// On error the pending action is left unchanged.
    pub fn execute_action(&mut self) -> Result<()> {
        self.next_action = match self.next_action.clone() {
            MctsAction::Selection { path: _ } => {
                let leaf = self.select_leaf(self.root_id)?;
                let node = self.get_node(leaf)?;
                let data = node.value();
                if data.is_terminal() || data.expanded {
                    MctsAction::Backpropagation {
                        leaf,
                        result: data.outcome.score(),
                    }
                } else {
                    MctsAction::Expansion { leaf }
                }
            }
            MctsAction::Expansion { leaf } => {
                let result = self.evaluate_and_expand(leaf)?;
                MctsAction::Backpropagation { leaf, result }
            }
            MctsAction::Backpropagation { leaf, result } => {
                let path = self.backpropagate(leaf, result)?;
                MctsAction::Selection { path }
            }
        };
        Ok(())
    }

    /// Performs one full simulation (Selection, Expansion, Backpropagation).
    /// Returns the path of nodes, leaf first, that were updated during backpropagation.
    pub fn do_iteration(&mut self) -> Result<Vec<NodeId>> {
        self.execute_action()?;
        while !matches!(self.next_action, MctsAction::Selection { .. }) {
            self.execute_action()?;
        }

        match &self.next_action {
            MctsAction::Selection { path } => Ok(path.clone()),
            _ => Ok(vec![]),
        }
    }

    /// Runs the search for a specified number of simulations.
    pub fn iterate_n_times(&mut self, n: u32) -> Result<()> {
        for iteration in 0..n {
            let path = self.do_iteration()?;
            trace!("simulation {iteration}: backpropagated through {} nodes", path.len());
        }
        Ok(())
    }

    /// Picks the child of `node_id` with the highest interest score. Ties go to the child created
    /// first.
    pub fn choose_child(&self, node_id: NodeId) -> Result<NodeId> {
        let node = self.get_node(node_id)?;
        let mut best: Option<(NodeId, f64)> = None;
        for child in node.children() {
            let score = interest(child, self.config.exploration);
            if best.is_none_or(|(_, max_score)| score > max_score) {
                best = Some((child.id(), score));
            }
        }

        best.map(|(id, _)| id)
            .ok_or(SearchError::EmptyChildSelection)
    }

    /// Descends from `node_id` through the most interesting children until it reaches a node
    /// that is unexpanded or has no children.
    pub fn select_leaf(&self, node_id: NodeId) -> Result<NodeId> {
        let mut current = node_id;
        loop {
            let node = self.get_node(current)?;
            if !node.value().expanded || !node.has_children() {
                return Ok(current);
            }
            current = self.choose_child(current)?;
        }
    }

    /// Creates one child per legal move of `node_id`, each carrying the prior `priors` assigns
    /// to that move's coordinates. Returns the ids of the new children.
    ///
    /// All priors are checked before any child is inserted, so on error the node is unchanged.
    pub fn expand(&mut self, node_id: NodeId, priors: &PriorSurface) -> Result<Vec<NodeId>> {
        let node = self.get_node(node_id)?;
        if node.value().expanded {
            return Err(SearchError::AlreadyExpanded(node_id));
        }

        let board = &node.value().board;
        let all_possible_moves = board.get_available_moves();
        let mut new_mcts_nodes = Vec::with_capacity(all_possible_moves.len());
        for possible_move in all_possible_moves {
            let prior = priors
                .prior(&possible_move)
                .filter(|p| p.is_finite() && *p >= 0.0)
                .ok_or(SearchError::InconsistentPrior {
                    x: possible_move.x,
                    y: possible_move.y,
                })?;
            let next_board = Box::new(board.apply(&possible_move));
            new_mcts_nodes.push(MctsNode::new(next_board, prior, Some(possible_move)));
        }

        let mut node = self
            .tree
            .get_mut(node_id)
            .ok_or(SearchError::UnknownNode(node_id))?;
        let mut new_node_ids = Vec::with_capacity(new_mcts_nodes.len());
        for mcts_node in new_mcts_nodes {
            new_node_ids.push(node.append(mcts_node).id());
        }
        node.value().expanded = true;

        trace!("expanded node {node_id:?} with {} children", new_node_ids.len());
        Ok(new_node_ids)
    }

    /// Evaluates a leaf with the predictor, expands it with the returned priors and returns the
    /// value estimate. The root uses the priors given to the builder when there are any.
    fn evaluate_and_expand(&mut self, node_id: NodeId) -> Result<f64> {
        let node = self
            .tree
            .get(node_id)
            .ok_or(SearchError::UnknownNode(node_id))?;
        let prediction = self.predictor.evaluate(&node.value().board)?;
        if !prediction.value.is_finite() {
            return Err(SearchError::NonFiniteValue(prediction.value));
        }

        let is_root = node_id == self.root_id;
        let priors = match self.root_priors.as_ref().filter(|_| is_root) {
            Some(root_priors) => root_priors.clone(),
            None => prediction.priors,
        };
        self.expand(node_id, &priors)?;
        if is_root {
            self.root_priors = None;
        }
        Ok(prediction.value)
    }

    /// Propagates the result of a simulation from `node_id` up to the root, adding it to the value
    /// and one visit to every node on the way. Returns the updated path, leaf first.
    pub fn backpropagate(&mut self, node_id: NodeId, result: f64) -> Result<Vec<NodeId>> {
        let node = self.get_node(node_id)?;
        let branch: Vec<NodeId> = std::iter::once(node_id)
            .chain(node.ancestors().map(|ancestor| ancestor.id()))
            .collect();

        let negate_per_ply = self.config.negate_per_ply;
        for id in &branch {
            let mut temp_node = self
                .tree
                .get_mut(*id)
                .ok_or(SearchError::UnknownNode(*id))?;
            let mcts_node = temp_node.value();
            let sign = if negate_per_ply {
                mcts_node.perspective()
            } else {
                1.0
            };
            mcts_node.value += result * sign;
            mcts_node.visits += 1;
        }

        Ok(branch)
    }

    /// Returns the child of the root with the most visits. Ties go to the child created first.
    pub fn get_most_visited_child(&self) -> Result<NodeRef<'_, MctsNode<T>>> {
        let mut best: Option<NodeRef<'_, MctsNode<T>>> = None;
        for child in self.get_root().children() {
            if best.is_none_or(|b| child.value().visits > b.value().visits) {
                best = Some(child);
            }
        }
        best.ok_or(SearchError::EmptyChildSelection)
    }

    /// Returns the recommended move: the move leading to the most visited child of the root.
    pub fn pick_best_move(&self) -> Result<Move> {
        self.get_most_visited_child()?
            .value()
            .prev_move
            .ok_or(SearchError::EmptyChildSelection)
    }

    /// Move, accumulated value and visit count of every child of the root.
    pub fn root_summaries(&self) -> Vec<NodeSummary> {
        self.get_root()
            .children()
            .map(|child| child.value().summary())
            .collect()
    }
}

/// Runs `n_simulations` simulations from a fresh root built from `root_state`, expanding the root
/// with `root_priors`, and returns the move leading to the most visited child of the root.
pub fn run_search<T: Board, P: Predictor<T>>(
    root_state: T,
    root_priors: PriorSurface,
    n_simulations: u32,
    predictor: P,
    config: MctsConfig,
) -> Result<Move> {
    let mut mcts = MonteCarloTreeSearch::builder(root_state, predictor)
        .with_config(config)
        .with_root_priors(root_priors)
        .build();
    mcts.iterate_n_times(n_simulations)?;

    if log_enabled!(Level::Debug) {
        let summaries: Vec<String> = mcts
            .root_summaries()
            .iter()
            .map(ToString::to_string)
            .collect();
        debug!(
            "root children after {n_simulations} simulations: [{}]",
            summaries.join("; ")
        );
    }

    mcts.pick_best_move()
}

/// Represents the stages of a simulation.
///
/// This enum is used to manage the state of the search process.
#[derive(Debug, PartialEq, Clone)]
pub enum MctsAction {
    /// **Selection**: Start from the root and follow the most interesting children to a leaf.
    Selection {
        /// The path of nodes updated during the last backpropagation, leaf first.
        path: Vec<NodeId>,
    },
    /// **Expansion**: Evaluate the selected leaf and create its children from the priors.
    Expansion {
        /// The leaf node to be expanded.
        leaf: NodeId,
    },
    /// **Backpropagation**: Update the statistics of the nodes on the path from `leaf` to the root.
    Backpropagation {
        /// The leaf the simulation ended at.
        leaf: NodeId,
        /// The outcome or value estimate to propagate.
        result: f64,
    },
}

impl MctsAction {
    /// Returns the name of the current action as a string.
    pub fn get_name(&self) -> String {
        match self {
            MctsAction::Selection { .. } => "Selection".to_string(),
            MctsAction::Expansion { .. } => "Expansion".to_string(),
            MctsAction::Backpropagation { .. } => "Backpropagation".to_string(),
        }
    }
}
