//! Search configuration parameters.

/// Default exploration constant `κ` of the interest score.
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Configuration for the tree search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    /// Exploration constant `κ` weighting the prior-driven term of the interest score.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration: f64,

    /// Whether backpropagated outcomes are negated on alternating plies.
    ///
    /// Outcomes always arrive from the first mover's point of view. When `false`, the same
    /// outcome is added at every level, matching a single fixed-perspective value head. When
    /// `true`, every node accumulates the outcome from the point of view of the player who made
    /// the move into it, i.e. the player choosing among its siblings.
    pub negate_per_ply: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: DEFAULT_EXPLORATION,
            negate_per_ply: false,
        }
    }
}

impl MctsConfig {
    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Builder pattern: set the per-ply sign convention.
    pub fn with_negate_per_ply(mut self, negate_per_ply: bool) -> Self {
        self.negate_per_ply = negate_per_ply;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert!((config.exploration - 2f64.sqrt()).abs() < 1e-12);
        assert!(!config.negate_per_ply);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_exploration(1.25)
            .with_negate_per_ply(true);

        assert!((config.exploration - 1.25).abs() < 1e-12);
        assert!(config.negate_per_ply);
    }
}
