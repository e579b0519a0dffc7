use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming, default_format, detailed_format,
};
use log::info;
use prior_mcts::board::{Board, GameOutcome};
use prior_mcts::boards::tic_tac_toe::TicTacToeBoard;
use prior_mcts::config::MctsConfig;
use prior_mcts::mcts::MonteCarloTreeSearch;
use prior_mcts::predictor::{PriorSurface, RolloutPredictor};
use prior_mcts::random::StandardRandomGenerator;
use std::error::Error;

const SIMULATIONS_PER_MOVE: u32 = 2000;

fn main() -> Result<(), Box<dyn Error>> {
    // Console at info, detailed rotating file at debug
    let _logger = Logger::try_with_env_or_str("debug")?
        .log_to_file(FileSpec::default().directory("logs"))
        .duplicate_to_stderr(Duplicate::Info)
        .format_for_stderr(default_format)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(1_000_000_000),
            Naming::Numbers,
            Cleanup::KeepLogFiles(1),
        )
        .start()?;

    // Play a whole game, both sides searching with random playouts as the value estimate
    let mut board = TicTacToeBoard::default();
    while board.get_outcome() == GameOutcome::InProgress {
        let root_priors = PriorSurface::uniform_over_legal(&board);
        let mut mcts = MonteCarloTreeSearch::builder(
            board.clone(),
            RolloutPredictor::new(StandardRandomGenerator),
        )
        .with_config(MctsConfig::default().with_negate_per_ply(true))
        .with_root_priors(root_priors)
        .build();

        mcts.iterate_n_times(SIMULATIONS_PER_MOVE)?;

        for summary in mcts.root_summaries() {
            info!("{summary}");
        }

        let best_move = mcts.pick_best_move()?;
        info!("{} plays {best_move}", board.current_player());
        board.perform_move(&best_move);
        println!("{board}");
    }

    println!("Outcome: {:?}", board.get_outcome());
    Ok(())
}
