use dockjump::tables::WAREHOUSE_CAPACITY;
use dockjump::{
    pieces_conserved, visualize, Dock, GameState, Outcome, Phase, PieceCounts, Player,
};
use rand::seq::SliceRandom;
use tracing::{debug, trace};

use crate::Config;

pub enum GameResult {
    Finished(Outcome),
    /// The current player had no legal action left.
    Stalled { player: Player },
    /// The game was cut off after `Config::max_actions` actions.
    TooLong,
}

/// Plays one game in which both players pick uniformly random legal actions.
///
/// Returns an error on I/O failure or when the engine breaks one of its own
/// invariants.
pub fn play_game(config: &mut Config) -> anyhow::Result<GameResult> {
    let mut state = GameState::new();
    let mut num_actions = 0;
    let result = loop {
        if let Some(outcome) = state.outcome() {
            break GameResult::Finished(outcome);
        }
        if num_actions >= config.max_actions {
            break GameResult::TooLong;
        }
        let actions = state.legal_actions();
        let Some(&action) = actions.choose(&mut config.rng) else {
            break GameResult::Stalled {
                player: state.current_player(),
            };
        };
        trace!(player = %state.current_player(), %action);
        state = state.apply(action)?;
        num_actions += 1;
        if let Some(recorder) = &mut config.recorder {
            recorder.store_action(action);
        }
        check_invariants(&state)?;
    };

    debug!(
        num_actions,
        remaining_a = %PieceCounts(state.board(), Player::A),
        remaining_b = %PieceCounts(state.board(), Player::B),
        "\n{}",
        visualize(&state)
    );
    if let Some(recorder) = &mut config.recorder {
        let path = recorder.write_game_recording(&state)?;
        debug!(path = %path.display(), "recorded game");
    }
    Ok(result)
}

fn check_invariants(state: &GameState) -> anyhow::Result<()> {
    if !pieces_conserved(state) {
        anyhow::bail!("Pieces were lost or duplicated:\n{}", visualize(state));
    }
    for player in Player::BOTH {
        let warehouse_total: u32 = state.warehouses_of(player).iter().map(|w| w.score()).sum();
        if warehouse_total != state.score(player) {
            anyhow::bail!(
                "Score of player {} is {}, but their warehouses hold {} points",
                player,
                state.score(player),
                warehouse_total
            );
        }
    }
    if Dock::all().any(|dock| state.warehouse(dock).goods().len() > WAREHOUSE_CAPACITY) {
        anyhow::bail!("A warehouse overflowed:\n{}", visualize(state));
    }
    match state.phase() {
        Phase::ChainActive { at } if state.chain().current_square() != Some(at) => {
            anyhow::bail!(
                "The chain is at {:?}, but the phase says {}",
                state.chain().current_square(),
                at
            )
        }
        Phase::Idle | Phase::Finished if !state.chain().is_empty() => {
            anyhow::bail!("A chain outlived its turn")
        }
        _ => Ok(()),
    }
}
