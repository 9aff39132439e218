use dockjump::{visualize, Action, GameState, IllegalAction, Player};
use tracing::{debug, info, warn};

use crate::recording::GameRecording;

pub enum ReplayResult {
    /// All actions were applied.
    Completed { state: GameState },
    /// The action at `action_idx` was rejected.
    Rejected {
        state: GameState,
        action_idx: usize,
        action: Action,
        err: IllegalAction,
    },
}

/// Applies the recorded actions to a new game, stopping at the first illegal one.
pub fn replay(recording: &GameRecording) -> ReplayResult {
    let mut state = GameState::new();
    for (action_idx, &action) in recording.actions.iter().enumerate() {
        match state.apply(action) {
            Ok(next) => {
                debug!(action_idx, %action, "applied");
                state = next;
            }
            Err(err) => {
                return ReplayResult::Rejected {
                    state,
                    action_idx,
                    action,
                    err,
                }
            }
        }
    }
    ReplayResult::Completed { state }
}

/// Logs how a replay went, and whether it agrees with the recorded result.
///
/// Returns `true` if every action was legal and the result matches.
pub fn report_replay(recording: &GameRecording, result: &ReplayResult) -> bool {
    match result {
        ReplayResult::Completed { state } => {
            info!("\n{}", visualize(state));
            let scores = [state.score(Player::A), state.score(Player::B)];
            if scores != recording.scores || state.outcome() != recording.outcome {
                warn!(
                    ?scores,
                    recorded_scores = ?recording.scores,
                    "Replay does not match the recorded result"
                );
                return false;
            }
            true
        }
        ReplayResult::Rejected {
            state,
            action_idx,
            action,
            err,
        } => {
            info!(action_idx, %action, player = %state.current_player(), "Illegal action");
            let mut err_dyn = err as &dyn std::error::Error;
            while let Some(src_err) = err_dyn.source() {
                info!("{}", err_dyn);
                err_dyn = src_err;
            }
            info!("{}", err_dyn);
            info!("\n{}", visualize(state));
            false
        }
    }
}
