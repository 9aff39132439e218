use crate::square::{NUM_COLS, NUM_ROWS};
use crate::{Dock, GameState, Phase, Player, Square};

/// Draws the board with the docks above and below it.
///
/// Pieces are shown by [`PieceKind::symbol()`](crate::PieceKind::symbol), docks
/// by the number of goods they hold.
pub fn visualize(state: &GameState) -> String {
    let mut result = String::from("     ");
    for col in 0..NUM_COLS {
        result.push((b'A' + col as u8) as char);
        result.push(' ');
    }
    result += "\n    ╭";
    for _ in 0..NUM_COLS {
        result += "──";
    }
    result += "╮\n";

    for row in (0..NUM_ROWS).rev() {
        result += &format!("{:>3} │", row);
        for col in 0..NUM_COLS {
            let square = Square::new_unchecked(col, row);
            let cell = if square.is_playable() {
                state
                    .board()
                    .get(square)
                    .map_or('·', |piece| piece.kind.symbol(piece.owner))
            } else {
                dock_cell(state, square)
            };
            result.push(cell);
            result.push(' ');
        }
        result += "│\n";
    }

    result += "    ╰";
    for _ in 0..NUM_COLS {
        result += "──";
    }
    result += "╯\n";
    result += &format!(
        "    A: {} points, B: {} points\n",
        state.score(Player::A),
        state.score(Player::B)
    );
    result += &match state.phase() {
        Phase::Idle if state.bonus_granted() => {
            format!("    {} to move (bonus turn)", state.current_player())
        }
        Phase::Idle => format!("    {} to move", state.current_player()),
        Phase::ChainActive { at } => format!(
            "    {} is jumping with {} ({} jumps)",
            state.current_player(),
            at,
            state.chain().jumps()
        ),
        Phase::Finished => match state.outcome() {
            Some(outcome) => format!("    game over, {}", outcome),
            None => String::from("    game over"),
        },
    };
    result
}

fn dock_cell(state: &GameState, square: Square) -> char {
    match Dock::try_from(square) {
        Ok(dock) => match state.warehouse(dock).goods().len() {
            0 if dock.is_scoring() => '□',
            0 => '·',
            n => char::from_digit(n as u32, 10).unwrap_or('?'),
        },
        Err(_) => ' ',
    }
}
