use crate::square::KING_OFFSETS;
use crate::{Board, Direction, JumpChain, PieceKind, Square, SquareSet};

/// All squares the piece of `kind` on `from` may move to.
///
/// Slides are only possible at the start of a turn. During a chain only the
/// jumps of [`jump_continuations()`] remain.
pub fn legal_destinations(
    from: Square,
    kind: PieceKind,
    board: &Board,
    chain: &JumpChain,
) -> SquareSet {
    let jumps = jump_continuations(from, kind, board, chain);
    if chain.is_empty() {
        jumps | slide_destinations(from, board)
    } else {
        jumps
    }
}

/// The empty playable squares adjacent to `from`. Every kind slides in every direction.
pub fn slide_destinations(from: Square, board: &Board) -> SquareSet {
    from.neighbours()
        .filter(|&to| to.is_playable() && !board.is_occupied(to))
        .collect()
}

/// The landing squares of all jumps the piece of `kind` on `from` may make.
///
/// A jump goes over an occupied adjacent square (of either player) onto the
/// empty playable square behind it. The direction must satisfy the kind's
/// [`JumpRule`](crate::JumpRule) given the chain so far, and a jump may not go
/// over a piece already jumped this chain, nor land on a square already
/// visited this chain.
pub fn jump_continuations(
    from: Square,
    kind: PieceKind,
    board: &Board,
    chain: &JumpChain,
) -> SquareSet {
    let mut jumps = SquareSet::new();
    for (d_col, d_row) in KING_OFFSETS {
        let direction = if d_col == 0 || d_row == 0 {
            Direction::Straight
        } else {
            Direction::Diagonal
        };
        if !kind.may_jump(direction, chain.direction()) {
            continue;
        }
        let (Some(over), Some(to)) = (
            from.offset(d_col, d_row),
            from.offset(2 * d_col, 2 * d_row),
        ) else {
            continue;
        };
        if !board.is_occupied(over) || !to.is_playable() || board.is_occupied(to) {
            continue;
        }
        if chain.repeats(over, to) {
            continue;
        }
        jumps = jumps.insert(to);
    }
    jumps
}
