use quickcheck::{Arbitrary, Gen};

use crate::square::KING_OFFSETS;
use crate::{Board, JumpChain, Piece, PieceKind, Player, Square};

/// A board with pieces of both players on random playable squares.
#[derive(Clone, Debug)]
pub struct ArbitraryBoard {
    pub board: Board,
}

impl Arbitrary for ArbitraryBoard {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut board = Board::empty();
        let num_pieces = usize::arbitrary(g) % 33;
        for _ in 0..num_pieces {
            let square = playable_square(g);
            // Collisions just make the board a bit emptier
            if !board.is_occupied(square) {
                board.insert(square, Piece::arbitrary(g));
            }
        }
        Self { board }
    }
}

/// A chain of geometrically possible jumps that never repeats a square or pivot.
///
/// The pivots are not necessarily occupied on any particular board, and the
/// directions do not follow any particular piece's rule.
#[derive(Clone, Debug)]
pub struct ArbitraryChain {
    pub chain: JumpChain,
}

impl Arbitrary for ArbitraryChain {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut chain = JumpChain::new();
        let mut at = playable_square(g);
        let attempts = u8::arbitrary(g) % 12;
        for _ in 0..attempts {
            let &(d_col, d_row) = g.choose(&KING_OFFSETS).unwrap();
            let (Some(over), Some(to)) = (
                at.offset(d_col, d_row),
                at.offset(2 * d_col, 2 * d_row),
            ) else {
                continue;
            };
            if !to.is_playable() || chain.repeats(over, to) {
                continue;
            }
            chain.record_jump(at, over, to);
            at = to;
        }
        Self { chain }
    }
}

fn playable_square(g: &mut Gen) -> Square {
    let col = (u8::arbitrary(g) % 8) as i8;
    let row = (u8::arbitrary(g) % 8) as i8 + 1;
    Square::new(col, row).unwrap()
}

impl Arbitrary for Square {
    fn arbitrary(g: &mut Gen) -> Self {
        let col = (u8::arbitrary(g) % 8) as i8;
        let row = (u8::arbitrary(g) % 10) as i8;
        Square::new(col, row).unwrap()
    }
}

impl Arbitrary for PieceKind {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&PieceKind::ALL).unwrap()
    }
}

impl Arbitrary for Player {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Player::BOTH).unwrap()
    }
}

impl Arbitrary for Piece {
    fn arbitrary(g: &mut Gen) -> Self {
        Piece::new(PieceKind::arbitrary(g), Player::arbitrary(g))
    }
}
