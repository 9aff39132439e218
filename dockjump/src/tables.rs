//! Static data: the starting layout and which squares give access to each dock.

use crate::Direction::{Diagonal, Straight};
use crate::PieceKind::{Butter, Cheese, Egg, Tulip};
use crate::Player::{A, B};
use crate::{Direction, Piece, Square};

pub const PIECES_PER_PLAYER: usize = 16;
pub const WAREHOUSE_CAPACITY: usize = 4;
/// A chain with at least this many jumps earns a bonus turn.
pub const BONUS_TURN_JUMPS: u8 = 4;

const fn sq(col: i8, row: i8) -> Square {
    Square::new_unchecked(col, row)
}

const fn piece(kind: crate::PieceKind, owner: crate::Player) -> Piece {
    Piece::new(kind, owner)
}

/// The kinds on a back row, from column A to H. Both players use the same
/// back row and the same front row.
const BACK_ROW: [crate::PieceKind; 8] = [Butter, Cheese, Egg, Tulip, Tulip, Egg, Cheese, Butter];
const FRONT_ROW: [crate::PieceKind; 8] = [Egg, Tulip, Butter, Cheese, Cheese, Butter, Tulip, Egg];

/// The 32 pieces at the start of a game.
pub fn initial_layout() -> impl Iterator<Item = (Square, Piece)> {
    let rows = [
        (1, BACK_ROW, A),
        (2, FRONT_ROW, A),
        (7, FRONT_ROW, B),
        (8, BACK_ROW, B),
    ];
    rows.into_iter().flat_map(|(row, kinds, owner)| {
        kinds
            .into_iter()
            .enumerate()
            .map(move |(col, kind)| (sq(col as i8, row), piece(kind, owner)))
    })
}

/// A square from which a piece slides straight into a dock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlideAccess {
    pub from: Square,
    pub direction: Direction,
}

/// A square from which a piece jumps into a dock over `over`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JumpAccess {
    pub from: Square,
    pub over: Square,
    pub direction: Direction,
}

#[derive(Copy, Clone, Debug)]
pub struct DockAccess {
    pub slides: &'static [SlideAccess],
    pub jumps: &'static [JumpAccess],
}

const fn slide(col: i8, row: i8, direction: Direction) -> SlideAccess {
    SlideAccess {
        from: sq(col, row),
        direction,
    }
}

const fn jump(from: (i8, i8), over: (i8, i8), direction: Direction) -> JumpAccess {
    JumpAccess {
        from: sq(from.0, from.1),
        over: sq(over.0, over.1),
        direction,
    }
}

/// Access to each dock, indexed by [`Dock::index()`](crate::Dock::index):
/// player A's docks A9 to H9 first, then player B's docks A0 to H0.
pub static DOCK_ACCESS: [DockAccess; 16] = [
    // A9
    DockAccess {
        slides: &[slide(0, 8, Straight), slide(1, 8, Diagonal)],
        jumps: &[jump((0, 7), (0, 8), Straight), jump((2, 7), (1, 8), Diagonal)],
    },
    // B9
    DockAccess {
        slides: &[slide(0, 8, Diagonal), slide(1, 8, Straight), slide(2, 8, Diagonal)],
        jumps: &[jump((1, 7), (1, 8), Straight), jump((3, 7), (2, 8), Diagonal)],
    },
    // C9
    DockAccess {
        slides: &[slide(1, 8, Diagonal), slide(2, 8, Straight), slide(3, 8, Diagonal)],
        jumps: &[
            jump((2, 7), (2, 8), Straight),
            jump((0, 7), (1, 8), Diagonal),
            jump((4, 7), (3, 8), Diagonal),
        ],
    },
    // D9
    DockAccess {
        slides: &[slide(2, 8, Diagonal), slide(3, 8, Straight), slide(4, 8, Diagonal)],
        jumps: &[
            jump((3, 7), (3, 8), Straight),
            jump((1, 7), (2, 8), Diagonal),
            jump((5, 7), (4, 8), Diagonal),
        ],
    },
    // E9
    DockAccess {
        slides: &[slide(3, 8, Diagonal), slide(4, 8, Straight), slide(5, 8, Diagonal)],
        jumps: &[
            jump((4, 7), (4, 8), Straight),
            jump((2, 7), (3, 8), Diagonal),
            jump((6, 7), (5, 8), Diagonal),
        ],
    },
    // F9
    DockAccess {
        slides: &[slide(4, 8, Diagonal), slide(5, 8, Straight), slide(6, 8, Diagonal)],
        jumps: &[
            jump((5, 7), (5, 8), Straight),
            jump((3, 7), (4, 8), Diagonal),
            jump((7, 7), (6, 8), Diagonal),
        ],
    },
    // G9
    DockAccess {
        slides: &[slide(5, 8, Diagonal), slide(6, 8, Straight), slide(7, 8, Diagonal)],
        jumps: &[jump((6, 7), (6, 8), Straight), jump((4, 7), (5, 8), Diagonal)],
    },
    // H9
    DockAccess {
        slides: &[slide(6, 8, Diagonal), slide(7, 8, Straight)],
        jumps: &[jump((7, 7), (7, 8), Straight), jump((5, 7), (6, 8), Diagonal)],
    },
    // A0
    DockAccess {
        slides: &[slide(0, 1, Straight), slide(1, 1, Diagonal)],
        jumps: &[jump((0, 2), (0, 1), Straight), jump((2, 2), (1, 1), Diagonal)],
    },
    // B0
    DockAccess {
        slides: &[slide(0, 1, Diagonal), slide(1, 1, Straight), slide(2, 1, Diagonal)],
        jumps: &[jump((1, 2), (1, 1), Straight), jump((3, 2), (2, 1), Diagonal)],
    },
    // C0
    DockAccess {
        slides: &[slide(1, 1, Diagonal), slide(2, 1, Straight), slide(3, 1, Diagonal)],
        jumps: &[
            jump((2, 2), (2, 1), Straight),
            jump((0, 2), (1, 1), Diagonal),
            jump((4, 2), (3, 1), Diagonal),
        ],
    },
    // D0
    DockAccess {
        slides: &[slide(2, 1, Diagonal), slide(3, 1, Straight), slide(4, 1, Diagonal)],
        jumps: &[
            jump((3, 2), (3, 1), Straight),
            jump((1, 2), (2, 1), Diagonal),
            jump((5, 2), (4, 1), Diagonal),
        ],
    },
    // E0
    DockAccess {
        slides: &[slide(3, 1, Diagonal), slide(4, 1, Straight), slide(5, 1, Diagonal)],
        jumps: &[
            jump((4, 2), (4, 1), Straight),
            jump((2, 2), (3, 1), Diagonal),
            jump((6, 2), (5, 1), Diagonal),
        ],
    },
    // F0
    DockAccess {
        slides: &[slide(4, 1, Diagonal), slide(5, 1, Straight), slide(6, 1, Diagonal)],
        jumps: &[
            jump((5, 2), (5, 1), Straight),
            jump((3, 2), (4, 1), Diagonal),
            jump((7, 2), (6, 1), Diagonal),
        ],
    },
    // G0
    DockAccess {
        slides: &[slide(5, 1, Diagonal), slide(6, 1, Straight), slide(7, 1, Diagonal)],
        jumps: &[jump((6, 2), (6, 1), Straight), jump((4, 2), (5, 1), Diagonal)],
    },
    // H0
    DockAccess {
        slides: &[slide(6, 1, Diagonal), slide(7, 1, Straight)],
        jumps: &[jump((7, 2), (7, 1), Straight), jump((5, 2), (6, 1), Diagonal)],
    },
];
