use std::iter::FusedIterator;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bitset::bitset_type;
use crate::tables::DOCK_ACCESS;
use crate::{Board, InvalidNotation, JumpChain, PieceKind, Player, Square};

/// One of the 16 docks: player A's on row 9, player B's on row 0.
///
/// The docks in columns B, C, F and G are scoring warehouses. The ones in
/// columns A, D, E and H are garden squares: a piece that reaches them leaves
/// the game without scoring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dock {
    square: Square,
}

impl Dock {
    pub fn new(col: i8, owner: Player) -> Option<Self> {
        Square::new(col, owner.dock_row()).map(|square| Self { square })
    }

    pub fn square(self) -> Square {
        self.square
    }

    pub fn owner(self) -> Player {
        if self.square.row() == Player::A.dock_row() {
            Player::A
        } else {
            Player::B
        }
    }

    pub fn is_scoring(self) -> bool {
        matches!(self.square.col(), 1 | 2 | 5 | 6)
    }

    /// A number in `0..16`: player A's docks from column A to H, then player B's.
    pub fn index(self) -> usize {
        self.owner().idx() * 8 + self.square.col() as usize
    }

    fn from_index(idx: u8) -> Self {
        debug_assert!(idx < 16);
        let owner = if idx < 8 { Player::A } else { Player::B };
        Self {
            square: Square::new_unchecked((idx % 8) as i8, owner.dock_row()),
        }
    }

    /// All docks, in the order of [`Self::index()`].
    pub fn all() -> impl Iterator<Item = Dock> {
        (0..16).map(Dock::from_index)
    }

    pub fn all_of(player: Player) -> impl Iterator<Item = Dock> {
        (0..8).filter_map(move |col| Dock::new(col, player))
    }
}

impl TryFrom<Square> for Dock {
    type Error = InvalidNotation;

    fn try_from(square: Square) -> Result<Self, Self::Error> {
        if square.row() == Player::A.dock_row() || square.row() == Player::B.dock_row() {
            Ok(Self { square })
        } else {
            Err(InvalidNotation::NotADock { square })
        }
    }
}

impl std::fmt::Display for Dock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.square)
    }
}

impl FromStr for Dock {
    type Err = InvalidNotation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dock::try_from(s.parse::<Square>()?)
    }
}

impl TryFrom<String> for Dock {
    type Error = InvalidNotation;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Dock> for String {
    fn from(dock: Dock) -> String {
        dock.to_string()
    }
}

/// A compact set of [`Dock`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DockSet {
    bits: u16,
}

bitset_type!(DockSet, Dock);

impl DockSet {
    fn bit(dock: Dock) -> u16 {
        1u16 << dock.index()
    }
}

impl IntoIterator for DockSet {
    type Item = Dock;

    type IntoIter = DockSetIter;

    fn into_iter(self) -> Self::IntoIter {
        DockSetIter { bits: self.bits }
    }
}

/// Iterator for a [`DockSet`], in the order of [`Dock::index()`].
#[derive(Clone, Copy, Debug)]
pub struct DockSetIter {
    bits: u16,
}

impl Iterator for DockSetIter {
    type Item = Dock;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            None
        } else {
            let idx = self.bits.trailing_zeros() as u8;
            self.bits ^= 1u16 << idx;
            Some(Dock::from_index(idx))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bits.count_ones() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for DockSetIter {}

impl FusedIterator for DockSetIter {}

/// Can a piece of `player` on `from` slide into `dock`? Every kind can.
pub fn can_slide_to_dock(from: Square, dock: Dock, player: Player) -> bool {
    dock.owner() == player
        && DOCK_ACCESS[dock.index()]
            .slides
            .iter()
            .any(|access| access.from == from)
}

/// Can a piece of `kind` and `player` on `from` jump into `dock`?
///
/// Returns the square jumped over. The jump needs a piece on that square,
/// and its direction must fit the kind's jump rule given the chain so far.
pub fn can_jump_to_dock(
    from: Square,
    dock: Dock,
    kind: PieceKind,
    player: Player,
    board: &Board,
    chain: &JumpChain,
) -> Option<Square> {
    if dock.owner() != player {
        return None;
    }
    DOCK_ACCESS[dock.index()]
        .jumps
        .iter()
        .filter(|access| access.from == from)
        .find(|access| {
            board.is_occupied(access.over) && kind.may_jump(access.direction, chain.direction())
        })
        .map(|access| access.over)
}

/// The docks the piece of `kind` and `player` on `from` can reach in one move.
///
/// During a chain only jumps count, since a slide would be a second move.
/// Whether the docks have room left is not considered here.
pub fn valid_docks_for_piece(
    from: Square,
    kind: PieceKind,
    player: Player,
    board: &Board,
    chain: &JumpChain,
) -> DockSet {
    Dock::all_of(player)
        .filter(|&dock| {
            (chain.is_empty() && can_slide_to_dock(from, dock, player))
                || can_jump_to_dock(from, dock, kind, player, board, chain).is_some()
        })
        .collect()
}
