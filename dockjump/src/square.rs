use std::iter::FusedIterator;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bitset::bitset_type;
use crate::InvalidNotation;

pub const NUM_COLS: i8 = 8;
pub const NUM_ROWS: i8 = 10;

/// The lowest and highest playable rows. Rows 0 and 9 hold the docks.
pub const FIRST_PLAYABLE_ROW: i8 = 1;
pub const LAST_PLAYABLE_ROW: i8 = 8;

const COLUMN_LETTERS: [char; NUM_COLS as usize] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// The eight king-adjacent offsets, as `(col, row)` deltas.
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A square of the 8 × 10 grid, written as a column letter followed by a row
/// digit, e.g. `C3`.
///
/// The row is stored as the digit of the notation, so `A0` is `(0, 0)` and
/// `H9` is `(7, 9)`. The derived ordering is row-major.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    row: i8,
    col: i8,
}

impl Square {
    pub const fn new(col: i8, row: i8) -> Option<Self> {
        if col >= 0 && col < NUM_COLS && row >= 0 && row < NUM_ROWS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// For the static tables, where coordinates are known to be valid.
    pub(crate) const fn new_unchecked(col: i8, row: i8) -> Self {
        debug_assert!(col >= 0 && col < NUM_COLS && row >= 0 && row < NUM_ROWS);
        Self { row, col }
    }

    pub fn col(self) -> i8 {
        self.col
    }

    pub fn row(self) -> i8 {
        self.row
    }

    /// A number in `0..80`, unique per square.
    pub fn index(self) -> u8 {
        (self.row * NUM_COLS + self.col) as u8
    }

    pub(crate) fn from_index(idx: u8) -> Self {
        debug_assert!(idx < (NUM_ROWS * NUM_COLS) as u8);
        let idx = idx as i8;
        Self {
            row: idx / NUM_COLS,
            col: idx % NUM_COLS,
        }
    }

    /// Whether pieces can stand on this square, i.e. it is on rows 1 to 8.
    pub fn is_playable(self) -> bool {
        (FIRST_PLAYABLE_ROW..=LAST_PLAYABLE_ROW).contains(&self.row)
    }

    pub fn offset(self, d_col: i8, d_row: i8) -> Option<Self> {
        Self::new(self.col + d_col, self.row + d_row)
    }

    /// The king-adjacent squares that are on the grid, including dock-row squares.
    pub fn neighbours(self) -> impl Iterator<Item = Square> {
        KING_OFFSETS
            .into_iter()
            .filter_map(move |(d_col, d_row)| self.offset(d_col, d_row))
    }

    /// Iterates over all 80 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..(NUM_ROWS * NUM_COLS) as u8).map(Square::from_index)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", COLUMN_LETTERS[self.col as usize], self.row)
    }
}

impl FromStr for Square {
    type Err = InvalidNotation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(col_char), Some(row_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(InvalidNotation::WrongLength {
                notation: String::from(s),
            });
        };
        let col = COLUMN_LETTERS
            .iter()
            .position(|&c| c == col_char)
            .ok_or(InvalidNotation::InvalidColumn { column: col_char })?;
        let row = row_char
            .to_digit(10)
            .ok_or(InvalidNotation::InvalidRow { row: row_char })?;
        // Both are in range: 8 letters, and a single decimal digit
        Ok(Square::new_unchecked(col as i8, row as i8))
    }
}

impl TryFrom<String> for Square {
    type Error = InvalidNotation;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> String {
        square.to_string()
    }
}

/// Shorthand for creating squares from their notation.
///
/// This macro is just calling the [`FromStr`] instance of [`Square`].
/// ```
/// # use dockjump::{square, Square};
/// assert_eq!(square!("C3"), Square::new(2, 3).unwrap());
/// ```
#[macro_export]
macro_rules! square {
    ($s:literal) => {
        <$crate::Square as std::str::FromStr>::from_str($s)
            .expect("Invalid square given to square! macro")
    };
}
#[allow(unused_imports)]
pub(crate) use square;

/// The direction of a move or jump.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Along a row or column.
    Straight,
    Diagonal,
}

impl Direction {
    /// The direction of the line from `from` to `to`, if they lie on one.
    ///
    /// Returns `None` for identical squares and for squares that are on
    /// neither a common row, column, nor diagonal.
    pub fn between(from: Square, to: Square) -> Option<Direction> {
        let d_row = (to.row - from.row).abs();
        let d_col = (to.col - from.col).abs();
        if (d_row == 0) != (d_col == 0) {
            Some(Direction::Straight)
        } else if d_row == d_col && d_row > 0 {
            Some(Direction::Diagonal)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Straight => write!(f, "straight"),
            Direction::Diagonal => write!(f, "diagonal"),
        }
    }
}

/// The pivot of a jump from `from` to `to`.
///
/// Defined only when the two squares are exactly two apart on a straight or
/// diagonal line.
pub fn square_between(from: Square, to: Square) -> Option<Square> {
    let d_row = to.row - from.row;
    let d_col = to.col - from.col;
    let two_apart = matches!((d_col.abs(), d_row.abs()), (2, 0) | (0, 2) | (2, 2));
    two_apart.then(|| Square::new_unchecked(from.col + d_col / 2, from.row + d_row / 2))
}

/// A compact set of [`Square`]s.
///
/// Like the other sets in this crate this is an immutable [`Copy`] type, so
/// `insert` and `remove` return a new set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u128", into = "u128")]
pub struct SquareSet {
    // Only the low 80 bits are used.
    bits: u128,
}

bitset_type!(SquareSet, Square);

impl SquareSet {
    const ALL_BITS: u128 = (1u128 << (NUM_COLS as u32 * NUM_ROWS as u32)) - 1;

    fn bit(square: Square) -> u128 {
        1u128 << square.index()
    }
}

/// Bits beyond the 80 squares are dropped.
impl From<u128> for SquareSet {
    fn from(bits: u128) -> Self {
        Self {
            bits: bits & Self::ALL_BITS,
        }
    }
}

impl From<SquareSet> for u128 {
    fn from(set: SquareSet) -> u128 {
        set.bits
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;

    type IntoIter = SquareSetIter;

    fn into_iter(self) -> Self::IntoIter {
        SquareSetIter { bits: self.bits }
    }
}

/// Iterator for a [`SquareSet`] that returns squares in row-major order.
#[derive(Clone, Copy, Debug)]
pub struct SquareSetIter {
    bits: u128,
}

impl Iterator for SquareSetIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            None
        } else {
            // At most 127, so this fits
            let idx = self.bits.trailing_zeros() as u8;
            self.bits ^= 1u128 << idx;
            Some(Square::from_index(idx))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bits.count_ones() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for SquareSetIter {}

impl FusedIterator for SquareSetIter {}
