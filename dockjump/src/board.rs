use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{tables, InvalidBoard, Piece, PieceKind, Player, Square, SquareSet};

/// A single occupied square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub square: Square,
    pub piece: Piece,
}

/// The pieces on the playable rows.
///
/// A sparse representation: one entry per occupied square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Placement>", into = "Vec<Placement>")]
pub struct Board {
    /// Sorted by square (row-major). There is at most one entry per square.
    ///
    /// The `occupied` field is derived from this list.
    pieces: Vec<(Square, Piece)>,
    occupied: SquareSet,
}

impl Board {
    /// Creates a board from a list of placements.
    ///
    /// Fails if a square is used twice or is not playable.
    pub fn new(placements: &[Placement]) -> Result<Self, InvalidBoard> {
        let mut board = Board::empty();
        for &Placement { square, piece } in placements {
            if !square.is_playable() {
                return Err(InvalidBoard::NotPlayable { square });
            }
            if board.is_occupied(square) {
                return Err(InvalidBoard::DuplicateSquare { square });
            }
            board.insert(square, piece);
        }
        Ok(board)
    }

    pub fn empty() -> Self {
        Self {
            pieces: Vec::new(),
            occupied: SquareSet::new(),
        }
    }

    /// The starting position of every game.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for (square, piece) in tables::initial_layout() {
            board.insert(square, piece);
        }
        board
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        if !self.occupied.contains(square) {
            return None;
        }
        self.position(square).ok().map(|idx| self.pieces[idx].1)
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.occupied.contains(square)
    }

    /// All occupied squares.
    pub fn occupied(&self) -> SquareSet {
        self.occupied
    }

    /// Puts a piece on an empty playable square.
    ///
    /// Panics if the square is occupied, since the rules never allow that.
    pub fn insert(&mut self, square: Square, piece: Piece) {
        assert!(square.is_playable(), "{} is not a playable square", square);
        match self.position(square) {
            Ok(_) => panic!("{} is already occupied", square),
            Err(idx) => self.pieces.insert(idx, (square, piece)),
        }
        self.occupied = self.occupied.insert(square);
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let idx = self.position(square).ok()?;
        self.occupied = self.occupied.remove(square);
        Some(self.pieces.remove(idx).1)
    }

    /// Moves the piece on `from` to the empty square `to`.
    ///
    /// Panics if there is no piece on `from`.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Piece {
        let piece = self
            .remove(from)
            .unwrap_or_else(|| panic!("no piece on {}", from));
        self.insert(to, piece);
        piece
    }

    /// How many pieces of `player` are on the board.
    pub fn count(&self, player: Player) -> usize {
        self.pieces.iter().filter(|(_, p)| p.owner == player).count()
    }

    /// How many pieces of each kind `player` has on the board, in the order
    /// of [`PieceKind::ALL`].
    pub fn count_by_kind(&self, player: Player) -> [usize; 4] {
        let mut counts = [0; 4];
        for (_, piece) in self.pieces.iter().filter(|(_, p)| p.owner == player) {
            counts[piece.kind as usize] += 1;
        }
        counts
    }

    pub fn squares_of(&self, player: Player) -> impl Iterator<Item = Square> + '_ {
        self.pieces
            .iter()
            .filter(move |(_, p)| p.owner == player)
            .map(|&(square, _)| square)
    }

    pub fn to_placements(&self) -> Vec<Placement> {
        self.pieces
            .iter()
            .map(|&(square, piece)| Placement { square, piece })
            .collect()
    }

    fn position(&self, square: Square) -> Result<usize, usize> {
        self.pieces.binary_search_by_key(&square, |&(s, _)| s)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Deref for Board {
    type Target = [(Square, Piece)];

    fn deref(&self) -> &Self::Target {
        &self.pieces
    }
}

impl TryFrom<Vec<Placement>> for Board {
    type Error = InvalidBoard;

    fn try_from(placements: Vec<Placement>) -> Result<Self, Self::Error> {
        Board::new(&placements)
    }
}

impl From<Board> for Vec<Placement> {
    fn from(board: Board) -> Self {
        board.to_placements()
    }
}

/// Displays how many pieces of each kind a player has left on the board.
pub struct PieceCounts<'a>(pub &'a Board, pub Player);

impl std::fmt::Display for PieceCounts<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts = self.0.count_by_kind(self.1);
        let parts: Vec<String> = PieceKind::ALL
            .iter()
            .zip(counts)
            .map(|(kind, n)| format!("{} {}", n, kind))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
