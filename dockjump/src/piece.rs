use serde::{Deserialize, Serialize};

use crate::Direction;

/// One of the two players.
///
/// Player A starts on rows 1 and 2 and loads into the docks on row 9,
/// player B starts on rows 7 and 8 and loads into the docks on row 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    A,
    B,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::A, Player::B];

    pub fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// `0` for A and `1` for B, for indexing per-player arrays.
    pub fn idx(self) -> usize {
        self as usize
    }

    /// The row of this player's docks.
    pub fn dock_row(self) -> i8 {
        match self {
            Player::A => 9,
            Player::B => 0,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::A => write!(f, "A"),
            Player::B => write!(f, "B"),
        }
    }
}

/// The kind of a piece, which decides how it may jump.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PieceKind {
    Cheese,
    Butter,
    Egg,
    Tulip,
}

/// The constraint on the direction of a piece's jumps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JumpRule {
    StraightOnly,
    DiagonalOnly,
    /// The first jump of a chain picks the direction for all later jumps.
    Locked,
    /// Every jump of a chain must change direction relative to the previous one.
    Alternating,
}

impl PieceKind {
    pub const ALL: [PieceKind; 4] = [
        PieceKind::Cheese,
        PieceKind::Butter,
        PieceKind::Egg,
        PieceKind::Tulip,
    ];

    pub fn jump_rule(self) -> JumpRule {
        match self {
            PieceKind::Egg => JumpRule::StraightOnly,
            PieceKind::Tulip => JumpRule::DiagonalOnly,
            PieceKind::Cheese => JumpRule::Locked,
            PieceKind::Butter => JumpRule::Alternating,
        }
    }

    /// Whether this piece may jump in `direction`, given the direction of
    /// the chain so far.
    ///
    /// `chain_direction` is the direction of the previous jump of the chain,
    /// or `None` if no jump has been made yet.
    pub fn may_jump(self, direction: Direction, chain_direction: Option<Direction>) -> bool {
        match (self.jump_rule(), chain_direction) {
            (JumpRule::StraightOnly, _) => direction == Direction::Straight,
            (JumpRule::DiagonalOnly, _) => direction == Direction::Diagonal,
            (JumpRule::Locked, Some(locked)) => direction == locked,
            (JumpRule::Alternating, Some(previous)) => direction != previous,
            (JumpRule::Locked | JumpRule::Alternating, None) => true,
        }
    }

    /// A one-letter symbol, uppercase for player A and lowercase for player B.
    pub fn symbol(self, owner: Player) -> char {
        let c = match self {
            PieceKind::Cheese => 'C',
            PieceKind::Butter => 'B',
            PieceKind::Egg => 'E',
            PieceKind::Tulip => 'T',
        };
        match owner {
            Player::A => c,
            Player::B => c.to_ascii_lowercase(),
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PieceKind::Cheese => write!(f, "cheese"),
            PieceKind::Butter => write!(f, "butter"),
            PieceKind::Egg => write!(f, "egg"),
            PieceKind::Tulip => write!(f, "tulip"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Player,
}

impl Piece {
    pub const fn new(kind: PieceKind, owner: Player) -> Self {
        Self { kind, owner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction::{Diagonal, Straight};

    #[test]
    fn jump_rules() {
        for chain_direction in [None, Some(Straight), Some(Diagonal)] {
            assert!(PieceKind::Egg.may_jump(Straight, chain_direction));
            assert!(!PieceKind::Egg.may_jump(Diagonal, chain_direction));
            assert!(PieceKind::Tulip.may_jump(Diagonal, chain_direction));
            assert!(!PieceKind::Tulip.may_jump(Straight, chain_direction));
        }

        assert!(PieceKind::Cheese.may_jump(Straight, None));
        assert!(PieceKind::Cheese.may_jump(Diagonal, None));
        assert!(PieceKind::Cheese.may_jump(Diagonal, Some(Diagonal)));
        assert!(!PieceKind::Cheese.may_jump(Straight, Some(Diagonal)));

        assert!(PieceKind::Butter.may_jump(Straight, None));
        assert!(PieceKind::Butter.may_jump(Diagonal, None));
        assert!(PieceKind::Butter.may_jump(Straight, Some(Diagonal)));
        assert!(!PieceKind::Butter.may_jump(Diagonal, Some(Diagonal)));
    }
}
