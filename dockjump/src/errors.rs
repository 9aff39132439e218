use crate::{Dock, Phase, Player, Square};

/// The error type for the [`FromStr`](std::str::FromStr) instances of
/// [`Square`], [`Dock`] and [`Action`](crate::Action).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidNotation {
    WrongLength { notation: String },
    InvalidColumn { column: char },
    InvalidRow { row: char },
    NotADock { square: Square },
    MalformedAction { action: String },
}

impl std::error::Error for InvalidNotation {}

impl std::fmt::Display for InvalidNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidNotation::WrongLength { notation } => write!(
                f,
                "'{}' is not a square, which is a column letter followed by a row digit",
                notation
            ),
            InvalidNotation::InvalidColumn { column } => {
                write!(f, "'{}' is not a column, columns are A to H", column)
            }
            InvalidNotation::InvalidRow { row } => {
                write!(f, "'{}' is not a row, rows are 0 to 9", row)
            }
            InvalidNotation::NotADock { square } => {
                write!(f, "{} is not a dock, docks are on rows 0 and 9", square)
            }
            InvalidNotation::MalformedAction { action } => write!(
                f,
                "'{}' is not an action, which is either 'end' or two squares like 'A2-A3'",
                action
            ),
        }
    }
}

/// The error type for [`Board::new()`](crate::Board::new).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidBoard {
    DuplicateSquare { square: Square },
    NotPlayable { square: Square },
}

impl std::error::Error for InvalidBoard {}

impl std::fmt::Display for InvalidBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidBoard::DuplicateSquare { square } => {
                write!(f, "More than one piece was placed on {}", square)
            }
            InvalidBoard::NotPlayable { square } => {
                write!(f, "A piece was placed on {}, which is not on rows 1 to 8", square)
            }
        }
    }
}

/// The error type for deserializing a [`GameState`](crate::GameState) or
/// [`Warehouse`](crate::Warehouse) whose parts contradict each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidGameState {
    WrongNumberOfWarehouses { count: usize },
    MisplacedWarehouse { index: usize, dock: Dock },
    WarehouseOverflow { dock: Dock, goods: usize },
    WrongWarehouseScore { dock: Dock, score: u32, expected: u32 },
    WrongPlayerScore { player: Player, score: u32, expected: u32 },
    InconsistentChain,
    PhaseMismatch { phase: Phase },
}

impl std::error::Error for InvalidGameState {}

impl std::fmt::Display for InvalidGameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidGameState::WrongNumberOfWarehouses { count } => {
                write!(f, "Expected 16 warehouses, found {}", count)
            }
            InvalidGameState::MisplacedWarehouse { index, dock } => {
                write!(f, "Warehouse {} is stored at position {}", dock, index)
            }
            InvalidGameState::WarehouseOverflow { dock, goods } => {
                write!(f, "Warehouse {} holds {} goods", dock, goods)
            }
            InvalidGameState::WrongWarehouseScore {
                dock,
                score,
                expected,
            } => write!(
                f,
                "Warehouse {} has a score of {}, but its goods are worth {}",
                dock, score, expected
            ),
            InvalidGameState::WrongPlayerScore {
                player,
                score,
                expected,
            } => write!(
                f,
                "Player {} has a score of {}, but their warehouses are worth {}",
                player, score, expected
            ),
            InvalidGameState::InconsistentChain => {
                write!(f, "The jump chain's trail, pivots and counter disagree")
            }
            InvalidGameState::PhaseMismatch { phase } => {
                write!(f, "The phase {:?} does not fit the board and jump chain", phase)
            }
        }
    }
}

/// Why a piece cannot be selected or moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionError {
    NoPieceOnSquare,
    OpponentsPiece,
    /// A jump chain is in progress, so only the chain's piece may act, and
    /// only through [`GameState::apply_move`](crate::GameState::apply_move),
    /// [`GameState::apply_dock`](crate::GameState::apply_dock) or
    /// [`GameState::end_chain_voluntarily`](crate::GameState::end_chain_voluntarily).
    ChainInProgress { chain_at: Square },
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::NoPieceOnSquare => write!(f, "there is no piece on that square"),
            SelectionError::OpponentsPiece => write!(f, "the piece belongs to the opponent"),
            SelectionError::ChainInProgress { chain_at } => write!(
                f,
                "a jump chain is in progress, only the piece on {} may continue",
                chain_at
            ),
        }
    }
}

/// The error type for every entry point of [`GameState`](crate::GameState).
///
/// A rejected action never modifies the game state. A dock that cannot be
/// reached is reported as an [`IllegalDestination`](IllegalAction::IllegalDestination)
/// whose `to` is the dock's square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllegalAction {
    InvalidNotation(InvalidNotation),
    IllegalSelection { square: Square, reason: SelectionError },
    IllegalDestination { from: Square, to: Square },
    DockFull { dock: Dock },
    WrongDock { dock: Dock },
    NoActiveChain,
    GameOver,
}

impl std::error::Error for IllegalAction {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IllegalAction::InvalidNotation(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for IllegalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalAction::InvalidNotation(_) => write!(f, "Invalid notation"),
            IllegalAction::IllegalSelection { square, reason } => {
                write!(f, "The piece on {} cannot be played: {}", square, reason)
            }
            IllegalAction::IllegalDestination { from, to } => {
                write!(f, "The piece on {} cannot move to {}", from, to)
            }
            IllegalAction::DockFull { dock } => {
                write!(f, "Dock {} already holds four goods", dock)
            }
            IllegalAction::WrongDock { dock } => {
                write!(f, "Dock {} belongs to the other player", dock)
            }
            IllegalAction::NoActiveChain => write!(f, "There is no jump chain to end"),
            IllegalAction::GameOver => write!(f, "The game has already ended"),
        }
    }
}

impl From<InvalidNotation> for IllegalAction {
    fn from(err: InvalidNotation) -> Self {
        IllegalAction::InvalidNotation(err)
    }
}
