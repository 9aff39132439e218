use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::tables::{BONUS_TURN_JUMPS, PIECES_PER_PLAYER};
use crate::{
    can_jump_to_dock, can_slide_to_dock, legal_destinations, score, square_between,
    valid_docks_for_piece, Board, Dock, DockSet, IllegalAction, InvalidGameState, InvalidNotation,
    JumpChain, Piece, PieceKind, Player, SelectionError, Square, SquareSet, Warehouse,
};

/// Something the current player does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// A slide to an adjacent square, or a jump over an adjacent piece.
    Move { from: Square, to: Square },
    /// A slide or jump that takes the piece off the board into a dock.
    Dock { from: Square, dock: Dock },
    /// Stops the current jump chain.
    EndChain,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { from, to } => write!(f, "{}-{}", from, to),
            Action::Dock { from, dock } => write!(f, "{}-{}", from, dock),
            Action::EndChain => write!(f, "end"),
        }
    }
}

/// Parses `"end"`, or two squares separated by a dash like `"A2-A3"`.
///
/// A destination on row 0 or 9 makes it a [`Action::Dock`].
impl FromStr for Action {
    type Err = InvalidNotation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("end") {
            return Ok(Action::EndChain);
        }
        let (from, to) = s
            .split_once('-')
            .ok_or_else(|| InvalidNotation::MalformedAction {
                action: s.to_owned(),
            })?;
        let from: Square = from.trim().parse()?;
        let to: Square = to.trim().parse()?;
        if to.is_playable() {
            Ok(Action::Move { from, to })
        } else {
            Ok(Action::Dock {
                from,
                dock: Dock::try_from(to)?,
            })
        }
    }
}

/// Where the game stands between two actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The current player may pick any of their pieces.
    Idle,
    /// The piece on `at` has jumped and may jump again, dock, or stop.
    ChainActive { at: Square },
    /// A player has no pieces left on the board.
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    WonBy(Player),
    Tie,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::WonBy(player) => write!(f, "player {} won", player),
            Outcome::Tie => write!(f, "tie"),
        }
    }
}

/// A selected piece together with everything it may do right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub from: Square,
    pub piece: Piece,
    pub moves: SquareSet,
    /// Only docks with room left.
    pub docks: DockSet,
}

impl Selection {
    pub fn is_stuck(&self) -> bool {
        self.moves.is_empty() && self.docks.is_empty()
    }

    pub fn actions(self) -> impl Iterator<Item = Action> {
        let from = self.from;
        let moves = self.moves.into_iter().map(move |to| Action::Move { from, to });
        let docks = self
            .docks
            .into_iter()
            .map(move |dock| Action::Dock { from, dock });
        moves.chain(docks)
    }
}

/// The complete state of a game.
///
/// Every action returns a new state and leaves the old one untouched, so a
/// rejected action never changes anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateRecord")]
pub struct GameState {
    board: Board,
    current_player: Player,
    phase: Phase,
    chain: JumpChain,
    /// All 16 warehouses, in the order of [`Dock::index()`].
    warehouses: Vec<Warehouse>,
    scores: [u32; 2],
    /// Whether the current turn is a bonus turn.
    bonus_granted: bool,
}

/// A [`GameState`] as stored, before its parts are checked against each other.
#[derive(Deserialize)]
struct GameStateRecord {
    board: Board,
    current_player: Player,
    phase: Phase,
    chain: JumpChain,
    warehouses: Vec<Warehouse>,
    scores: [u32; 2],
    bonus_granted: bool,
}

impl TryFrom<GameStateRecord> for GameState {
    type Error = InvalidGameState;

    fn try_from(record: GameStateRecord) -> Result<Self, Self::Error> {
        let state = GameState {
            board: record.board,
            current_player: record.current_player,
            phase: record.phase,
            chain: record.chain,
            warehouses: record.warehouses,
            scores: record.scores,
            bonus_granted: record.bonus_granted,
        };
        if state.warehouses.len() != 16 {
            return Err(InvalidGameState::WrongNumberOfWarehouses {
                count: state.warehouses.len(),
            });
        }
        for (index, warehouse) in state.warehouses.iter().enumerate() {
            if warehouse.dock().index() != index {
                return Err(InvalidGameState::MisplacedWarehouse {
                    index,
                    dock: warehouse.dock(),
                });
            }
        }
        for player in Player::BOTH {
            let expected: u32 = state
                .warehouses_of(player)
                .iter()
                .map(|warehouse| warehouse.score())
                .sum();
            if state.score(player) != expected {
                return Err(InvalidGameState::WrongPlayerScore {
                    player,
                    score: state.score(player),
                    expected,
                });
            }
        }
        if !state.chain.is_consistent() {
            return Err(InvalidGameState::InconsistentChain);
        }
        let phase_fits = match state.phase {
            Phase::Idle => state.chain.is_empty(),
            Phase::ChainActive { at } => {
                state.chain.current_square() == Some(at)
                    && state.board.get(at).map(|piece| piece.owner) == Some(state.current_player)
            }
            Phase::Finished => {
                state.chain.is_empty()
                    && Player::BOTH
                        .into_iter()
                        .any(|player| state.board.count(player) == 0)
            }
        };
        if !phase_fits {
            return Err(InvalidGameState::PhaseMismatch { phase: state.phase });
        }
        Ok(state)
    }
}

/// A validated action that has not been carried out yet.
pub struct ActionCalculation<'a> {
    /// This struct ties together the state and its step, to prevent any possible mixups
    state: &'a GameState,
    step: Step,
    /// The points the acting player gains.
    pub points: u32,
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Slide {
        from: Square,
        to: Square,
    },
    Jump {
        from: Square,
        over: Square,
        to: Square,
    },
    Dock {
        from: Square,
        kind: PieceKind,
        dock: Dock,
        over: Option<Square>,
    },
    EndChain,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// The initial position, with player A to move.
    pub fn new() -> Self {
        Self::from_board(Board::initial(), Player::A)
    }

    /// A game starting from an arbitrary position, with empty warehouses.
    pub fn from_board(board: Board, current_player: Player) -> Self {
        Self {
            board,
            current_player,
            phase: Phase::Idle,
            chain: JumpChain::new(),
            warehouses: Dock::all().map(Warehouse::new).collect(),
            scores: [0, 0],
            bonus_granted: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The chain of the current turn. Empty unless the phase is [`Phase::ChainActive`].
    pub fn chain(&self) -> &JumpChain {
        &self.chain
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.idx()]
    }

    pub fn warehouse(&self, dock: Dock) -> &Warehouse {
        &self.warehouses[dock.index()]
    }

    /// The player's 8 warehouses, from column A to H.
    pub fn warehouses_of(&self, player: Player) -> &[Warehouse] {
        let start = player.idx() * 8;
        &self.warehouses[start..start + 8]
    }

    pub fn bonus_granted(&self) -> bool {
        self.bonus_granted
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// The result, once the game is finished.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_finished() {
            return None;
        }
        let (a, b) = (self.score(Player::A), self.score(Player::B));
        Some(if a > b {
            Outcome::WonBy(Player::A)
        } else if b > a {
            Outcome::WonBy(Player::B)
        } else {
            Outcome::Tie
        })
    }

    /// The player's pieces still on the board, by kind in the order of [`PieceKind::ALL`].
    pub fn remaining_pieces(&self, player: Player) -> [usize; 4] {
        self.board.count_by_kind(player)
    }

    /// How many of the player's pieces have left the board through a dock.
    pub fn pieces_retired(&self, player: Player) -> usize {
        self.warehouses_of(player)
            .iter()
            .map(|warehouse| warehouse.goods().len())
            .sum()
    }

    /// Selects the current player's piece on `square` at the start of a turn.
    ///
    /// During a chain no other piece can be selected, and the chain's piece is
    /// described by [`Self::chain_options()`] instead.
    pub fn select_piece(&self, square: Square) -> Result<Selection, IllegalAction> {
        match self.phase {
            Phase::Finished => Err(IllegalAction::GameOver),
            Phase::ChainActive { at } => Err(IllegalAction::IllegalSelection {
                square,
                reason: SelectionError::ChainInProgress { chain_at: at },
            }),
            Phase::Idle => {
                let piece = self.own_piece(square)?;
                Ok(self.options(square, piece))
            }
        }
    }

    /// The options of the piece in the middle of a jump chain, if there is one.
    pub fn chain_options(&self) -> Option<Selection> {
        match self.phase {
            Phase::ChainActive { at } => self.board.get(at).map(|piece| self.options(at, piece)),
            _ => None,
        }
    }

    /// Every action the current player may take.
    pub fn legal_actions(&self) -> Vec<Action> {
        match self.phase {
            Phase::Finished => vec![],
            Phase::ChainActive { .. } => {
                let mut actions: Vec<Action> = self
                    .chain_options()
                    .map(|selection| selection.actions().collect())
                    .unwrap_or_default();
                actions.push(Action::EndChain);
                actions
            }
            Phase::Idle => self
                .board
                .iter()
                .filter(|(_, piece)| piece.owner == self.current_player)
                .flat_map(|&(square, piece)| self.options(square, piece).actions())
                .collect(),
        }
    }

    pub fn apply_move(&self, from: Square, to: Square) -> Result<GameState, IllegalAction> {
        self.apply(Action::Move { from, to })
    }

    pub fn apply_dock(&self, from: Square, dock: Dock) -> Result<GameState, IllegalAction> {
        self.apply(Action::Dock { from, dock })
    }

    pub fn end_chain_voluntarily(&self) -> Result<GameState, IllegalAction> {
        self.apply(Action::EndChain)
    }

    pub fn apply(&self, action: Action) -> Result<GameState, IllegalAction> {
        Ok(self.calculate(action)?.execute())
    }

    /// Parses an action like `"C5-C7"` and applies it.
    pub fn apply_str(&self, action: &str) -> Result<GameState, IllegalAction> {
        self.apply(action.parse()?)
    }

    /// Checks whether the action is legal, without carrying it out.
    pub fn calculate(&self, action: Action) -> Result<ActionCalculation<'_>, IllegalAction> {
        if self.is_finished() {
            return Err(IllegalAction::GameOver);
        }
        let step = match action {
            Action::Move { from, to } => {
                let piece = self.acting_piece(from)?;
                if !legal_destinations(from, piece.kind, &self.board, &self.chain).contains(to) {
                    return Err(IllegalAction::IllegalDestination { from, to });
                }
                match square_between(from, to) {
                    Some(over) => Step::Jump { from, over, to },
                    None => Step::Slide { from, to },
                }
            }
            Action::Dock { from, dock } => {
                let piece = self.acting_piece(from)?;
                if dock.owner() != self.current_player {
                    return Err(IllegalAction::WrongDock { dock });
                }
                if self.warehouse(dock).is_full() {
                    return Err(IllegalAction::DockFull { dock });
                }
                let over = if self.chain.is_empty()
                    && can_slide_to_dock(from, dock, self.current_player)
                {
                    None
                } else {
                    let over = can_jump_to_dock(
                        from,
                        dock,
                        piece.kind,
                        self.current_player,
                        &self.board,
                        &self.chain,
                    )
                    .ok_or(IllegalAction::IllegalDestination {
                        from,
                        to: dock.square(),
                    })?;
                    Some(over)
                };
                Step::Dock {
                    from,
                    kind: piece.kind,
                    dock,
                    over,
                }
            }
            Action::EndChain => match self.phase {
                Phase::ChainActive { .. } => Step::EndChain,
                _ => return Err(IllegalAction::NoActiveChain),
            },
        };
        let points = match step {
            Step::Dock { kind, dock, .. } if dock.is_scoring() => {
                let mut goods = self.warehouse(dock).goods().to_vec();
                let before = score(&goods);
                goods.push(kind);
                score(&goods) - before
            }
            _ => 0,
        };
        Ok(ActionCalculation {
            state: self,
            step,
            points,
        })
    }

    /// The piece that would act from `from`: during a chain only the chain's
    /// piece, otherwise any piece of the current player.
    fn acting_piece(&self, from: Square) -> Result<Piece, IllegalAction> {
        if let Phase::ChainActive { at } = self.phase {
            if at != from {
                return Err(IllegalAction::IllegalSelection {
                    square: from,
                    reason: SelectionError::ChainInProgress { chain_at: at },
                });
            }
        }
        self.own_piece(from)
    }

    fn own_piece(&self, square: Square) -> Result<Piece, IllegalAction> {
        let piece = self
            .board
            .get(square)
            .ok_or(IllegalAction::IllegalSelection {
                square,
                reason: SelectionError::NoPieceOnSquare,
            })?;
        if piece.owner != self.current_player {
            return Err(IllegalAction::IllegalSelection {
                square,
                reason: SelectionError::OpponentsPiece,
            });
        }
        Ok(piece)
    }

    fn options(&self, from: Square, piece: Piece) -> Selection {
        let moves = legal_destinations(from, piece.kind, &self.board, &self.chain);
        let docks = valid_docks_for_piece(from, piece.kind, piece.owner, &self.board, &self.chain)
            .into_iter()
            .filter(|&dock| !self.warehouse(dock).is_full())
            .collect();
        Selection {
            from,
            piece,
            moves,
            docks,
        }
    }

    /// Clears the chain, then either ends the game, grants a bonus turn or
    /// hands the turn to the opponent.
    fn end_turn(&mut self) {
        let jumps = self.chain.jumps();
        self.chain = JumpChain::new();
        if let Some(player) = Player::BOTH
            .into_iter()
            .find(|&player| self.board.count(player) == 0)
        {
            debug!(
                %player,
                score_a = self.scores[0],
                score_b = self.scores[1],
                "no pieces left, game over"
            );
            self.phase = Phase::Finished;
            return;
        }
        self.phase = Phase::Idle;
        if jumps >= BONUS_TURN_JUMPS && !self.bonus_granted {
            debug!(player = %self.current_player, jumps, "bonus turn");
            self.bonus_granted = true;
        } else {
            self.bonus_granted = false;
            self.current_player = self.current_player.opponent();
            debug!(player = %self.current_player, jumps, "turn passes");
        }
    }
}

impl ActionCalculation<'_> {
    pub fn is_jump(&self) -> bool {
        matches!(
            self.step,
            Step::Jump { .. } | Step::Dock { over: Some(_), .. }
        )
    }

    pub fn execute(self) -> GameState {
        let mut next = self.state.clone();
        match self.step {
            Step::Slide { from, to } => {
                trace!(player = %next.current_player, %from, %to, "slide");
                next.board.move_piece(from, to);
                next.end_turn();
            }
            Step::Jump { from, over, to } => {
                let piece = next.board.move_piece(from, to);
                next.chain.record_jump(from, over, to);
                trace!(
                    player = %next.current_player,
                    %from,
                    %over,
                    %to,
                    jumps = next.chain.jumps(),
                    "jump"
                );
                if next.options(to, piece).is_stuck() {
                    debug!(at = %to, jumps = next.chain.jumps(), "chain has no continuation");
                    next.end_turn();
                } else {
                    next.phase = Phase::ChainActive { at: to };
                }
            }
            Step::Dock {
                from,
                kind,
                dock,
                over,
            } => {
                let removed = next.board.remove(from);
                debug_assert_eq!(removed.map(|piece| piece.kind), Some(kind));
                if let Some(over) = over {
                    next.chain.record_jump(from, over, dock.square());
                }
                let gained = next.warehouses[dock.index()].load(kind);
                debug_assert_eq!(gained, self.points);
                next.scores[next.current_player.idx()] += gained;
                debug!(
                    player = %next.current_player,
                    %from,
                    %dock,
                    %kind,
                    points = gained,
                    "docked"
                );
                next.end_turn();
            }
            Step::EndChain => {
                trace!(player = %next.current_player, jumps = next.chain.jumps(), "chain ended");
                next.end_turn();
            }
        }
        debug_assert!(Player::BOTH
            .into_iter()
            .all(|player| next.board.count(player) + next.pieces_retired(player)
                == self.state.board.count(player) + self.state.pieces_retired(player)));
        next
    }
}

/// Whether a position reached from [`GameState::new()`] still holds all
/// pieces of each player, on the board or in a warehouse.
pub fn pieces_conserved(state: &GameState) -> bool {
    Player::BOTH.into_iter().all(|player| {
        state.board().count(player) + state.pieces_retired(player) == PIECES_PER_PLAYER
    })
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::{square, Direction, JumpRule, Placement};

    fn board_with(pieces: &[(&str, PieceKind, Player)]) -> Board {
        let placements: Vec<Placement> = pieces
            .iter()
            .map(|&(s, kind, owner)| Placement {
                square: s.parse().unwrap(),
                piece: Piece::new(kind, owner),
            })
            .collect();
        Board::new(&placements).unwrap()
    }

    fn dock(s: &str) -> Dock {
        s.parse().unwrap()
    }

    #[test]
    fn initial_state() {
        let state = GameState::new();
        assert_eq!(state.current_player(), Player::A);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.score(Player::A), 0);
        assert_eq!(state.score(Player::B), 0);
        assert_eq!(state.remaining_pieces(Player::B), [4, 4, 4, 4]);
        assert!(state.chain().is_empty());
        assert!(pieces_conserved(&state));
        assert_eq!(state.outcome(), None);
        assert!(!state.legal_actions().is_empty());
    }

    #[test]
    fn slide_ends_the_turn() {
        let state = GameState::new();
        let next = state.apply_move(square!("A2"), square!("A3")).unwrap();
        assert_eq!(next.current_player(), Player::B);
        assert_eq!(next.phase(), Phase::Idle);
        assert!(next.chain().is_empty());
        assert_eq!(next.score(Player::A), 0);
        assert_eq!(next.board().get(square!("A2")), None);
        assert_eq!(
            next.board().get(square!("A3")),
            Some(Piece::new(PieceKind::Egg, Player::A))
        );
        // The old state is untouched
        assert!(state.board().is_occupied(square!("A2")));
    }

    #[test]
    fn selection_errors() {
        let state = GameState::new();
        assert_eq!(
            state.select_piece(square!("D5")),
            Err(IllegalAction::IllegalSelection {
                square: square!("D5"),
                reason: SelectionError::NoPieceOnSquare
            })
        );
        assert_eq!(
            state.select_piece(square!("D7")),
            Err(IllegalAction::IllegalSelection {
                square: square!("D7"),
                reason: SelectionError::OpponentsPiece
            })
        );
        assert_eq!(
            state.apply_move(square!("A2"), square!("A4")),
            Err(IllegalAction::IllegalDestination {
                from: square!("A2"),
                to: square!("A4")
            })
        );
        assert_eq!(
            state.end_chain_voluntarily(),
            Err(IllegalAction::NoActiveChain)
        );
        assert_eq!(
            state.apply_dock(square!("A2"), dock("A0")),
            Err(IllegalAction::WrongDock { dock: dock("A0") })
        );

        let selection = state.select_piece(square!("A2")).unwrap();
        assert_eq!(
            selection.moves,
            SquareSet::from_iter([square!("A3"), square!("B3")])
        );
        assert!(selection.docks.is_empty());
    }

    #[test]
    fn jump_without_continuation_ends_the_turn() {
        // The butter on A1 jumps over A2, after which it would have to jump
        // diagonally and cannot.
        let state = GameState::new()
            .apply_move(square!("A1"), square!("A3"))
            .unwrap();
        assert_eq!(state.current_player(), Player::B);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.chain().is_empty());
    }

    #[test]
    fn chain_into_a_dock() {
        let state = GameState::from_board(
            board_with(&[
                ("C5", PieceKind::Egg, Player::A),
                ("H3", PieceKind::Tulip, Player::A),
                ("C6", PieceKind::Cheese, Player::B),
                ("C8", PieceKind::Cheese, Player::B),
            ]),
            Player::A,
        );
        let state = state.apply_move(square!("C5"), square!("C7")).unwrap();
        assert_eq!(state.phase(), Phase::ChainActive { at: square!("C7") });
        assert_eq!(state.current_player(), Player::A);
        assert_eq!(state.chain().jumps(), 1);
        assert_eq!(state.chain().direction(), Some(Direction::Straight));
        let options = state.chain_options().unwrap();
        assert!(options.moves.is_empty());
        assert_eq!(options.docks, DockSet::from_iter([dock("C9")]));

        // Other pieces are off limits for the rest of the chain
        assert_eq!(
            state.apply_move(square!("H3"), square!("H4")),
            Err(IllegalAction::IllegalSelection {
                square: square!("H3"),
                reason: SelectionError::ChainInProgress {
                    chain_at: square!("C7")
                }
            })
        );
        assert!(matches!(
            state.select_piece(square!("C7")),
            Err(IllegalAction::IllegalSelection {
                reason: SelectionError::ChainInProgress { .. },
                ..
            })
        ));

        let calculation = state.calculate("C7-C9".parse().unwrap()).unwrap();
        assert!(calculation.is_jump());
        assert_eq!(calculation.points, 1);
        let state = calculation.execute();
        assert_eq!(state.warehouse(dock("C9")).goods(), &[PieceKind::Egg]);
        assert_eq!(state.score(Player::A), 1);
        assert_eq!(state.current_player(), Player::B);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.pieces_retired(Player::A), 1);
        assert_eq!(state.remaining_pieces(Player::A), [0, 0, 0, 1]);
    }

    #[test]
    fn three_jumps_into_a_dock() {
        let state = GameState::from_board(
            board_with(&[
                ("C3", PieceKind::Egg, Player::A),
                ("H3", PieceKind::Tulip, Player::A),
                ("C4", PieceKind::Cheese, Player::B),
                ("C6", PieceKind::Cheese, Player::B),
                ("C8", PieceKind::Cheese, Player::B),
            ]),
            Player::A,
        );
        let state = state
            .apply_str("C3-C5")
            .and_then(|s| s.apply_str("C5-C7"))
            .unwrap();
        assert_eq!(state.chain().jumps(), 2);
        let last = state.clone();
        let state = state.apply_dock(square!("C7"), dock("C9")).unwrap();
        assert_eq!(state.score(Player::A), 1);
        // Three jumps earn no bonus turn
        assert_eq!(state.current_player(), Player::B);
        assert!(!state.bonus_granted());
        // The dock jump counted as the third jump
        let mut chain = last.chain().clone();
        chain.record_jump(square!("C7"), square!("C8"), square!("C9"));
        assert_eq!(chain.jumps(), 3);
    }

    #[test]
    fn voluntary_end_of_chain() {
        let state = GameState::from_board(
            board_with(&[
                ("C3", PieceKind::Egg, Player::A),
                ("C4", PieceKind::Cheese, Player::B),
                ("C6", PieceKind::Cheese, Player::B),
            ]),
            Player::A,
        );
        let state = state.apply_str("C3-C5").unwrap();
        assert_eq!(state.phase(), Phase::ChainActive { at: square!("C5") });
        assert!(state.legal_actions().contains(&Action::EndChain));
        let state = state.end_chain_voluntarily().unwrap();
        assert_eq!(state.current_player(), Player::B);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(
            state.board().get(square!("C5")),
            Some(Piece::new(PieceKind::Egg, Player::A))
        );
    }

    #[test]
    fn full_warehouse() {
        let mut state = GameState::from_board(
            board_with(&[
                ("B8", PieceKind::Egg, Player::A),
                ("C8", PieceKind::Tulip, Player::A),
                ("D8", PieceKind::Cheese, Player::A),
                ("C7", PieceKind::Egg, Player::A),
                ("B7", PieceKind::Butter, Player::A),
                ("H4", PieceKind::Egg, Player::B),
            ]),
            Player::A,
        );
        let mut b_at_h4 = true;
        let mut play = |state: &GameState, action: &str| {
            let state = state.apply_str(action).unwrap();
            let reply = if b_at_h4 { "H4-H5" } else { "H5-H4" };
            b_at_h4 = !b_at_h4;
            state.apply_str(reply).unwrap()
        };
        for action in ["C8-C9", "B8-C9", "D8-C9", "C7-C8", "C8-C9", "B7-B8"] {
            state = play(&state, action);
        }
        let warehouse = state.warehouse(dock("C9"));
        assert!(warehouse.is_full());
        assert_eq!(
            warehouse.goods(),
            &[
                PieceKind::Tulip,
                PieceKind::Egg,
                PieceKind::Cheese,
                PieceKind::Egg
            ]
        );
        assert_eq!(state.score(Player::A), 5);

        let before = state.clone();
        assert_eq!(
            state.apply_dock(square!("B8"), dock("C9")),
            Err(IllegalAction::DockFull { dock: dock("C9") })
        );
        assert_eq!(state, before);
        let selection = state.select_piece(square!("B8")).unwrap();
        assert_eq!(
            selection.docks,
            DockSet::from_iter([dock("A9"), dock("B9")])
        );
    }

    #[test]
    fn one_bonus_turn() {
        let state = GameState::from_board(
            board_with(&[
                ("C1", PieceKind::Egg, Player::A),
                ("D1", PieceKind::Egg, Player::A),
                ("H3", PieceKind::Tulip, Player::A),
                ("C2", PieceKind::Cheese, Player::B),
                ("C4", PieceKind::Cheese, Player::B),
                ("C6", PieceKind::Cheese, Player::B),
                ("C8", PieceKind::Cheese, Player::B),
                ("D2", PieceKind::Cheese, Player::B),
                ("D4", PieceKind::Cheese, Player::B),
                ("D6", PieceKind::Cheese, Player::B),
                ("D8", PieceKind::Cheese, Player::B),
            ]),
            Player::A,
        );
        let mut state = state;
        for action in ["C1-C3", "C3-C5", "C5-C7", "C7-C9"] {
            state = state.apply_str(action).unwrap();
        }
        assert_eq!(state.current_player(), Player::A);
        assert!(state.bonus_granted());
        assert_eq!(state.phase(), Phase::Idle);

        // Another long chain during the bonus turn does not earn a second one
        for action in ["D1-D3", "D3-D5", "D5-D7", "D7-D9"] {
            state = state.apply_str(action).unwrap();
        }
        assert_eq!(state.current_player(), Player::B);
        assert!(!state.bonus_granted());
        // D9 is a garden
        assert_eq!(state.score(Player::A), 1);
        assert_eq!(state.warehouse(dock("D9")).goods(), &[PieceKind::Egg]);
    }

    #[test]
    fn game_over() {
        let state = GameState::from_board(
            board_with(&[
                ("C8", PieceKind::Egg, Player::A),
                ("E4", PieceKind::Egg, Player::B),
            ]),
            Player::A,
        );
        let state = state.apply_str("C8-C9").unwrap();
        assert_eq!(state.phase(), Phase::Finished);
        assert_eq!(state.outcome(), Some(Outcome::WonBy(Player::A)));
        assert!(state.legal_actions().is_empty());
        assert_eq!(state.apply_str("E4-E3"), Err(IllegalAction::GameOver));
        assert_eq!(state.select_piece(square!("E4")), Err(IllegalAction::GameOver));

        let state = GameState::from_board(
            board_with(&[
                ("A8", PieceKind::Egg, Player::A),
                ("E4", PieceKind::Egg, Player::B),
            ]),
            Player::A,
        );
        let state = state.apply_str("A8-A9").unwrap();
        assert_eq!(state.outcome(), Some(Outcome::Tie));
    }

    #[test]
    fn parse_actions() {
        assert_eq!(
            "A2-A3".parse(),
            Ok(Action::Move {
                from: square!("A2"),
                to: square!("A3")
            })
        );
        assert_eq!(
            " C7-C9 ".parse(),
            Ok(Action::Dock {
                from: square!("C7"),
                dock: dock("C9")
            })
        );
        assert_eq!("END".parse(), Ok(Action::EndChain));
        assert_eq!(
            "A2A3".parse::<Action>(),
            Err(InvalidNotation::MalformedAction {
                action: "A2A3".into()
            })
        );
        assert_eq!(
            "A2-Z3".parse::<Action>(),
            Err(InvalidNotation::InvalidColumn { column: 'Z' })
        );
        assert_eq!(
            GameState::new().apply_str("A2-Z3"),
            Err(IllegalAction::InvalidNotation(
                InvalidNotation::InvalidColumn { column: 'Z' }
            ))
        );
        for action in ["A2-A3", "C7-C9", "end"] {
            assert_eq!(action.parse::<Action>().unwrap().to_string(), action);
        }
    }

    #[test]
    fn serde_round_trip() {
        let state = GameState::new().apply_str("A2-A3").unwrap();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(serde_json::from_str::<GameState>(&json).unwrap(), state);

        let action = Action::Dock {
            from: square!("C7"),
            dock: dock("C9"),
        };
        assert_eq!(
            serde_json::to_string(&action).unwrap(),
            r#"{"type":"dock","from":"C7","dock":"C9"}"#
        );
    }

    #[test]
    fn stored_states_are_checked() {
        fn reload(json: &serde_json::Value) -> Result<GameState, serde_json::Error> {
            serde_json::from_value(json.clone())
        }

        let state = GameState::from_board(
            board_with(&[
                ("C3", PieceKind::Egg, Player::A),
                ("C4", PieceKind::Cheese, Player::B),
                ("C6", PieceKind::Cheese, Player::B),
            ]),
            Player::A,
        )
        .apply_str("C3-C5")
        .unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(reload(&json).unwrap(), state);

        let mut missing_warehouses = serde_json::to_value(GameState::new()).unwrap();
        missing_warehouses["warehouses"] = serde_json::json!([]);
        assert!(reload(&missing_warehouses)
            .unwrap_err()
            .to_string()
            .contains("Expected 16 warehouses, found 0"));

        let mut swapped = serde_json::to_value(GameState::new()).unwrap();
        swapped["warehouses"].as_array_mut().unwrap().swap(0, 1);
        assert!(reload(&swapped).is_err());

        let mut free_points = serde_json::to_value(GameState::new()).unwrap();
        free_points["scores"] = serde_json::json!([5, 0]);
        assert!(reload(&free_points).is_err());

        // A chain phase without a chain would allow slides mid-chain
        let mut fake_chain = serde_json::to_value(GameState::new()).unwrap();
        fake_chain["phase"] = serde_json::json!({"ChainActive": {"at": "A2"}});
        assert!(reload(&fake_chain)
            .unwrap_err()
            .to_string()
            .contains("does not fit"));

        // A chain left over after its turn
        let mut stale_chain = json.clone();
        stale_chain["phase"] = serde_json::json!("Idle");
        assert!(reload(&stale_chain).is_err());

        // A chain that jumped without moving its piece
        let mut wrong_square = json.clone();
        wrong_square["phase"] = serde_json::json!({"ChainActive": {"at": "C3"}});
        assert!(reload(&wrong_square).is_err());

        let mut wrong_counter = json.clone();
        wrong_counter["chain"]["jumps"] = serde_json::json!(2);
        assert!(reload(&wrong_counter)
            .unwrap_err()
            .to_string()
            .contains("disagree"));

        let mut early_end = serde_json::to_value(GameState::new()).unwrap();
        early_end["phase"] = serde_json::json!("Finished");
        assert!(reload(&early_end).is_err());
    }

    /// Plays the game from the start, using `choices` to pick among the legal actions.
    fn random_game(choices: &[u16]) -> Vec<(GameState, Action)> {
        let mut state = GameState::new();
        let mut history = vec![];
        for &choice in choices {
            let actions = state.legal_actions();
            if actions.is_empty() {
                break;
            }
            let action = actions[choice as usize % actions.len()];
            let next = state.apply(action).unwrap();
            history.push((state, action));
            state = next;
        }
        history
    }

    quickcheck! {
        fn legal_actions_are_legal(choices: Vec<u16>) -> bool {
            random_game(&choices).into_iter().all(|(state, action)| {
                let next = state.apply(action).unwrap();
                pieces_conserved(&next)
                    && next.score(Player::A) + next.score(Player::B)
                        == Dock::all().map(|dock| next.warehouse(dock).score()).sum::<u32>()
            })
        }

        fn dock_jumps_use_fresh_pivots(choices: Vec<u16>) -> bool {
            random_game(&choices).into_iter().all(|(state, action)| {
                let Action::Dock { from, dock } = action else { return true };
                match square_between(from, dock.square()) {
                    Some(over) => !state.chain().jumped_over().contains(over),
                    None => true,
                }
            })
        }

        fn jumps_follow_the_piece_rules(choices: Vec<u16>) -> bool {
            random_game(&choices).into_iter().all(|(state, action)| {
                let Action::Move { from, to } = action else { return true };
                let Some(direction) = Direction::between(from, to) else { return true };
                if square_between(from, to).is_none() {
                    return true;
                }
                let kind = state.board().get(from).unwrap().kind;
                match (kind.jump_rule(), state.chain().direction()) {
                    (JumpRule::StraightOnly, _) => direction == Direction::Straight,
                    (JumpRule::DiagonalOnly, _) => direction == Direction::Diagonal,
                    (JumpRule::Locked, Some(locked)) => direction == locked,
                    (JumpRule::Alternating, Some(last)) => direction != last,
                    (_, None) => true,
                }
            })
        }

        fn chains_never_repeat(choices: Vec<u16>) -> bool {
            random_game(&choices).into_iter().all(|(state, action)| {
                let next = state.apply(action).unwrap();
                if let Phase::ChainActive { at } = next.phase() {
                    let before = state.chain();
                    let after = next.chain();
                    after.jumps() == before.jumps() + 1
                        && (before.visited() & after.visited()) == before.visited()
                        && !before.visited().contains(at)
                        && after.visited().contains(at)
                        && (before.jumped_over() & after.jumped_over()) == before.jumped_over()
                        && after.jumped_over().len() == after.jumps() as u32
                } else {
                    next.chain().is_empty()
                }
            })
        }

        fn bonus_turns_are_granted_once(choices: Vec<u16>) -> bool {
            random_game(&choices).into_iter().all(|(state, action)| {
                let calculation = state.calculate(action).unwrap();
                let jumps = state.chain().jumps() + calculation.is_jump() as u8;
                let next = calculation.execute();
                if next.phase() != Phase::Idle {
                    return true;
                }
                let keeps_turn = next.current_player() == state.current_player();
                let expect_bonus = jumps >= BONUS_TURN_JUMPS && !state.bonus_granted();
                keeps_turn == expect_bonus && next.bonus_granted() == expect_bonus
            })
        }
    }
}
