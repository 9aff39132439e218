use serde::{Deserialize, Serialize};

use crate::{Direction, Square, SquareSet};

/// What a piece has done so far in the current jump chain.
///
/// Everything in here is scoped to one chain and reset when the chain ends.
/// An empty chain means the current turn has not moved a piece yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpChain {
    /// The direction of the latest jump. For direction-locked pieces this is
    /// the lock, for alternating pieces the direction the next jump must avoid.
    direction: Option<Direction>,
    /// Start and end square of every jump, in order.
    trail: Vec<Square>,
    visited: SquareSet,
    jumped_over: SquareSet,
    jumps: u8,
}

impl JumpChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no jump has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.jumps == 0
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn trail(&self) -> &[Square] {
        &self.trail
    }

    /// The squares the piece stood on during this chain, including where it started.
    pub fn visited(&self) -> SquareSet {
        self.visited
    }

    pub fn jumped_over(&self) -> SquareSet {
        self.jumped_over
    }

    pub fn jumps(&self) -> u8 {
        self.jumps
    }

    /// The square the chain's piece is standing on, if the chain has started.
    pub fn current_square(&self) -> Option<Square> {
        self.trail.last().copied()
    }

    /// Whether jumping over `over` onto `to` would repeat part of this chain.
    ///
    /// Nothing repeats in an empty chain.
    pub fn repeats(&self, over: Square, to: Square) -> bool {
        self.jumped_over.contains(over) || self.visited.contains(to)
    }

    /// Whether the trail, the square sets and the counter describe the same jumps.
    pub(crate) fn is_consistent(&self) -> bool {
        let jumps = self.jumps as usize;
        let last_direction = self
            .trail
            .chunks(2)
            .last()
            .and_then(|jump| Direction::between(jump[0], jump[1]));
        self.trail.len() == 2 * jumps
            && self.jumped_over.len() as usize == jumps
            // Every jump starts where the previous one landed
            && self.trail.windows(2).skip(1).step_by(2).all(|w| w[0] == w[1])
            && self.visited == self.trail.iter().copied().collect::<SquareSet>()
            && self.direction == last_direction
    }

    /// Records a jump from `from` over `over` onto `to`.
    ///
    /// `to` is a dock square when the chain ends by jumping into a dock.
    pub(crate) fn record_jump(&mut self, from: Square, over: Square, to: Square) {
        debug_assert!(!self.jumped_over.contains(over), "{} jumped twice", over);
        debug_assert!(self.current_square().map_or(true, |s| s == from));
        self.direction = Direction::between(from, to);
        self.trail.push(from);
        self.trail.push(to);
        self.visited = self.visited.insert(from).insert(to);
        self.jumped_over = self.jumped_over.insert(over);
        self.jumps += 1;
    }
}
