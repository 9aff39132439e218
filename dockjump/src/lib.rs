//! Rules for a two-player game of slides and jump chains, in which pieces
//! leave the board through docks on the far side and are scored as goods.
//!
//! [`GameState`] is the entry point: it validates every [`Action`] and
//! returns the next state.

pub use board::*;
pub use chain::*;
pub use dock::*;
pub use errors::*;
pub use game::*;
pub use movegen::*;
pub use piece::*;
pub use scoring::*;
pub use square::*;
pub use visualization::*;
pub use warehouse::*;

#[cfg(test)]
mod arbitrary;
mod bitset;
mod board;
mod chain;
mod dock;
mod errors;
mod game;
mod movegen;
mod piece;
mod scoring;
mod square;
pub mod tables;
mod visualization;
mod warehouse;
