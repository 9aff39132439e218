mod recording;
mod replay;
mod self_play;
pub use recording::*;
pub use replay::*;
pub use self_play::*;

pub struct Config {
    pub rng: rand::rngs::StdRng,
    pub recorder: Option<recording::Recorder>,
    /// Self-play games are cut off after this many actions.
    pub max_actions: usize,
}
