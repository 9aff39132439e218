use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use dockjump::{Action, GameState, Outcome, Player};
use serde::{Deserialize, Serialize};

/// Writes every finished game to its own numbered JSON file.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    actions: Vec<Action>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            actions: Vec::new(),
        })
    }

    pub fn store_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Writes the actions stored since the last call, together with the final state's result.
    pub fn write_game_recording(&mut self, final_state: &GameState) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let recording = GameRecording {
            actions: std::mem::take(&mut self.actions),
            scores: [
                final_state.score(Player::A),
                final_state.score(Player::B),
            ],
            outcome: final_state.outcome(),
        };
        let mut writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(&mut writer, &recording)?;
        writeln!(writer)?;
        writer.flush()?;
        self.num += 1;
        Ok(filepath)
    }
}

/// The contents of a game record file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecording {
    /// Every applied action, starting from the initial position.
    pub actions: Vec<Action>,
    /// The scores of players A and B after the last action.
    pub scores: [u32; 2],
    /// `None` if the game did not finish.
    pub outcome: Option<Outcome>,
}

impl GameRecording {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open game record '{}'", path.display()))?;
        let recording = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse game record '{}'", path.display()))?;
        Ok(recording)
    }
}
