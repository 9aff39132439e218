use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dockjump::{Outcome, Player};
use rand::rngs::StdRng;
use rand::SeedableRng;
use referee::{play_game, replay, report_replay, Config, GameRecording, GameResult, Recorder};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info", global = true)]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Check a recorded game action by action
    Replay {
        /// Path to a game record JSON file
        file: PathBuf,
    },
    /// Play games between two players picking random legal actions
    SelfPlay {
        /// How many games to play
        #[arg(short, long, default_value_t = 100)]
        num_games: usize,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Stop a game after this many actions
        #[arg(long, default_value_t = 2000)]
        max_actions: usize,

        /// Record the games' actions as JSON files into this directory
        #[arg(short, long)]
        record_games_to_directory: Option<PathBuf>,
    },
}

#[derive(Default)]
struct SelfPlayScore {
    wins: [usize; 2],
    ties: usize,
    stalled: usize,
    too_long: usize,
}

fn run_self_play(config: &mut Config, num_games: usize) -> anyhow::Result<SelfPlayScore> {
    let mut score = SelfPlayScore::default();
    for game_idx in 0..num_games {
        match play_game(config)? {
            GameResult::Finished(Outcome::WonBy(player)) => {
                debug!(winner = %player, game_idx);
                score.wins[player.idx()] += 1;
            }
            GameResult::Finished(Outcome::Tie) => {
                debug!(game_idx, "Tie");
                score.ties += 1;
            }
            GameResult::Stalled { player } => {
                info!(%player, game_idx, "No legal action left");
                score.stalled += 1;
            }
            GameResult::TooLong => {
                info!(game_idx, max_actions = config.max_actions, "Game cut off");
                score.too_long += 1;
            }
        }
    }
    eprintln!(
        "End result:\n- {} wins by {}\n- {} wins by {}\n- {} ties\n- {} stalled\n- {} cut off",
        score.wins[0],
        Player::A,
        score.wins[1],
        Player::B,
        score.ties,
        score.stalled,
        score.too_long
    );
    Ok(score)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    match args.command {
        Command::Replay { file } => {
            let recording = GameRecording::load(&file)?;
            info!(num_actions = recording.actions.len(), file = %file.display());
            let result = replay(&recording);
            if !report_replay(&recording, &result) {
                anyhow::bail!("Replay of '{}' failed", file.display());
            }
        }
        Command::SelfPlay {
            num_games,
            seed,
            max_actions,
            record_games_to_directory,
        } => {
            // Get a random seed
            let seed = seed.unwrap_or_else(rand::random);
            info!(seed);
            let recorder = if let Some(dir_path) = record_games_to_directory {
                Some(Recorder::new(dir_path)?)
            } else {
                None
            };
            let mut config = Config {
                rng: StdRng::seed_from_u64(seed),
                recorder,
                max_actions,
            };
            run_self_play(&mut config, num_games)?;
        }
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
