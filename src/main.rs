use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_pente::prelude::*;

#[derive(Clone, Debug, Parser)]
#[command(about = "Loads datapacks and replays a move list against the rules engine")]
struct DemoOptions {
    /// JSON datapack file to load. Repeat to load several.
    #[arg(short, long = "datapack")]
    datapacks: Vec<PathBuf>,

    /// Number of players in the new game.
    #[arg(short, long, default_value_t = 2)]
    players: u32,

    /// Log level, overridable by RUST_LOG.
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Newline-delimited `axis,axis,...` coordinates to replay non-interactively.
    #[arg(short, long)]
    moves: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let options = DemoOptions::parse();

    let _logger = Logger::try_with_env_or_str(&options.log_level)
        .context("invalid log level")?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            false => AdaptiveFormat::Default,
        })
        .start()
        .context("failed to start logger")?;

    let docs = options
        .datapacks
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading datapack {}", path.display()))?;
            serde_json::from_str::<DatapackDoc>(&text)
                .with_context(|| format!("parsing datapack {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let ruleset = load(docs).context("failed to load datapacks")?;
    let mut state = new_game(&ruleset, options.players);

    let Some(moves_path) = &options.moves else {
        log::info!("ruleset loaded with {} rule(s); no --moves given, nothing to replay", ruleset.rules.len());
        return Ok(());
    };

    let text = fs::read_to_string(moves_path)
        .with_context(|| format!("reading moves file {}", moves_path.display()))?;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let axes = line
            .split(',')
            .map(|s| s.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("moves file line {}: {:?}", line_no + 1, line))?;
        let mv = Coord::new(axes);

        state = apply(&ruleset, &state, &mv)
            .with_context(|| format!("applying move {:?} from line {}", mv, line_no + 1))?;

        if state.is_terminal() {
            break;
        }
    }

    Ok(())
}
