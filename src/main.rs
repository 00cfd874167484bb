use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use maze_runner::app::App;
use maze_runner::game::GameConfig;
use maze_runner::leaderboard::{Leaderboard, StoreConfig};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "maze-runner")]
#[command(version, about = "Snake arcade game with an online leaderboard")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value = "20", value_parser = grid_dimension())]
    width: i32,

    /// Grid height in cells
    #[arg(long, default_value = "20", value_parser = grid_dimension())]
    height: i32,

    /// Log file path (the terminal is occupied by the game)
    #[arg(long, default_value = "maze_runner.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.log_file)?;
    info!("application started");

    // The gateway connects and migrates on background tasks from the start,
    // overlapping with terminal setup.
    let leaderboard = Leaderboard::connect(StoreConfig::from_env());

    let config = GameConfig::new(cli.width, cli.height);
    let mut app = App::new(config, leaderboard);

    let result = app.run().await;
    if let Err(err) = &result {
        error!(error = %err, "application error");
    }
    info!("application exited");
    result
}

/// The grid must at least fit the spawned snake; zero or negative
/// dimensions would make cell sampling panic.
fn grid_dimension() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(4..)
}

fn setup_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_rejects_degenerate_grid_sizes() {
        assert!(Cli::try_parse_from(["maze-runner", "--width", "0"]).is_err());
        assert!(Cli::try_parse_from(["maze-runner", "--width", "-5"]).is_err());
        assert!(Cli::try_parse_from(["maze-runner", "--height", "0"]).is_err());
        assert!(Cli::try_parse_from(["maze-runner", "--height", "-5"]).is_err());
        assert!(Cli::try_parse_from(["maze-runner", "--width", "3"]).is_err());
    }

    #[test]
    fn test_cli_accepts_valid_grid_sizes() {
        let cli = Cli::try_parse_from(["maze-runner", "--width", "4", "--height", "40"]).unwrap();
        assert_eq!(cli.width, 4);
        assert_eq!(cli.height, 40);

        let cli = Cli::try_parse_from(["maze-runner"]).unwrap();
        assert_eq!(cli.width, 20);
        assert_eq!(cli.height, 20);
    }
}
