use clap::{Parser, ValueEnum};
use dirsync_core::StrategyChoice;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dirsync")]
#[command(about = "Synchronise two local directories")]
#[command(version)]
pub struct Cli {
    /// Path to the source directory
    pub source: PathBuf,
    /// Path to the destination directory
    pub destination: PathBuf,
    /// Copy files wholesale (default) or send rolling deltas
    #[arg(long, value_enum, default_value = "copy")]
    pub strategy: Strategy,
    /// Block size (bytes) for the delta strategy
    #[arg(long, value_name = "BYTES", allow_hyphen_values = true)]
    pub block_size: Option<i64>,
    /// Preview sync actions without modifying the destination
    #[arg(long)]
    pub dry_run: bool,
    /// Print each action as it occurs
    #[arg(long, short = 'v')]
    pub verbose: bool,
    /// Show an interactive progress indicator
    #[arg(long, short = 'p')]
    pub progress: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Copy,
    Delta,
}

impl From<Strategy> for StrategyChoice {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Copy => StrategyChoice::Copy,
            Strategy::Delta => StrategyChoice::Delta,
        }
    }
}
