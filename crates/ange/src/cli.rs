//! CLI structure using clap

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ange")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Template file, directory or glob pattern
    #[arg(default_value = ".")]
    pub input: String,

    /// Output path (only used when INPUT is a single file)
    pub output: Option<PathBuf>,

    /// Search directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Recompile templates as they change
    #[arg(short, long)]
    pub watch: bool,

    /// Exit with an error when any template fails to compile
    #[arg(long)]
    pub strict: bool,

    /// Config file (defaults to ./ange.toml when present)
    #[arg(short, long, env = "ANGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}
