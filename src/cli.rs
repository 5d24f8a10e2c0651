use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "capnorm")]
#[command(about = "Normalize downloaded VTT captions and info.json sidecars into transcript JSON.")]
pub struct Args {
    /// Path to config TOML (defaults to ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize every VTT file in a directory and write a manifest
    Normalize(NormalizeCmd),
    /// Normalize a single VTT file and print the transcript JSON to stdout
    Inspect(InspectCmd),
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, Default, Parser)]
pub struct NormalizeCmd {
    /// Directory holding *.vtt files and their info.json sidecars
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory to write <videoId>.json files and the manifest into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Abort on the first file that fails to normalize
    #[arg(long)]
    pub fail_fast: bool,

    /// Leave transcripts with no segments out of the output
    #[arg(long)]
    pub skip_empty: bool,
}

#[derive(Debug, Parser)]
pub struct InspectCmd {
    /// VTT file to normalize
    pub input: PathBuf,

    /// Metadata sidecar (defaults to <videoId>.info.json next to the input)
    #[arg(long)]
    pub metadata: Option<PathBuf>,
}
