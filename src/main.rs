use anyhow::Result;
use clap::Parser;

use caption_normalizer::{cli, config, metadata::SystemClock, pipeline};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "capnorm starting");

    match args.command {
        cli::Command::Normalize(cmd) => {
            let report = pipeline::run_normalize(cmd, &cfg, &SystemClock)?;
            for f in &report.failures {
                eprintln!("failed: {} ({})", f.video_id, f.reason);
            }
            println!(
                "Normalized {} transcripts ({} segments), {} failed, {} skipped",
                report.manifest.total_videos,
                report.total_segments,
                report.failures.len(),
                report.skipped.len()
            );
            Ok(())
        }
        cli::Command::Inspect(cmd) => pipeline::run_inspect(cmd, &cfg, &SystemClock),
        cli::Command::PrintDefaultConfig => {
            let s = cfg.to_toml_pretty()?;
            print!("{s}");
            Ok(())
        }
    }
}
