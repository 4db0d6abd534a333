mod cli;
mod summary;

use std::time::{Duration, Instant};

use clap::Parser;
use eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use dirsync_core::{logger, mirror, FileSyncer, MirrorOptions};

use crate::cli::Cli;
use crate::summary::{print_action, print_delta_stats, print_summary};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    logger::init(args.verbose);

    let mut syncer = FileSyncer::from_options(args.strategy.into(), args.block_size)?;

    let progress_bar = if !args.progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap()
                .tick_strings(&["-", "\\", "|", "/"]),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message(format!(
            "Mirroring {} → {}",
            args.source.display(),
            args.destination.display()
        ));
        Some(pb)
    };

    let echo_actions = args.verbose || args.dry_run;
    let options = MirrorOptions {
        dry_run: args.dry_run,
    };

    let start = Instant::now();
    let result = mirror(
        &args.source,
        &args.destination,
        &mut syncer,
        options,
        |action| {
            if echo_actions {
                match &progress_bar {
                    Some(pb) => pb.suspend(|| print_action(action)),
                    None => print_action(action),
                }
            }
        },
    );

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let run = result.with_context(|| {
        format!(
            "failed to mirror {} to {}",
            args.source.display(),
            args.destination.display()
        )
    })?;
    let elapsed = start.elapsed();

    print_summary(&run, args.dry_run, elapsed);
    if syncer.is_delta() {
        print_delta_stats(syncer.ledger(), &args.destination);
    }

    Ok(())
}
