use std::sync::Arc;

use anyhow::Result;
use bloom::watering::{Progress, ProgressObserver};
use bloom::GiftContext;
use clap::Args;

#[derive(Args)]
pub struct WaterSubCommand {
    /// Gift link, or link to a stored gift
    reference: String,
    /// Times to water; waters until it blooms when omitted
    #[arg(short, long)]
    times: Option<u32>,
}

/// Prints a progress bar after every watering
#[derive(Debug)]
struct TerminalProgress;

impl ProgressObserver for TerminalProgress {
    fn on_progress(&self, progress: &Progress) {
        println!(
            "[{}{}] {}",
            "#".repeat(progress.completed as usize),
            ".".repeat(progress.remaining() as usize),
            progress.instruction()
        );
    }
}

pub async fn water(ctx: &GiftContext, sub_command_args: &WaterSubCommand) -> Result<()> {
    let mut session = ctx
        .open(&sub_command_args.reference)
        .await?
        .with_observer(Arc::new(TerminalProgress));

    println!(
        "A {} is waiting for you. {}",
        session.descriptor().flower(),
        session.progress().instruction()
    );

    let times = sub_command_args
        .times
        .unwrap_or_else(|| session.progress().remaining());

    let mut completion = session.completion().cloned();
    for _ in 0..times {
        if let Some(event) = session.advance() {
            completion = Some(event);
        }
    }

    let Some(event) = completion else {
        return Ok(());
    };

    let reveal = event.reveal();
    println!();
    println!("🌸 Your {} bloomed! ({})", reveal.flower, reveal.image);
    println!("   \"{}\"", reveal.message);
    if reveal.sparkle {
        println!("   ✨ ✨ ✨");
    }
    if let Some(music) = reveal.music {
        println!("   Now playing: {music}");
    }

    // The reveal stands even when the garden is unreachable
    match session.persist(&event).await {
        Ok(entry_id) => println!("Planted in your garden as {entry_id}"),
        Err(e) => {
            tracing::warn!("Could not plant gift {}: {}", session.entry_id(), e);
            let hint = if e.is_retryable() { " Try again later." } else { "" };
            eprintln!("Warning: the gift could not be added to your garden: {e}.{hint}");
        }
    }

    Ok(())
}
