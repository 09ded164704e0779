use std::str::FromStr;

use anyhow::Result;
use bloom::garden::EntryId;
use bloom::gift::{encode_stored, gift_page};
use bloom::GiftContext;
use clap::Args;
use url::Url;

use crate::config::Settings;

#[derive(Args)]
pub struct ShowSubCommand {
    /// Garden entry id
    #[arg(value_parser = EntryId::from_str)]
    entry_id: EntryId,
}

pub async fn show(
    ctx: &GiftContext,
    settings: &Settings,
    sub_command_args: &ShowSubCommand,
) -> Result<()> {
    let entry = ctx.entry(&sub_command_args.entry_id).await?;
    let descriptor = &entry.descriptor;

    println!("Entry:    {}", entry.id);
    println!("Owner:    {}", entry.owner);
    println!("Flower:   {}", descriptor.flower());
    println!("Message:  {}", descriptor.message());
    println!(
        "Theme:    {} ({})",
        descriptor.theme(),
        descriptor.theme().background_color()
    );
    println!("Waterings: {}", descriptor.required_interactions());
    println!("Sparkle:  {}", descriptor.sparkle());
    if let Some(music) = descriptor.music() {
        println!("Music:    {music}");
    }
    if let Some(source) = entry.source {
        println!("Opened from: {source}");
    }
    println!("Bloomed:  {}", entry.received_at);

    let builder_url = Url::parse(&settings.info.builder_url)?;
    println!(
        "Share:    {}",
        encode_stored(&entry.id, &gift_page(&builder_url))
    );

    Ok(())
}
