use anyhow::Result;
use bloom::gift::{encode, gift_page, FlowerKind, GiftDescriptor, Theme};
use clap::Args;
use url::Url;

use crate::config::Settings;

#[derive(Args)]
pub struct LinkSubCommand {
    /// Flower to send
    #[arg(short, long, default_value = "Rose")]
    flower: FlowerKind,
    /// Message revealed when the flower blooms
    #[arg(short, long, default_value = "")]
    message: String,
    /// Page theme
    #[arg(short, long, default_value = "spring")]
    theme: Theme,
    /// Waterings needed before it blooms (1-10)
    #[arg(short, long, default_value_t = 3, allow_negative_numbers = true)]
    clicks: i64,
    /// Music played on reveal
    #[arg(long)]
    music: Option<String>,
    /// Do not attach the default music
    #[arg(long, conflicts_with = "music")]
    no_music: bool,
    /// Sparkle on reveal
    #[arg(long)]
    sparkle: bool,
    /// Builder page the link is resolved against
    #[arg(long)]
    builder_url: Option<Url>,
}

pub fn link(settings: &Settings, sub_command_args: &LinkSubCommand) -> Result<()> {
    let builder_url = match &sub_command_args.builder_url {
        Some(url) => url.clone(),
        None => Url::parse(&settings.info.builder_url)?,
    };

    let music = match (&sub_command_args.music, sub_command_args.no_music) {
        (Some(music), _) => Some(music.clone()),
        (None, true) => None,
        (None, false) => settings.info.default_music.clone(),
    };

    let descriptor = GiftDescriptor::new(
        sub_command_args.flower,
        &sub_command_args.message,
        sub_command_args.theme,
        sub_command_args.clicks,
        music,
        sub_command_args.sparkle,
    );

    if i64::from(descriptor.required_interactions()) != sub_command_args.clicks {
        eprintln!(
            "Waterings set to {} (allowed range is 1-10)",
            descriptor.required_interactions()
        );
    }

    println!("{}", encode(&descriptor, &gift_page(&builder_url)));

    Ok(())
}
