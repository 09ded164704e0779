use anyhow::Result;
use bloom::garden::GardenLayout;
use bloom::GiftContext;
use clap::Args;

#[derive(Args)]
pub struct GardenSubCommand {
    /// Also print where each flower sits on a canvas this many pixels wide
    #[arg(long)]
    viewport: Option<u32>,
}

pub async fn garden(ctx: &GiftContext, sub_command_args: &GardenSubCommand) -> Result<()> {
    let entries = ctx.garden().await?;

    if entries.is_empty() {
        println!("Your garden is empty. Water a gift to plant your first flower.");
        return Ok(());
    }

    println!("Your garden has {} flower(s):", entries.len());
    for entry in &entries {
        println!(
            "{}  {:<9}  {:<6}  {}  {}",
            entry.id,
            entry.descriptor.flower(),
            entry.descriptor.theme(),
            entry.received_at,
            entry.descriptor.message()
        );
    }

    if let Some(viewport) = sub_command_args.viewport {
        let layout = GardenLayout::compute(entries.len(), viewport);
        println!();
        println!(
            "Canvas {}x{} ({} columns, {} rows)",
            layout.width, layout.height, layout.cols, layout.rows
        );
        for (tile, entry) in layout.tiles.iter().zip(&entries) {
            println!(
                "  {:<9} col {} row {} at ({}, {})",
                entry.descriptor.flower(),
                tile.col,
                tile.row,
                tile.x,
                tile.y
            );
        }
    }

    Ok(())
}
