use crate::cli::RenderArgs;
use crate::report::render_block;
use crate::splice::{splice, Placement};
use crate::store;
use anyhow::Context;
use std::fs;
use tracing::info;

pub fn exec(args: &RenderArgs) -> anyhow::Result<()> {
    let stats = store::load(&args.stats)
        .with_context(|| format!("Failed to read {}", args.stats.display()))?;

    let Some(stats) = stats else {
        println!("Statistics file {} not found.", args.stats.display());
        return Ok(());
    };

    let Some(block) = render_block(&stats, args.top) else {
        println!("No statistics to update.");
        return Ok(());
    };

    let document = match fs::read_to_string(&args.readme) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", args.readme.display()))
        }
    };

    let (updated, placement) = splice(&document, &block);

    if args.dry_run {
        print!("{updated}");
        return Ok(());
    }

    if updated == document {
        println!("{} is already up to date.", args.readme.display());
        return Ok(());
    }

    fs::write(&args.readme, &updated)
        .with_context(|| format!("Failed to write {}", args.readme.display()))?;

    let how = match placement {
        Placement::Replaced => "replaced existing section",
        Placement::BeforeBadge => "inserted before Top Languages badge",
        Placement::Appended => "appended section",
    };
    info!("{}: {how}", args.readme.display());
    println!("{} updated successfully!", args.readme.display());
    Ok(())
}
