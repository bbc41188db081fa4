//! JPEG rank range command.

use std::path::Path;

use anyhow::{Result, bail};

pub fn run(data_dir: &Path, json: bool) -> Result<()> {
    let controller = super::load(data_dir);
    let Some(view) = controller.rank_view() else {
        bail!("JPEG rank data unavailable (see log)");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    for panel in &view.panels {
        println!("{} ({} models)", panel.benchmark, panel.models.len());
        println!("{:<24} {:>8} {:>5} {:>5}  Variants", "Model", "Default", "Best", "Worst");
        println!("{:-<70}", "");
        for range in &panel.models {
            let variants: Vec<String> = range
                .variants
                .iter()
                .map(|(quality, rank)| format!("{}={}", quality, rank))
                .collect();
            println!(
                "{:<24} {:>8} {:>5} {:>5}  {}",
                range.model,
                range.default_rank.map_or("-".to_string(), |r| r.to_string()),
                range.min_rank,
                range.max_rank,
                variants.join(" ")
            );
        }
        println!();
    }

    Ok(())
}
