//! Marker-style comparison command.

use std::path::Path;

use anyhow::{Context, Result};
use marker_viz::marker::compare::{format_delta, format_rank_delta};

pub fn run(data_dir: &Path, dataset: &str, style: &str, json: bool) -> Result<()> {
    let mut controller = super::load(data_dir);

    controller
        .select_dataset(dataset)
        .with_context(|| format!("Cannot show dataset '{}'", dataset))?;
    let view = controller
        .select_style(style)
        .with_context(|| format!("Cannot show style '{}'", style))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.style != view.requested_style {
        println!(
            "Style '{}' not present in {}, showing default",
            view.requested_style, view.dataset
        );
    }
    println!("{}: {} vs default ({} models)", view.dataset, view.style, view.rows.len());
    println!();
    println!(
        "{:<24} {:>9} {:>9} {:>8} {:>6} {:>6} {:>7}",
        "Model", "Default", "Selected", "Delta", "Rank0", "Rank", "dRank"
    );
    println!("{:-<75}", "");

    for row in &view.rows {
        println!(
            "{:<24} {:>9.2} {:>9.2} {:>8} {:>6} {:>6} {:>7}",
            row.model,
            row.baseline_accuracy,
            row.accuracy,
            format_delta(row.delta),
            row.baseline_rank,
            row.rank,
            format_rank_delta(row.rank_delta)
        );
    }

    Ok(())
}
