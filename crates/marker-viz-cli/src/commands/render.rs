//! HTML page command.

use std::path::Path;

use anyhow::{Context, Result};
use marker_viz::{PageBundle, render_html};
use tracing::info;

pub fn run(
    data_dir: &Path,
    output: &Path,
    json: Option<&Path>,
    citation: Option<&Path>,
) -> Result<()> {
    let citation = citation
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read citation from {}", path.display()))
        })
        .transpose()?;

    let controller = super::load(data_dir);
    let bundle = PageBundle::build(&controller, citation.map(|c| c.trim_end().to_string()));

    let html = render_html(&bundle).context("Failed to render page")?;
    std::fs::write(output, html)
        .with_context(|| format!("Failed to write to {}", output.display()))?;

    let views: usize = bundle.datasets.values().map(|d| d.views.len()).sum();
    println!(
        "Rendered {} dataset(s), {} view(s){}",
        bundle.datasets.len(),
        views,
        if bundle.ranks.is_some() { ", rank panels" } else { "" }
    );
    println!("Saved to: {}", output.display());

    if let Some(json_path) = json {
        std::fs::write(json_path, bundle.to_json()?)
            .with_context(|| format!("Failed to write to {}", json_path.display()))?;
        info!(path = %json_path.display(), "wrote view bundle");
    }

    Ok(())
}
