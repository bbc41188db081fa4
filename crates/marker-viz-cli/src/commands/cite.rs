//! Citation copy command.

use std::path::Path;

use anyhow::{Context, Result};
use marker_viz::clipboard::system_clipboard;
use marker_viz::{CopyLabel, copy_text};

pub fn run(input: &Path, copy: bool) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let text = text.trim_end();

    println!("{text}");

    if copy {
        let clipboard = system_clipboard();
        let label = CopyLabel::after(copy_text(clipboard.as_ref(), text));
        eprintln!("{label}");
    }

    Ok(())
}
