//! Subcommand implementations.

pub mod cite;
pub mod compare;
pub mod ranks;
pub mod render;

use std::path::Path;

use marker_viz::{Controller, DirSource, VizConfig};

/// Load both resources from `data_dir` with the default layout.
fn load(data_dir: &Path) -> Controller {
    let config = VizConfig::builder().data_dir(data_dir).build();
    let source = DirSource::new(&config.data_dir);
    Controller::startup(&source, config)
}
