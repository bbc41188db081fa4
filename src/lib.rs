//! # marker-viz
//!
//! Comparison charts for marker-style and JPEG-compression benchmark results.
//!
//! Small CSV resources are parsed, normalized and grouped into per-dataset
//! tables, then turned into declarative chart descriptions ([`chart::Figure`])
//! and comparison tables. A [`Controller`] holds the current selection and
//! recomputes views as it changes; [`page`] bundles every view into a
//! standalone HTML page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marker_viz::{Controller, DirSource, VizConfig};
//!
//! let config = VizConfig::builder().data_dir("assets").build();
//! let source = DirSource::new(&config.data_dir);
//! let mut controller = Controller::startup(&source, config);
//!
//! let view = controller.select_style("Color Blue")?;
//! for row in &view.rows {
//!     println!("{} {:+.2}", row.model, row.delta);
//! }
//! # Ok::<(), marker_viz::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`import`]: CSV reading and resource fetching
//! - [`normalize`]: canonical dataset and marker-style keys
//! - [`marker`]: marker accuracy datasets and baseline comparison
//! - [`jpeg`]: rank ranges under JPEG compression
//! - [`chart`]: trace/layout/config figure descriptions
//! - [`controller`]: selection state and startup loading
//! - [`page`]: standalone HTML output
//! - [`clipboard`]: citation copy

pub mod chart;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod import;
pub mod jpeg;
pub mod marker;
pub mod normalize;
pub mod page;

// Re-export commonly used types
pub use chart::Figure;
pub use clipboard::{Clipboard, CopyLabel, copy_text};
pub use config::{AxisRange, DeltaPalette, VizConfig};
pub use controller::{Controller, RenderState};
pub use error::{Error, Result};
pub use import::{CsvTable, DataSource, DirSource};
pub use jpeg::{JpegRankRecord, RankRangeView, render_rank_range};
pub use marker::{
    ComparisonRow, ComparisonView, DeltaSign, MarkerDataset, MarkerRecord, StyleSeries,
    build_marker_datasets, compare,
};
pub use normalize::{normalize_dataset_key, normalize_marker_style_key};
pub use page::{PageBundle, render_html};
