//! Rendering configuration.
//!
//! Holds where the CSV resources live and the hand-tuned display choices
//! (per-dataset y-axis ranges and the delta palette).

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::normalize::{DA2K, DEFAULT_STYLE, SPAIR};

/// A fixed axis range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl AxisRange {
    /// Create a new range.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Colors used by the comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaPalette {
    /// Bars of the baseline series.
    pub baseline: String,
    /// Selected style scored higher than the baseline.
    pub up: String,
    /// Selected style scored lower than the baseline.
    pub down: String,
    /// No change.
    pub neutral: String,
}

impl Default for DeltaPalette {
    fn default() -> Self {
        Self {
            baseline: "#b0b7c3".to_string(),
            up: "#2e9d5b".to_string(),
            down: "#d64545".to_string(),
            neutral: "#8a8f98".to_string(),
        }
    }
}

/// Configuration for loading and rendering.
#[derive(Debug, Clone)]
pub struct VizConfig {
    /// Root that resource paths are resolved against.
    pub data_dir: PathBuf,

    /// Marker accuracy CSV, relative to `data_dir`.
    pub marker_path: PathBuf,

    /// JPEG rank CSV, relative to `data_dir`.
    pub jpeg_path: PathBuf,

    /// Hand-tuned y-axis range per dataset. Datasets without an entry
    /// autorange.
    pub y_ranges: BTreeMap<String, AxisRange>,

    /// Chart colors.
    pub palette: DeltaPalette,

    /// Dataset shown first.
    pub initial_dataset: String,

    /// Marker style shown first.
    pub initial_style: String,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl VizConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> VizConfigBuilder {
        VizConfigBuilder::default()
    }

    /// The y-axis range for a dataset, if one is configured.
    #[must_use]
    pub fn y_range(&self, dataset: &str) -> Option<AxisRange> {
        self.y_ranges.get(dataset).copied()
    }
}

/// Builder for [`VizConfig`].
#[derive(Debug, Default)]
pub struct VizConfigBuilder {
    data_dir: Option<PathBuf>,
    marker_path: Option<PathBuf>,
    jpeg_path: Option<PathBuf>,
    y_ranges: Option<BTreeMap<String, AxisRange>>,
    palette: Option<DeltaPalette>,
    initial_dataset: Option<String>,
    initial_style: Option<String>,
}

impl VizConfigBuilder {
    /// Set the data root directory.
    #[must_use]
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Set the marker accuracy CSV path.
    #[must_use]
    pub fn marker_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.marker_path = Some(path.into());
        self
    }

    /// Set the JPEG rank CSV path.
    #[must_use]
    pub fn jpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.jpeg_path = Some(path.into());
        self
    }

    /// Set or replace the y-axis range of one dataset.
    #[must_use]
    pub fn y_range(mut self, dataset: impl Into<String>, range: AxisRange) -> Self {
        self.y_ranges
            .get_or_insert_with(default_y_ranges)
            .insert(dataset.into(), range);
        self
    }

    /// Set the chart palette.
    #[must_use]
    pub fn palette(mut self, palette: DeltaPalette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Set the dataset shown first.
    #[must_use]
    pub fn initial_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.initial_dataset = Some(dataset.into());
        self
    }

    /// Set the marker style shown first.
    #[must_use]
    pub fn initial_style(mut self, style: impl Into<String>) -> Self {
        self.initial_style = Some(style.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> VizConfig {
        VizConfig {
            data_dir: self.data_dir.unwrap_or_else(|| PathBuf::from("assets")),
            marker_path: self
                .marker_path
                .unwrap_or_else(|| PathBuf::from("data/marker_acc.csv")),
            jpeg_path: self
                .jpeg_path
                .unwrap_or_else(|| PathBuf::from("data/jpeg_rank.csv")),
            y_ranges: self.y_ranges.unwrap_or_else(default_y_ranges),
            palette: self.palette.unwrap_or_default(),
            initial_dataset: self.initial_dataset.unwrap_or_else(|| DA2K.to_string()),
            initial_style: self
                .initial_style
                .unwrap_or_else(|| DEFAULT_STYLE.to_string()),
        }
    }
}

fn default_y_ranges() -> BTreeMap<String, AxisRange> {
    BTreeMap::from([
        (DA2K.to_string(), AxisRange::new(50.0, 100.0)),
        (SPAIR.to_string(), AxisRange::new(0.0, 60.0)),
    ])
}
