//! Comparing one marker style against the "default" baseline.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{Axis, BarTrace, Color, Figure, Layout, Marker, Trace};
use crate::config::{DeltaPalette, VizConfig};
use crate::error::{Error, Result};
use crate::marker::MarkerDataset;
use crate::normalize::DEFAULT_STYLE;

/// Direction of an accuracy change relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaSign {
    /// Higher than baseline.
    Up,
    /// Lower than baseline.
    Down,
    /// Exactly equal to baseline.
    Neutral,
}

impl DeltaSign {
    /// Classify a delta. Only an exact zero is neutral.
    #[must_use]
    pub fn of(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Up
        } else if delta < 0.0 {
            Self::Down
        } else {
            Self::Neutral
        }
    }

    /// Palette color for this sign.
    #[must_use]
    pub fn color(self, palette: &DeltaPalette) -> &str {
        match self {
            Self::Up => &palette.up,
            Self::Down => &palette.down,
            Self::Neutral => &palette.neutral,
        }
    }
}

/// One model's line in the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Model name.
    pub model: String,
    /// Accuracy under "default".
    pub baseline_accuracy: f64,
    /// Accuracy under the selected style.
    pub accuracy: f64,
    /// `accuracy - baseline_accuracy`.
    pub delta: f64,
    /// Sign of `delta`.
    pub sign: DeltaSign,
    /// Rank under "default".
    pub baseline_rank: u32,
    /// Rank under the selected style.
    pub rank: u32,
    /// `baseline_rank - rank`; positive means the model moved up.
    pub rank_delta: i64,
}

/// Chart and table for one dataset/style selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonView {
    /// Dataset key.
    pub dataset: String,
    /// Style the caller asked for.
    pub requested_style: String,
    /// Style actually shown (falls back to "default").
    pub style: String,
    /// One row per model, in the dataset's model order.
    pub rows: Vec<ComparisonRow>,
    /// Baseline and selected bar series.
    pub chart: Figure,
}

/// Build the comparison of `selected` against "default" for one dataset.
///
/// An unknown `selected` style falls back to "default". A dataset without a
/// "default" style has no baseline and yields [`Error::MissingBaseline`].
pub fn compare(
    dataset: &str,
    data: &MarkerDataset,
    selected: &str,
    config: &VizConfig,
) -> Result<ComparisonView> {
    let baseline = data.style(DEFAULT_STYLE).ok_or_else(|| Error::MissingBaseline {
        dataset: dataset.to_string(),
    })?;

    let (style, series) = match data.style(selected) {
        Some(series) => (selected, series),
        None => {
            debug!(dataset, style = selected, "style not present, showing default");
            (DEFAULT_STYLE, baseline)
        }
    };

    // Series are aligned to `models`; anything past the shortest is skipped.
    let rows: Vec<ComparisonRow> = data
        .models
        .iter()
        .zip(baseline.accuracies.iter().zip(&baseline.ranks))
        .zip(series.accuracies.iter().zip(&series.ranks))
        .map(|((model, (&baseline_accuracy, &baseline_rank)), (&accuracy, &rank))| {
            let delta = accuracy - baseline_accuracy;
            ComparisonRow {
                model: model.clone(),
                baseline_accuracy,
                accuracy,
                delta,
                sign: DeltaSign::of(delta),
                baseline_rank,
                rank,
                rank_delta: i64::from(baseline_rank) - i64::from(rank),
            }
        })
        .collect();
    if rows.len() < data.models.len() {
        debug!(
            dataset,
            models = data.models.len(),
            rows = rows.len(),
            "series shorter than model list"
        );
    }

    let chart = comparison_chart(dataset, style, &rows, config);

    Ok(ComparisonView {
        dataset: dataset.to_string(),
        requested_style: selected.to_string(),
        style: style.to_string(),
        rows,
        chart,
    })
}

fn comparison_chart(
    dataset: &str,
    style: &str,
    rows: &[ComparisonRow],
    config: &VizConfig,
) -> Figure {
    let palette = &config.palette;
    let models: Vec<String> = rows.iter().map(|r| r.model.clone()).collect();

    let baseline = BarTrace {
        name: DEFAULT_STYLE.to_string(),
        x: models.clone(),
        y: rows.iter().map(|r| r.baseline_accuracy).collect(),
        marker: Marker::color(Color::Single(palette.baseline.clone())),
        text: None,
        textposition: None,
        hovertemplate: Some("%{x}<br>default: %{y:.2f}<extra></extra>".to_string()),
    };

    let selected = BarTrace {
        name: style.to_string(),
        x: models.clone(),
        y: rows.iter().map(|r| r.accuracy).collect(),
        marker: Marker::color(Color::PerPoint(
            rows.iter()
                .map(|r| r.sign.color(palette).to_string())
                .collect(),
        )),
        text: Some(rows.iter().map(|r| format_delta(r.delta)).collect()),
        textposition: Some("outside".to_string()),
        hovertemplate: Some(format!("%{{x}}<br>{style}: %{{y:.2f}} (%{{text}})<extra></extra>")),
    };

    let layout = Layout::new(&format!("{dataset}: {style} vs default"))
        .with_barmode("group")
        .with_xaxis(Axis::titled("Model").with_categories(models))
        .with_yaxis(Axis::titled("Accuracy (%)").with_range(config.y_range(dataset)));

    Figure::new(vec![Trace::Bar(baseline), Trace::Bar(selected)], layout)
}

/// Signed accuracy delta with two decimals (`+2.00`, `-0.35`).
#[must_use]
pub fn format_delta(delta: f64) -> String {
    format!("{delta:+.2}")
}

/// Signed rank change (`+1`, `-2`, `0`).
#[must_use]
pub fn format_rank_delta(delta: i64) -> String {
    if delta == 0 {
        "0".to_string()
    } else {
        format!("{delta:+}")
    }
}
