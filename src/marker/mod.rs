//! Marker-style accuracy data.
//!
//! Rows of `marker_acc.csv` become [`MarkerRecord`]s, which are grouped into
//! one [`MarkerDataset`] per dataset. Within a dataset every style's series is
//! aligned index-for-index with [`MarkerDataset::models`].
//!
//! ## Example
//!
//! ```
//! use marker_viz::marker::{MarkerRecord, build_marker_datasets};
//!
//! let records = vec![
//!     MarkerRecord::new("DA2k", "default", "A", 80.0, 2),
//!     MarkerRecord::new("DA2k", "default", "B", 90.0, 1),
//!     MarkerRecord::new("DA2k", "color_blue", "A", 82.0, 1),
//! ];
//!
//! let datasets = build_marker_datasets(&records);
//! assert_eq!(datasets["DA2k"].models, vec!["A"]);
//! ```

pub mod compare;

pub use compare::{ComparisonRow, ComparisonView, DeltaSign, compare};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::import::{CsvTable, DataSource};
use crate::normalize::{DEFAULT_STYLE, normalize_dataset_key, normalize_marker_style_key};

/// Columns `marker_acc.csv` must carry, looked up by name.
pub const REQUIRED_COLUMNS: [&str; 5] = ["dataset", "model", "marker_style", "accuracy", "rank"];

/// One validated row of marker accuracy data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    /// Canonical dataset key.
    pub dataset: String,
    /// Canonical marker-style key.
    pub marker_style: String,
    /// Model name.
    pub model: String,
    /// Accuracy (percent).
    pub accuracy: f64,
    /// 1-based rank within the dataset/style group.
    pub rank: u32,
}

impl MarkerRecord {
    /// Create a record from already-canonical fields.
    #[must_use]
    pub fn new(
        dataset: impl Into<String>,
        marker_style: impl Into<String>,
        model: impl Into<String>,
        accuracy: f64,
        rank: u32,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            marker_style: marker_style.into(),
            model: model.into(),
            accuracy,
            rank,
        }
    }

    /// Extract records from a parsed table.
    ///
    /// Columns are found by header name, in any order. A missing column fails
    /// the whole table; a row with an empty key or an unparseable number is
    /// dropped.
    pub fn from_table(table: &CsvTable, resource: &str) -> Result<Vec<Self>> {
        let indices: Vec<Option<usize>> = REQUIRED_COLUMNS
            .iter()
            .map(|name| table.find_column(name))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(&indices)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Schema {
                resource: resource.to_string(),
                missing,
            });
        }

        let idx: Vec<usize> = indices.into_iter().flatten().collect();
        let (dataset_idx, model_idx, style_idx, accuracy_idx, rank_idx) =
            (idx[0], idx[1], idx[2], idx[3], idx[4]);

        let records = table
            .usable_rows()
            .filter_map(|row| {
                let dataset = normalize_dataset_key(&row[dataset_idx]);
                let model = row[model_idx].trim().to_string();
                let marker_style = normalize_marker_style_key(&row[style_idx]);
                if dataset.is_empty() || model.is_empty() || marker_style.is_empty() {
                    return None;
                }

                let accuracy = parse_finite(&row[accuracy_idx])?;
                let rank = parse_rank(&row[rank_idx])?;

                Some(Self {
                    dataset,
                    marker_style,
                    model,
                    accuracy,
                    rank,
                })
            })
            .collect();

        Ok(records)
    }
}

/// Parse a finite float.
pub(crate) fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a positive integer rank. Integral floats such as `"2.0"` are accepted.
pub(crate) fn parse_rank(s: &str) -> Option<u32> {
    let s = s.trim();
    let rank = match s.parse::<u32>() {
        Ok(rank) => rank,
        Err(_) => {
            let v = parse_finite(s)?;
            if v.fract() != 0.0 || v < 0.0 || v > f64::from(u32::MAX) {
                return None;
            }
            v as u32
        }
    };
    (rank >= 1).then_some(rank)
}

/// Accuracies and ranks of one marker style, aligned to the dataset's models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSeries {
    /// Accuracy per model.
    pub accuracies: Vec<f64>,
    /// Rank per model.
    pub ranks: Vec<u32>,
}

/// All marker styles of one dataset over a common model ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerDataset {
    /// Models present under every style, in baseline order.
    pub models: Vec<String>,
    /// Series per style key.
    pub styles: BTreeMap<String, StyleSeries>,
}

impl MarkerDataset {
    /// Get a style's series.
    #[must_use]
    pub fn style(&self, key: &str) -> Option<&StyleSeries> {
        self.styles.get(key)
    }

    /// Whether the dataset has a "default" style to compare against.
    #[must_use]
    pub fn has_baseline(&self) -> bool {
        self.styles.contains_key(DEFAULT_STYLE)
    }

    /// Style keys with "default" first and the rest in sorted order.
    #[must_use]
    pub fn style_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.styles.len());
        if self.has_baseline() {
            names.push(DEFAULT_STYLE);
        }
        names.extend(
            self.styles
                .keys()
                .map(String::as_str)
                .filter(|k| *k != DEFAULT_STYLE),
        );
        names
    }
}

/// Per-style lookup from model to (accuracy, rank), remembering first-seen order.
#[derive(Default)]
struct StyleGroup {
    order: Vec<String>,
    values: HashMap<String, (f64, u32)>,
}

impl StyleGroup {
    fn insert(&mut self, model: &str, accuracy: f64, rank: u32) {
        if self
            .values
            .insert(model.to_string(), (accuracy, rank))
            .is_none()
        {
            self.order.push(model.to_string());
        }
    }
}

#[derive(Default)]
struct DatasetGroup {
    all_models: Vec<String>,
    seen: HashSet<String>,
    styles: BTreeMap<String, StyleGroup>,
}

/// Group records into one [`MarkerDataset`] per dataset.
///
/// The model ordering is the "default" style's first-seen order, or every
/// model's first-seen order when the dataset has no "default" style. Only
/// models present under every style are kept. A repeated (style, model) pair
/// keeps the last value.
#[must_use]
pub fn build_marker_datasets(records: &[MarkerRecord]) -> BTreeMap<String, MarkerDataset> {
    let mut groups: BTreeMap<String, DatasetGroup> = BTreeMap::new();

    for record in records {
        let group = groups.entry(record.dataset.clone()).or_default();
        if group.seen.insert(record.model.clone()) {
            group.all_models.push(record.model.clone());
        }
        group
            .styles
            .entry(record.marker_style.clone())
            .or_default()
            .insert(&record.model, record.accuracy, record.rank);
    }

    groups
        .into_iter()
        .map(|(dataset, group)| (dataset, build_dataset(group)))
        .collect()
}

fn build_dataset(group: DatasetGroup) -> MarkerDataset {
    let candidates = match group.styles.get(DEFAULT_STYLE) {
        Some(baseline) => &baseline.order,
        None => &group.all_models,
    };

    let models: Vec<String> = candidates
        .iter()
        .filter(|model| {
            group
                .styles
                .values()
                .all(|style| style.values.contains_key(model.as_str()))
        })
        .cloned()
        .collect();

    let styles = group
        .styles
        .iter()
        .map(|(key, style)| {
            let (accuracies, ranks): (Vec<f64>, Vec<u32>) = models
                .iter()
                .filter_map(|model| style.values.get(model))
                .copied()
                .unzip();
            (key.clone(), StyleSeries { accuracies, ranks })
        })
        .collect();

    MarkerDataset { models, styles }
}

/// Fetch, parse and group the marker accuracy resource.
pub fn load_marker_data(
    source: &dyn DataSource,
    path: &Path,
) -> Result<BTreeMap<String, MarkerDataset>> {
    let text = source.fetch(path)?;
    let table = CsvTable::parse(&text)?;
    let records = MarkerRecord::from_table(&table, &path.display().to_string())?;
    let datasets = build_marker_datasets(&records);

    debug!(
        path = %path.display(),
        records = records.len(),
        datasets = datasets.len(),
        "loaded marker data"
    );

    Ok(datasets)
}
