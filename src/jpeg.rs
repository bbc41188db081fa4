//! Rank stability under JPEG compression.
//!
//! `jpeg_rank.csv` lists, per benchmark and model, the model's rank at each
//! JPEG quality setting. For every model the chart shows the span between its
//! best and worst rank plus a marker at its rank on uncompressed input.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{Axis, Color, Figure, Layout, Line, Marker, ScatterTrace, Trace};
use crate::error::Result;
use crate::import::{CsvTable, DataSource};
use crate::marker::parse_rank;
use crate::normalize::{DA2K, DEFAULT_STYLE, SPAIR, normalize_dataset_key};

/// Benchmarks drawn, one panel each, in panel order.
pub const BENCHMARKS: [&str; 2] = [DA2K, SPAIR];

/// Sort position of a model with no default-quality rank.
pub const MISSING_RANK: u32 = 9999;

/// Sort position of the "default" quality, after every other label.
pub const DEFAULT_QUALITY_ORDER: u32 = u32::MAX;

/// Sort position of a label with no trailing number.
pub const UNNUMBERED_QUALITY_ORDER: u32 = u32::MAX - 1;

const RANGE_COLOR: &str = "#9aa5b8";
const DEFAULT_MARKER_COLOR: &str = "#1f5fbf";

/// One row of JPEG rank data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JpegRankRecord {
    /// Canonical benchmark key.
    pub benchmark: String,
    /// Model name.
    pub model: String,
    /// Quality setting label (`"default"`, `"jpeg70"`, ...).
    pub jpeg_quality: String,
    /// 1-based rank.
    pub rank: u32,
}

impl JpegRankRecord {
    /// Create a record.
    #[must_use]
    pub fn new(benchmark: &str, model: &str, jpeg_quality: &str, rank: u32) -> Self {
        Self {
            benchmark: benchmark.to_string(),
            model: model.to_string(),
            jpeg_quality: jpeg_quality.to_string(),
            rank,
        }
    }

    /// Extract records from the first four columns of each row, whatever the
    /// header names. Rows with empty fields or an invalid rank are dropped.
    #[must_use]
    pub fn from_table(table: &CsvTable) -> Vec<Self> {
        table
            .usable_rows()
            .filter_map(|row| {
                let [benchmark, model, quality, rank] = row.get(..4)? else {
                    return None;
                };
                let benchmark = normalize_dataset_key(benchmark);
                let quality = quality.trim().to_lowercase();
                if benchmark.is_empty() || model.is_empty() || quality.is_empty() {
                    return None;
                }
                Some(Self {
                    benchmark,
                    model: model.clone(),
                    jpeg_quality: quality,
                    rank: parse_rank(rank)?,
                })
            })
            .collect()
    }
}

/// Order key for a quality label: its trailing number. Labels without a
/// number come after every numbered quality, and "default" comes last.
///
/// ```
/// use marker_viz::jpeg::{quality_order, DEFAULT_QUALITY_ORDER};
///
/// assert_eq!(quality_order("jpeg70"), 70);
/// assert_eq!(quality_order("default"), DEFAULT_QUALITY_ORDER);
/// ```
#[must_use]
pub fn quality_order(quality: &str) -> u32 {
    if quality == DEFAULT_STYLE {
        return DEFAULT_QUALITY_ORDER;
    }
    let digits_start = quality
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    let Some(i) = digits_start else {
        return UNNUMBERED_QUALITY_ORDER;
    };
    // Numbered labels stay ahead of the sentinels, even when they overflow.
    quality[i..]
        .parse::<u32>()
        .unwrap_or(u32::MAX)
        .min(UNNUMBERED_QUALITY_ORDER - 1)
}

/// Rank spread of one model across quality settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRankRange {
    /// Model name.
    pub model: String,
    /// Best (smallest) rank.
    pub min_rank: u32,
    /// Worst (largest) rank.
    pub max_rank: u32,
    /// Rank at the default quality, if present.
    pub default_rank: Option<u32>,
    /// (quality, rank) pairs in quality order.
    pub variants: Vec<(String, u32)>,
}

impl ModelRankRange {
    /// Hover text listing every quality's rank.
    #[must_use]
    pub fn tooltip(&self) -> String {
        let mut text = format!("<b>{}</b>", self.model);
        for (quality, rank) in &self.variants {
            let _ = write!(text, "<br>{quality}: {rank}");
        }
        text
    }
}

/// One benchmark's panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankPanel {
    /// Benchmark key.
    pub benchmark: String,
    /// Models ordered by default-quality rank.
    pub models: Vec<ModelRankRange>,
    /// Range segments plus default-quality markers.
    pub chart: Figure,
}

/// Both benchmark panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRangeView {
    /// Panels in [`BENCHMARKS`] order.
    pub panels: Vec<RankPanel>,
}

impl RankRangeView {
    /// Get a benchmark's panel.
    #[must_use]
    pub fn panel(&self, benchmark: &str) -> Option<&RankPanel> {
        self.panels.iter().find(|p| p.benchmark == benchmark)
    }
}

/// Group rank records into the two-panel range view.
///
/// Records for other benchmarks are ignored. A repeated (model, quality)
/// pair keeps the last rank.
#[must_use]
pub fn render_rank_range(records: &[JpegRankRecord]) -> RankRangeView {
    let panels = BENCHMARKS
        .iter()
        .map(|benchmark| {
            let models = model_ranges(records.iter().filter(|r| r.benchmark == *benchmark));
            let chart = range_chart(benchmark, &models);
            RankPanel {
                benchmark: (*benchmark).to_string(),
                models,
                chart,
            }
        })
        .collect();

    RankRangeView { panels }
}

fn model_ranges<'a>(records: impl Iterator<Item = &'a JpegRankRecord>) -> Vec<ModelRankRange> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_model: HashMap<&str, Vec<(String, u32)>> = HashMap::new();

    for record in records {
        let variants = by_model.entry(record.model.as_str()).or_insert_with(|| {
            order.push(record.model.as_str());
            Vec::new()
        });
        match variants.iter_mut().find(|v| v.0 == record.jpeg_quality) {
            Some(entry) => entry.1 = record.rank,
            None => variants.push((record.jpeg_quality.clone(), record.rank)),
        }
    }

    let mut ranges: Vec<ModelRankRange> = order
        .into_iter()
        .filter_map(|model| {
            let mut variants = by_model.remove(model)?;
            variants.sort_by(|a, b| {
                quality_order(&a.0)
                    .cmp(&quality_order(&b.0))
                    .then_with(|| a.0.cmp(&b.0))
            });
            let min_rank = variants.iter().map(|v| v.1).min()?;
            let max_rank = variants.iter().map(|v| v.1).max()?;
            let default_rank = variants
                .iter()
                .find(|v| v.0 == DEFAULT_STYLE)
                .map(|v| v.1);
            Some(ModelRankRange {
                model: model.to_string(),
                min_rank,
                max_rank,
                default_rank,
                variants,
            })
        })
        .collect();

    ranges.sort_by_key(|r| r.default_rank.unwrap_or(MISSING_RANK));
    ranges
}

fn range_chart(benchmark: &str, models: &[ModelRankRange]) -> Figure {
    let mut seg_x = Vec::with_capacity(models.len() * 3);
    let mut seg_y = Vec::with_capacity(models.len() * 3);
    let mut seg_text = Vec::with_capacity(models.len() * 3);
    for range in models {
        let tooltip = range.tooltip();
        seg_x.extend([Some(range.model.clone()), Some(range.model.clone()), None]);
        seg_y.extend([
            Some(f64::from(range.min_rank)),
            Some(f64::from(range.max_rank)),
            None,
        ]);
        seg_text.extend([Some(tooltip.clone()), Some(tooltip), None]);
    }

    let segments = ScatterTrace {
        name: "Rank range".to_string(),
        x: seg_x,
        y: seg_y,
        mode: "lines".to_string(),
        line: Some(Line {
            color: RANGE_COLOR.to_string(),
            width: 8.0,
        }),
        marker: None,
        text: Some(seg_text),
        hoverinfo: Some("text".to_string()),
        showlegend: true,
    };

    let with_default: Vec<&ModelRankRange> =
        models.iter().filter(|r| r.default_rank.is_some()).collect();
    let markers = ScatterTrace {
        name: "Default quality".to_string(),
        x: with_default.iter().map(|r| Some(r.model.clone())).collect(),
        y: with_default
            .iter()
            .map(|r| r.default_rank.map(f64::from))
            .collect(),
        mode: "markers".to_string(),
        line: None,
        marker: Some(Marker {
            color: Color::Single(DEFAULT_MARKER_COLOR.to_string()),
            size: Some(11.0),
            symbol: Some("diamond".to_string()),
        }),
        text: Some(with_default.iter().map(|r| Some(r.tooltip())).collect()),
        hoverinfo: Some("text".to_string()),
        showlegend: true,
    };

    let categories = models.iter().map(|r| r.model.clone()).collect();
    let layout = Layout::new(benchmark)
        .with_xaxis(Axis::titled("Model").with_categories(categories))
        .with_yaxis(Axis::titled("Rank").reversed().with_dtick(1.0))
        .with_height(380);

    Figure::new(
        vec![Trace::Scatter(segments), Trace::Scatter(markers)],
        layout,
    )
}

/// Fetch and parse the JPEG rank resource.
pub fn load_jpeg_ranks(source: &dyn DataSource, path: &Path) -> Result<Vec<JpegRankRecord>> {
    let text = source.fetch(path)?;
    let table = CsvTable::parse(&text)?;
    let records = JpegRankRecord::from_table(&table);

    debug!(path = %path.display(), records = records.len(), "loaded jpeg ranks");

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_and_default_marker() {
        let records = vec![
            JpegRankRecord::new("DA2k", "M", "default", 3),
            JpegRankRecord::new("DA2k", "M", "jpeg70", 5),
            JpegRankRecord::new("DA2k", "M", "jpeg90", 2),
        ];
        let view = render_rank_range(&records);

        let panel = view.panel("DA2k").unwrap();
        let m = &panel.models[0];
        assert_eq!((m.min_rank, m.max_rank), (2, 5));
        assert_eq!(m.default_rank, Some(3));

        let Trace::Scatter(markers) = &panel.chart.data[1] else {
            panic!("expected scatter trace");
        };
        assert_eq!(markers.y, vec![Some(3.0)]);
    }

    #[test]
    fn test_variants_sorted_by_quality() {
        let records = vec![
            JpegRankRecord::new("DA2k", "M", "default", 3),
            JpegRankRecord::new("DA2k", "M", "jpeg90", 2),
            JpegRankRecord::new("DA2k", "M", "jpeg10", 7),
            JpegRankRecord::new("DA2k", "M", "jpeg70", 5),
        ];
        let view = render_rank_range(&records);

        let qualities: Vec<&str> = view.panels[0].models[0]
            .variants
            .iter()
            .map(|(q, _)| q.as_str())
            .collect();
        assert_eq!(qualities, vec!["jpeg10", "jpeg70", "jpeg90", "default"]);
        assert_eq!(
            view.panels[0].models[0].tooltip(),
            "<b>M</b><br>jpeg10: 7<br>jpeg70: 5<br>jpeg90: 2<br>default: 3"
        );
    }

    #[test]
    fn test_models_ordered_by_default_rank() {
        let records = vec![
            JpegRankRecord::new("SPair", "NoDefault", "jpeg50", 1),
            JpegRankRecord::new("SPair", "B", "default", 2),
            JpegRankRecord::new("SPair", "A", "default", 1),
            JpegRankRecord::new("SPair", "A", "jpeg50", 4),
        ];
        let view = render_rank_range(&records);

        let panel = view.panel("SPair").unwrap();
        let order: Vec<&str> = panel.models.iter().map(|m| m.model.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "NoDefault"]);
        assert_eq!(
            panel.chart.layout.xaxis.categoryarray,
            Some(vec!["A".to_string(), "B".to_string(), "NoDefault".to_string()])
        );

        // No marker for the model without a default-quality rank.
        let Trace::Scatter(markers) = &panel.chart.data[1] else {
            panic!("expected scatter trace");
        };
        assert_eq!(markers.x.len(), 2);
    }

    #[test]
    fn test_unknown_benchmarks_ignored() {
        let records = vec![
            JpegRankRecord::new("Other", "M", "default", 1),
            JpegRankRecord::new("DA2k", "M", "default", 1),
        ];
        let view = render_rank_range(&records);

        assert_eq!(view.panels.len(), 2);
        assert_eq!(view.panel("DA2k").unwrap().models.len(), 1);
        assert!(view.panel("SPair").unwrap().models.is_empty());
        assert!(view.panel("Other").is_none());
    }

    #[test]
    fn test_segments_break_between_models() {
        let records = vec![
            JpegRankRecord::new("DA2k", "A", "default", 1),
            JpegRankRecord::new("DA2k", "A", "jpeg50", 2),
            JpegRankRecord::new("DA2k", "B", "default", 2),
        ];
        let view = render_rank_range(&records);

        let Trace::Scatter(segments) = &view.panels[0].chart.data[0] else {
            panic!("expected scatter trace");
        };
        assert_eq!(
            segments.y,
            vec![Some(1.0), Some(2.0), None, Some(2.0), Some(2.0), None]
        );
    }

    #[test]
    fn test_quality_order() {
        assert_eq!(quality_order("jpeg70"), 70);
        assert_eq!(quality_order("q5"), 5);
        assert_eq!(quality_order("default"), DEFAULT_QUALITY_ORDER);
        assert_eq!(quality_order("lossless"), UNNUMBERED_QUALITY_ORDER);
    }

    #[test]
    fn test_default_quality_sorts_after_large_numbers() {
        assert!(quality_order("q1500") < quality_order("default"));
        assert!(quality_order("q99999999999") < quality_order("lossless"));
        assert!(quality_order("lossless") < quality_order("default"));

        let records = vec![
            JpegRankRecord::new("DA2k", "M", "default", 3),
            JpegRankRecord::new("DA2k", "M", "q1500", 2),
            JpegRankRecord::new("DA2k", "M", "lossless", 4),
            JpegRankRecord::new("DA2k", "M", "jpeg70", 5),
        ];
        let view = render_rank_range(&records);
        let qualities: Vec<&str> = view.panel("DA2k").unwrap().models[0]
            .variants
            .iter()
            .map(|(q, _)| q.as_str())
            .collect();
        assert_eq!(qualities, vec!["jpeg70", "q1500", "lossless", "default"]);
    }

    #[test]
    fn test_from_table_is_positional() {
        let table = CsvTable::parse(
            "bench,name,q,r\n\
             da2k,A,Default,2\n\
             spair-71k,B,jpeg50,1\n\
             DA2k,C,jpeg50,zero\n\
             DA2k,D\n",
        )
        .unwrap();
        let records = JpegRankRecord::from_table(&table);

        assert_eq!(
            records,
            vec![
                JpegRankRecord::new("DA2k", "A", "default", 2),
                JpegRankRecord::new("SPair", "B", "jpeg50", 1),
            ]
        );
    }
}
