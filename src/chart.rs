//! Declarative chart descriptions.
//!
//! A [`Figure`] is the trace/layout/config triple handed to the rendering
//! sink. It serializes to the JSON shape Plotly's `newPlot(el, data, layout,
//! config)` accepts, so any renderer understanding that shape can draw it.

use serde::{Deserialize, Serialize};

use crate::config::AxisRange;

/// A complete chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Traces drawn in order.
    pub data: Vec<Trace>,
    /// Axes, title and spacing.
    pub layout: Layout,
    /// Renderer options.
    pub config: PlotConfig,
}

impl Figure {
    /// Create a figure from traces and a layout with default renderer options.
    #[must_use]
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self {
            data,
            layout,
            config: PlotConfig::default(),
        }
    }
}

/// One drawable series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    /// Vertical bars over a category axis.
    Bar(BarTrace),
    /// Lines and/or point markers.
    Scatter(ScatterTrace),
}

/// Either one color for the whole trace or one per point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Same color for every point.
    Single(String),
    /// Color per point, aligned with the trace's x values.
    PerPoint(Vec<String>),
}

/// Marker styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Fill color.
    pub color: Color,
    /// Marker size in pixels (points only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Marker symbol name (points only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Marker {
    /// A marker with a fill color only.
    #[must_use]
    pub fn color(color: Color) -> Self {
        Self {
            color,
            size: None,
            symbol: None,
        }
    }
}

/// Line styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Stroke color.
    pub color: String,
    /// Stroke width in pixels.
    pub width: f64,
}

/// Bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    /// Legend name.
    pub name: String,
    /// Category labels.
    pub x: Vec<String>,
    /// Bar heights.
    pub y: Vec<f64>,
    /// Bar fill.
    pub marker: Marker,
    /// Per-bar annotation text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    /// Where annotation text is drawn (`"outside"`, `"inside"`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
    /// Hover label template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
}

/// Scatter series. `None` entries break a line into separate segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    /// Legend name.
    pub name: String,
    /// Category labels.
    pub x: Vec<Option<String>>,
    /// Values.
    pub y: Vec<Option<f64>>,
    /// `"lines"`, `"markers"` or `"lines+markers"`.
    pub mode: String,
    /// Line styling for line modes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    /// Marker styling for marker modes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    /// Hover text per point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<Option<String>>>,
    /// Which hover fields to show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    /// Whether the trace appears in the legend.
    pub showlegend: bool,
}

/// Chart title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Title text.
    pub text: String,
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Axis settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Axis title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    /// Fixed `[min, max]` range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    /// `"reversed"` to flip the axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<String>,
    /// `"array"` to honour `categoryarray`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<String>,
    /// Explicit category ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<String>>,
    /// Tick spacing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<f64>,
}

impl Axis {
    /// Creates an axis with the given title.
    #[must_use]
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Sets a fixed range.
    #[must_use]
    pub fn with_range(mut self, range: Option<AxisRange>) -> Self {
        self.range = range.map(|r| [r.min, r.max]);
        self
    }

    /// Flips the axis so the smallest value is on top.
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.autorange = Some("reversed".to_string());
        self
    }

    /// Fixes the category order.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categoryorder = Some("array".to_string());
        self.categoryarray = Some(categories);
        self
    }

    /// Sets the tick spacing.
    #[must_use]
    pub fn with_dtick(mut self, dtick: f64) -> Self {
        self.dtick = Some(dtick);
        self
    }
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Chart title.
    pub title: Title,
    /// `"group"` places bar series side by side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    /// Horizontal axis.
    pub xaxis: Axis,
    /// Vertical axis.
    pub yaxis: Axis,
    /// Chart height in pixels.
    pub height: u32,
}

impl Layout {
    /// Creates a layout with the given title and default axes.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.into(),
            barmode: None,
            xaxis: Axis::default(),
            yaxis: Axis::default(),
            height: 420,
        }
    }

    /// Sets the bar mode.
    #[must_use]
    pub fn with_barmode(mut self, mode: &str) -> Self {
        self.barmode = Some(mode.to_string());
        self
    }

    /// Sets the horizontal axis.
    #[must_use]
    pub fn with_xaxis(mut self, axis: Axis) -> Self {
        self.xaxis = axis;
        self
    }

    /// Sets the vertical axis.
    #[must_use]
    pub fn with_yaxis(mut self, axis: Axis) -> Self {
        self.yaxis = axis;
        self
    }

    /// Sets the chart height.
    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }
}

/// Renderer options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
    /// Resize with the container.
    pub responsive: bool,
    /// Show the hover toolbar.
    pub display_mode_bar: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            responsive: true,
            display_mode_bar: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bar_trace_json_shape() {
        let trace = Trace::Bar(BarTrace {
            name: "default".to_string(),
            x: vec!["a".to_string()],
            y: vec![1.5],
            marker: Marker::color(Color::PerPoint(vec!["#fff".to_string()])),
            text: None,
            textposition: None,
            hovertemplate: None,
        });

        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "bar",
                "name": "default",
                "x": ["a"],
                "y": [1.5],
                "marker": { "color": ["#fff"] },
            })
        );
    }

    #[test]
    fn test_scatter_gaps_serialize_as_null() {
        let trace = Trace::Scatter(ScatterTrace {
            name: "range".to_string(),
            x: vec![Some("m".to_string()), Some("m".to_string()), None],
            y: vec![Some(2.0), Some(5.0), None],
            mode: "lines".to_string(),
            line: None,
            marker: None,
            text: None,
            hoverinfo: None,
            showlegend: false,
        });

        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(value["type"], "scatter");
        assert_eq!(value["x"], json!(["m", "m", null]));
        assert_eq!(value["y"], json!([2.0, 5.0, null]));
    }

    #[test]
    fn test_layout_axes() {
        let layout = Layout::new("Ranks")
            .with_xaxis(Axis::default().with_categories(vec!["b".into(), "a".into()]))
            .with_yaxis(Axis::titled("Rank").reversed().with_dtick(1.0));

        let value = serde_json::to_value(&layout).unwrap();
        assert_eq!(value["title"]["text"], "Ranks");
        assert_eq!(value["xaxis"]["categoryorder"], "array");
        assert_eq!(value["xaxis"]["categoryarray"], json!(["b", "a"]));
        assert_eq!(value["yaxis"]["autorange"], "reversed");
        assert!(value["yaxis"].get("range").is_none());
    }

    #[test]
    fn test_config_camel_case() {
        let value = serde_json::to_value(PlotConfig::default()).unwrap();
        assert_eq!(value, json!({ "responsive": true, "displayModeBar": false }));
    }
}
