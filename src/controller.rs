//! Interaction state and the startup load.
//!
//! [`Controller`] owns the [`RenderState`] and is the only thing that changes
//! it. View computation ([`compare`]) only ever borrows the state.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::VizConfig;
use crate::error::{Error, Result};
use crate::import::DataSource;
use crate::jpeg::{JpegRankRecord, RankRangeView, load_jpeg_ranks, render_rank_range};
use crate::marker::{ComparisonView, MarkerDataset, compare, load_marker_data};
use crate::normalize::{normalize_dataset_key, normalize_marker_style_key};

/// What is currently selected and what has been loaded.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// Selected dataset key.
    pub current_dataset: String,
    /// Marker data; `None` until loaded, and after a failed load.
    pub marker_data: Option<BTreeMap<String, MarkerDataset>>,
    /// Selected marker style.
    pub active_style: String,
}

/// Drives view updates in response to selections.
#[derive(Debug, Clone)]
pub struct Controller {
    config: VizConfig,
    state: RenderState,
    ranks: Option<RankRangeView>,
}

impl Controller {
    /// Create a controller with nothing loaded.
    #[must_use]
    pub fn new(config: VizConfig) -> Self {
        let state = RenderState {
            current_dataset: config.initial_dataset.clone(),
            marker_data: None,
            active_style: config.initial_style.clone(),
        };
        Self {
            config,
            state,
            ranks: None,
        }
    }

    /// Create a controller and load both resources concurrently.
    ///
    /// The two loads are independent: a failure in one is logged and leaves
    /// that view empty without affecting the other.
    pub fn startup(source: &dyn DataSource, config: VizConfig) -> Self {
        let mut controller = Self::new(config);
        let (markers, ranks) = rayon::join(
            || load_marker_data(source, &controller.config.marker_path),
            || load_jpeg_ranks(source, &controller.config.jpeg_path),
        );
        controller.on_marker_data(markers);
        controller.on_jpeg_ranks(ranks);
        info!(
            marker_datasets = controller.datasets().len(),
            rank_panels = controller.ranks.as_ref().map_or(0, |r| r.panels.len()),
            "startup complete"
        );
        controller
    }

    /// Accept the result of the marker data load.
    pub fn on_marker_data(&mut self, result: Result<BTreeMap<String, MarkerDataset>>) {
        match result {
            Ok(data) => {
                if !data.contains_key(&self.state.current_dataset) {
                    // Prefer a dataset that can be compared against its baseline.
                    let fallback = data
                        .iter()
                        .find(|(_, dataset)| dataset.has_baseline())
                        .or_else(|| data.iter().next())
                        .map(|(key, _)| key);
                    if let Some(first) = fallback {
                        debug!(
                            wanted = %self.state.current_dataset,
                            using = %first,
                            "initial dataset not present"
                        );
                        self.state.current_dataset = first.clone();
                    }
                }
                self.state.marker_data = Some(data);
            }
            Err(e) => {
                warn!(error = %e, "marker data failed to load; comparison chart skipped");
                self.state.marker_data = None;
            }
        }
    }

    /// Accept the result of the JPEG rank load.
    pub fn on_jpeg_ranks(&mut self, result: Result<Vec<JpegRankRecord>>) {
        match result {
            Ok(records) => self.ranks = Some(render_rank_range(&records)),
            Err(e) => {
                warn!(error = %e, "jpeg ranks failed to load; rank chart skipped");
                self.ranks = None;
            }
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    /// Loaded dataset keys.
    #[must_use]
    pub fn datasets(&self) -> Vec<&str> {
        self.state
            .marker_data
            .as_ref()
            .map(|data| data.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// A loaded dataset.
    #[must_use]
    pub fn dataset(&self, key: &str) -> Option<&MarkerDataset> {
        self.state.marker_data.as_ref()?.get(key)
    }

    /// The JPEG rank view, if it loaded.
    #[must_use]
    pub fn rank_view(&self) -> Option<&RankRangeView> {
        self.ranks.as_ref()
    }

    /// Switch dataset and recompute the view.
    ///
    /// An unknown dataset leaves the selection unchanged.
    pub fn select_dataset(&mut self, raw: &str) -> Result<ComparisonView> {
        let key = normalize_dataset_key(raw);
        let data = self.state.marker_data.as_ref().ok_or(Error::NotLoaded)?;
        if !data.contains_key(&key) {
            return Err(Error::UnknownDataset(key));
        }
        self.state.current_dataset = key;
        self.current_view()
    }

    /// Switch marker style and recompute the view.
    ///
    /// The style is kept even when the current dataset lacks it, so it
    /// applies again after switching to a dataset that has it.
    pub fn select_style(&mut self, raw: &str) -> Result<ComparisonView> {
        self.state.active_style = normalize_marker_style_key(raw);
        self.current_view()
    }

    /// View for the current selection.
    pub fn current_view(&self) -> Result<ComparisonView> {
        self.view(&self.state.current_dataset, &self.state.active_style)
    }

    /// View for an arbitrary dataset and style, without changing the selection.
    pub fn view(&self, dataset: &str, style: &str) -> Result<ComparisonView> {
        let data = self.state.marker_data.as_ref().ok_or(Error::NotLoaded)?;
        let dataset_data = data
            .get(dataset)
            .ok_or_else(|| Error::UnknownDataset(dataset.to_string()))?;
        compare(dataset, dataset_data, style, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::import::DirSource;

    const MARKERS: &str = "dataset,model,marker_style,accuracy,rank\n\
        DA2k,A,default,80,2\n\
        DA2k,B,default,90,1\n\
        DA2k,A,Color Blue,85,1\n\
        DA2k,B,Color Blue,84,2\n\
        SPair,A,default,30,1\n\
        SPair,A,radius 3,31,1\n";

    const RANKS: &str = "benchmark,model,jpeg_quality,rank\n\
        DA2k,A,default,2\n\
        DA2k,A,jpeg50,4\n\
        SPair,A,default,1\n";

    fn data_dir(markers: Option<&str>, ranks: Option<&str>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        if let Some(text) = markers {
            std::fs::write(dir.path().join("data/marker_acc.csv"), text).unwrap();
        }
        if let Some(text) = ranks {
            std::fs::write(dir.path().join("data/jpeg_rank.csv"), text).unwrap();
        }
        dir
    }

    #[test]
    fn test_startup_loads_both() {
        let dir = data_dir(Some(MARKERS), Some(RANKS));
        let controller = Controller::startup(&DirSource::new(dir.path()), VizConfig::default());

        assert_eq!(controller.datasets(), vec!["DA2k", "SPair"]);
        assert!(controller.rank_view().is_some());
        assert_eq!(controller.state().current_dataset, "DA2k");
        assert_eq!(controller.state().active_style, "default");
    }

    #[test]
    fn test_startup_failures_are_independent() {
        let dir = data_dir(None, Some(RANKS));
        let controller = Controller::startup(&DirSource::new(dir.path()), VizConfig::default());
        assert!(controller.state().marker_data.is_none());
        assert!(controller.rank_view().is_some());
        assert!(matches!(controller.current_view(), Err(Error::NotLoaded)));

        let dir = data_dir(Some(MARKERS), None);
        let controller = Controller::startup(&DirSource::new(dir.path()), VizConfig::default());
        assert!(controller.state().marker_data.is_some());
        assert!(controller.rank_view().is_none());
    }

    #[test]
    fn test_schema_failure_skips_marker_view_only() {
        let dir = data_dir(Some("dataset,model\nDA2k,A\n"), Some(RANKS));
        let controller = Controller::startup(&DirSource::new(dir.path()), VizConfig::default());

        assert!(controller.state().marker_data.is_none());
        assert!(controller.rank_view().is_some());
    }

    #[test]
    fn test_select_style_and_dataset() {
        let dir = data_dir(Some(MARKERS), Some(RANKS));
        let mut controller =
            Controller::startup(&DirSource::new(dir.path()), VizConfig::default());

        let view = controller.select_style("Color Blue").unwrap();
        assert_eq!(view.style, "color_blue");
        assert_eq!(controller.state().active_style, "color_blue");

        // SPair has no color_blue: falls back, but the selection is kept.
        let view = controller.select_dataset("spair").unwrap();
        assert_eq!(view.dataset, "SPair");
        assert_eq!(view.style, "default");
        assert_eq!(controller.state().active_style, "color_blue");

        let view = controller.select_dataset("DA2k").unwrap();
        assert_eq!(view.style, "color_blue");
    }

    #[test]
    fn test_unknown_dataset_keeps_selection() {
        let dir = data_dir(Some(MARKERS), Some(RANKS));
        let mut controller =
            Controller::startup(&DirSource::new(dir.path()), VizConfig::default());

        let err = controller.select_dataset("NYUv2").unwrap_err();
        assert!(matches!(err, Error::UnknownDataset(ref k) if k == "NYUv2"));
        assert_eq!(controller.state().current_dataset, "DA2k");
    }

    #[test]
    fn test_initial_dataset_falls_back_to_first_loaded() {
        let mut controller = Controller::new(VizConfig::builder().initial_dataset("NYUv2").build());
        let dir = data_dir(Some(MARKERS), None);
        let source = DirSource::new(dir.path());
        let markers = load_marker_data(&source, Path::new("data/marker_acc.csv"));
        controller.on_marker_data(markers);

        assert_eq!(controller.state().current_dataset, "DA2k");
    }

    #[test]
    fn test_initial_fallback_skips_dataset_without_baseline() {
        let records = vec![
            crate::marker::MarkerRecord::new("Aaa", "color_red", "A", 1.0, 1),
            crate::marker::MarkerRecord::new("DA2k", "default", "A", 80.0, 1),
        ];
        let mut controller = Controller::new(VizConfig::builder().initial_dataset("NYUv2").build());
        controller.on_marker_data(Ok(crate::marker::build_marker_datasets(&records)));

        assert_eq!(controller.state().current_dataset, "DA2k");
    }
}
