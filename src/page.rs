//! Standalone HTML page with every precomputed view.
//!
//! All dataset × style comparisons are computed up front and embedded as
//! JSON; the page's inline script only switches between them and hands the
//! chosen [`Figure`](crate::chart::Figure) to Plotly.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::controller::Controller;
use crate::error::Result;
use crate::jpeg::RankRangeView;
use crate::marker::ComparisonView;

/// Plotly build the page loads.
pub const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Every view of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetViews {
    /// Style keys, "default" first.
    pub styles: Vec<String>,
    /// View per style key.
    pub views: BTreeMap<String, ComparisonView>,
}

/// Everything the page needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBundle {
    /// When the bundle was built.
    pub generated_at: DateTime<Utc>,
    /// Dataset selected on load.
    pub initial_dataset: String,
    /// Style selected on load.
    pub initial_style: String,
    /// Views per dataset. Datasets without a baseline are left out.
    pub datasets: BTreeMap<String, DatasetViews>,
    /// JPEG rank panels, if that data loaded.
    pub ranks: Option<RankRangeView>,
    /// Citation block offered for copying.
    pub citation: Option<String>,
}

impl PageBundle {
    /// Precompute every view the controller can produce.
    #[must_use]
    pub fn build(controller: &Controller, citation: Option<String>) -> Self {
        let mut datasets = BTreeMap::new();

        for key in controller.datasets() {
            let Some(data) = controller.dataset(key) else {
                continue;
            };
            if !data.has_baseline() {
                warn!(dataset = key, "no default style; dataset left out of the page");
                continue;
            }

            let styles: Vec<String> = data.style_names().into_iter().map(String::from).collect();
            let mut views = BTreeMap::new();
            for style in &styles {
                match controller.view(key, style) {
                    Ok(view) => {
                        views.insert(style.clone(), view);
                    }
                    Err(e) => warn!(dataset = key, style = %style, error = %e, "view skipped"),
                }
            }
            datasets.insert(key.to_string(), DatasetViews { styles, views });
        }

        let state = controller.state();
        let initial_dataset = if datasets.contains_key(&state.current_dataset) {
            state.current_dataset.clone()
        } else {
            datasets.keys().next().cloned().unwrap_or_default()
        };
        Self {
            generated_at: Utc::now(),
            initial_dataset,
            initial_style: state.active_style.clone(),
            datasets,
            ranks: controller.rank_view().cloned(),
            citation,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render the bundle as a self-contained HTML document.
pub fn render_html(bundle: &PageBundle) -> Result<String> {
    // Keep "</script>" inside string values from closing the data block.
    let data = serde_json::to_string(bundle)?.replace("</", "<\\/");

    let mut html = String::with_capacity(16 * 1024 + data.len());
    html.push_str(HEAD);
    let _ = writeln!(html, r#"<script src="{PLOTLY_SRC}"></script>"#);
    html.push_str("</head>\n<body>\n<main>\n");

    html.push_str(
        r#"<section id="marker-section">
<h2>Marker style vs. default</h2>
<div class="controls">
  <label for="dataset-select">Dataset</label>
  <select id="dataset-select"></select>
  <div id="style-buttons"></div>
</div>
<div id="comparison-chart" class="chart"></div>
<table>
<thead><tr><th>Model</th><th>Default</th><th>Selected</th><th>&Delta; acc.</th><th>Default rank</th><th>Rank</th><th>&Delta; rank</th></tr></thead>
<tbody id="comparison-body"></tbody>
</table>
</section>
"#,
    );

    if let Some(ranks) = &bundle.ranks {
        html.push_str(
            r#"<section id="rank-section">
<h2>Rank under JPEG compression</h2>
<div class="panels">
"#,
        );
        for (i, panel) in ranks.panels.iter().enumerate() {
            let _ = writeln!(
                html,
                r#"<div id="rank-panel-{i}" class="chart" aria-label="{}"></div>"#,
                escape_html(&panel.benchmark)
            );
        }
        html.push_str("</div>\n</section>\n");
    }

    if let Some(citation) = &bundle.citation {
        let _ = writeln!(
            html,
            r#"<section id="citation-section">
<h2>Citation</h2>
<pre id="citation">{}</pre>
<button type="button" data-copy-target="citation">Copy</button>
</section>"#,
            escape_html(citation)
        );
    }

    let _ = writeln!(
        html,
        "<footer>Generated {}</footer>\n</main>",
        bundle.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        html,
        r#"<script type="application/json" id="viz-data">{data}</script>"#
    );
    html.push_str(SCRIPT);
    html.push_str("</body>\n</html>\n");

    Ok(html)
}

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Marker style comparison</title>
<style>
  :root { --text: #1a1a1a; --dim: #666; --border: #ddd; --up: #2e9d5b; --down: #d64545; --neutral: #8a8f98; }
  @media (prefers-color-scheme: dark) {
    :root { --text: #e0e0e0; --dim: #999; --border: #404040; }
    body { background: #1a1a1a; }
  }
  body { font: 15px system-ui, sans-serif; color: var(--text); }
  main { max-width: 960px; margin: 0 auto; padding: 1rem; }
  .controls { display: flex; gap: 0.75rem; align-items: center; flex-wrap: wrap; }
  #style-buttons button { border: 1px solid var(--border); background: none; color: inherit; padding: 0.25rem 0.6rem; border-radius: 4px; cursor: pointer; }
  #style-buttons button.active { border-color: var(--text); font-weight: 600; }
  .chart { min-height: 380px; }
  .panels { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  table { border-collapse: collapse; width: 100%; }
  th, td { padding: 0.3rem 0.5rem; border-bottom: 1px solid var(--border); text-align: right; }
  th:first-child, td:first-child { text-align: left; }
  td.up { color: var(--up); } td.down { color: var(--down); } td.neutral { color: var(--neutral); }
  pre { white-space: pre-wrap; border: 1px solid var(--border); padding: 0.75rem; }
  footer { color: var(--dim); font-size: 0.8rem; margin-top: 2rem; }
</style>
"#;

const SCRIPT: &str = r#"<script>
(() => {
  const bundle = JSON.parse(document.getElementById('viz-data').textContent);
  const select = document.getElementById('dataset-select');
  const buttons = document.getElementById('style-buttons');
  const body = document.getElementById('comparison-body');
  const state = { dataset: bundle.initial_dataset, style: bundle.initial_style };
  const signed = (v, digits) => (v > 0 ? '+' : '') + v.toFixed(digits);

  function draw() {
    const ds = bundle.datasets[state.dataset];
    if (!ds) return;
    const view = ds.views[state.style] || ds.views['default'];
    if (!view) return;
    const f = view.chart;
    Plotly.react('comparison-chart', f.data, f.layout, f.config);
    body.replaceChildren(...view.rows.map(row => {
      const tr = document.createElement('tr');
      [row.model, row.baseline_accuracy.toFixed(2), row.accuracy.toFixed(2), signed(row.delta, 2),
       row.baseline_rank, row.rank, signed(row.rank_delta, 0)].forEach((value, i) => {
        const td = document.createElement('td');
        td.textContent = value;
        if (i === 3) td.className = row.sign;
        tr.appendChild(td);
      });
      return tr;
    }));
    buttons.querySelectorAll('button').forEach(b => b.classList.toggle('active', b.dataset.style === view.style));
  }

  function styleButtons() {
    const ds = bundle.datasets[state.dataset];
    buttons.replaceChildren(...(ds ? ds.styles : []).map(style => {
      const b = document.createElement('button');
      b.type = 'button';
      b.textContent = style;
      b.dataset.style = style;
      b.addEventListener('click', () => { state.style = style; draw(); });
      return b;
    }));
  }

  const keys = Object.keys(bundle.datasets);
  if (!bundle.datasets[state.dataset] && keys.length) state.dataset = keys[0];
  keys.forEach(key => select.add(new Option(key, key)));
  select.value = state.dataset;
  select.addEventListener('change', () => { state.dataset = select.value; styleButtons(); draw(); });
  styleButtons();
  draw();

  if (bundle.ranks) {
    bundle.ranks.panels.forEach((panel, i) => {
      const f = panel.chart;
      Plotly.newPlot('rank-panel-' + i, f.data, f.layout, f.config);
    });
  }

  document.querySelectorAll('button[data-copy-target]').forEach(button => {
    button.addEventListener('click', async () => {
      const text = document.getElementById(button.dataset.copyTarget).textContent;
      let copied = false;
      try {
        if (navigator.clipboard) { await navigator.clipboard.writeText(text); copied = true; }
      } catch (_) { copied = false; }
      button.textContent = copied ? 'Copied!' : 'Copy failed';
      setTimeout(() => { button.textContent = 'Copy'; }, 2000);
    });
  });
})();
</script>
"#;
