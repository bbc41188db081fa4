//! Canonical keys for free-form CSV labels.
//!
//! Both normalizers are total: unknown input is passed through (datasets) or
//! slugified (marker styles), never rejected.

use std::sync::LazyLock;

use regex::Regex;

/// Canonical key of the DA2k depth benchmark.
pub const DA2K: &str = "DA2k";

/// Canonical key of the SPair correspondence benchmark.
pub const SPAIR: &str = "SPair";

/// Canonical key of the unmodified baseline style.
pub const DEFAULT_STYLE: &str = "default";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w.]+").unwrap());

/// Known marker-style phrasings, compared after lowercasing and with `_`/`-`
/// read as spaces.
const STYLE_ALIASES: &[(&[&str], &str)] = &[
    (
        &["default", "baseline", "none", "no marker", "original"],
        DEFAULT_STYLE,
    ),
    (&["color red", "red", "red marker", "colour red"], "color_red"),
    (
        &["color green", "green", "green marker", "colour green"],
        "color_green",
    ),
    (&["color blue", "blue", "blue marker", "colour blue"], "color_blue"),
    (
        &["color yellow", "yellow", "yellow marker", "colour yellow"],
        "color_yellow",
    ),
    (&["radius 3", "radius 3px", "r3", "r 3", "r=3", "small"], "radius_3"),
    (&["radius 5", "radius 5px", "r5", "r 5", "r=5", "medium"], "radius_5"),
    (
        &["radius 10", "radius 10px", "r10", "r 10", "r=10", "large"],
        "radius_10",
    ),
    (&["shape circle", "circle"], "shape_circle"),
    (&["shape square", "square"], "shape_square"),
    (&["shape cross", "cross"], "shape_cross"),
];

/// Canonicalize a dataset label.
///
/// Case-insensitive prefix variants of the two known benchmarks map to
/// [`DA2K`] and [`SPAIR`] (`"da2k-val"`, `"SPAIR-71k"`). Anything else is
/// returned trimmed and otherwise unchanged.
///
/// # Example
///
/// ```
/// use marker_viz::normalize::normalize_dataset_key;
///
/// assert_eq!(normalize_dataset_key("da2k_full"), "DA2k");
/// assert_eq!(normalize_dataset_key("spair-71k"), "SPair");
/// assert_eq!(normalize_dataset_key("NYUv2"), "NYUv2");
/// ```
#[must_use]
pub fn normalize_dataset_key(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();
    if lower.starts_with("da2k") {
        DA2K.to_string()
    } else if lower.starts_with("spair") {
        SPAIR.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Canonicalize a marker-style label.
///
/// Known phrasings map to their underscore-separated key; unknown labels are
/// lowercased and slugified (runs of characters other than word characters
/// and `.` become `_`).
///
/// # Example
///
/// ```
/// use marker_viz::normalize::normalize_marker_style_key;
///
/// assert_eq!(normalize_marker_style_key("Color Blue"), "color_blue");
/// assert_eq!(normalize_marker_style_key("unknown style!!"), "unknown_style");
/// assert_eq!(normalize_marker_style_key("alpha 0.5"), "alpha_0.5");
/// ```
#[must_use]
pub fn normalize_marker_style_key(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let collapsed = WHITESPACE.replace_all(lower.trim(), " ");

    let phrase = collapsed.replace(['_', '-'], " ");
    let phrase = WHITESPACE.replace_all(phrase.trim(), " ");
    let phrase: &str = &phrase;
    for (variants, key) in STYLE_ALIASES {
        if variants.contains(&phrase) {
            return (*key).to_string();
        }
    }

    NON_WORD
        .replace_all(&collapsed, "_")
        .trim_matches('_')
        .to_string()
}
