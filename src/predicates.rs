/// Watched-item detection, one rule set per tab kind
use crate::page::ContentItem;
use crate::tab_kind::TabKind;

/// Red playback-progress bar on a thumbnail
pub const PROGRESS_SELECTOR: &str = "#progress";
pub const RESUME_OVERLAY_SELECTOR: &str = "ytd-thumbnail-overlay-resume-playback-renderer";
pub const WATCHED_LABEL_SELECTOR: &str = "[aria-label=\"Watched\"]";
pub const LIVE_BADGE_SELECTORS: &[&str] = &[
    ".badge-style-type-live-now-alternate",
    "ytd-badge-supported-renderer .badge-style-type-live-now",
    "[aria-label=\"LIVE\"]",
];

const WATCHED_TEXT: &str = "Watched";

/// Numeric value of a CSS length such as `"42.5px"` or `"30%"`.
/// Keywords like `auto` have no value.
pub fn parse_css_width(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    value[..end].parse::<f64>().ok()
}

fn has_progress(item: &impl ContentItem) -> bool {
    item.descendant_width(PROGRESS_SELECTOR)
        .is_some_and(|width| width > 0.0)
}

fn has_live_badge(item: &impl ContentItem) -> bool {
    LIVE_BADGE_SELECTORS
        .iter()
        .any(|selector| item.has_descendant(selector))
}

/// Whether the host page marks `item` as already watched
pub fn is_watched(kind: TabKind, item: &impl ContentItem) -> bool {
    match kind {
        TabKind::Videos | TabKind::Shorts => {
            has_progress(item) || item.has_descendant(RESUME_OVERLAY_SELECTOR)
        }
        TabKind::Live => is_watched_stream(item),
    }
}

// A broadcast that is live right now is never hidden, whatever else it shows.
// "Streamed ..." replays count through their progress bar.
fn is_watched_stream(item: &impl ContentItem) -> bool {
    if has_live_badge(item) {
        return false;
    }
    has_progress(item)
        || item.has_descendant(WATCHED_LABEL_SELECTOR)
        || item.text().contains(WATCHED_TEXT)
}
