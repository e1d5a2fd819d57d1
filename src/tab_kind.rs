/// Channel tab kinds and their fixed per-kind data
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three channel sections the filter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Videos,
    Shorts,
    Live,
}

impl TabKind {
    pub const ALL: [TabKind; 3] = [TabKind::Videos, TabKind::Shorts, TabKind::Live];

    /// Identifier used in DOM attributes and log lines
    pub fn as_str(self) -> &'static str {
        match self {
            TabKind::Videos => "videos",
            TabKind::Shorts => "shorts",
            TabKind::Live => "live",
        }
    }

    /// Capitalized name shown on the toggle button
    pub fn display_name(self) -> &'static str {
        match self {
            TabKind::Videos => "Videos",
            TabKind::Shorts => "Shorts",
            TabKind::Live => "Live",
        }
    }

    /// Durable storage key holding this tab's "filter active" flag
    pub fn storage_key(self) -> &'static str {
        match self {
            TabKind::Videos => "yt-unwatched-videos-active",
            TabKind::Shorts => "yt-unwatched-shorts-active",
            TabKind::Live => "yt-unwatched-live-active",
        }
    }

    /// Element selectors enumerating this tab's content items, in query order
    pub fn item_selectors(self) -> &'static [&'static str] {
        match self {
            TabKind::Videos | TabKind::Live => &[
                "ytd-grid-video-renderer",
                "ytd-rich-item-renderer",
                "ytd-video-renderer",
            ],
            TabKind::Shorts => &[
                "ytd-grid-video-renderer",
                "ytd-reel-item-renderer",
                "ytd-rich-grid-slim-media",
                "ytd-rich-item-renderer",
            ],
        }
    }
}

impl fmt::Display for TabKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tab kind: {0:?}")]
pub struct UnknownTabKind(pub String);

impl FromStr for TabKind {
    type Err = UnknownTabKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "videos" => Ok(TabKind::Videos),
            "shorts" => Ok(TabKind::Shorts),
            "live" => Ok(TabKind::Live),
            other => Err(UnknownTabKind(other.to_string())),
        }
    }
}
