/// Tab classification for channel pages
///
/// The URL path is authoritative when it names a tab. DOM probes only
/// decide when the path is ambiguous, e.g. right after an SPA navigation
/// before the location updates.
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::page::TabProbe;
use crate::tab_kind::TabKind;

pub const SELECTED_TAB_SELECTOR: &str = "[aria-selected=\"true\"]";
pub const SHORTS_SHELF_SELECTOR: &str = "ytd-reel-shelf-renderer";
pub const LIVE_PLAYER_SELECTOR: &str = "ytd-channel-video-player-renderer";

static CHANNEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/channel/|/c/|/user/|/@").expect("valid channel pattern"));

static TAB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/videos|/shorts|/streams|/live").expect("valid tab pattern"));

/// Path component of `location`; anything unparsable is treated as a path
pub fn location_path(location: &str) -> String {
    match Url::parse(location) {
        Ok(url) => url.path().to_string(),
        Err(_) => location.to_string(),
    }
}

/// Tab named by the path alone
pub fn path_tab(path: &str) -> Option<TabKind> {
    if path.contains("/shorts") {
        Some(TabKind::Shorts)
    } else if path.contains("/streams") || path.contains("/live") {
        Some(TabKind::Live)
    } else if path.contains("/videos") {
        Some(TabKind::Videos)
    } else {
        None
    }
}

fn selected_tab_kind(text: &str) -> Option<TabKind> {
    let text = text.to_lowercase();
    if text.contains("shorts") {
        Some(TabKind::Shorts)
    } else if text.contains("live") || text.contains("stream") {
        Some(TabKind::Live)
    } else if text.contains("video") {
        Some(TabKind::Videos)
    } else {
        None
    }
}

fn container_kind(probe: &impl TabProbe) -> Option<TabKind> {
    if probe.has_element(SHORTS_SHELF_SELECTOR) {
        Some(TabKind::Shorts)
    } else if probe.has_element(LIVE_PLAYER_SELECTOR) {
        Some(TabKind::Live)
    } else {
        None
    }
}

/// Classify `location`, falling back to DOM markers and finally to Videos
pub fn classify(location: &str, probe: &impl TabProbe) -> TabKind {
    path_tab(&location_path(location))
        .or_else(|| probe.selected_tab_text().as_deref().and_then(selected_tab_kind))
        .or_else(|| container_kind(probe))
        .unwrap_or(TabKind::Videos)
}

/// True only on a channel page showing one of the filterable tabs
pub fn is_channel_tab_page(location: &str) -> bool {
    CHANNEL_PATTERN.is_match(location) && TAB_PATTERN.is_match(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;
    use proptest::prelude::*;

    const BASE: &str = "https://www.youtube.com";

    fn blank() -> FakePage {
        FakePage::default()
    }

    #[test]
    fn test_path_markers() {
        let page = blank();
        assert_eq!(classify(&format!("{BASE}/@chan/shorts"), &page), TabKind::Shorts);
        assert_eq!(classify(&format!("{BASE}/@chan/streams"), &page), TabKind::Live);
        assert_eq!(classify(&format!("{BASE}/@chan/live"), &page), TabKind::Live);
        assert_eq!(classify(&format!("{BASE}/@chan/videos"), &page), TabKind::Videos);
    }

    #[test]
    fn test_path_beats_dom() {
        let page = blank();
        page.select_tab("Live");
        page.add_element(SHORTS_SHELF_SELECTOR);

        assert_eq!(classify(&format!("{BASE}/@chan/videos"), &page), TabKind::Videos);
    }

    #[test]
    fn test_query_string_is_not_a_path_marker() {
        let page = blank();
        assert_eq!(classify(&format!("{BASE}/@chan?from=/shorts"), &page), TabKind::Videos);
    }

    #[test]
    fn test_selected_tab_fallback() {
        let page = blank();
        page.select_tab("  Shorts ");
        assert_eq!(classify(&format!("{BASE}/@chan"), &page), TabKind::Shorts);

        page.select_tab("Streams");
        assert_eq!(classify(&format!("{BASE}/@chan"), &page), TabKind::Live);

        page.select_tab("LIVE");
        assert_eq!(classify(&format!("{BASE}/@chan"), &page), TabKind::Live);

        page.select_tab("Videos");
        assert_eq!(classify(&format!("{BASE}/@chan"), &page), TabKind::Videos);
    }

    #[test]
    fn test_selected_tab_beats_containers() {
        let page = blank();
        page.select_tab("Videos");
        page.add_element(SHORTS_SHELF_SELECTOR);

        assert_eq!(classify(&format!("{BASE}/@chan/featured"), &page), TabKind::Videos);
    }

    #[test]
    fn test_unrecognized_tab_text_falls_through_to_containers() {
        let page = blank();
        page.select_tab("Community");
        page.add_element(LIVE_PLAYER_SELECTOR);

        assert_eq!(classify(&format!("{BASE}/@chan/featured"), &page), TabKind::Live);
    }

    #[test]
    fn test_container_order() {
        let page = blank();
        page.add_element(LIVE_PLAYER_SELECTOR);
        page.add_element(SHORTS_SHELF_SELECTOR);

        assert_eq!(classify(&format!("{BASE}/@chan"), &page), TabKind::Shorts);
    }

    #[test]
    fn test_default_is_videos() {
        assert_eq!(classify(&format!("{BASE}/@chan/featured"), &blank()), TabKind::Videos);
        assert_eq!(classify("not a url", &blank()), TabKind::Videos);
    }

    #[test]
    fn test_unparsable_location_used_as_path() {
        assert_eq!(classify("/@chan/shorts", &blank()), TabKind::Shorts);
    }

    #[test]
    fn test_channel_tab_page() {
        assert!(is_channel_tab_page(&format!("{BASE}/@chan/videos")));
        assert!(is_channel_tab_page(&format!("{BASE}/channel/UC123/streams")));
        assert!(is_channel_tab_page(&format!("{BASE}/c/Name/shorts")));
        assert!(is_channel_tab_page(&format!("{BASE}/user/name/live")));
    }

    #[test]
    fn test_not_channel_tab_page() {
        assert!(!is_channel_tab_page(&format!("{BASE}/@chan")));
        assert!(!is_channel_tab_page(&format!("{BASE}/@chan/community")));
        assert!(!is_channel_tab_page(&format!("{BASE}/watch?v=abc")));
        assert!(!is_channel_tab_page(&format!("{BASE}/feed/subscriptions")));
    }

    proptest! {
        #[test]
        fn prop_shorts_path_wins_over_any_dom(
            prefix in "[a-z0-9/]{0,12}",
            suffix in "[a-z0-9/]{0,12}",
            tab_text in proptest::option::of("[A-Za-z ]{0,12}"),
            live_player in any::<bool>(),
        ) {
            let page = blank();
            if let Some(text) = &tab_text {
                page.select_tab(text);
            }
            if live_player {
                page.add_element(LIVE_PLAYER_SELECTOR);
            }
            let location = format!("{BASE}/{prefix}/shorts{suffix}");
            prop_assert_eq!(classify(&location, &page), TabKind::Shorts);
        }

        #[test]
        fn prop_markerless_path_without_dom_is_videos(segment in "[a-z0-9]{1,10}") {
            let location = format!("{BASE}/@{segment}");
            prop_assert_eq!(classify(&location, &blank()), TabKind::Videos);
        }
    }
}
