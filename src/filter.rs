/// Filter passes: stateless sweeps over the currently rendered items
use crate::error::Result;
use crate::page::{ContentItem, Page};
use crate::predicates::is_watched;
use crate::tab_kind::TabKind;

/// Containers whose renderer descendants the live-tab reveal sweeps, first match wins
pub const CONTENT_CONTAINERS: &[&str] = &["ytd-browse[page-subtype=\"channels\"]", "#contents"];

/// Result of one pass, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterReport {
    pub kind: TabKind,
    pub hidden: usize,
    pub total: usize,
    /// Extra elements restored by the live-tab sweep
    pub swept: usize,
}

fn is_renderer_tag(tag: &str) -> bool {
    tag.to_ascii_lowercase().contains("renderer")
}

/// Hide watched items of `kind`, or reveal everything when `active` is off
pub fn apply<P: Page>(page: &P, kind: TabKind, active: bool) -> Result<FilterReport> {
    if !active {
        return reveal_all(page, kind);
    }

    let items = page.query_items(kind.item_selectors())?;
    let mut hidden = 0;
    for item in &items {
        let watched = is_watched(kind, item);
        item.set_hidden(watched)?;
        if watched {
            hidden += 1;
        }
    }

    Ok(FilterReport {
        kind,
        hidden,
        total: items.len(),
        swept: 0,
    })
}

/// Make every item of `kind` visible again
pub fn reveal_all<P: Page>(page: &P, kind: TabKind) -> Result<FilterReport> {
    let items = page.query_items(kind.item_selectors())?;
    for item in &items {
        item.set_hidden(false)?;
    }

    // Selector sets miss some stream layouts; sweep every renderer instead.
    let mut swept = 0;
    if kind == TabKind::Live {
        for element in page.descendants(CONTENT_CONTAINERS)? {
            if element.is_hidden() && is_renderer_tag(&element.tag_name()) {
                element.set_hidden(false)?;
                swept += 1;
            }
        }
    }

    Ok(FilterReport {
        kind,
        hidden: 0,
        total: items.len(),
        swept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::{LIVE_BADGE_SELECTORS, RESUME_OVERLAY_SELECTOR};
    use crate::testing::{FakeItem, FakePage};

    const RICH: &str = "ytd-rich-item-renderer";

    fn page_with_progress(widths: &[f64]) -> (FakePage, Vec<FakeItem>) {
        let page = FakePage::default();
        let items = widths
            .iter()
            .map(|w| page.add_item(FakeItem::new(RICH).with_progress(*w)))
            .collect();
        (page, items)
    }

    #[test]
    fn test_apply_hides_exactly_watched_items() {
        let (page, items) = page_with_progress(&[0.0, 35.0, 0.0, 100.0, 0.0]);

        let report = apply(&page, TabKind::Videos, true).unwrap();

        assert_eq!(report.hidden, 2);
        assert_eq!(report.total, 5);
        let hidden: Vec<bool> = items.iter().map(|i| i.is_hidden()).collect();
        assert_eq!(hidden, vec![false, true, false, true, false]);
    }

    #[test]
    fn test_apply_unhides_items_no_longer_watched() {
        let page = FakePage::default();
        let item = page.add_item(FakeItem::new(RICH).hidden());

        apply(&page, TabKind::Videos, true).unwrap();

        assert!(!item.is_hidden());
    }

    #[test]
    fn test_apply_counts_resume_overlay() {
        let page = FakePage::default();
        page.add_item(FakeItem::new("ytd-reel-item-renderer").with_marker(RESUME_OVERLAY_SELECTOR));
        page.add_item(FakeItem::new("ytd-reel-item-renderer"));

        let report = apply(&page, TabKind::Shorts, true).unwrap();

        assert_eq!(report.hidden, 1);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn test_apply_ignores_other_tabs_items() {
        let page = FakePage::default();
        let reel = page.add_item(FakeItem::new("ytd-reel-item-renderer").with_progress(50.0));

        let report = apply(&page, TabKind::Videos, true).unwrap();

        assert_eq!(report.total, 0);
        assert!(!reel.is_hidden());
    }

    #[test]
    fn test_apply_on_empty_page() {
        let page = FakePage::default();
        let report = apply(&page, TabKind::Live, true).unwrap();
        assert_eq!((report.hidden, report.total), (0, 0));
    }

    #[test]
    fn test_inactive_apply_reveals() {
        let page = FakePage::default();
        let item = page.add_item(FakeItem::new(RICH).with_progress(20.0).hidden());

        let report = apply(&page, TabKind::Videos, false).unwrap();

        assert_eq!(report.hidden, 0);
        assert!(!item.is_hidden());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (page, items) = page_with_progress(&[10.0, 0.0, 10.0]);

        let first = apply(&page, TabKind::Videos, true).unwrap();
        let second = apply(&page, TabKind::Videos, true).unwrap();

        assert_eq!(first, second);
        assert_eq!(items.iter().filter(|i| i.is_hidden()).count(), 2);
    }

    #[test]
    fn test_reveal_all_leaves_nothing_hidden() {
        let (page, items) = page_with_progress(&[10.0, 0.0, 10.0]);
        apply(&page, TabKind::Videos, true).unwrap();

        reveal_all(&page, TabKind::Videos).unwrap();
        reveal_all(&page, TabKind::Videos).unwrap();

        assert!(items.iter().all(|i| !i.is_hidden()));
    }

    #[test]
    fn test_live_reveal_sweeps_unlisted_renderers() {
        let page = FakePage::default();
        page.add_element(CONTENT_CONTAINERS[0]);
        let odd = page.add_container_extra(FakeItem::new("ytd-grid-stream-renderer").hidden());
        let spacer = page.add_container_extra(FakeItem::new("div").hidden());

        let report = reveal_all(&page, TabKind::Live).unwrap();

        assert_eq!(report.swept, 1);
        assert!(!odd.is_hidden());
        assert!(spacer.is_hidden());
    }

    #[test]
    fn test_videos_reveal_does_not_sweep() {
        let page = FakePage::default();
        page.add_element(CONTENT_CONTAINERS[0]);
        let odd = page.add_container_extra(FakeItem::new("ytd-grid-stream-renderer").hidden());

        reveal_all(&page, TabKind::Videos).unwrap();

        assert!(odd.is_hidden());
    }

    #[test]
    fn test_live_apply_keeps_live_now_visible() {
        let page = FakePage::default();
        let live = page.add_item(
            FakeItem::new(RICH)
                .with_progress(90.0)
                .with_marker(LIVE_BADGE_SELECTORS[1]),
        );
        let replay = page.add_item(FakeItem::new(RICH).with_progress(40.0).with_text("Streamed 1 week ago"));

        let report = apply(&page, TabKind::Live, true).unwrap();

        assert_eq!(report.hidden, 1);
        assert!(!live.is_hidden());
        assert!(replay.is_hidden());
    }

    #[test]
    fn test_query_failure_propagates() {
        let page = FakePage::default();
        page.fail_queries(true);
        assert!(apply(&page, TabKind::Videos, true).is_err());
    }
}
