/// Host page access used by the filter core
///
/// The core never touches `web_sys` directly. `web::dom` implements these
/// traits against the live document; tests use an in-memory page.
use std::rc::Rc;

use crate::control::ControlLook;
use crate::error::Result;
use crate::tab_kind::TabKind;

/// Read-only DOM probes consulted by the tab classifier
pub trait TabProbe {
    /// Text of the element marked as the selected navigation tab, if any
    fn selected_tab_text(&self) -> Option<String>;

    /// Whether any element matches `selector`
    fn has_element(&self, selector: &str) -> bool;
}

/// One rendered video/short/stream entry
///
/// Handles are transient: they are re-queried on every pass and never
/// compared across passes.
pub trait ContentItem {
    /// Lowercase element type name
    fn tag_name(&self) -> String;

    /// Rendered width of the first descendant matching `selector`.
    /// `None` when there is no such descendant.
    fn descendant_width(&self, selector: &str) -> Option<f64>;

    fn has_descendant(&self, selector: &str) -> bool;

    fn text(&self) -> String;

    fn is_hidden(&self) -> bool;

    fn set_hidden(&self, hidden: bool) -> Result<()>;
}

/// The live document the filter works on
pub trait Page: TabProbe {
    type Item: ContentItem;

    /// Full current location
    fn href(&self) -> String;

    /// Items matching any of `selectors`, in document order, each once
    fn query_items(&self, selectors: &[&str]) -> Result<Vec<Self::Item>>;

    /// Every descendant element of the first container matching one of
    /// `containers`; empty when none is rendered yet
    fn descendants(&self, containers: &[&str]) -> Result<Vec<Self::Item>>;
}

/// Where the single toggle control lives
pub trait ControlHost {
    fn control_present(&self) -> bool;

    /// Tab kind recorded on the existing control
    fn control_kind(&self) -> Option<TabKind>;

    /// Create the control and wire `on_activate` as its only click handler
    fn insert_control(
        &self,
        kind: TabKind,
        look: &ControlLook,
        on_activate: Rc<dyn Fn()>,
    ) -> Result<()>;

    fn update_control(&self, kind: TabKind, look: &ControlLook) -> Result<()>;

    /// Returns whether a control was removed
    fn remove_control(&self) -> bool;
}
