//! In-memory host page for unit tests.
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::control::ControlLook;
use crate::error::{FilterError, Result};
use crate::page::{ContentItem, ControlHost, Page, TabProbe};
use crate::predicates::PROGRESS_SELECTOR;
use crate::tab_kind::TabKind;

#[derive(Debug, Default)]
struct ItemState {
    tag: String,
    widths: HashMap<String, f64>,
    markers: HashSet<String>,
    text: String,
    hidden: bool,
}

/// Shared handle; clones observe the same item
#[derive(Debug, Clone)]
pub struct FakeItem(Rc<RefCell<ItemState>>);

impl FakeItem {
    pub fn new(tag: &str) -> Self {
        FakeItem(Rc::new(RefCell::new(ItemState {
            tag: tag.to_string(),
            ..ItemState::default()
        })))
    }

    pub fn with_progress(self, width: f64) -> Self {
        self.0
            .borrow_mut()
            .widths
            .insert(PROGRESS_SELECTOR.to_string(), width);
        self
    }

    pub fn with_marker(self, selector: &str) -> Self {
        self.0.borrow_mut().markers.insert(selector.to_string());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text = text.to_string();
        self
    }

    pub fn hidden(self) -> Self {
        self.0.borrow_mut().hidden = true;
        self
    }
}

impl ContentItem for FakeItem {
    fn tag_name(&self) -> String {
        self.0.borrow().tag.clone()
    }

    fn descendant_width(&self, selector: &str) -> Option<f64> {
        self.0.borrow().widths.get(selector).copied()
    }

    fn has_descendant(&self, selector: &str) -> bool {
        let state = self.0.borrow();
        state.markers.contains(selector) || state.widths.contains_key(selector)
    }

    fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    fn is_hidden(&self) -> bool {
        self.0.borrow().hidden
    }

    fn set_hidden(&self, hidden: bool) -> Result<()> {
        self.0.borrow_mut().hidden = hidden;
        Ok(())
    }
}

pub struct FakeControl {
    pub kind: TabKind,
    pub look: ControlLook,
    pub on_activate: Rc<dyn Fn()>,
}

#[derive(Default)]
pub struct FakePage {
    href: RefCell<String>,
    selected_tab: RefCell<Option<String>>,
    elements: RefCell<HashSet<String>>,
    items: RefCell<Vec<FakeItem>>,
    container_extras: RefCell<Vec<FakeItem>>,
    controls: RefCell<Vec<FakeControl>>,
    insert_failures: Cell<u32>,
    insert_calls: Cell<u32>,
    query_fails: Cell<bool>,
}

impl FakePage {
    pub fn at(href: &str) -> Self {
        let page = FakePage::default();
        page.navigate(href);
        page
    }

    pub fn navigate(&self, href: &str) {
        *self.href.borrow_mut() = href.to_string();
    }

    pub fn select_tab(&self, text: &str) {
        *self.selected_tab.borrow_mut() = Some(text.to_string());
    }

    pub fn add_element(&self, selector: &str) {
        self.elements.borrow_mut().insert(selector.to_string());
    }

    pub fn add_item(&self, item: FakeItem) -> FakeItem {
        self.items.borrow_mut().push(item.clone());
        item
    }

    /// Element only reachable through the container sweep
    pub fn add_container_extra(&self, item: FakeItem) -> FakeItem {
        self.container_extras.borrow_mut().push(item.clone());
        item
    }

    pub fn clear_items(&self) {
        self.items.borrow_mut().clear();
    }

    pub fn fail_next_inserts(&self, count: u32) {
        self.insert_failures.set(count);
    }

    pub fn fail_queries(&self, fail: bool) {
        self.query_fails.set(fail);
    }

    pub fn insert_calls(&self) -> u32 {
        self.insert_calls.get()
    }

    pub fn control_count(&self) -> usize {
        self.controls.borrow().len()
    }

    pub fn control_label(&self) -> Option<String> {
        self.controls.borrow().first().map(|c| c.look.label.clone())
    }

    pub fn control_color(&self) -> Option<&'static str> {
        self.controls.borrow().first().map(|c| c.look.color)
    }

    /// Simulate the host page replacing the control's subtree
    pub fn drop_control_externally(&self) {
        self.controls.borrow_mut().clear();
    }

    /// Rebind the existing control behind the core's back
    pub fn set_control_kind(&self, kind: TabKind) {
        if let Some(control) = self.controls.borrow_mut().first_mut() {
            control.kind = kind;
        }
    }

    /// Invoke the click handler of the current control
    pub fn click_control(&self) {
        let handler = self.controls.borrow().first().map(|c| c.on_activate.clone());
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn visible_count(&self) -> usize {
        self.items.borrow().iter().filter(|i| !i.is_hidden()).count()
    }
}

impl TabProbe for FakePage {
    fn selected_tab_text(&self) -> Option<String> {
        self.selected_tab.borrow().clone()
    }

    fn has_element(&self, selector: &str) -> bool {
        self.elements.borrow().contains(selector)
    }
}

impl Page for FakePage {
    type Item = FakeItem;

    fn href(&self) -> String {
        self.href.borrow().clone()
    }

    fn query_items(&self, selectors: &[&str]) -> Result<Vec<FakeItem>> {
        if self.query_fails.get() {
            return Err(FilterError::Dom("query rejected".to_string()));
        }
        Ok(self
            .items
            .borrow()
            .iter()
            .filter(|item| selectors.contains(&item.tag_name().as_str()))
            .cloned()
            .collect())
    }

    fn descendants(&self, containers: &[&str]) -> Result<Vec<FakeItem>> {
        if self.query_fails.get() {
            return Err(FilterError::Dom("query rejected".to_string()));
        }
        if !containers.iter().any(|c| self.has_element(c)) {
            return Ok(Vec::new());
        }
        let mut all = self.items.borrow().clone();
        all.extend(self.container_extras.borrow().iter().cloned());
        Ok(all)
    }
}

impl ControlHost for FakePage {
    fn control_present(&self) -> bool {
        !self.controls.borrow().is_empty()
    }

    fn control_kind(&self) -> Option<TabKind> {
        self.controls.borrow().first().map(|c| c.kind)
    }

    fn insert_control(
        &self,
        kind: TabKind,
        look: &ControlLook,
        on_activate: Rc<dyn Fn()>,
    ) -> Result<()> {
        self.insert_calls.set(self.insert_calls.get() + 1);
        if self.insert_failures.get() > 0 {
            self.insert_failures.set(self.insert_failures.get() - 1);
            return Err(FilterError::Dom("document body not ready".to_string()));
        }
        self.controls.borrow_mut().push(FakeControl {
            kind,
            look: look.clone(),
            on_activate,
        });
        Ok(())
    }

    fn update_control(&self, kind: TabKind, look: &ControlLook) -> Result<()> {
        match self.controls.borrow_mut().first_mut() {
            Some(control) => {
                control.kind = kind;
                control.look = look.clone();
                Ok(())
            }
            None => Err(FilterError::Dom("control missing".to_string())),
        }
    }

    fn remove_control(&self) -> bool {
        let mut controls = self.controls.borrow_mut();
        let had = !controls.is_empty();
        controls.clear();
        had
    }
}
