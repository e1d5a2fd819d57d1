/// `web_sys` implementation of the host page traits
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, MouseEvent, NodeList, Window};

use crate::classifier::SELECTED_TAB_SELECTOR;
use crate::control::{CONTROL_ID, ControlLook, TAB_KIND_ATTRIBUTE};
use crate::error::{FilterError, Result};
use crate::page::{ContentItem, ControlHost, Page, TabProbe};
use crate::predicates::parse_css_width;
use crate::tab_kind::TabKind;

const CONTROL_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "120px"),
    ("right", "20px"),
    ("padding", "10px 20px"),
    ("border-radius", "20px"),
    ("border", "none"),
    ("cursor", "pointer"),
    ("font-weight", "bold"),
    ("font-size", "14px"),
    ("color", "#ffffff"),
    ("box-shadow", "0 2px 5px rgba(0,0,0,0.2)"),
    ("z-index", "9999"),
];

fn elements(list: NodeList) -> Vec<WebItem> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(|element| WebItem { element })
        .collect()
}

fn style_width(style: Option<web_sys::CssStyleDeclaration>) -> Option<f64> {
    style
        .and_then(|s| s.get_property_value("width").ok())
        .and_then(|value| parse_css_width(&value))
}

/// A rendered item element
#[derive(Debug, Clone)]
pub struct WebItem {
    element: Element,
}

impl WebItem {
    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl ContentItem for WebItem {
    fn tag_name(&self) -> String {
        self.element.tag_name().to_lowercase()
    }

    fn descendant_width(&self, selector: &str) -> Option<f64> {
        let child = self.element.query_selector(selector).ok().flatten()?;
        let computed = web_sys::window()
            .and_then(|window| window.get_computed_style(&child).ok().flatten());
        // Computed width can be `auto` mid-layout; the inline width still says how far it got
        let width = style_width(computed).or_else(|| {
            style_width(child.dyn_ref::<HtmlElement>().map(|html| html.style()))
        });
        Some(width.unwrap_or(0.0))
    }

    fn has_descendant(&self, selector: &str) -> bool {
        matches!(self.element.query_selector(selector), Ok(Some(_)))
    }

    fn text(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn is_hidden(&self) -> bool {
        self.element
            .dyn_ref::<HtmlElement>()
            .and_then(|html| html.style().get_property_value("display").ok())
            .is_some_and(|display| display == "none")
    }

    fn set_hidden(&self, hidden: bool) -> Result<()> {
        let Some(html) = self.element.dyn_ref::<HtmlElement>() else {
            return Ok(());
        };
        let style = html.style();
        if hidden {
            style
                .set_property("display", "none")
                .map_err(|e| FilterError::dom("hide item", e))
        } else {
            style
                .remove_property("display")
                .map(|_| ())
                .map_err(|e| FilterError::dom("show item", e))
        }
    }
}

/// The live document of the current tab
pub struct WebPage {
    window: Window,
    document: Document,
    control_listener: RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>,
}

impl WebPage {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| FilterError::Dom("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| FilterError::Dom("no document".to_string()))?;
        Ok(WebPage {
            window,
            document,
            control_listener: RefCell::new(None),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn control_element(&self) -> Option<Element> {
        self.document.get_element_by_id(CONTROL_ID)
    }

    fn apply_look(element: &Element, kind: TabKind, look: &ControlLook) -> Result<()> {
        element.set_text_content(Some(look.label.as_str()));
        element
            .set_attribute(TAB_KIND_ATTRIBUTE, kind.as_str())
            .map_err(|e| FilterError::dom("bind button", e))?;
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            html.style()
                .set_property("background-color", look.color)
                .map_err(|e| FilterError::dom("color button", e))?;
        }
        Ok(())
    }
}

impl TabProbe for WebPage {
    fn selected_tab_text(&self) -> Option<String> {
        self.document
            .query_selector(SELECTED_TAB_SELECTOR)
            .ok()
            .flatten()
            .and_then(|element| element.text_content())
    }

    fn has_element(&self, selector: &str) -> bool {
        matches!(self.document.query_selector(selector), Ok(Some(_)))
    }
}

impl Page for WebPage {
    type Item = WebItem;

    fn href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn query_items(&self, selectors: &[&str]) -> Result<Vec<WebItem>> {
        if selectors.is_empty() {
            return Ok(Vec::new());
        }
        let list = self
            .document
            .query_selector_all(&selectors.join(", "))
            .map_err(|e| FilterError::dom("query items", e))?;
        Ok(elements(list))
    }

    fn descendants(&self, containers: &[&str]) -> Result<Vec<WebItem>> {
        for selector in containers {
            let container = self
                .document
                .query_selector(selector)
                .map_err(|e| FilterError::dom("query container", e))?;
            if let Some(container) = container {
                let list = container
                    .query_selector_all("*")
                    .map_err(|e| FilterError::dom("query descendants", e))?;
                return Ok(elements(list));
            }
        }
        Ok(Vec::new())
    }
}

impl ControlHost for WebPage {
    fn control_present(&self) -> bool {
        self.control_element().is_some()
    }

    fn control_kind(&self) -> Option<TabKind> {
        self.control_element()?
            .get_attribute(TAB_KIND_ATTRIBUTE)?
            .parse()
            .ok()
    }

    fn insert_control(
        &self,
        kind: TabKind,
        look: &ControlLook,
        on_activate: Rc<dyn Fn()>,
    ) -> Result<()> {
        let body = self
            .document
            .body()
            .ok_or_else(|| FilterError::Dom("document body not ready".to_string()))?;
        let button: HtmlElement = self
            .document
            .create_element("button")
            .map_err(|e| FilterError::dom("create button", e))?
            .dyn_into()
            .map_err(|_| FilterError::Dom("button is not an HtmlElement".to_string()))?;

        button.set_id(CONTROL_ID);
        let style = button.style();
        for (name, value) in CONTROL_STYLE {
            style
                .set_property(name, value)
                .map_err(|e| FilterError::dom("style button", e))?;
        }
        Self::apply_look(&button, kind, look)?;

        let listener = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
            on_activate();
        });
        button
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .map_err(|e| FilterError::dom("listen on button", e))?;
        body.append_child(&button)
            .map_err(|e| FilterError::dom("append button", e))?;

        *self.control_listener.borrow_mut() = Some(listener);
        Ok(())
    }

    fn update_control(&self, kind: TabKind, look: &ControlLook) -> Result<()> {
        let element = self
            .control_element()
            .ok_or_else(|| FilterError::Dom("button missing".to_string()))?;
        Self::apply_look(&element, kind, look)
    }

    fn remove_control(&self) -> bool {
        let removed = match self.control_element() {
            Some(element) => {
                element.remove();
                true
            }
            None => false,
        };
        self.control_listener.borrow_mut().take();
        removed
    }
}
