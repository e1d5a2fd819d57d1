/// Unwatched Filter - Chrome Extension hiding watched videos on channel pages
/// Built with Rust + WASM + Yew

pub mod classifier;
pub mod config;
pub mod control;
pub mod error;
pub mod filter;
pub mod messages;
pub mod page;
pub mod predicates;
pub mod reconcile;
pub mod schedule;
pub mod storage;
pub mod tab_kind;
pub mod ui;
pub mod web;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export tab detection for JavaScript access
#[wasm_bindgen]
pub fn tab_for_location(url: &str) -> Option<String> {
    if !classifier::is_channel_tab_page(url) {
        return None;
    }
    classifier::path_tab(&classifier::location_path(url)).map(|kind| kind.as_str().to_string())
}

// Start filtering on a channel page (content script)
#[wasm_bindgen]
pub fn start_content_script() {
    spawn_local(async {
        if let Err(e) = web::runtime::start().await {
            log::warn!("Unwatched filter: content script not started: {}", e);
        }
    });
}

// Start the Yew app for the settings popup
#[wasm_bindgen]
pub fn start_settings_panel() {
    yew::Renderer::<ui::settings::SettingsPanel>::new().render();
}

// Register the background worker listeners
#[wasm_bindgen]
pub fn start_background() {
    web::background::start();
}
