/// Typed wrappers around the extension API bridge in `js/bridge.js`
use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::messages::{ExtensionMessage, decode_global_enabled};

#[wasm_bindgen(module = "/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn readGlobalEnabled() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn writeGlobalEnabled(enabled: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn broadcastToHostTabs(message: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_name = onRuntimeMessage)]
    pub fn on_runtime_message(handler: &js_sys::Function);

    #[wasm_bindgen(js_name = onInstalled)]
    pub fn on_installed(handler: &js_sys::Function);
}

/// Global switch from extension storage, defaulting to enabled
pub async fn global_enabled() -> Result<bool, FilterError> {
    let raw = readGlobalEnabled()
        .await
        .map_err(|e| FilterError::bridge("read global state", e))?;
    Ok(decode_global_enabled(raw.as_bool()))
}

pub async fn set_global_enabled(enabled: bool) -> Result<(), FilterError> {
    writeGlobalEnabled(enabled)
        .await
        .map_err(|e| FilterError::bridge("write global state", e))
}

/// Deliver `message` to every open host-site tab
pub async fn broadcast(message: &ExtensionMessage) -> Result<(), FilterError> {
    broadcastToHostTabs(message.to_js()?)
        .await
        .map_err(|e| FilterError::bridge("broadcast", e))
}
