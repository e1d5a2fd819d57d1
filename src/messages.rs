/// Messages exchanged between the settings panel, background worker and
/// content script
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::error::{FilterError, Result};

/// chrome.storage.local key of the global switch
pub const GLOBAL_ENABLED_KEY: &str = "globalFilterEnabled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ExtensionMessage {
    /// Settings panel → content scripts
    #[serde(rename = "updateGlobalState")]
    UpdateGlobalState { enabled: bool },
    /// Any page → background worker, answered with [`GlobalState`]
    #[serde(rename = "getGlobalState")]
    GetGlobalState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalState {
    pub enabled: bool,
}

impl ExtensionMessage {
    pub fn from_js(value: JsValue) -> Result<Self> {
        serde_wasm_bindgen::from_value(value).map_err(|e| FilterError::Message(e.to_string()))
    }

    pub fn to_js(&self) -> Result<JsValue> {
        serde_wasm_bindgen::to_value(self).map_err(|e| FilterError::Message(e.to_string()))
    }
}

/// Stored switch value; unset or non-boolean means enabled
pub fn decode_global_enabled(raw: Option<bool>) -> bool {
    raw.unwrap_or(true)
}
