/// Background worker: install defaults and answers global-state queries
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::messages::{ExtensionMessage, GlobalState};
use crate::web::bridge;

pub fn start() {
    let installed = Closure::<dyn FnMut(JsValue)>::new(|_details: JsValue| {
        spawn_local(async {
            match bridge::set_global_enabled(true).await {
                Ok(()) => log::info!("Unwatched filter installed, global filtering enabled by default"),
                Err(e) => log::warn!("Unwatched filter: could not store default global state: {}", e),
            }
        });
    });
    bridge::on_installed(installed.as_ref().unchecked_ref());
    installed.forget();

    let on_message = Closure::<dyn FnMut(JsValue) -> JsValue>::new(|message: JsValue| {
        match ExtensionMessage::from_js(message) {
            Ok(ExtensionMessage::GetGlobalState) => future_to_promise(async {
                let enabled = bridge::global_enabled().await.unwrap_or_else(|e| {
                    log::warn!("Unwatched filter: global state unreadable: {}", e);
                    true
                });
                serde_wasm_bindgen::to_value(&GlobalState { enabled })
                    .map_err(|e| JsValue::from_str(&e.to_string()))
            })
            .into(),
            _ => JsValue::UNDEFINED,
        }
    });
    bridge::on_runtime_message(on_message.as_ref().unchecked_ref());
    on_message.forget();
}
