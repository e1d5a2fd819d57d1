/// Error type shared by the filter core and the browser glue
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// Element missing or a DOM call rejected
    #[error("dom: {0}")]
    Dom(String),

    /// Durable storage unavailable or refused a write
    #[error("storage: {0}")]
    Storage(String),

    /// A call into the extension JS bridge failed
    #[error("bridge: {0}")]
    Bridge(String),

    /// Inbound message could not be decoded
    #[error("message: {0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    /// Wrap a thrown JS value, keeping its debug rendering
    pub fn dom(context: &str, err: wasm_bindgen::JsValue) -> Self {
        FilterError::Dom(format!("{}: {:?}", context, err))
    }

    pub fn storage(context: &str, err: wasm_bindgen::JsValue) -> Self {
        FilterError::Storage(format!("{}: {:?}", context, err))
    }

    pub fn bridge(context: &str, err: wasm_bindgen::JsValue) -> Self {
        FilterError::Bridge(format!("{}: {:?}", context, err))
    }
}
