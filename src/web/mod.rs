/// Browser bindings: DOM, localStorage, extension APIs and the event loop glue
pub mod background;
pub mod bridge;
pub mod dom;
pub mod local_storage;
pub mod runtime;
