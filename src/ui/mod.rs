/// UI module exports
pub mod settings;
