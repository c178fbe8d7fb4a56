//! Core pipeline components.

pub mod backup;
pub mod env;
pub mod fragments;
pub mod manifest;
pub mod pipeline;
pub mod reindent;
pub mod secrets;
pub mod template;
pub mod validate;
