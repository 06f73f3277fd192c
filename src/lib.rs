pub mod clipboard;
pub mod config;
pub mod dialog;
pub mod document;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod notify;
pub mod pipeline;
pub mod reconcile;
pub mod render;
pub mod title;
