// src/lib.rs

pub mod api;
pub mod app;
pub mod attachments;
pub mod chat_message;
pub mod chat_state;
pub mod config;
pub mod constants;
pub mod errors;
pub mod key_handlers;
pub mod logging;
pub mod message;
pub mod status_indicator;
pub mod ui;
