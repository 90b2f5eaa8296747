pub mod app;
pub mod config;
pub mod download;
pub mod http;
pub mod logging;
pub mod terminal;
