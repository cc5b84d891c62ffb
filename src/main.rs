//! TidyTasks Frontend Entry Point

mod app;
mod board;
mod calendar;
mod commands;
mod components;
mod config;
mod context;
mod error;
mod footer;
mod models;
mod router;
mod session;
mod store;
mod toast;
mod validation;
mod views;

use app::App;
use leptos::prelude::*;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(e) = rolling_logger::init(level) {
        web_sys::console::warn_1(&format!("logger already installed: {}", e).into());
    }
    mount_to_body(App);
}
