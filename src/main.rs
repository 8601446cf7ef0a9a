#![allow(warnings)]
//! Hospital Portal Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod error;
mod locations;
mod models;
mod query;
mod store;
mod toast;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_env();
    if let Err(err) = rolling_logger::init(config.log_capacity, config.log_level) {
        web_sys::console::warn_1(&format!("logger already installed: {err}").into());
    }
    log::info!("[app] starting against {}", config.api_base_url);

    mount_to_body(move || view! { <App config=config.clone() /> });
}
