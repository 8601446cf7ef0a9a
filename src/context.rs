//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::config::AppConfig;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<AppConfig>,
    api: StoredValue<ApiClient>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let api = ApiClient::from_config(&config);
        Self { config: StoredValue::new(config), api: StoredValue::new(api) }
    }

    /// Client for one request; cheap to clone into an async block
    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    pub fn page_size(&self) -> usize {
        self.config.with_value(|c| c.page_size)
    }

    pub fn skeleton_rows(&self) -> usize {
        self.config.with_value(|c| c.skeleton_rows)
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
