//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::toast::ToastQueue;

/// Screens reachable from the section tab bar
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Billing,
    Pharmacy,
    Patients,
    Appointments,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Billing, Section::Pharmacy, Section::Patients, Section::Appointments];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Billing => "Billing",
            Section::Pharmacy => "Pharmacy",
            Section::Patients => "Patients",
            Section::Appointments => "Appointments",
        }
    }
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Screen shown in the main area
    pub active_section: Section,
    /// Toasts currently on screen
    pub toasts: ToastQueue,
}

impl AppState {
    pub fn new(toast_capacity: usize) -> Self {
        Self { toasts: ToastQueue::with_capacity(toast_capacity), ..Default::default() }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}
