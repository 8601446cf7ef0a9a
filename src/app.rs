//! Hospital Portal App
//!
//! Root component: provides config, store, toasts and the query client, then
//! shows the screen picked in the section tab bar.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{AppointmentsScreen, BillingScreen, LogPanel, PatientsScreen, PharmacyScreen, SectionTabBar};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::query::provide_query_client;
use crate::store::{AppState, AppStateStoreFields, Section};
use crate::toast::{ToastViewport, Toaster};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let store = Store::new(AppState::new(config.toast_capacity));
    provide_context(store);

    provide_query_client(Toaster::new(store, config.toast_timeout_ms));
    provide_context(AppContext::new(config));

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"Hospital Portal"</h1>
                <SectionTabBar />
            </header>
            <main class="main-content">
                {move || match store.active_section().get() {
                    Section::Billing => view! { <BillingScreen /> }.into_any(),
                    Section::Pharmacy => view! { <PharmacyScreen /> }.into_any(),
                    Section::Patients => view! { <PatientsScreen /> }.into_any(),
                    Section::Appointments => view! { <AppointmentsScreen /> }.into_any(),
                }}
            </main>
            <ToastViewport />
            <LogPanel />
        </div>
    }
}
