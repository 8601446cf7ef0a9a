//! Section Tab Bar Component
//!
//! Tab bar for switching between screens in the main content area.

use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields, Section};

#[component]
pub fn SectionTabBar() -> impl IntoView {
    let store = use_app_store();

    view! {
        <nav class="section-tab-bar">
            {Section::ALL
                .into_iter()
                .map(|section| {
                    let tab_class = move || {
                        if store.active_section().get() == section { "section-tab active" } else { "section-tab" }
                    };
                    view! {
                        <button
                            type="button"
                            class=tab_class
                            on:click=move |_| {
                                log::debug!("[nav] {}", section.title());
                                store.active_section().set(section);
                            }
                        >
                            {section.title()}
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}
