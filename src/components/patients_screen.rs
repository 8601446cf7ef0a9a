//! Patients Screen
//!
//! Search-driven, server-paginated patient list. The search term and page
//! are part of the query key, so each combination is cached separately.

use leptos::prelude::*;
use leptos_forge::prelude::*;

use crate::api::patient;
use crate::components::RegisterPatientWizard;
use crate::context::use_app_context;
use crate::models::{Patient, PatientListParams};
use crate::query::use_query;

pub fn patient_columns() -> Vec<ColumnDef<Patient>> {
    vec![
        ColumnDef::new("hospital_number", "Hospital no.", |p: &Patient| {
            p.hospital_number.clone().unwrap_or_else(|| p.id.clone())
        }),
        ColumnDef::new("name", "Name", Patient::full_name),
        ColumnDef::new("gender", "Gender", |p: &Patient| p.gender.clone().unwrap_or_default()),
        ColumnDef::new("phone", "Phone", |p: &Patient| p.phone.clone().unwrap_or_default()),
        ColumnDef::new("date_of_birth", "Date of birth", |p: &Patient| {
            p.date_of_birth.map(|d| d.format("%d %b %Y").to_string()).unwrap_or_default()
        }),
        ColumnDef::new("location", "LGA / State", |p: &Patient| match (&p.lga, &p.state) {
            (Some(lga), Some(state)) => format!("{lga}, {state}"),
            (None, Some(state)) => state.clone(),
            _ => String::new(),
        }),
    ]
}

/// Request parameters for a search query; pages are 1-based on the wire
pub fn list_params(query: &SearchQuery) -> PatientListParams {
    PatientListParams {
        search: query.search.trim().to_string(),
        page: query.pagination.page_index + 1,
        limit: query.pagination.page_size,
    }
}

#[component]
pub fn PatientsScreen() -> impl IntoView {
    let ctx = use_app_context();
    let search = RwSignal::new(String::new());
    let pagination = RwSignal::new(PaginationState::new(ctx.page_size()));
    let wizard_open = RwSignal::new(false);

    let query = move || SearchQuery { search: search.get(), pagination: pagination.get() };
    let patients = use_query(
        move || patient::patient_page_key(&list_params(&query())),
        move || {
            let api = ctx.api();
            let params = list_params(&query());
            async move { patient::list_patients(&api, &params).await }
        },
    );

    let on_search = move |ev: web_sys::Event| {
        let mut current = SearchQuery { search: search.get_untracked(), pagination: pagination.get_untracked() };
        if current.set_search(event_target_value(&ev)) {
            search.set(current.search);
            pagination.set(current.pagination);
        }
    };

    let rows = Signal::derive(move || patients.data.get().map(|page| page.items).unwrap_or_default());
    let options = Signal::derive(move || TableOptions {
        is_loading: patients.is_loading.get(),
        manual_pagination: true,
        total_count: patients.data.with(|page| page.as_ref().map(|p| p.total_count)),
        disable_selection: true,
        skeleton_rows: Some(ctx.skeleton_rows()),
        ..Default::default()
    });

    view! {
        <section class="screen patients-screen">
            <header class="screen-header">
                <h1>"Patients"</h1>
                <input
                    class="screen-search"
                    type="search"
                    placeholder="Search by name, phone or hospital number"
                    prop:value=move || search.get()
                    on:input=on_search
                />
                <button type="button" class="primary" on:click=move |_| wizard_open.set(true)>
                    "Register Patient"
                </button>
            </header>
            <DataTable columns=patient_columns() rows=rows options=options pagination=pagination />
            <RegisterPatientWizard open=wizard_open />
        </section>
    }
}
