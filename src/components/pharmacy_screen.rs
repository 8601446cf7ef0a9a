//! Pharmacy Screen
//!
//! Drug requests with a line-item form. New requests appear in the table
//! before the backend confirms them and disappear again if it refuses.

use leptos::prelude::*;
use leptos_forge::prelude::*;
use serde_json::{json, Map};

use crate::api::pharmacy;
use crate::context::use_app_context;
use crate::models::{DrugRequest, NewDrugRequest};
use crate::query::{use_query, use_query_client};

pub fn drug_request_columns() -> Vec<ColumnDef<DrugRequest>> {
    vec![
        ColumnDef::new("patient", "Patient", |r: &DrugRequest| r.patient_name.clone()).sortable(),
        ColumnDef::new("drugs", "Drugs", |r: &DrugRequest| {
            r.drugs.iter().map(|d| format!("{} ×{}", d.drug_name, d.quantity)).collect::<Vec<_>>().join(", ")
        }),
        ColumnDef::new("note", "Note", |r: &DrugRequest| r.note.clone()),
        ColumnDef::new("status", "Status", |r: &DrugRequest| {
            if r.is_pending_sync() {
                "saving…".to_string()
            } else {
                r.status.clone()
            }
        })
        .sortable(),
    ]
}

pub fn drug_request_form() -> FormState {
    let line_fields = vec![
        FieldDescriptor::text("drug_name", "Drug"),
        FieldDescriptor::number("quantity", "Quantity"),
        FieldDescriptor::text("dosage", "Dosage").placeholder("e.g. 500mg twice daily"),
    ];
    let line_rules = Schema::new()
        .field("drug_name", [Rule::required("Drug name is required")])
        .field(
            "quantity",
            [
                Rule::required("Quantity is required"),
                Rule::numeric("Quantity must be a number"),
                Rule::min(1.0, "Quantity must be at least 1"),
            ],
        );

    let mut defaults = Map::new();
    defaults.insert("drugs".into(), json!([{ "drug_name": "", "quantity": "", "dosage": "" }]));

    FormState::new(
        vec![
            FieldDescriptor::text("patient_name", "Patient name"),
            FieldDescriptor::group("drugs", "Drug", line_fields),
            FieldDescriptor::textarea("note", "Note"),
        ],
        Schema::new()
            .field("patient_name", [Rule::required("Patient name is required")])
            .field("drugs", [Rule::min_items(1, "Add at least one drug")])
            .group("drugs", line_rules),
    )
    .with_defaults(defaults)
}

#[component]
pub fn PharmacyScreen() -> impl IntoView {
    let ctx = use_app_context();
    let client = use_query_client();
    let requests = use_query(pharmacy::drug_requests_key, move || {
        let api = ctx.api();
        async move { pharmacy::list_drug_requests(&api).await }
    });

    let dialog_open = RwSignal::new(false);
    let pending = RwSignal::new(false);
    let deleting = RwSignal::new(false);
    let form = RwSignal::new(drug_request_form());

    let rows = Signal::derive(move || requests.data.get().unwrap_or_default());
    let options = Signal::derive(move || TableOptions {
        is_loading: requests.is_loading.get(),
        skeleton_rows: Some(ctx.skeleton_rows()),
        disable_selection: true,
        ..Default::default()
    });

    let on_submit = Callback::new(move |request: NewDrugRequest| {
        let key = pharmacy::drug_requests_key();
        let insert = client.optimistic_insert(&key, &DrugRequest::optimistic(&request));
        dialog_open.set(false);

        let api = ctx.api();
        client.mutate(pending, async move { pharmacy::create_drug_request(&api, &request).await }, move |result| {
            match result {
                Ok(created) => {
                    log::info!("[pharmacy] drug request {} created", created.id);
                    // A failed commit stales the list itself
                    match &insert {
                        Some(insert) => {
                            client.commit_insert(insert, &created);
                        }
                        None => client.invalidate(&key),
                    }
                    form.update(|f| f.reset(None));
                    client.toaster().success("Drug request sent to pharmacy");
                }
                Err(_) => {
                    if let Some(insert) = &insert {
                        log::warn!("[pharmacy] rolling back {}", insert.temp_id);
                        client.rollback_insert(insert);
                    }
                    // Entered values are still on the form
                    dialog_open.set(true);
                }
            }
        });
    });

    let delete_action = RowAction::confirmed("Delete", move |request: DrugRequest| {
        if request.is_pending_sync() {
            log::debug!("[pharmacy] {} is not saved yet", request.id);
            return;
        }
        let api = ctx.api();
        let id = request.id.clone();
        client.mutate(deleting, async move { pharmacy::delete_drug_request(&api, &id).await }, move |result| {
            if let Ok(message) = result {
                client.toaster().success(message.unwrap_or_else(|| "Drug request deleted".into()));
                client.invalidate(&pharmacy::drug_requests_key());
            }
        });
    });

    view! {
        <section class="screen pharmacy-screen">
            <header class="screen-header">
                <h1>"Pharmacy"</h1>
                <button type="button" class="primary" on:click=move |_| dialog_open.set(true)>
                    "New Drug Request"
                </button>
            </header>
            <DataTable
                columns=drug_request_columns()
                rows=rows
                options=options
                row_actions=vec![delete_action]
                filter_placeholder="Filter requests..."
            />
            <Dialog open=dialog_open title="New Drug Request">
                <ForgeForm form=form on_submit=on_submit submit_label="Send request" pending=pending />
            </Dialog>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_starts_with_one_line() {
        let form = drug_request_form();
        assert_eq!(form.row_count("drugs"), 1);
        assert!(!form.is_dirty());
    }

    #[test]
    fn line_items_are_validated_by_index() {
        let mut form = drug_request_form();
        form.set_value("patient_name", json!("Aisha Bello"));
        form.set_value("drugs.0.drug_name", json!("Amoxicillin"));
        form.set_value("drugs.0.quantity", json!("10"));
        form.append("drugs", None);

        assert!(!form.validate());
        assert_eq!(form.error("drugs.1.drug_name"), Some("Drug name is required"));
        assert_eq!(form.error("drugs.0.drug_name"), None);

        form.remove("drugs", 1);
        let request: NewDrugRequest = form.submit().unwrap();
        assert_eq!(request.drugs.len(), 1);
        assert_eq!(request.drugs[0].quantity, 10);
        assert!(request.note.is_empty());
    }

    #[test]
    fn empty_line_list_is_rejected() {
        let mut form = drug_request_form();
        form.set_value("patient_name", json!("Aisha Bello"));
        form.remove("drugs", 0);
        assert!(!form.validate());
        assert_eq!(form.error("drugs"), Some("Add at least one drug"));
    }

    #[test]
    fn pending_rows_show_saving() {
        let request = DrugRequest {
            id: "temp-1".into(),
            patient_name: "Aisha Bello".into(),
            note: String::new(),
            drugs: vec![],
            status: "pending".into(),
        };
        assert_eq!(drug_request_columns()[3].render(&request), "saving…");
    }
}
