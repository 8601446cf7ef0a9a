//! Billing Screen
//!
//! Bills table with a "Create New Bill" dialog.

use leptos::prelude::*;
use leptos_forge::prelude::*;
use serde_json::Value;

use crate::api::billing;
use crate::context::use_app_context;
use crate::models::{format_amount, Bill, NewBill};
use crate::query::{use_query, use_query_client};

pub fn bill_columns() -> Vec<ColumnDef<Bill>> {
    vec![
        ColumnDef::new("patient", "Patient", |b: &Bill| {
            b.patient_name.clone().unwrap_or_else(|| b.patient_id.clone())
        })
        .sortable(),
        ColumnDef::new("description", "Description", |b: &Bill| b.description.clone()),
        ColumnDef::new("total", "Total payable", |b: &Bill| format_amount(b.total_payable))
            .sort_by_number(|b: &Bill| b.total_payable),
        ColumnDef::new("paid", "Amount paid", |b: &Bill| format_amount(b.amount_paid)),
        ColumnDef::new("balance", "Balance", |b: &Bill| format_amount(b.balance())).sort_by_number(Bill::balance),
        ColumnDef::new("status", "Status", |b: &Bill| b.status.label().to_string()),
    ]
}

/// Fields and rules of the "Create New Bill" form
pub fn new_bill_form() -> FormState {
    FormState::new(
        vec![
            FieldDescriptor::text("patient_id", "Patient ID").placeholder("e.g. HMS-00231"),
            FieldDescriptor::textarea("description", "Description").placeholder("Consultation, lab work, drugs..."),
            FieldDescriptor::number("total_payable", "Total payable (₦)"),
            FieldDescriptor::number("amount_paid", "Amount paid (₦)")
                .description("Leave blank if nothing has been paid yet"),
        ],
        Schema::new()
            .field("patient_id", [Rule::required("Patient ID is required")])
            .field(
                "description",
                [
                    Rule::required("Description is required"),
                    Rule::max_length(255, "Description must be at most 255 characters"),
                ],
            )
            .field(
                "total_payable",
                [
                    Rule::required("Total payable is required"),
                    Rule::numeric("Total payable must be a number"),
                    Rule::min(0.0, "Total payable cannot be negative"),
                ],
            )
            .field(
                "amount_paid",
                [
                    Rule::numeric("Amount paid must be a number"),
                    Rule::min(0.0, "Amount paid cannot be negative"),
                    Rule::custom(paid_within_total),
                ],
            ),
    )
}

fn paid_within_total(value: &Value, form: &serde_json::Map<String, Value>) -> Result<(), String> {
    let paid = leptos_forge::rules::number_of(value);
    let total = form.get("total_payable").and_then(leptos_forge::rules::number_of);
    match (paid, total) {
        (Some(paid), Some(total)) if paid > total => Err("Amount paid cannot exceed the total payable".into()),
        _ => Ok(()),
    }
}

#[component]
pub fn BillingScreen() -> impl IntoView {
    let ctx = use_app_context();
    let client = use_query_client();
    let bills = use_query(billing::bills_key, move || {
        let api = ctx.api();
        async move { billing::list_bills(&api).await }
    });

    let dialog_open = RwSignal::new(false);
    let pending = RwSignal::new(false);
    let form = RwSignal::new(new_bill_form());
    let pagination = RwSignal::new(PaginationState::new(ctx.page_size()));

    let rows = Signal::derive(move || bills.data.get().unwrap_or_default());
    let options = Signal::derive(move || TableOptions {
        is_loading: bills.is_loading.get(),
        skeleton_rows: Some(ctx.skeleton_rows()),
        ..Default::default()
    });

    let on_submit = Callback::new(move |bill: NewBill| {
        let api = ctx.api();
        client.mutate(pending, async move { billing::create_bill(&api, &bill).await }, move |result| {
            // A failed create keeps the dialog open with what was typed
            if let Ok(created) = result {
                log::info!("[billing] created bill {}", created.id);
                client.toaster().success("Bill created");
                client.invalidate(&billing::bills_key());
                form.update(|f| f.reset(None));
                dialog_open.set(false);
            }
        });
    });

    view! {
        <section class="screen billing-screen">
            <header class="screen-header">
                <h1>"Billing"</h1>
                <button type="button" class="primary" on:click=move |_| dialog_open.set(true)>
                    "Create New Bill"
                </button>
            </header>
            <DataTable
                columns=bill_columns()
                rows=rows
                options=options
                pagination=pagination
                filter_placeholder="Filter bills..."
            />
            <Dialog open=dialog_open title="Create New Bill" description="Raise a bill against a registered patient.">
                <ForgeForm form=form on_submit=on_submit submit_label="Create bill" pending=pending />
            </Dialog>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_total_blocks_submission() {
        let mut form = new_bill_form();
        form.set_value("patient_id", json!("HMS-00231"));
        form.set_value("description", json!("Consultation"));

        let mut requests = 0;
        let submitted = form.handle_submit(|_: NewBill| requests += 1);

        assert!(!submitted);
        assert_eq!(requests, 0);
        assert_eq!(form.error("total_payable"), Some("Total payable is required"));
    }

    #[test]
    fn valid_bill_decodes_with_numbers() {
        let mut form = new_bill_form();
        form.set_value("patient_id", json!(" HMS-00231 "));
        form.set_value("description", json!("Consultation"));
        form.set_value("total_payable", json!("15000"));

        let bill: NewBill = form.submit().unwrap();
        assert_eq!(bill.patient_id, "HMS-00231");
        assert_eq!(bill.total_payable, 15000.0);
        assert_eq!(bill.amount_paid, None);
    }

    #[test]
    fn overpayment_is_rejected() {
        let mut form = new_bill_form();
        form.set_value("patient_id", json!("HMS-1"));
        form.set_value("description", json!("Ward fee"));
        form.set_value("total_payable", json!("5000"));
        form.set_value("amount_paid", json!("7000"));
        assert!(!form.validate());
        assert_eq!(form.error("amount_paid"), Some("Amount paid cannot exceed the total payable"));
    }

    #[test]
    fn columns_render_balance() {
        let bill = Bill {
            id: "1".into(),
            patient_id: "HMS-1".into(),
            patient_name: None,
            description: "Ward fee".into(),
            total_payable: 12000.0,
            amount_paid: 2000.0,
            status: Default::default(),
        };
        let cells: Vec<_> = bill_columns().iter().map(|c| c.render(&bill)).collect();
        assert_eq!(cells[0], "HMS-1");
        assert_eq!(cells[4], "₦10,000.00");
    }
}
