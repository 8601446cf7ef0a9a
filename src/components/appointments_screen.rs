//! Appointments Screen

use leptos::prelude::*;
use leptos_forge::prelude::*;

use crate::api::appointment;
use crate::context::use_app_context;
use crate::models::Appointment;
use crate::query::{use_query, use_query_client};
use crate::toast::ToastKind;

pub fn appointment_columns() -> Vec<ColumnDef<Appointment>> {
    vec![
        ColumnDef::new("patient", "Patient", |a: &Appointment| a.patient_name.clone()).sortable(),
        ColumnDef::new("doctor", "Doctor", |a: &Appointment| a.doctor_name.clone().unwrap_or_else(|| "-".into())),
        ColumnDef::new("date", "Date", |a: &Appointment| a.date.format("%Y-%m-%d").to_string()).sortable(),
        ColumnDef::new("time", "Time", |a: &Appointment| a.time.clone().unwrap_or_default()),
        ColumnDef::new("reason", "Reason", |a: &Appointment| a.reason.clone()),
        ColumnDef::new("status", "Status", |a: &Appointment| a.status.clone()).sortable(),
    ]
}

pub fn is_cancellable(appointment: &Appointment) -> bool {
    !matches!(appointment.status.to_lowercase().as_str(), "cancelled" | "canceled" | "completed")
}

#[component]
pub fn AppointmentsScreen() -> impl IntoView {
    let ctx = use_app_context();
    let client = use_query_client();
    let appointments = use_query(appointment::appointments_key, move || {
        let api = ctx.api();
        async move { appointment::list_appointments(&api).await }
    });
    let cancelling = RwSignal::new(false);

    let rows = Signal::derive(move || appointments.data.get().unwrap_or_default());
    let options = Signal::derive(move || TableOptions {
        is_loading: appointments.is_loading.get(),
        skeleton_rows: Some(ctx.skeleton_rows()),
        disable_selection: true,
        ..Default::default()
    });

    let cancel = RowAction::confirmed("Cancel", move |appt: Appointment| {
        if !is_cancellable(&appt) {
            client.toaster().show(ToastKind::Info, "This appointment can no longer be cancelled");
            return;
        }
        let api = ctx.api();
        client.mutate(
            cancelling,
            async move { appointment::cancel_appointment(&api, &appt.id).await },
            move |result| {
                if let Ok(updated) = result {
                    log::info!("[appointments] cancelled {}", updated.id);
                    client.toaster().success("Appointment cancelled");
                    client.invalidate(&appointment::appointments_key());
                }
            },
        );
    });

    view! {
        <section class="screen appointments-screen">
            <header class="screen-header">
                <h1>"Appointments"</h1>
            </header>
            <DataTable
                columns=appointment_columns()
                rows=rows
                options=options
                row_actions=vec![cancel]
                filter_placeholder="Filter appointments..."
            />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn appointment(status: &str) -> Appointment {
        Appointment {
            id: "5".into(),
            patient_name: "Tunde Bakare".into(),
            doctor_name: None,
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            time: Some("09:30".into()),
            reason: "Follow-up".into(),
            status: status.into(),
        }
    }

    #[test]
    fn finished_appointments_cannot_be_cancelled() {
        assert!(is_cancellable(&appointment("scheduled")));
        assert!(!is_cancellable(&appointment("Cancelled")));
        assert!(!is_cancellable(&appointment("completed")));
    }

    #[test]
    fn columns_render_missing_doctor() {
        let cells: Vec<_> = appointment_columns().iter().map(|c| c.render(&appointment("scheduled"))).collect();
        assert_eq!(cells[1], "-");
        assert_eq!(cells[2], "2026-03-14");
    }
}
