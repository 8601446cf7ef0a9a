//! Appointment Management Endpoints

use serde::Serialize;

use crate::error::ApiError;
use crate::models::Appointment;
use crate::query::QueryKey;

use super::ApiClient;

const APPOINTMENTS: &str = "appointment-management/appointments";

#[derive(Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

pub fn appointments_key() -> QueryKey {
    QueryKey::new(["appointments"])
}

pub async fn list_appointments(api: &ApiClient) -> Result<Vec<Appointment>, ApiError> {
    api.get_request(APPOINTMENTS).await
}

pub async fn cancel_appointment(api: &ApiClient, id: &str) -> Result<Appointment, ApiError> {
    api.patch_request(&format!("{APPOINTMENTS}/{id}"), &StatusUpdate { status: "cancelled" }).await
}
