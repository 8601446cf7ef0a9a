//! Patient Management Endpoints

use crate::error::ApiError;
use crate::models::{NewPatient, Paginated, Patient, PatientListParams};
use crate::query::QueryKey;

use super::ApiClient;

const PATIENTS: &str = "patient-management/patients";

/// Every patient list, whatever the search or page
pub fn patients_key() -> QueryKey {
    QueryKey::new(["patients"])
}

pub fn patient_page_key(params: &PatientListParams) -> QueryKey {
    patients_key().with(params.search.trim().to_lowercase()).with(params.page.to_string()).with(params.limit.to_string())
}

pub async fn list_patients(api: &ApiClient, params: &PatientListParams) -> Result<Paginated<Patient>, ApiError> {
    api.get_with_query(PATIENTS, params).await
}

pub async fn register_patient(api: &ApiClient, patient: &NewPatient) -> Result<Patient, ApiError> {
    api.post_request(PATIENTS, patient).await
}
