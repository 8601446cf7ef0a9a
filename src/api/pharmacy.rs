//! Pharmacy Endpoints

use crate::error::ApiError;
use crate::models::{DrugRequest, NewDrugRequest};
use crate::query::QueryKey;

use super::ApiClient;

const DRUG_REQUESTS: &str = "pharmacy/drug-requests";

pub fn drug_requests_key() -> QueryKey {
    QueryKey::new(["pharmacy", "drug-requests"])
}

pub async fn list_drug_requests(api: &ApiClient) -> Result<Vec<DrugRequest>, ApiError> {
    api.get_request(DRUG_REQUESTS).await
}

pub async fn create_drug_request(api: &ApiClient, request: &NewDrugRequest) -> Result<DrugRequest, ApiError> {
    api.post_request(DRUG_REQUESTS, request).await
}

pub async fn delete_drug_request(api: &ApiClient, id: &str) -> Result<Option<String>, ApiError> {
    api.delete_request(&format!("{DRUG_REQUESTS}/{id}")).await
}
