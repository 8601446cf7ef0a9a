//! Billing Endpoints

use crate::error::ApiError;
use crate::models::{Bill, NewBill};
use crate::query::QueryKey;

use super::ApiClient;

const BILLS: &str = "billing/bills";

pub fn bills_key() -> QueryKey {
    QueryKey::new(["bills"])
}

pub async fn list_bills(api: &ApiClient) -> Result<Vec<Bill>, ApiError> {
    api.get_request(BILLS).await
}

pub async fn create_bill(api: &ApiClient, bill: &NewBill) -> Result<Bill, ApiError> {
    api.post_request(BILLS, bill).await
}
