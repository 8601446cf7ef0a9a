//! Frontend Models
//!
//! DTOs matching the backend API. The backend owns every entity; these are
//! cache-lifetime copies.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept ids sent as either strings or numbers
pub fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

/// Prefix of ids assigned locally before the backend confirms a create
pub const TEMP_ID_PREFIX: &str = "temp-";

pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

/// One page of a server-paginated list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(alias = "data", alias = "results", default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(alias = "total", alias = "count", default)]
    pub total_count: usize,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total_count: 0 }
    }
}

// ========================
// Patients
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub hospital_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub lga: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Payload of the patient registration wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub address: String,
    pub state: String,
    pub lga: String,
    pub next_of_kin_name: String,
    pub next_of_kin_phone: String,
    pub next_of_kin_relationship: String,
}

/// Query string of the paged patient list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientListParams {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
    pub page: usize,
    pub limit: usize,
}

// ========================
// Billing
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[default]
    Unpaid,
    PartiallyPaid,
    Paid,
    #[serde(other)]
    Unknown,
}

impl BillStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Unpaid => "Unpaid",
            BillStatus::PartiallyPaid => "Part paid",
            BillStatus::Paid => "Paid",
            BillStatus::Unknown => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub total_payable: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default)]
    pub status: BillStatus,
}

impl Bill {
    pub fn balance(&self) -> f64 {
        (self.total_payable - self.amount_paid).max(0.0)
    }
}

/// Naira amount with thousands separators, e.g. `₦12,500.00`
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}₦{grouped}.{cents}")
}

/// Payload of the "Create New Bill" form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBill {
    pub patient_id: String,
    pub description: String,
    pub total_payable: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<f64>,
}

// ========================
// Pharmacy
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugLine {
    pub drug_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub dosage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugRequest {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub patient_name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default, alias = "items")]
    pub drugs: Vec<DrugLine>,
    #[serde(default = "pending_status")]
    pub status: String,
}

fn pending_status() -> String {
    "pending".to_string()
}

impl DrugRequest {
    pub fn is_pending_sync(&self) -> bool {
        is_temp_id(&self.id)
    }

    /// Record shown in the list while the create request is in flight
    pub fn optimistic(request: &NewDrugRequest) -> Self {
        Self {
            id: String::new(),
            patient_name: request.patient_name.clone(),
            note: request.note.clone(),
            drugs: request.drugs.clone(),
            status: pending_status(),
        }
    }
}

/// Payload of the "New Drug Request" form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrugRequest {
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    pub drugs: Vec<DrugLine>,
}

// ========================
// Appointments
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub patient_name: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_accept_numbers_and_strings() {
        let bill: Bill = serde_json::from_value(json!({
            "id": 42, "patient_id": "P-1", "total_payable": 100.0
        }))
        .unwrap();
        assert_eq!(bill.id, "42");
        assert_eq!(bill.status, BillStatus::Unpaid);
        assert_eq!(bill.balance(), 100.0);

        let bill: Bill = serde_json::from_value(json!({
            "id": "b-7", "patient_id": "P-1", "total_payable": 50, "amount_paid": 80, "status": "paid"
        }))
        .unwrap();
        assert_eq!(bill.id, "b-7");
        assert_eq!(bill.status, BillStatus::Paid);
        assert_eq!(bill.balance(), 0.0);
    }

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(0.0), "₦0.00");
        assert_eq!(format_amount(950.5), "₦950.50");
        assert_eq!(format_amount(12500.0), "₦12,500.00");
        assert_eq!(format_amount(1234567.891), "₦1,234,567.89");
        assert_eq!(format_amount(-2000.0), "-₦2,000.00");
    }

    #[test]
    fn unknown_bill_status_does_not_fail() {
        let bill: Bill = serde_json::from_value(json!({
            "id": 1, "patient_id": "P", "total_payable": 1, "status": "waived"
        }))
        .unwrap();
        assert_eq!(bill.status, BillStatus::Unknown);
    }

    #[test]
    fn paginated_accepts_common_aliases() {
        let page: Paginated<Patient> = serde_json::from_value(json!({
            "data": [{ "id": 1, "first_name": "Ada", "last_name": "Obi", "date_of_birth": "1990-04-12" }],
            "total": 31
        }))
        .unwrap();
        assert_eq!(page.total_count, 31);
        assert_eq!(page.items[0].full_name(), "Ada Obi");
        assert_eq!(page.items[0].date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 12));
    }

    #[test]
    fn drug_request_reads_items_alias() {
        let request: DrugRequest = serde_json::from_value(json!({
            "id": "temp-3",
            "patient_name": "Musa Bello",
            "items": [{ "drug_name": "Artemether", "quantity": 6 }]
        }))
        .unwrap();
        assert!(request.is_pending_sync());
        assert_eq!(request.drugs[0].quantity, 6);
        assert_eq!(request.status, "pending");
    }

    #[test]
    fn patient_params_skip_blank_search() {
        let params = PatientListParams { search: String::new(), page: 2, limit: 10 };
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({ "page": 2, "limit": 10 }));
    }
}
