//! Register Patient Wizard
//!
//! Three steps: bio data, contact (state then LGA), next of kin. Values are
//! kept per step so going back never loses input.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use leptos::prelude::*;
use leptos_forge::prelude::*;
use regex::Regex;
use serde_json::{Map, Value};

use crate::api::patient;
use crate::context::use_app_context;
use crate::error::ApiError;
use crate::locations::{lgas_of, states};
use crate::models::NewPatient;
use crate::query::use_query_client;

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+234|0)[789][01]\d{8}$").expect("phone pattern is valid"));

const GENDERS: [&str; 2] = ["Female", "Male"];
const RELATIONSHIPS: [&str; 5] = ["Parent", "Spouse", "Sibling", "Child", "Other"];

pub fn registration_steps() -> Vec<WizardStep> {
    vec![
        WizardStep::new("bio", "Bio data"),
        WizardStep::new("contact", "Contact"),
        WizardStep::new("next_of_kin", "Next of kin"),
    ]
}

fn options(values: &[&str]) -> Vec<SelectOption> {
    values.iter().map(|v| SelectOption::from(*v)).collect()
}

fn birth_date_in_past(value: &Value, _: &Map<String, Value>) -> Result<(), String> {
    let Some(text) = value.as_str().filter(|s| !s.trim().is_empty()) else {
        return Ok(());
    };
    match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
        Ok(date) if date > Local::now().date_naive() => Err("Date of birth cannot be in the future".into()),
        Ok(_) => Ok(()),
        Err(_) => Err("Enter a valid date".into()),
    }
}

pub fn bio_form() -> FormState {
    FormState::new(
        vec![
            FieldDescriptor::text("first_name", "First name"),
            FieldDescriptor::text("last_name", "Last name"),
            FieldDescriptor::select("gender", "Gender", options(&GENDERS)),
            FieldDescriptor::date("date_of_birth", "Date of birth"),
        ],
        Schema::new()
            .field("first_name", [Rule::required("First name is required")])
            .field("last_name", [Rule::required("Last name is required")])
            .field("gender", [Rule::required("Gender is required")])
            .field(
                "date_of_birth",
                [Rule::required("Date of birth is required"), Rule::custom(birth_date_in_past)],
            ),
    )
}

pub fn contact_form() -> FormState {
    FormState::new(
        vec![
            FieldDescriptor::text("phone", "Phone number").placeholder("08031234567"),
            FieldDescriptor::new("email", "Email", FieldKind::Email).description("Optional"),
            FieldDescriptor::textarea("address", "Home address"),
            FieldDescriptor::select("state", "State", states()),
            FieldDescriptor::dependent_select("lga", "LGA", &["state"], |values| {
                lgas_of(values.get("state").and_then(Value::as_str).unwrap_or_default())
            }),
        ],
        Schema::new()
            .field(
                "phone",
                [Rule::required("Phone number is required"), Rule::pattern(PHONE.clone(), "Enter a valid phone number")],
            )
            .field("email", [Rule::email("Enter a valid email address")])
            .field("address", [Rule::required("Address is required")])
            .field("state", [Rule::required("State is required")])
            .field("lga", [Rule::required("LGA is required")]),
    )
}

pub fn next_of_kin_form() -> FormState {
    FormState::new(
        vec![
            FieldDescriptor::text("next_of_kin_name", "Full name"),
            FieldDescriptor::text("next_of_kin_phone", "Phone number"),
            FieldDescriptor::select("next_of_kin_relationship", "Relationship", options(&RELATIONSHIPS)),
        ],
        Schema::new()
            .field("next_of_kin_name", [Rule::required("Next of kin name is required")])
            .field(
                "next_of_kin_phone",
                [
                    Rule::required("Next of kin phone is required"),
                    Rule::pattern(PHONE.clone(), "Enter a valid phone number"),
                ],
            )
            .field("next_of_kin_relationship", [Rule::required("Relationship is required")]),
    )
}

#[component]
pub fn RegisterPatientWizard(open: RwSignal<bool>) -> impl IntoView {
    let ctx = use_app_context();
    let client = use_query_client();
    let wizard = RwSignal::new(WizardState::new(registration_steps()));
    let forms = vec![RwSignal::new(bio_form()), RwSignal::new(contact_form()), RwSignal::new(next_of_kin_form())];
    let pending = RwSignal::new(false);

    let step_forms = StoredValue::new(forms.clone());
    let on_complete = Callback::new(move |payload: Map<String, Value>| {
        let new_patient: NewPatient = match serde_json::from_value(Value::Object(payload)) {
            Ok(decoded) => decoded,
            Err(err) => {
                log::error!("[patients] registration payload does not decode: {err}");
                client.toaster().error(&ApiError::from(err));
                return;
            }
        };
        let api = ctx.api();
        client.mutate(pending, async move { patient::register_patient(&api, &new_patient).await }, move |result| {
            if let Ok(created) = result {
                log::info!("[patients] registered {}", created.full_name());
                client.toaster().success(format!("{} registered", created.full_name()));
                client.invalidate(&patient::patients_key());
                step_forms.with_value(|forms| forms.iter().for_each(|f| f.update(|f| f.reset(None))));
                wizard.update(WizardState::restart);
                open.set(false);
            }
        });
    });

    view! {
        <WizardDialog
            open=open
            title="Register Patient"
            wizard=wizard
            forms=forms
            on_complete=on_complete
            pending=pending
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fill_bio(form: &mut FormState) {
        form.set_value("first_name", json!("Ngozi"));
        form.set_value("last_name", json!("Okafor"));
        form.set_value("gender", json!("Female"));
        form.set_value("date_of_birth", json!("1988-02-29"));
    }

    #[test]
    fn lga_options_follow_state() {
        let mut form = contact_form();
        assert!(form.options("lga").is_empty());
        form.set_value("state", json!("Lagos"));
        assert!(form.options("lga").iter().any(|o| o.value == "Ikeja"));

        form.set_value("lga", json!("Ikeja"));
        let cleared = form.set_value("state", json!("Kano"));
        assert_eq!(cleared, vec!["lga".to_string()]);
        assert_eq!(form.text("lga"), "");
    }

    #[test]
    fn phone_numbers_are_checked() {
        let mut form = contact_form();
        form.set_value("phone", json!("12345"));
        assert!(!form.validate());
        assert_eq!(form.error("phone"), Some("Enter a valid phone number"));
        form.set_value("phone", json!("+2348031234567"));
        form.validate();
        assert_eq!(form.error("phone"), None);
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let mut form = bio_form();
        fill_bio(&mut form);
        form.set_value("date_of_birth", json!("2999-01-01"));
        assert!(!form.validate());
        assert_eq!(form.error("date_of_birth"), Some("Date of birth cannot be in the future"));
    }

    #[test]
    fn completed_wizard_decodes_new_patient() {
        let mut wizard = WizardState::new(registration_steps());
        let mut bio = bio_form();
        let mut contact = contact_form();
        let mut kin = next_of_kin_form();

        fill_bio(&mut bio);
        assert_eq!(wizard.advance(&mut bio), StepOutcome::Advanced(1));

        contact.set_value("phone", json!("08031234567"));
        contact.set_value("address", json!("12 Allen Avenue"));
        contact.set_value("state", json!("Lagos"));
        contact.set_value("lga", json!("Ikeja"));
        assert_eq!(wizard.advance(&mut contact), StepOutcome::Advanced(2));

        // Going back keeps step one as typed
        wizard.back();
        wizard.back();
        assert_eq!(bio.text("first_name"), "Ngozi");
        wizard.advance(&mut bio);
        wizard.advance(&mut contact);

        kin.set_value("next_of_kin_name", json!("Chidi Okafor"));
        kin.set_value("next_of_kin_phone", json!("07061234567"));
        kin.set_value("next_of_kin_relationship", json!("Spouse"));
        let StepOutcome::Complete(payload) = wizard.advance(&mut kin) else {
            panic!("expected completion");
        };

        let patient: NewPatient = serde_json::from_value(Value::Object(payload)).unwrap();
        assert_eq!(patient.first_name, "Ngozi");
        assert_eq!(patient.lga, "Ikeja");
        assert_eq!(patient.date_of_birth, NaiveDate::from_ymd_opt(1988, 2, 29));
        assert!(patient.email.is_empty());
    }
}
