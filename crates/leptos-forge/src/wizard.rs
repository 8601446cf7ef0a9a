//! Wizard Shell
//!
//! Step bookkeeping for multi-step dialogs. Each step owns a [`FormState`]
//! kept by the caller; the wizard stores every accepted step payload and
//! merges them on the final step.

use serde_json::{Map, Value};

use crate::form::FormState;
use crate::rules::ValidationErrors;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardStep {
    pub id: String,
    pub title: String,
}

impl WizardStep {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }
}

/// Result of trying to leave the current step forwards
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// Current step has invalid fields; the wizard did not move
    Blocked(ValidationErrors),
    /// Moved to the step at this index
    Advanced(usize),
    /// Last step accepted; merged payload of every step
    Complete(Map<String, Value>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct WizardState {
    steps: Vec<WizardStep>,
    current: usize,
    payloads: Vec<Option<Map<String, Value>>>,
}

impl WizardState {
    pub fn new(steps: Vec<WizardStep>) -> Self {
        let payloads = vec![None; steps.len()];
        Self { steps, current: 0, payloads }
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&WizardStep> {
        self.steps.get(self.current)
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    /// Payload accepted for `step`, if it has been passed at least once
    pub fn payload(&self, step: usize) -> Option<&Map<String, Value>> {
        self.payloads.get(step).and_then(Option::as_ref)
    }

    /// Validate the current step's form and move on.
    ///
    /// `form` must be the form rendered for the current step.
    pub fn advance(&mut self, form: &mut FormState) -> StepOutcome {
        form.mark_submitted();
        if !form.validate() {
            return StepOutcome::Blocked(form.errors().clone());
        }
        if let Some(slot) = self.payloads.get_mut(self.current) {
            *slot = Some(form.output());
        }
        if self.is_last() {
            log::debug!("[wizard] final step accepted");
            return StepOutcome::Complete(self.merged());
        }
        self.current += 1;
        StepOutcome::Advanced(self.current)
    }

    /// Go back one step; nothing entered so far is discarded
    pub fn back(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    /// Jump to an earlier step
    pub fn go_to(&mut self, step: usize) -> bool {
        if step <= self.current {
            self.current = step;
            true
        } else {
            false
        }
    }

    /// Accepted payloads combined in step order; later steps win on key clashes
    pub fn merged(&self) -> Map<String, Value> {
        let mut merged = Map::new();
        for payload in self.payloads.iter().flatten() {
            merged.extend(payload.clone());
        }
        merged
    }

    /// Start over at the first step with nothing accepted
    pub fn restart(&mut self) {
        self.current = 0;
        self.payloads.iter_mut().for_each(|p| *p = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use crate::rules::{Rule, Schema};
    use serde_json::json;

    fn forms() -> Vec<FormState> {
        vec![
            FormState::new(
                vec![
                    FieldDescriptor::text("first_name", "First name"),
                    FieldDescriptor::text("last_name", "Last name"),
                ],
                Schema::new().field("first_name", [Rule::required("First name is required")]),
            ),
            FormState::new(
                vec![FieldDescriptor::text("phone", "Phone"), FieldDescriptor::text("note", "Note")],
                Schema::new().field("phone", [Rule::required("Phone is required")]),
            ),
        ]
    }

    fn wizard() -> WizardState {
        WizardState::new(vec![WizardStep::new("bio", "Bio data"), WizardStep::new("contact", "Contact")])
    }

    #[test]
    fn invalid_step_blocks_advance() {
        let mut wizard = wizard();
        let mut forms = forms();
        let outcome = wizard.advance(&mut forms[0]);
        let StepOutcome::Blocked(errors) = outcome else { panic!("expected block") };
        assert_eq!(errors.get("first_name"), Some("First name is required"));
        assert_eq!(wizard.current(), 0);
    }

    #[test]
    fn correcting_a_blocked_step_clears_its_error() {
        let mut wizard = wizard();
        let mut forms = forms();
        assert!(matches!(wizard.advance(&mut forms[0]), StepOutcome::Blocked(_)));
        assert!(forms[0].error("first_name").is_some());

        forms[0].set_value("first_name", json!("Ngozi"));
        assert_eq!(forms[0].error("first_name"), None);
        assert_eq!(wizard.advance(&mut forms[0]), StepOutcome::Advanced(1));
    }

    #[test]
    fn back_navigation_preserves_entered_values() {
        let mut wizard = wizard();
        let mut forms = forms();
        forms[0].set_value("first_name", json!("Ngozi"));
        forms[0].set_value("last_name", json!("Okafor"));
        let before = forms[0].values().clone();

        assert_eq!(wizard.advance(&mut forms[0]), StepOutcome::Advanced(1));
        forms[1].set_value("phone", json!("0803"));
        assert_eq!(wizard.back(), 0);

        assert_eq!(forms[0].values(), &before);
        assert_eq!(forms[1].text("phone"), "0803");
        assert_eq!(wizard.payload(0).and_then(|p| p.get("first_name")), Some(&json!("Ngozi")));
    }

    #[test]
    fn final_step_merges_payloads() {
        let mut wizard = wizard();
        let mut forms = forms();
        forms[0].set_value("first_name", json!("Ngozi"));
        forms[1].set_value("phone", json!("08030000000"));

        wizard.advance(&mut forms[0]);
        let StepOutcome::Complete(merged) = wizard.advance(&mut forms[1]) else {
            panic!("expected completion")
        };
        assert_eq!(merged.get("first_name"), Some(&json!("Ngozi")));
        assert_eq!(merged.get("phone"), Some(&json!("08030000000")));
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn revisiting_a_step_replaces_its_payload() {
        let mut wizard = wizard();
        let mut forms = forms();
        forms[0].set_value("first_name", json!("Ngozi"));
        wizard.advance(&mut forms[0]);
        wizard.back();
        forms[0].set_value("first_name", json!("Chioma"));
        wizard.advance(&mut forms[0]);
        assert_eq!(wizard.merged().get("first_name"), Some(&json!("Chioma")));
    }

    #[test]
    fn go_to_only_moves_backwards() {
        let mut wizard = wizard();
        assert!(!wizard.go_to(1));
        let mut forms = forms();
        forms[0].set_value("first_name", json!("A"));
        wizard.advance(&mut forms[0]);
        assert!(wizard.go_to(0));
        wizard.restart();
        assert!(wizard.payload(0).is_none());
        assert!(wizard.is_first());
    }
}
