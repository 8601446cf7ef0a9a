//! Field Descriptors
//!
//! Declarative description of a single form field: what it is called, how it
//! is rendered, which options it offers and which sibling fields it watches.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Input component used to render a field
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Number,
    Date,
    TextArea,
    Select,
    Checkbox,
    /// Repeating group of sub-fields (field array)
    Group(Vec<FieldDescriptor>),
}

impl FieldKind {
    /// HTML `type` attribute for `<input>` based kinds
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Checkbox => "checkbox",
            _ => "text",
        }
    }
}

/// One entry of a select field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

type OptionsFn = Arc<dyn Fn(&Map<String, Value>) -> Vec<SelectOption> + Send + Sync>;

/// Where a select field gets its options from
#[derive(Clone)]
pub enum OptionSource {
    Static(Vec<SelectOption>),
    /// Recomputed from the current form values whenever a watched field changes
    Derived(OptionsFn),
}

impl OptionSource {
    pub fn resolve(&self, values: &Map<String, Value>) -> Vec<SelectOption> {
        match self {
            OptionSource::Static(options) => options.clone(),
            OptionSource::Derived(f) => f(values),
        }
    }
}

impl fmt::Debug for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSource::Static(options) => f.debug_tuple("Static").field(options).finish(),
            OptionSource::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl PartialEq for OptionSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OptionSource::Static(a), OptionSource::Static(b)) => a == b,
            (OptionSource::Derived(a), OptionSource::Derived(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Declarative field description consumed by the form controller and renderer
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub options: Option<OptionSource>,
    /// Sibling fields whose changes recompute this field's options
    pub depends_on: Vec<String>,
    pub disabled: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            placeholder: None,
            description: None,
            options: None,
            depends_on: Vec::new(),
            disabled: false,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn textarea(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::TextArea)
    }

    pub fn select(name: impl Into<String>, label: impl Into<String>, options: Vec<SelectOption>) -> Self {
        let mut field = Self::new(name, label, FieldKind::Select);
        field.options = Some(OptionSource::Static(options));
        field
    }

    /// Select whose options are a function of other field values
    pub fn dependent_select<F>(
        name: impl Into<String>,
        label: impl Into<String>,
        depends_on: &[&str],
        options: F,
    ) -> Self
    where
        F: Fn(&Map<String, Value>) -> Vec<SelectOption> + Send + Sync + 'static,
    {
        let mut field = Self::new(name, label, FieldKind::Select);
        field.options = Some(OptionSource::Derived(Arc::new(options)));
        field.depends_on = depends_on.iter().map(|s| s.to_string()).collect();
        field
    }

    pub fn group(name: impl Into<String>, label: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, label, FieldKind::Group(fields))
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Sub-fields of a repeating group, empty for scalar fields
    pub fn group_fields(&self) -> &[FieldDescriptor] {
        match &self.kind {
            FieldKind::Group(fields) => fields,
            _ => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, FieldKind::Group(_))
    }

    /// Empty value a fresh instance of this field starts with
    pub fn empty_value(&self) -> Value {
        match &self.kind {
            FieldKind::Checkbox => Value::Bool(false),
            FieldKind::Group(_) => Value::Array(Vec::new()),
            _ => Value::String(String::new()),
        }
    }

    /// Empty row for a repeating group
    pub fn empty_row(&self) -> Map<String, Value> {
        self.group_fields()
            .iter()
            .map(|f| (f.name.clone(), f.empty_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derived_options_follow_values() {
        let field = FieldDescriptor::dependent_select("lga", "LGA", &["state"], |values| {
            match values.get("state").and_then(Value::as_str) {
                Some("lagos") => vec!["Ikeja".into(), "Epe".into()],
                _ => vec![],
            }
        });

        let mut values = Map::new();
        let source = field.options.clone().unwrap();
        assert!(source.resolve(&values).is_empty());

        values.insert("state".into(), json!("lagos"));
        assert_eq!(source.resolve(&values).len(), 2);
        assert_eq!(field.depends_on, vec!["state".to_string()]);
    }

    #[test]
    fn group_empty_row_uses_sub_field_defaults() {
        let group = FieldDescriptor::group(
            "drugs",
            "Drugs",
            vec![
                FieldDescriptor::text("drug_name", "Drug"),
                FieldDescriptor::new("urgent", "Urgent", FieldKind::Checkbox),
            ],
        );
        let row = group.empty_row();
        assert_eq!(row.get("drug_name"), Some(&json!("")));
        assert_eq!(row.get("urgent"), Some(&json!(false)));
        assert_eq!(group.empty_value(), json!([]));
    }
}
