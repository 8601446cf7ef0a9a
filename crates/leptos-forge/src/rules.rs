//! Validation Rules
//!
//! Declarative per-field rule sets. A [`Schema`] maps field names to rules and
//! nests a sub-schema for every repeating group.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

type CustomCheck = Arc<dyn Fn(&Value, &Map<String, Value>) -> Result<(), String> + Send + Sync>;

/// A single validation rule with its error message
#[derive(Clone)]
pub enum Rule {
    Required(String),
    MinLength(usize, String),
    MaxLength(usize, String),
    Pattern(Regex, String),
    Email(String),
    Numeric(String),
    Min(f64, String),
    Max(f64, String),
    /// Minimum number of rows in a repeating group
    MinItems(usize, String),
    /// Check against the field value and the whole form
    Custom(CustomCheck),
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required(message.into())
    }

    pub fn min_length(len: usize, message: impl Into<String>) -> Self {
        Rule::MinLength(len, message.into())
    }

    pub fn max_length(len: usize, message: impl Into<String>) -> Self {
        Rule::MaxLength(len, message.into())
    }

    pub fn pattern(regex: Regex, message: impl Into<String>) -> Self {
        Rule::Pattern(regex, message.into())
    }

    pub fn email(message: impl Into<String>) -> Self {
        Rule::Email(message.into())
    }

    pub fn numeric(message: impl Into<String>) -> Self {
        Rule::Numeric(message.into())
    }

    pub fn min(min: f64, message: impl Into<String>) -> Self {
        Rule::Min(min, message.into())
    }

    pub fn max(max: f64, message: impl Into<String>) -> Self {
        Rule::Max(max, message.into())
    }

    pub fn min_items(count: usize, message: impl Into<String>) -> Self {
        Rule::MinItems(count, message.into())
    }

    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&Value, &Map<String, Value>) -> Result<(), String> + Send + Sync + 'static,
    {
        Rule::Custom(Arc::new(check))
    }

    /// Check `value`; `form` is the full set of values the field lives in.
    ///
    /// Every rule except `Required`, `MinItems` and `Custom` passes on a blank
    /// value, so optional fields only get checked once filled in.
    pub fn check(&self, value: &Value, form: &Map<String, Value>) -> Result<(), String> {
        match self {
            Rule::Required(msg) => {
                if is_blank(value) {
                    return Err(msg.clone());
                }
            }
            Rule::MinItems(count, msg) => {
                let len = value.as_array().map(Vec::len).unwrap_or(0);
                if len < *count {
                    return Err(msg.clone());
                }
            }
            Rule::Custom(check) => return check(value, form),
            _ if is_blank(value) => {}
            Rule::MinLength(len, msg) => {
                if text_of(value).chars().count() < *len {
                    return Err(msg.clone());
                }
            }
            Rule::MaxLength(len, msg) => {
                if text_of(value).chars().count() > *len {
                    return Err(msg.clone());
                }
            }
            Rule::Pattern(regex, msg) => {
                if !regex.is_match(&text_of(value)) {
                    return Err(msg.clone());
                }
            }
            Rule::Email(msg) => {
                if !looks_like_email(&text_of(value)) {
                    return Err(msg.clone());
                }
            }
            Rule::Numeric(msg) => {
                if number_of(value).is_none() {
                    return Err(msg.clone());
                }
            }
            Rule::Min(min, msg) => {
                if number_of(value).is_some_and(|n| n < *min) {
                    return Err(msg.clone());
                }
            }
            Rule::Max(max, msg) => {
                if number_of(value).is_some_and(|n| n > *max) {
                    return Err(msg.clone());
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required(m) => write!(f, "Required({m:?})"),
            Rule::MinLength(n, m) => write!(f, "MinLength({n}, {m:?})"),
            Rule::MaxLength(n, m) => write!(f, "MaxLength({n}, {m:?})"),
            Rule::Pattern(re, m) => write!(f, "Pattern({}, {m:?})", re.as_str()),
            Rule::Email(m) => write!(f, "Email({m:?})"),
            Rule::Numeric(m) => write!(f, "Numeric({m:?})"),
            Rule::Min(n, m) => write!(f, "Min({n}, {m:?})"),
            Rule::Max(n, m) => write!(f, "Max({n}, {m:?})"),
            Rule::MinItems(n, m) => write!(f, "MinItems({n}, {m:?})"),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Empty string, whitespace, null, unchecked box or empty array
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Bool(b) => !b,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Numeric reading of a value, accepting numeric strings as typed by a user
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn looks_like_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !text.contains(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

/// Field errors keyed by dotted path, first error per field wins
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn remove(&mut self, path: &str) {
        self.0.remove(path);
    }

    /// Drop the error at `path` and every error nested under it
    pub fn remove_tree(&mut self, path: &str) {
        let nested = format!("{path}.");
        self.0.retain(|k, _| k != path && !k.starts_with(&nested));
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (path, message) in other.0 {
            self.add(path, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Rule set for a form: field rules plus nested schemas for repeating groups
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: BTreeMap<String, Vec<Rule>>,
    groups: BTreeMap<String, Schema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.entry(name.into()).or_default().extend(rules);
        self
    }

    /// Rules applied to every row of the repeating group `name`
    pub fn group(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.groups.insert(name.into(), schema);
        self
    }

    pub fn rules_for(&self, name: &str) -> &[Rule] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Validate every field and every group row
    pub fn validate(&self, values: &Map<String, Value>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        self.validate_into(values, "", &mut errors);
        errors
    }

    fn validate_into(&self, values: &Map<String, Value>, prefix: &str, errors: &mut ValidationErrors) {
        for (name, rules) in &self.fields {
            let value = values.get(name).unwrap_or(&Value::Null);
            if let Some(message) = first_failure(rules, value, values) {
                errors.add(format!("{prefix}{name}"), message);
            }
        }
        for (name, schema) in &self.groups {
            let Some(rows) = values.get(name).and_then(Value::as_array) else {
                continue;
            };
            for (idx, row) in rows.iter().enumerate() {
                if let Value::Object(row) = row {
                    schema.validate_into(row, &format!("{prefix}{name}.{idx}."), errors);
                }
            }
        }
    }

    /// Validate the single field at a dotted path (`total`, `drugs.0.quantity`)
    pub fn validate_path(&self, values: &Map<String, Value>, path: &str) -> Option<String> {
        let mut schema = self;
        let mut scope = values;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                let value = scope.get(segment).unwrap_or(&Value::Null);
                return first_failure(schema.rules_for(segment), value, scope);
            }
            let idx = segments.next()?.parse::<usize>().ok()?;
            schema = schema.groups.get(segment)?;
            scope = scope.get(segment)?.as_array()?.get(idx)?.as_object()?;
        }
        None
    }
}

fn first_failure(rules: &[Rule], value: &Value, form: &Map<String, Value>) -> Option<String> {
    rules.iter().find_map(|rule| rule.check(value, form).err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn required_rejects_blank_and_whitespace() {
        let rule = Rule::required("Name is required");
        let form = Map::new();
        assert!(rule.check(&json!(""), &form).is_err());
        assert!(rule.check(&json!("   "), &form).is_err());
        assert!(rule.check(&Value::Null, &form).is_err());
        assert!(rule.check(&json!("Ada"), &form).is_ok());
    }

    #[test]
    fn optional_rules_skip_blank_values() {
        let form = Map::new();
        assert!(Rule::numeric("must be a number").check(&json!(""), &form).is_ok());
        assert!(Rule::email("bad email").check(&json!(""), &form).is_ok());
        assert!(Rule::numeric("must be a number").check(&json!("12x"), &form).is_err());
    }

    #[test]
    fn numeric_bounds_accept_numeric_strings() {
        let form = Map::new();
        let min = Rule::min(1.0, "at least 1");
        assert!(min.check(&json!("0"), &form).is_err());
        assert!(min.check(&json!("2.5"), &form).is_ok());
        assert!(min.check(&json!(3), &form).is_ok());
        assert!(Rule::max(10.0, "at most 10").check(&json!("11"), &form).is_err());
    }

    #[test]
    fn email_shape() {
        let form = Map::new();
        let rule = Rule::email("Enter a valid email");
        assert!(rule.check(&json!("nurse@clinic.ng"), &form).is_ok());
        assert!(rule.check(&json!("nurse@clinic"), &form).is_err());
        assert!(rule.check(&json!("nurse clinic@x.ng"), &form).is_err());
        assert!(rule.check(&json!("@clinic.ng"), &form).is_err());
    }

    #[test]
    fn pattern_rule() {
        let rule = Rule::pattern(Regex::new(r"^\d{11}$").unwrap(), "Phone must be 11 digits");
        let form = Map::new();
        assert!(rule.check(&json!("08012345678"), &form).is_ok());
        assert!(rule.check(&json!("0801"), &form).is_err());
    }

    #[test]
    fn custom_rule_sees_whole_form() {
        let rule = Rule::custom(|value, form| {
            let total = form.get("total_payable").and_then(number_of).unwrap_or(0.0);
            match number_of(value) {
                Some(paid) if paid > total => Err("Amount paid cannot exceed total".into()),
                _ => Ok(()),
            }
        });
        let form = values(json!({ "total_payable": "100" }));
        assert!(rule.check(&json!("150"), &form).is_err());
        assert!(rule.check(&json!("50"), &form).is_ok());
    }

    #[test]
    fn schema_reports_first_error_per_field() {
        let schema = Schema::new().field(
            "total_payable",
            [Rule::required("Total payable is required"), Rule::numeric("Must be a number")],
        );
        let errors = schema.validate(&values(json!({ "total_payable": "" })));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("total_payable"), Some("Total payable is required"));
    }

    #[test]
    fn schema_validates_group_rows() {
        let schema = Schema::new()
            .field("drugs", [Rule::min_items(1, "Add at least one drug")])
            .group("drugs", Schema::new().field("quantity", [Rule::required("Quantity is required")]));

        let errors = schema.validate(&values(json!({ "drugs": [] })));
        assert_eq!(errors.get("drugs"), Some("Add at least one drug"));

        let errors = schema.validate(&values(json!({
            "drugs": [{ "quantity": "2" }, { "quantity": "" }]
        })));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("drugs.1.quantity"), Some("Quantity is required"));
    }

    #[test]
    fn validate_path_resolves_nested_rows() {
        let schema = Schema::new()
            .group("drugs", Schema::new().field("quantity", [Rule::min(1.0, "At least 1")]));
        let form = values(json!({ "drugs": [{ "quantity": "0" }] }));
        assert_eq!(schema.validate_path(&form, "drugs.0.quantity").as_deref(), Some("At least 1"));
        assert_eq!(schema.validate_path(&form, "drugs.4.quantity"), None);
    }

    #[test]
    fn remove_tree_clears_nested_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("drugs", "x");
        errors.add("drugs.0.quantity", "y");
        errors.add("drugs_note", "z");
        errors.remove_tree("drugs");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("drugs_note"), Some("z"));
    }
}
