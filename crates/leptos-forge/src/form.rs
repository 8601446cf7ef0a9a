//! Form Controller
//!
//! Holds the values, errors and submit/reset lifecycle of one form instance.
//! Values live in a JSON object so a single controller serves every screen;
//! [`FormState::submit`] turns them into the caller's typed struct.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::error::{FormError, Result};
use crate::field::{FieldDescriptor, FieldKind, SelectOption};
use crate::rules::{is_blank, number_of, Schema, ValidationErrors};

/// State of one form: descriptors, schema, defaults, live values and errors
#[derive(Clone, Debug)]
pub struct FormState {
    fields: Vec<FieldDescriptor>,
    schema: Schema,
    defaults: Map<String, Value>,
    values: Map<String, Value>,
    errors: ValidationErrors,
    touched: BTreeSet<String>,
    submit_count: u32,
    form_error: Option<String>,
}

impl FormState {
    pub fn new(fields: Vec<FieldDescriptor>, schema: Schema) -> Self {
        let defaults = empty_values(&fields);
        Self {
            fields,
            schema,
            values: defaults.clone(),
            defaults,
            errors: ValidationErrors::new(),
            touched: BTreeSet::new(),
            submit_count: 0,
            form_error: None,
        }
    }

    /// Overlay default values on top of the empty ones
    pub fn with_defaults(mut self, defaults: Map<String, Value>) -> Self {
        self.reset(Some(defaults));
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn value(&self, path: &str) -> Option<&Value> {
        get_path(&self.values, path)
    }

    /// Value rendered as input text
    pub fn text(&self, path: &str) -> String {
        match self.value(path) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn checked(&self, path: &str) -> bool {
        self.value(path).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Descriptor for a dotted path; array indices are skipped
    pub fn descriptor(&self, path: &str) -> Option<&FieldDescriptor> {
        let mut scope = self.fields.as_slice();
        let mut found = None;
        for segment in path.split('.') {
            if segment.parse::<usize>().is_ok() {
                continue;
            }
            let field = scope.iter().find(|f| f.name == segment)?;
            scope = field.group_fields();
            found = Some(field);
        }
        found
    }

    /// Current option list of a select field, recomputed from live values
    pub fn options(&self, path: &str) -> Vec<SelectOption> {
        self.descriptor(path)
            .and_then(|field| field.options.as_ref())
            .map(|source| source.resolve(&self.values))
            .unwrap_or_default()
    }

    /// Set a value and propagate to dependent fields.
    ///
    /// Returns the paths of dependent fields that were cleared because their
    /// value is no longer among their recomputed options.
    pub fn set_value(&mut self, path: &str, value: Value) -> Vec<String> {
        if !set_path(&mut self.values, path, value) {
            log::warn!("[forge] ignoring write to unknown path {path}");
            return Vec::new();
        }
        self.touched.insert(path.to_string());
        if self.submit_count > 0 {
            self.revalidate(path);
        }

        let mut cleared = Vec::new();
        let mut pending = vec![path.to_string()];
        while let Some(changed) = pending.pop() {
            for dependent in self.dependents_of(&changed) {
                let current = self.values.get(&dependent).cloned().unwrap_or(Value::Null);
                if is_blank(&current) {
                    continue;
                }
                let still_valid = self
                    .options(&dependent)
                    .iter()
                    .any(|opt| Value::String(opt.value.clone()) == current);
                if !still_valid {
                    let empty = self.descriptor(&dependent).map(FieldDescriptor::empty_value).unwrap_or(Value::Null);
                    self.values.insert(dependent.clone(), empty);
                    self.errors.remove(&dependent);
                    cleared.push(dependent.clone());
                    pending.push(dependent);
                }
            }
        }
        cleared
    }

    fn dependents_of(&self, name: &str) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.depends_on.iter().any(|d| d == name))
            .map(|f| f.name.clone())
            .collect()
    }

    /// Re-check `path` and every field already showing an error.
    ///
    /// Cross-field rules mean an edit can fix a different field, so stale
    /// errors elsewhere are re-run against the current values too. Fields
    /// without an error stay quiet until the next submit.
    fn revalidate(&mut self, path: &str) {
        let fresh = self.schema.validate(&self.values);
        let mut recheck: Vec<String> = self.errors.iter().map(|(p, _)| p.to_string()).collect();
        recheck.push(path.to_string());
        for target in recheck {
            self.errors.remove(&target);
            if let Some(message) = fresh.get(&target) {
                self.errors.add(target.clone(), message);
            }
        }
    }

    /// Count a submit attempt without running the schema
    pub fn mark_submitted(&mut self) {
        self.submit_count += 1;
    }

    /// Number of rows in a repeating group
    pub fn row_count(&self, group: &str) -> usize {
        self.values.get(group).and_then(Value::as_array).map(Vec::len).unwrap_or(0)
    }

    /// Append a row to a repeating group, empty when `row` is `None`
    pub fn append(&mut self, group: &str, row: Option<Map<String, Value>>) {
        let Some(descriptor) = self.descriptor(group).filter(|d| d.is_group()) else {
            log::warn!("[forge] append on non-group field {group}");
            return;
        };
        let mut new_row = descriptor.empty_row();
        if let Some(row) = row {
            new_row.extend(row);
        }
        if let Some(Value::Array(rows)) = self.values.get_mut(group) {
            rows.push(Value::Object(new_row));
        } else {
            self.values.insert(group.to_string(), Value::Array(vec![Value::Object(new_row)]));
        }
        if self.submit_count > 0 {
            self.revalidate(group);
        }
    }

    /// Remove row `index` from a repeating group
    pub fn remove(&mut self, group: &str, index: usize) -> bool {
        let Some(Value::Array(rows)) = self.values.get_mut(group) else {
            return false;
        };
        if index >= rows.len() {
            return false;
        }
        rows.remove(index);
        // Row indices shifted, so nested errors no longer line up
        self.errors.remove_tree(group);
        if self.submit_count > 0 {
            let fresh = self.schema.validate(&self.values);
            let prefix = format!("{group}.");
            for (path, message) in fresh.iter() {
                if path == group || path.starts_with(&prefix) {
                    self.errors.add(path, message);
                }
            }
        }
        true
    }

    /// Run the whole schema; true when every field passes
    pub fn validate(&mut self) -> bool {
        self.errors = self.schema.validate(&self.values);
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, path: &str) -> Option<&str> {
        self.errors.get(path)
    }

    /// Form-level message not tied to a field (decode failure, rejected mutation)
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn set_form_error(&mut self, message: Option<String>) {
        self.form_error = message;
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    pub fn is_touched(&self, path: &str) -> bool {
        self.touched.contains(path)
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.defaults
    }

    /// Values as the backend expects them: numbers parsed, blank selects and
    /// dates as `null`
    pub fn output(&self) -> Map<String, Value> {
        coerce(&self.fields, &self.values)
    }

    /// Validate and decode into `T`.
    ///
    /// On failure the errors are kept on the form for inline display.
    pub fn submit<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.mark_submitted();
        self.form_error = None;
        if !self.validate() {
            return Err(FormError::Invalid(self.errors.clone()));
        }
        serde_json::from_value(Value::Object(self.output())).map_err(|e| {
            let message = e.to_string();
            log::error!("[forge] decode failed: {message}");
            self.form_error = Some(message.clone());
            FormError::Decode(message)
        })
    }

    /// Run `handler` with typed values only when the form is valid
    pub fn handle_submit<T, F>(&mut self, handler: F) -> bool
    where
        T: DeserializeOwned,
        F: FnOnce(T),
    {
        match self.submit::<T>() {
            Ok(values) => {
                handler(values);
                true
            }
            Err(_) => false,
        }
    }

    /// Restore the defaults, or adopt `values` as the new defaults
    pub fn reset(&mut self, values: Option<Map<String, Value>>) {
        if let Some(values) = values {
            let mut defaults = empty_values(&self.fields);
            defaults.extend(values);
            self.defaults = defaults;
        }
        self.values = self.defaults.clone();
        self.errors = ValidationErrors::new();
        self.touched.clear();
        self.submit_count = 0;
        self.form_error = None;
    }
}

fn empty_values(fields: &[FieldDescriptor]) -> Map<String, Value> {
    fields.iter().map(|f| (f.name.clone(), f.empty_value())).collect()
}

fn coerce(fields: &[FieldDescriptor], values: &Map<String, Value>) -> Map<String, Value> {
    values
        .iter()
        .map(|(name, value)| {
            let coerced = match fields.iter().find(|f| &f.name == name) {
                Some(field) => coerce_value(field, value),
                None => value.clone(),
            };
            (name.clone(), coerced)
        })
        .collect()
}

fn coerce_value(field: &FieldDescriptor, value: &Value) -> Value {
    match &field.kind {
        FieldKind::Number => match number_of(value) {
            Some(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Value::from(n as i64),
            Some(n) => Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null),
            None => Value::Null,
        },
        FieldKind::Select | FieldKind::Date if is_blank(value) => Value::Null,
        FieldKind::Group(sub_fields) => match value {
            Value::Array(rows) => Value::Array(
                rows.iter()
                    .map(|row| match row {
                        Value::Object(row) => Value::Object(coerce(sub_fields, row)),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            other => other.clone(),
        },
        FieldKind::Text | FieldKind::TextArea | FieldKind::Email | FieldKind::Password => match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other.clone(),
        },
        _ => value.clone(),
    }
}

/// Read a dotted path (`name`, `drugs.1.quantity`)
pub fn get_path<'a>(values: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = values.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write a dotted path; intermediate containers must already exist
pub fn set_path(values: &mut Map<String, Value>, path: &str, value: Value) -> bool {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return false;
    };
    if segments.is_empty() {
        values.insert(last.to_string(), value);
        return true;
    }
    let mut current = match values.get_mut(segments[0]) {
        Some(v) => v,
        None => return false,
    };
    for segment in &segments[1..] {
        current = match current {
            Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                Some(v) => v,
                None => return false,
            },
            Value::Object(map) => match map.get_mut(*segment) {
                Some(v) => v,
                None => return false,
            },
            _ => return false,
        };
    }
    match current {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            true
        }
        Value::Array(items) => match last.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        },
        _ => false,
    }
}
