//! Leptos Forge
//!
//! Declarative building blocks for data-driven admin screens:
//! - [`field`]: field descriptors (name, label, input kind, options, dependencies)
//! - [`rules`]: per-field validation schema
//! - [`form`]: form controller holding values, errors, submit and reset
//! - [`table`]: table model with pagination, sorting, filtering and selection
//! - [`wizard`]: multi-step form bookkeeping
//! - [`components`]: Leptos components binding the above
//!
//! The state types are plain Rust and carry no reactive runtime; the
//! components keep them inside signals.

pub mod components;
pub mod error;
pub mod field;
pub mod form;
pub mod rules;
pub mod table;
pub mod wizard;

pub use error::FormError;
pub use field::{FieldDescriptor, FieldKind, OptionSource, SelectOption};
pub use form::FormState;
pub use rules::{Rule, Schema, ValidationErrors};
pub use table::{
    ColumnDef, PaginationState, RowSelection, SearchQuery, SortDirection, SortState, TableBody, TableOptions,
};
pub use wizard::{StepOutcome, WizardState, WizardStep};

pub mod prelude {
    pub use crate::components::*;
    pub use crate::{
        ColumnDef, FieldDescriptor, FieldKind, FormError, FormState, PaginationState, Rule, Schema, SearchQuery,
        SelectOption, StepOutcome, TableOptions, WizardState, WizardStep,
    };
}
