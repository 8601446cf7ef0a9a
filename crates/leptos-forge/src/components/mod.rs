//! Leptos bindings for the forge state types

mod confirm_button;
mod dialog;
mod field;
mod form;
mod table;

pub use confirm_button::ConfirmButton;
pub use dialog::{Dialog, WizardDialog};
pub use field::{ForgeField, ForgeFieldArray};
pub use form::ForgeForm;
pub use table::{DataTable, RowAction};
