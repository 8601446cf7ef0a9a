//! Form Errors

use crate::rules::ValidationErrors;

/// Why a submit attempt did not produce typed values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    /// One or more fields failed their rules; shown inline, never escalated
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(ValidationErrors),
    /// Values passed validation but did not fit the target type
    #[error("could not read form values: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, FormError>;
