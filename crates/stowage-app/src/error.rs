//! Application-level error types.

use stowage_cell::{AuthError, CellError};
use stowage_core::FieldErrors;
use stowage_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid form: {}", summarize(.0))]
    Validation(FieldErrors),

    #[error("user not found: {0}")]
    UserNotFound(u64),

    #[error("todo not found: {0}")]
    TodoNotFound(u64),

    #[error("todo title must not be blank")]
    BlankTitle,

    #[error("no free {0} id left")]
    IdsExhausted(&'static str),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("cell error: {0}")]
    Cell(#[from] CellError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

pub type AppResult<T> = Result<T, AppError>;

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}
