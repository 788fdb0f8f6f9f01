pub mod config;
pub mod types;
pub mod validate;

pub use config::StowageConfig;
pub use types::*;
pub use validate::{FieldErrors, validate_login_form, validate_user_form};
