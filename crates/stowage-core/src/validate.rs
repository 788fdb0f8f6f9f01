//! Form validation for the user dashboard and the login screen.
//!
//! Validators return a map of field name to message; an empty map means the
//! form may be submitted.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{LoginForm, UserForm};

/// Field name → error message.
pub type FieldErrors = BTreeMap<String, String>;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

pub fn validate_user_form(form: &UserForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.name.trim().is_empty() {
        errors.insert("name".into(), "Name is required".into());
    }
    if form.email.trim().is_empty() {
        errors.insert("email".into(), "Email is required".into());
    } else if !is_valid_email(&form.email) {
        errors.insert("email".into(), "Invalid email format".into());
    }
    if form.department.trim().is_empty() {
        errors.insert("department".into(), "Department is required".into());
    }
    if form.location.trim().is_empty() {
        errors.insert("location".into(), "Location is required".into());
    }
    errors
}

pub fn validate_login_form(form: &LoginForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.email.is_empty() {
        errors.insert("email".into(), "Email is required".into());
    }
    errors
}
