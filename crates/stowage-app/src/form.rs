//! Generic form state: values, per-field errors, touched fields.

use std::collections::BTreeSet;

use stowage_core::{FieldErrors, LoginForm, UserForm, validate_login_form, validate_user_form};

/// Field names of a form, used to mark everything touched on submit.
pub trait FormFields {
    const FIELDS: &'static [&'static str];
}

impl FormFields for UserForm {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "email",
        "avatar",
        "role",
        "department",
        "location",
        "isActive",
    ];
}

impl FormFields for LoginForm {
    const FIELDS: &'static [&'static str] = &["email", "password"];
}

type Validator<T> = Box<dyn Fn(&T) -> FieldErrors + Send + Sync>;

pub struct FormState<T> {
    initial: T,
    values: T,
    errors: FieldErrors,
    touched: BTreeSet<String>,
    submitting: bool,
    validate: Option<Validator<T>>,
}

impl<T: Clone + FormFields> FormState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            values: initial.clone(),
            initial,
            errors: FieldErrors::new(),
            touched: BTreeSet::new(),
            submitting: false,
            validate: None,
        }
    }

    pub fn with_validator(
        initial: T,
        validate: impl Fn(&T) -> FieldErrors + Send + Sync + 'static,
    ) -> Self {
        Self {
            validate: Some(Box::new(validate)),
            ..Self::new(initial)
        }
    }

    pub fn values(&self) -> &T {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Error to display for `field`: only once the field has been touched.
    pub fn visible_error(&self, field: &str) -> Option<&str> {
        if self.is_touched(field) {
            self.errors.get(field).map(String::as_str)
        } else {
            None
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Edit one field, mark it touched and re-run validation.
    pub fn change(&mut self, field: &str, edit: impl FnOnce(&mut T)) {
        edit(&mut self.values);
        self.touched.insert(field.to_string());
        self.revalidate();
    }

    /// Validate and, if clean, enter the submitting state.
    ///
    /// Every field is marked touched so all errors become visible. Pair
    /// with [`FormState::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<T, FieldErrors> {
        self.touched
            .extend(T::FIELDS.iter().map(|field| field.to_string()));
        self.revalidate();
        if !self.errors.is_empty() {
            return Err(self.errors.clone());
        }
        self.submitting = true;
        Ok(self.values.clone())
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    /// Validate, then hand the values to `on_submit`.
    pub fn submit<R>(&mut self, on_submit: impl FnOnce(T) -> R) -> Result<R, FieldErrors> {
        let values = self.begin_submit()?;
        let out = on_submit(values);
        self.finish_submit();
        Ok(out)
    }

    /// Back to the initial values with nothing touched.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
        self.submitting = false;
    }

    fn revalidate(&mut self) {
        if let Some(validate) = &self.validate {
            self.errors = validate(&self.values);
        }
    }
}

impl FormState<UserForm> {
    pub fn user(initial: UserForm) -> Self {
        Self::with_validator(initial, validate_user_form)
    }
}

impl FormState<LoginForm> {
    pub fn login() -> Self {
        Self::with_validator(LoginForm::default(), validate_login_form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_show_only_for_touched_fields() {
        let mut form = FormState::user(UserForm::default());
        form.change("name", |f| f.name = "Linus".to_string());

        assert!(form.errors().contains_key("email"));
        assert_eq!(form.visible_error("email"), None);
        assert_eq!(form.visible_error("name"), None);
    }

    #[test]
    fn change_validates_the_new_values() {
        let mut form = FormState::login();
        form.change("email", |f| f.email = "x@y.z".to_string());
        assert!(form.errors().is_empty());
        form.change("email", |f| f.email.clear());
        assert_eq!(form.visible_error("email"), Some("Email is required"));
    }

    #[test]
    fn submit_blocks_on_errors_and_touches_everything() {
        let mut form = FormState::user(UserForm::default());
        let mut called = false;
        let result = form.submit(|_| called = true);

        assert!(!called);
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(UserForm::FIELDS.iter().all(|f| form.is_touched(f)));
        assert_eq!(form.visible_error("location"), Some("Location is required"));
        assert!(!form.is_submitting());
    }

    #[test]
    fn submit_passes_values_and_clears_flag() {
        let mut form = FormState::login();
        form.change("email", |f| f.email = "admin@example.com".to_string());

        assert!(form.begin_submit().is_ok());
        assert!(form.is_submitting());
        form.finish_submit();

        let email = form.submit(|values| values.email).unwrap();
        assert_eq!(email, "admin@example.com");
        assert!(!form.is_submitting());
    }

    #[test]
    fn form_without_validator_always_submits() {
        let mut form = FormState::new(LoginForm::default());
        assert!(form.submit(|_| ()).is_ok());
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut form = FormState::login();
        form.change("email", |f| f.email = "a@b.cd".to_string());
        form.reset();
        assert_eq!(form.values(), &LoginForm::default());
        assert!(!form.is_touched("email"));
    }
}
