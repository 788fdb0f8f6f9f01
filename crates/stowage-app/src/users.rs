//! User directory persisted under `users`, and the dashboard's view state.

use chrono::{Local, NaiveDate};
use stowage_cell::{CellOptions, CellResult, Subscription, SyncedCell};
use stowage_core::{UserForm, UserRecord, ViewMode, validate_user_form};
use stowage_store::SharedStorage;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Storage slot for the user list.
pub const USERS_KEY: &str = "users";

const AVATAR_POOL: u64 = 50;

/// Portrait assigned to a new user.
pub fn avatar_for(id: u64) -> String {
    let set = if id % 2 == 0 { "men" } else { "women" };
    format!("https://randomuser.me/api/portraits/{set}/{}.jpg", id % AVATAR_POOL)
}

#[derive(Clone, Debug)]
pub struct UserDirectory {
    cell: SyncedCell<Vec<UserRecord>>,
}

impl UserDirectory {
    pub fn new(storage: SharedStorage) -> CellResult<Self> {
        Self::with_options(storage, CellOptions::default())
    }

    pub fn with_options(
        storage: SharedStorage,
        options: CellOptions<Vec<UserRecord>>,
    ) -> CellResult<Self> {
        Ok(Self {
            cell: SyncedCell::create_with(storage, USERS_KEY, Vec::new(), options)?,
        })
    }

    pub fn list(&self) -> Vec<UserRecord> {
        self.cell.get()
    }

    pub fn get(&self, id: u64) -> Option<UserRecord> {
        self.cell.with(|users| users.iter().find(|u| u.id == id).cloned())
    }

    /// Create or update a user from a validated form.
    pub fn submit(&self, form: &UserForm) -> AppResult<UserRecord> {
        self.submit_on(form, Local::now().date_naive())
    }

    /// As [`UserDirectory::submit`], with an explicit join date for new users.
    pub fn submit_on(&self, form: &UserForm, today: NaiveDate) -> AppResult<UserRecord> {
        let errors = validate_user_form(form);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if let Some(id) = form.id {
            let updated = self.cell.try_modify(|users| {
                let user = users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or(AppError::UserNotFound(id))?;
                user.merge(form);
                Ok::<_, AppError>(user.clone())
            })?;
            debug!(id, "user updated");
            return Ok(updated);
        }

        let user = self.cell.try_modify(|users| {
            let id = users
                .iter()
                .map(|u| u.id)
                .max()
                .unwrap_or(0)
                .checked_add(1)
                .ok_or(AppError::IdsExhausted("user"))?;
            let user = UserRecord {
                id,
                name: form.name.clone(),
                email: form.email.clone(),
                avatar: form.avatar.clone().unwrap_or_else(|| avatar_for(id)),
                role: form.role.clone(),
                department: form.department.clone(),
                location: form.location.clone(),
                join_date: today,
                is_active: form.is_active,
            };
            users.push(user.clone());
            Ok::<_, AppError>(user)
        })?;
        debug!(id = user.id, "user created");
        Ok(user)
    }

    /// Remove a user. Returns true if it existed.
    pub fn delete(&self, id: u64) -> bool {
        // Skip the write when nothing would change.
        if self.get(id).is_none() {
            return false;
        }
        self.cell.update(|users| users.iter().filter(|u| u.id != id).cloned().collect());
        debug!(id, "user deleted");
        true
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&Vec<UserRecord>) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Subscription {
        self.cell.subscribe(observer)
    }

    pub fn cell(&self) -> &SyncedCell<Vec<UserRecord>> {
        &self.cell
    }
}

/// Which user is on screen and what the dashboard is doing with them.
#[derive(Debug)]
pub struct Dashboard {
    directory: UserDirectory,
    mode: ViewMode,
    selected: Option<u64>,
    editing: Option<UserForm>,
}

impl Dashboard {
    pub fn new(directory: UserDirectory) -> Self {
        Self {
            directory,
            mode: ViewMode::List,
            selected: None,
            editing: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn selected(&self) -> Option<UserRecord> {
        self.selected.and_then(|id| self.directory.get(id))
    }

    /// Form contents while in [`ViewMode::Form`]; `None` means a blank form.
    pub fn editing(&self) -> Option<&UserForm> {
        self.editing.as_ref()
    }

    pub fn view_profile(&mut self, id: u64) -> bool {
        if self.directory.get(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        self.mode = ViewMode::Profile;
        true
    }

    pub fn add_user(&mut self) {
        self.editing = None;
        self.mode = ViewMode::Form;
    }

    pub fn edit_selected(&mut self) -> bool {
        let Some(user) = self.selected() else {
            return false;
        };
        self.editing = Some(UserForm::from(&user));
        self.mode = ViewMode::Form;
        true
    }

    /// Save the form; the dashboard returns to the list on success.
    pub fn submit(&mut self, form: &UserForm) -> AppResult<UserRecord> {
        let user = self.directory.submit(form)?;
        self.mode = ViewMode::List;
        Ok(user)
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let removed = self.directory.delete(id);
        if removed {
            if self.selected == Some(id) {
                self.selected = None;
            }
            self.mode = ViewMode::List;
        }
        removed
    }

    pub fn cancel(&mut self) {
        self.mode = if self.selected().is_some() {
            ViewMode::Profile
        } else {
            ViewMode::List
        };
    }

    pub fn back(&mut self) {
        self.mode = ViewMode::List;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stowage_store::MemoryStorage;

    use super::*;

    fn directory() -> UserDirectory {
        UserDirectory::new(Arc::new(MemoryStorage::new())).unwrap()
    }

    fn form(name: &str) -> UserForm {
        UserForm {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            department: "Engineering".to_string(),
            location: "Remote".to_string(),
            is_active: true,
            ..Default::default()
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn new_users_get_sequential_ids() {
        let users = directory();
        let a = users.submit_on(&form("Ada"), day()).unwrap();
        let b = users.submit_on(&form("Bob"), day()).unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.join_date, day());
        assert_eq!(a.role, "Viewer");
        assert_eq!(a.avatar, avatar_for(1));
        assert_eq!(users.list().len(), 2);
    }

    #[test]
    fn ids_follow_the_highest_even_after_deletes() {
        let users = directory();
        users.submit_on(&form("Ada"), day()).unwrap();
        users.submit_on(&form("Bob"), day()).unwrap();
        assert!(users.delete(1));
        let c = users.submit_on(&form("Cy"), day()).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn editing_merges_into_existing_record() {
        let users = directory();
        let ada = users.submit_on(&form("Ada"), day()).unwrap();

        let mut edit = UserForm::from(&ada);
        edit.location = "Lisbon".to_string();
        let later = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let updated = users.submit_on(&edit, later).unwrap();

        assert_eq!(updated.id, ada.id);
        assert_eq!(updated.location, "Lisbon");
        assert_eq!(updated.join_date, day());
        assert_eq!(users.list().len(), 1);
    }

    #[test]
    fn editing_unknown_user_fails() {
        let users = directory();
        let mut ghost = form("Ghost");
        ghost.id = Some(99);
        assert!(matches!(
            users.submit_on(&ghost, day()),
            Err(AppError::UserNotFound(99))
        ));
        assert!(users.list().is_empty());
    }

    #[test]
    fn create_fails_once_ids_run_out() {
        let users = directory();
        let mut last = users.submit_on(&form("Last"), day()).unwrap();
        last.id = u64::MAX;
        users.cell().set(vec![last]);

        assert!(matches!(
            users.submit_on(&form("Overflow"), day()),
            Err(AppError::IdsExhausted("user"))
        ));
        assert_eq!(users.list().len(), 1);
    }

    #[test]
    fn invalid_form_is_not_saved() {
        let users = directory();
        let mut bad = form("Ada");
        bad.email = "not-an-email".to_string();
        match users.submit_on(&bad, day()) {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors["email"], "Invalid email format")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(users.list().is_empty());
    }

    #[test]
    fn delete_missing_user_is_a_noop() {
        let users = directory();
        assert!(!users.delete(5));
    }

    #[test]
    fn dashboard_walks_through_view_modes() {
        let users = directory();
        let ada = users.submit_on(&form("Ada"), day()).unwrap();
        let mut dash = Dashboard::new(users.clone());
        assert_eq!(dash.mode(), ViewMode::List);

        assert!(!dash.view_profile(42));
        assert!(dash.view_profile(ada.id));
        assert_eq!(dash.mode(), ViewMode::Profile);

        assert!(dash.edit_selected());
        assert_eq!(dash.mode(), ViewMode::Form);
        assert_eq!(dash.editing().and_then(|f| f.id), Some(ada.id));

        dash.cancel();
        assert_eq!(dash.mode(), ViewMode::Profile);

        dash.add_user();
        assert!(dash.editing().is_none());
        dash.submit(&form("Bob")).unwrap();
        assert_eq!(dash.mode(), ViewMode::List);

        dash.view_profile(ada.id);
        assert!(dash.delete(ada.id));
        assert!(dash.selected().is_none());
        dash.cancel();
        assert_eq!(dash.mode(), ViewMode::List);
        assert_eq!(users.list().len(), 1);
    }
}
