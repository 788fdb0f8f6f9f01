//! Workspace: the single place where storage and contexts are built.
//!
//! Construct one `Workspace` at startup and hand its (cloneable) contexts to
//! whatever needs them. Nothing in Stowage looks state up globally.

use std::sync::Arc;

use stowage_cell::{
    AuthContext, AuthTransition, CellError, CellOptions, ErrorHook, ThemeContext, TransitionHook,
};
use stowage_core::config::{StorageBackend, StorageConfig};
use stowage_core::{LoginForm, SessionUser, StowageConfig, validate_login_form};
use stowage_store::{MemoryStorage, Namespaced, RedbStorage, SharedStorage};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::todos::TodoBoard;
use crate::users::UserDirectory;

/// Callbacks the embedding application wires into every context.
#[derive(Clone, Default)]
pub struct WorkspaceHooks {
    /// Receives every absorbed persistence or subscriber failure.
    pub on_error: Option<ErrorHook>,
    /// Receives every login and logout.
    pub navigate: Option<TransitionHook>,
}

impl WorkspaceHooks {
    pub fn on_error(mut self, hook: impl Fn(&CellError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    pub fn navigate(mut self, hook: impl Fn(&AuthTransition) + Send + Sync + 'static) -> Self {
        self.navigate = Some(Arc::new(hook));
        self
    }

    fn options<T>(&self) -> CellOptions<T> {
        match &self.on_error {
            Some(hook) => {
                let hook = hook.clone();
                CellOptions::new().on_persist_error(move |e| hook(e))
            }
            None => CellOptions::new(),
        }
    }
}

#[derive(Clone)]
pub struct Workspace {
    storage: SharedStorage,
    pub theme: ThemeContext,
    pub auth: AuthContext,
    pub users: UserDirectory,
    pub todos: TodoBoard,
}

impl Workspace {
    /// Open the configured storage and build every context.
    pub fn open(config: &StowageConfig, hooks: WorkspaceHooks) -> AppResult<Self> {
        let storage = open_storage(&config.storage)?;
        Self::from_storage(storage, config, hooks)
    }

    /// Build every context over an already-open storage.
    pub fn from_storage(
        storage: SharedStorage,
        config: &StowageConfig,
        hooks: WorkspaceHooks,
    ) -> AppResult<Self> {
        let theme =
            ThemeContext::with_options(storage.clone(), config.ui.default_theme, hooks.options())?;

        let auth = AuthContext::with_options(
            storage.clone(),
            hooks.options(),
            hooks.navigate.clone(),
        )?;

        let users = UserDirectory::with_options(storage.clone(), hooks.options())?;
        let todos = TodoBoard::with_options(storage.clone(), hooks.options())?;

        info!(
            theme = %theme.theme(),
            signed_in = auth.is_authenticated(),
            users = users.list().len(),
            todos = todos.list().len(),
            "workspace ready"
        );
        Ok(Self {
            storage,
            theme,
            auth,
            users,
            todos,
        })
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// Validate the login form and sign in as the demo administrator.
    ///
    /// No credential is verified; any well-formed email is accepted.
    pub fn sign_in(&self, form: &LoginForm) -> AppResult<SessionUser> {
        let errors = validate_login_form(form);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        let user = SessionUser {
            id: 1,
            name: "Admin User".to_string(),
            email: Some(form.email.clone()),
        };
        self.auth.login(user.clone());
        Ok(user)
    }

    pub fn sign_out(&self) {
        self.auth.logout();
    }

    /// Gate for the user and todo screens.
    pub fn require_user(&self) -> AppResult<SessionUser> {
        Ok(self.auth.require_user()?)
    }
}

/// Build the storage backend named by the config.
pub fn open_storage(config: &StorageConfig) -> AppResult<SharedStorage> {
    let base: SharedStorage = match config.backend {
        StorageBackend::Redb => Arc::new(RedbStorage::open(&config.path)?),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    };
    Ok(match config.namespace.as_deref() {
        Some(namespace) if !namespace.is_empty() => Arc::new(Namespaced::new(base, namespace)),
        _ => base,
    })
}
