//! Auth context: the signed-in user, persisted under `user`.
//!
//! Routing is not this module's concern. Every login or logout is announced
//! as an [`AuthTransition`] through the cell's `after_notify` hook, and the
//! embedding application decides where to send the user.

use std::sync::Arc;

use stowage_core::SessionUser;
use stowage_store::SharedStorage;
use thiserror::Error;

use crate::cell::{CellOptions, SyncedCell};
use crate::error::CellResult;
use crate::subscription::Subscription;

/// Storage slot for the signed-in user.
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("not signed in")]
    NotAuthenticated,
}

/// Auth state change announced after subscribers have been notified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthTransition {
    LoggedIn(SessionUser),
    LoggedOut,
}

impl AuthTransition {
    /// Conventional destination for the transition.
    pub fn destination(&self) -> &'static str {
        match self {
            AuthTransition::LoggedIn(_) => "/",
            AuthTransition::LoggedOut => "/login",
        }
    }
}

/// Navigation hook invoked on every auth change.
pub type TransitionHook = Arc<dyn Fn(&AuthTransition) + Send + Sync>;

#[derive(Clone, Debug)]
pub struct AuthContext {
    cell: SyncedCell<Option<SessionUser>>,
}

impl AuthContext {
    /// Auth context with nobody listening for transitions.
    pub fn new(storage: SharedStorage) -> CellResult<Self> {
        Self::with_options(storage, CellOptions::default(), None)
    }

    /// Auth context that reports every transition to `navigate`.
    pub fn with_navigation(
        storage: SharedStorage,
        navigate: impl Fn(&AuthTransition) + Send + Sync + 'static,
    ) -> CellResult<Self> {
        Self::with_options(storage, CellOptions::default(), Some(Arc::new(navigate)))
    }

    /// Full constructor. `navigate` is installed as the cell's
    /// `after_notify` hook, replacing any hook already in `options`.
    pub fn with_options(
        storage: SharedStorage,
        options: CellOptions<Option<SessionUser>>,
        navigate: Option<TransitionHook>,
    ) -> CellResult<Self> {
        let options = match navigate {
            Some(navigate) => options.after_notify(move |user: &Option<SessionUser>| {
                let transition = match user {
                    Some(user) => AuthTransition::LoggedIn(user.clone()),
                    None => AuthTransition::LoggedOut,
                };
                navigate(&transition);
            }),
            None => options,
        };
        Ok(Self {
            cell: SyncedCell::create_with(storage, USER_KEY, None, options)?,
        })
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.cell.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.cell.with(Option::is_some)
    }

    pub fn login(&self, user: SessionUser) {
        tracing::info!(user_id = user.id, "signed in");
        self.cell.set(Some(user));
    }

    pub fn logout(&self) {
        tracing::info!("signed out");
        self.cell.set(None);
    }

    /// Gate for protected screens.
    pub fn require_user(&self) -> Result<SessionUser, AuthError> {
        self.user().ok_or(AuthError::NotAuthenticated)
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&Option<SessionUser>) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Subscription {
        self.cell.subscribe(observer)
    }

    pub fn cell(&self) -> &SyncedCell<Option<SessionUser>> {
        &self.cell
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use stowage_store::{DurableStorage, MemoryStorage};

    use super::*;

    fn admin() -> SessionUser {
        SessionUser {
            id: 1,
            name: "Admin User".to_string(),
            email: Some("admin@example.com".to_string()),
        }
    }

    #[test]
    fn login_logout_round_trip() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let auth = AuthContext::new(storage.clone()).unwrap();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.require_user(), Err(AuthError::NotAuthenticated));

        auth.login(admin());
        assert!(auth.is_authenticated());
        assert_eq!(AuthContext::new(storage.clone()).unwrap().user(), Some(admin()));

        auth.logout();
        assert_eq!(storage.read_raw(USER_KEY).unwrap().as_deref(), Some("null"));
        assert!(AuthContext::new(storage).unwrap().user().is_none());
    }

    #[test]
    fn transitions_reach_navigation() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let routes = Arc::new(Mutex::new(Vec::new()));
        let sink = routes.clone();
        let auth = AuthContext::with_navigation(storage, move |t| {
            sink.lock().unwrap().push(t.destination());
        })
        .unwrap();

        auth.login(admin());
        auth.logout();
        auth.logout();
        assert_eq!(*routes.lock().unwrap(), vec!["/", "/login", "/login"]);
    }

    #[test]
    fn subscribers_run_before_navigation() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let nav_log = log.clone();
        let auth = AuthContext::with_navigation(storage, move |_| {
            nav_log.lock().unwrap().push("navigate");
        })
        .unwrap();
        let sub_log = log.clone();
        let _sub = auth.subscribe(move |_| {
            sub_log.lock().unwrap().push("render");
            Ok(())
        });

        auth.logout();
        assert_eq!(*log.lock().unwrap(), vec!["render", "navigate"]);
    }

    #[test]
    fn logout_from_login_subscriber_ends_on_login_route() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let routes = Arc::new(Mutex::new(Vec::new()));
        let sink = routes.clone();
        let auth = AuthContext::with_navigation(storage, move |t| {
            sink.lock().unwrap().push(t.destination());
        })
        .unwrap();

        let rendered = Arc::new(Mutex::new(Vec::new()));
        let render_log = rendered.clone();
        let _render = auth.subscribe(move |user| {
            render_log.lock().unwrap().push(user.is_some());
            Ok(())
        });
        let kicker = auth.clone();
        let _kick = auth.subscribe(move |user| {
            if user.is_some() {
                kicker.logout();
            }
            Ok(())
        });

        auth.login(admin());

        assert!(!auth.is_authenticated());
        assert_eq!(*routes.lock().unwrap(), vec!["/login"]);
        assert_eq!(rendered.lock().unwrap().last(), Some(&false));
    }

    #[test]
    fn stored_user_without_email_loads() {
        let storage: SharedStorage =
            Arc::new(MemoryStorage::with_slots([(USER_KEY, r#"{"id":2,"name":"Guest"}"#)]));
        let auth = AuthContext::new(storage).unwrap();
        assert_eq!(auth.require_user().unwrap().name, "Guest");
    }
}
