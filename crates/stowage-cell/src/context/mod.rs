//! Cross-cutting contexts shared by every screen: theme and auth.
//!
//! Each context owns one [`crate::SyncedCell`] and is constructed once at
//! startup, then handed out as a cheap clone.

pub mod auth;
pub mod theme;

pub use auth::{AuthContext, AuthError, AuthTransition, TransitionHook, USER_KEY};
pub use theme::{THEME_KEY, ThemeContext};
