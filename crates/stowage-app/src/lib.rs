//! stowage-app: the dashboard and todo manager, minus the pixels.
//!
//! Every screen's state lives in a [`stowage_cell::SyncedCell`]; this crate
//! holds the operations those screens perform on it.
//!
//! # Architecture
//!
//! ```text
//! Workspace (built once from stowage.toml)
//!   ├── SharedStorage (redb | memory, optionally namespaced)
//!   ├── ThemeContext   → "theme"
//!   ├── AuthContext    → "user"   ── AuthTransition → navigation hook
//!   ├── UserDirectory  → "users"  ── Dashboard (list/profile/form)
//!   └── TodoBoard      → "todos"  ── CalendarView (month/week/day)
//! ```

pub mod calendar;
pub mod error;
pub mod form;
pub mod todos;
pub mod users;
pub mod workspace;

pub use calendar::{CalendarEvent, CalendarMode, CalendarView, Navigate};
pub use error::{AppError, AppResult};
pub use form::{FormFields, FormState};
pub use todos::{TODOS_KEY, TodoBoard, TodoSummary};
pub use users::{Dashboard, USERS_KEY, UserDirectory};
pub use workspace::{Workspace, WorkspaceHooks};
