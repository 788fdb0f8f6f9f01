//! stowage-cell: storage-synchronized reactive state for Stowage.
//!
//! A [`SyncedCell`] is a named value that hydrates once from durable
//! storage, persists every write back as JSON, and synchronously notifies
//! its subscribers after each change.
//!
//! # Lifecycle
//!
//! ```text
//! create(key, default)
//!   └── read_raw(key) ── decoded ──→ Ready(stored value)
//!                     ├─ absent ───→ Ready(default)
//!                     └─ corrupt ──→ Ready(default), error reported
//! set(v) / update(f) / modify(f) / try_modify(f)
//!   ├── 1. replace in-memory value  ┐ under the commit lock
//!   ├── 2. encode + write_raw(key)  ┘ (write skipped on encode failure)
//!   ├── 3. notify subscribers in registration order
//!   └── 4. after_notify hook
//! ```
//!
//! A write made while step 3 is running (from an observer or another
//! thread) supersedes the pass in flight: it stops, and only the newer
//! value reaches the remaining subscribers and `after_notify`.
//!
//! No failure is fatal. Decode, encode, storage and observer failures are
//! logged and handed to the optional hooks in [`CellOptions`].
//!
//! Cells are `Clone` handles over shared state; construct one per key at
//! startup and pass it to whoever needs it. The [`context`] module builds
//! the theme and auth contexts on top.

pub mod cell;
pub mod context;
pub mod error;
pub mod subscription;

pub use cell::{CellOptions, ErrorHook, Hydration, NotifyHook, SyncedCell};
pub use context::{
    AuthContext, AuthError, AuthTransition, THEME_KEY, ThemeContext, TransitionHook, USER_KEY,
};
pub use error::{CellError, CellResult};
pub use subscription::{Observer, Subscription};
