use stowage_core::Theme;
use stowage_store::SharedStorage;

use crate::cell::{CellOptions, SyncedCell};
use crate::error::CellResult;
use crate::subscription::Subscription;

/// Storage slot for the active theme.
pub const THEME_KEY: &str = "theme";

#[derive(Clone, Debug)]
pub struct ThemeContext {
    cell: SyncedCell<Theme>,
}

impl ThemeContext {
    pub fn new(storage: SharedStorage, default: Theme) -> CellResult<Self> {
        Self::with_options(storage, default, CellOptions::default())
    }

    pub fn with_options(
        storage: SharedStorage,
        default: Theme,
        options: CellOptions<Theme>,
    ) -> CellResult<Self> {
        Ok(Self {
            cell: SyncedCell::create_with(storage, THEME_KEY, default, options)?,
        })
    }

    pub fn theme(&self) -> Theme {
        self.cell.get()
    }

    pub fn is_dark(&self) -> bool {
        self.theme() == Theme::Dark
    }

    pub fn set_theme(&self, theme: Theme) {
        self.cell.set(theme);
    }

    /// Flip between light and dark; returns the new theme.
    pub fn toggle(&self) -> Theme {
        self.cell.modify(|theme| {
            *theme = theme.toggled();
            *theme
        })
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&Theme) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Subscription {
        self.cell.subscribe(observer)
    }

    pub fn cell(&self) -> &SyncedCell<Theme> {
        &self.cell
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use stowage_store::{DurableStorage, MemoryStorage};

    use super::*;

    #[test]
    fn toggle_persists() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let theme = ThemeContext::new(storage.clone(), Theme::Light).unwrap();

        assert_eq!(theme.toggle(), Theme::Dark);
        assert!(theme.is_dark());
        assert_eq!(storage.read_raw(THEME_KEY).unwrap().as_deref(), Some("\"dark\""));

        let reopened = ThemeContext::new(storage, Theme::Light).unwrap();
        assert_eq!(reopened.theme(), Theme::Dark);
    }

    #[test]
    fn subscribers_see_each_toggle() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let theme = ThemeContext::new(storage, Theme::Dark).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = theme.subscribe(move |t| {
            sink.lock().unwrap().push(*t);
            Ok(())
        });

        theme.toggle();
        theme.toggle();
        assert_eq!(*seen.lock().unwrap(), vec![Theme::Light, Theme::Dark]);
    }

    #[test]
    fn unknown_stored_theme_falls_back() {
        let storage: SharedStorage = Arc::new(MemoryStorage::with_slots([(THEME_KEY, "\"sepia\"")]));
        let theme = ThemeContext::new(storage, Theme::Dark).unwrap();
        assert_eq!(theme.theme(), Theme::Dark);
    }
}
