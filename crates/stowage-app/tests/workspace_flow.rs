//! End-to-end flows through a `Workspace`, reopened across "sessions".

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use stowage_app::*;
use stowage_cell::{AuthTransition, Hydration};
use stowage_core::config::StorageBackend;
use stowage_core::{LoginForm, Priority, StowageConfig, Theme, UserForm};
use stowage_store::{DurableStorage, MemoryStorage, SharedStorage};

fn disk_config(dir: &std::path::Path) -> StowageConfig {
    StowageConfig::scaffold(dir, None)
}

fn login(email: &str) -> LoginForm {
    LoginForm {
        email: email.to_string(),
        password: "whatever".to_string(),
    }
}

#[test]
fn state_survives_reopening_the_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(dir.path());

    {
        let ws = Workspace::open(&config, WorkspaceHooks::default()).unwrap();
        ws.sign_in(&login("admin@example.com")).unwrap();
        ws.theme.toggle();
        ws.todos
            .add("buy milk", NaiveDate::from_ymd_opt(2024, 3, 9), Some(Priority::High))
            .unwrap();
        ws.users
            .submit(&UserForm {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                department: "Math".to_string(),
                location: "London".to_string(),
                ..Default::default()
            })
            .unwrap();
    }

    let ws = Workspace::open(&config, WorkspaceHooks::default()).unwrap();
    assert_eq!(ws.theme.theme(), Theme::Dark);
    assert_eq!(
        ws.require_user().unwrap().email.as_deref(),
        Some("admin@example.com")
    );
    assert_eq!(ws.todos.list()[0].title, "buy milk");
    assert_eq!(ws.users.list()[0].name, "Ada");
    assert_eq!(ws.todos.cell().hydration(), Hydration::Stored);
}

#[test]
fn protected_operations_need_a_user() {
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let ws = Workspace::from_storage(storage, &StowageConfig::default(), WorkspaceHooks::default())
        .unwrap();

    assert!(matches!(ws.require_user(), Err(AppError::Auth(_))));
    assert!(matches!(
        ws.sign_in(&login("")),
        Err(AppError::Validation(errors)) if errors.contains_key("email")
    ));
    ws.sign_in(&login("a@b.co")).unwrap();
    assert_eq!(ws.require_user().unwrap().name, "Admin User");
    ws.sign_out();
    assert!(ws.require_user().is_err());
}

#[test]
fn navigation_hook_follows_auth_changes() {
    let routes = Arc::new(Mutex::new(Vec::new()));
    let sink = routes.clone();
    let hooks = WorkspaceHooks::default().navigate(move |t: &AuthTransition| {
        sink.lock().unwrap().push(t.destination());
    });
    let storage: SharedStorage = Arc::new(MemoryStorage::new());
    let ws = Workspace::from_storage(storage, &StowageConfig::default(), hooks).unwrap();

    ws.sign_in(&login("a@b.co")).unwrap();
    ws.theme.toggle();
    ws.sign_out();
    assert_eq!(*routes.lock().unwrap(), vec!["/", "/login"]);
}

#[test]
fn corrupt_slots_fall_back_and_are_reported() {
    let storage: SharedStorage = Arc::new(MemoryStorage::with_slots([
        ("todos", "{\"not\":\"a list\"}"),
        ("theme", "\"dark\""),
    ]));
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let hooks = WorkspaceHooks::default().on_error(move |e| {
        sink.lock().unwrap().push(e.key().unwrap_or_default().to_string());
    });

    let ws = Workspace::from_storage(storage.clone(), &StowageConfig::default(), hooks).unwrap();
    assert!(ws.todos.list().is_empty());
    assert_eq!(ws.theme.theme(), Theme::Dark);
    assert_eq!(*errors.lock().unwrap(), vec!["todos"]);

    ws.todos.add("recover", None, None).unwrap();
    let raw = storage.read_raw("todos").unwrap().unwrap();
    assert!(raw.starts_with('['), "{raw}");
}

#[test]
fn namespaces_keep_workspaces_apart() {
    let dir = tempfile::tempdir().unwrap();
    let mut alpha = disk_config(dir.path());
    alpha.storage.namespace = Some("alpha".to_string());
    let mut beta = alpha.clone();
    beta.storage.namespace = Some("beta".to_string());

    {
        let ws = Workspace::open(&alpha, WorkspaceHooks::default()).unwrap();
        ws.theme.set_theme(Theme::Dark);
        assert_eq!(ws.storage().keys().unwrap(), vec!["theme"]);
    }

    let ws = Workspace::open(&beta, WorkspaceHooks::default()).unwrap();
    assert_eq!(ws.theme.theme(), Theme::Light);
}

#[test]
fn memory_backend_starts_empty() {
    let mut config = StowageConfig::default();
    config.storage.backend = StorageBackend::Memory;
    let ws = Workspace::open(&config, WorkspaceHooks::default()).unwrap();
    assert!(ws.storage().keys().unwrap().is_empty());
    assert!(ws.users.list().is_empty());
}
