pub mod calendar;
pub mod init;
pub mod session;
pub mod storage;
pub mod theme;
pub mod todos;
pub mod users;

use serde::Serialize;
use stowage_app::{Workspace, WorkspaceHooks};
use stowage_core::StowageConfig;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    pub fn parse(format: &str) -> anyhow::Result<Self> {
        match format {
            "text" => Ok(Output::Text),
            "json" => Ok(Output::Json),
            other => anyhow::bail!("unknown output format: {other} (expected text or json)"),
        }
    }

    /// Print `value` as pretty JSON, or run `text` for the human format.
    pub fn emit<T: Serialize + ?Sized>(self, value: &T, text: impl FnOnce()) -> anyhow::Result<()> {
        match self {
            Output::Json => println!("{}", serde_json::to_string_pretty(value)?),
            Output::Text => text(),
        }
        Ok(())
    }
}

/// Open the configured workspace with terminal-facing hooks.
///
/// Absorbed storage failures are surfaced as warnings so a command that
/// "succeeded" in memory but failed to persist does not go unnoticed.
pub fn open_workspace(config: &StowageConfig) -> anyhow::Result<Workspace> {
    let hooks = WorkspaceHooks::default()
        .on_error(|e| eprintln!("⚠ {e}"))
        .navigate(|transition| println!("→ {}", transition.destination()));
    Ok(Workspace::open(config, hooks)?)
}
