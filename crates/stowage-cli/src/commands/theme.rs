use serde_json::json;
use stowage_app::Workspace;
use stowage_core::Theme;

use super::Output;

pub fn show(ws: &Workspace, out: Output) -> anyhow::Result<()> {
    let theme = ws.theme.theme();
    out.emit(&json!({ "theme": theme }), || println!("{theme}"))
}

pub fn toggle(ws: &Workspace, out: Output) -> anyhow::Result<()> {
    let theme = ws.theme.toggle();
    out.emit(&json!({ "theme": theme }), || println!("✓ Theme is now {theme}"))
}

pub fn set(ws: &Workspace, theme: Theme, out: Output) -> anyhow::Result<()> {
    ws.theme.set_theme(theme);
    out.emit(&json!({ "theme": theme }), || println!("✓ Theme is now {theme}"))
}
