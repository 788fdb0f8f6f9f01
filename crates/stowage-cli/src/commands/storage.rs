use stowage_app::Workspace;
use stowage_store::DurableStorage;

use super::Output;

pub fn keys(ws: &Workspace, out: Output) -> anyhow::Result<()> {
    let keys = ws.storage().keys()?;
    out.emit(&keys, || {
        for key in &keys {
            println!("{key}");
        }
    })
}

/// Print the raw slot content exactly as stored.
pub fn get(ws: &Workspace, key: &str) -> anyhow::Result<()> {
    match ws.storage().read_raw(key)? {
        Some(raw) => {
            println!("{raw}");
            Ok(())
        }
        None => anyhow::bail!("no value stored under {key:?}"),
    }
}
