use stowage_app::Workspace;
use stowage_core::LoginForm;

use super::Output;

pub fn login(ws: &Workspace, email: String, password: String, out: Output) -> anyhow::Result<()> {
    let user = ws.sign_in(&LoginForm { email, password })?;
    out.emit(&user, || println!("✓ Signed in as {}", user.name))
}

pub fn logout(ws: &Workspace) -> anyhow::Result<()> {
    ws.sign_out();
    println!("✓ Signed out");
    Ok(())
}

pub fn whoami(ws: &Workspace, out: Output) -> anyhow::Result<()> {
    let user = ws.auth.user();
    out.emit(&user, || match &user {
        Some(user) => match &user.email {
            Some(email) => println!("{} <{email}> (id {})", user.name, user.id),
            None => println!("{} (id {})", user.name, user.id),
        },
        None => println!("Not signed in"),
    })
}
