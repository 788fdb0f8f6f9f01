use clap::Args;
use stowage_app::{AppError, FormState, Workspace};
use stowage_core::{UserForm, UserRecord};

use super::Output;

/// Editable user fields. Omitted flags keep the current (or default) value.
#[derive(Args, Debug, Default)]
pub struct UserFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Admin, Editor or Viewer
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Avatar image URL
    #[arg(long)]
    pub avatar: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

impl UserFields {
    /// Apply the given flags to a form, marking each as touched.
    pub fn fill(self, form: &mut FormState<UserForm>) {
        if let Some(name) = self.name {
            form.change("name", |f| f.name = name);
        }
        if let Some(email) = self.email {
            form.change("email", |f| f.email = email);
        }
        if let Some(role) = self.role {
            form.change("role", |f| f.role = role);
        }
        if let Some(department) = self.department {
            form.change("department", |f| f.department = department);
        }
        if let Some(location) = self.location {
            form.change("location", |f| f.location = location);
        }
        if let Some(avatar) = self.avatar {
            form.change("avatar", |f| f.avatar = Some(avatar));
        }
        if let Some(active) = self.active {
            form.change("isActive", |f| f.is_active = active);
        }
    }
}

pub fn list(ws: &Workspace, out: Output) -> anyhow::Result<()> {
    let users = ws.users.list();
    out.emit(&users, || {
        if users.is_empty() {
            println!("No users yet. Add one with `stowage users add`.");
            return;
        }
        println!("{:<5} {:<24} {:<30} {:<8} {}", "ID", "NAME", "EMAIL", "ROLE", "STATUS");
        for user in &users {
            println!(
                "{:<5} {:<24} {:<30} {:<8} {}",
                user.id,
                user.name,
                user.email,
                user.role,
                status(user)
            );
        }
    })
}

pub fn show(ws: &Workspace, id: u64, out: Output) -> anyhow::Result<()> {
    let user = ws.users.get(id).ok_or(AppError::UserNotFound(id))?;
    out.emit(&user, || print_profile(&user))
}

pub fn add(ws: &Workspace, fields: UserFields, out: Output) -> anyhow::Result<()> {
    let mut form = FormState::user(UserForm::default());
    fields.fill(&mut form);
    let user = submit(ws, &mut form)?;
    out.emit(&user, || println!("✓ Added user {} ({})", user.id, user.name))
}

pub fn edit(ws: &Workspace, id: u64, fields: UserFields, out: Output) -> anyhow::Result<()> {
    let current = ws.users.get(id).ok_or(AppError::UserNotFound(id))?;
    let mut form = FormState::user(UserForm::from(&current));
    fields.fill(&mut form);
    let user = submit(ws, &mut form)?;
    out.emit(&user, || println!("✓ Updated user {} ({})", user.id, user.name))
}

pub fn delete(ws: &Workspace, id: u64) -> anyhow::Result<()> {
    if !ws.users.delete(id) {
        return Err(AppError::UserNotFound(id).into());
    }
    println!("✓ Deleted user {id}");
    Ok(())
}

fn submit(ws: &Workspace, form: &mut FormState<UserForm>) -> anyhow::Result<UserRecord> {
    let result = form
        .submit(|values| ws.users.submit(&values))
        .map_err(AppError::Validation)?;
    Ok(result?)
}

fn status(user: &UserRecord) -> &'static str {
    if user.is_active { "active" } else { "inactive" }
}

fn print_profile(user: &UserRecord) {
    println!("{} (id {})", user.name, user.id);
    println!("  email:      {}", user.email);
    println!("  role:       {}", user.role);
    println!("  department: {}", user.department);
    println!("  location:   {}", user.location);
    println!("  joined:     {}", user.join_date.format("%b %d, %Y"));
    println!("  status:     {}", status(user));
    println!("  avatar:     {}", user.avatar);
}
