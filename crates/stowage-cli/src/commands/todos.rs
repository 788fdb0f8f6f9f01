use chrono::{Local, NaiveDate};
use serde_json::json;
use stowage_app::{AppError, Workspace};
use stowage_core::{Priority, Todo, TodoPatch};

use super::Output;

pub fn list(ws: &Workspace, out: Output) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let todos = ws.todos.list();
    let summary = ws.todos.summary(today);
    out.emit(&json!({ "todos": todos, "summary": summary }), || {
        if todos.is_empty() {
            println!("Nothing to do. Add a task with `stowage todos add`.");
            return;
        }
        for todo in &todos {
            println!("{}", render(todo, today));
        }
        println!(
            "\n{} total, {} done, {} overdue",
            summary.total, summary.completed, summary.overdue
        );
    })
}

pub fn add(
    ws: &Workspace,
    title: &str,
    due: Option<NaiveDate>,
    priority: Priority,
    out: Output,
) -> anyhow::Result<()> {
    let todo = ws.todos.add(title, due, Some(priority))?;
    out.emit(&todo, || println!("✓ Added {} ({})", todo.title, todo.id))
}

pub fn toggle(ws: &Workspace, id: u64, out: Output) -> anyhow::Result<()> {
    let todo = ws.todos.toggle(id)?;
    out.emit(&todo, || {
        let state = if todo.completed { "done" } else { "open" };
        println!("✓ {} is {state}", todo.title)
    })
}

pub fn edit(
    ws: &Workspace,
    id: u64,
    title: Option<String>,
    due: Option<Option<NaiveDate>>,
    priority: Option<Priority>,
    out: Output,
) -> anyhow::Result<()> {
    let patch = TodoPatch {
        title,
        completed: None,
        due_date: due,
        priority: priority.map(Some),
    };
    if patch.is_empty() {
        anyhow::bail!("nothing to change (pass --title, --due, --clear-due or --priority)");
    }
    let todo = ws.todos.update(id, &patch)?;
    out.emit(&todo, || println!("✓ Updated {} ({})", todo.title, todo.id))
}

pub fn delete(ws: &Workspace, id: u64) -> anyhow::Result<()> {
    if !ws.todos.delete(id) {
        return Err(AppError::TodoNotFound(id).into());
    }
    println!("✓ Deleted todo {id}");
    Ok(())
}

pub fn clear_completed(ws: &Workspace) -> anyhow::Result<()> {
    let removed = ws.todos.clear_completed();
    println!("✓ Cleared {removed} completed todo(s)");
    Ok(())
}

/// One line per task: checkbox, id, title, priority label, due date.
pub fn render(todo: &Todo, today: NaiveDate) -> String {
    let mut line = format!(
        "[{}] {} {}",
        if todo.completed { "x" } else { " " },
        todo.id,
        todo.title
    );
    if let Some(priority) = todo.priority {
        line.push_str(&format!(" ({})", priority.label()));
    }
    if let Some(due) = todo.due_date {
        line.push_str(&format!(" due {}", due.format("%b %d")));
        if !todo.completed && due < today {
            line.push_str(" OVERDUE");
        }
    }
    line
}
