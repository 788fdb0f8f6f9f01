use chrono::{Local, NaiveDate};
use serde_json::json;
use stowage_app::{CalendarMode, CalendarView, Workspace};

use super::Output;

pub fn show(
    ws: &Workspace,
    mode: CalendarMode,
    date: Option<NaiveDate>,
    out: Output,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let view = CalendarView::new(mode, date.unwrap_or(today));
    let (start, end) = view.range();
    let events = view.events(&ws.todos.list(), today);

    out.emit(
        &json!({ "view": mode, "start": start, "end": end, "events": events }),
        || {
            println!("{}", view.label());
            if events.is_empty() {
                println!("  (no events)");
            }
            let mut current = None;
            for event in &events {
                if current != Some(event.date) {
                    println!("  {}", event.date.format("%a %b %d"));
                    current = Some(event.date);
                }
                let mark = if event.completed { "x" } else { " " };
                println!("    [{mark}] {}", event.title);
            }
        },
    )
}
