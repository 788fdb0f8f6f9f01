//! Calendar projection of the todo list.
//!
//! Each todo becomes an all-day event on its due date (or on "today" when it
//! has none). A [`CalendarView`] picks the visible window: a month, a
//! Sunday-to-Saturday week, or a single day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use stowage_core::{ParseVariantError, Todo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub id: u64,
    pub title: String,
    pub date: NaiveDate,
    pub completed: bool,
}

impl CalendarEvent {
    pub fn from_todo(todo: &Todo, today: NaiveDate) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            date: todo.due_date.unwrap_or(today),
            completed: todo.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarMode {
    #[default]
    Month,
    Week,
    Day,
}

impl fmt::Display for CalendarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CalendarMode::Month => "month",
            CalendarMode::Week => "week",
            CalendarMode::Day => "day",
        })
    }
}

impl FromStr for CalendarMode {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(CalendarMode::Month),
            "week" => Ok(CalendarMode::Week),
            "day" => Ok(CalendarMode::Day),
            _ => Err(ParseVariantError {
                kind: "calendar view",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigate {
    Prev,
    Next,
    Today,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    pub mode: CalendarMode,
    pub anchor: NaiveDate,
}

impl CalendarView {
    pub fn new(mode: CalendarMode, anchor: NaiveDate) -> Self {
        Self { mode, anchor }
    }

    /// First and last visible day, inclusive.
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        match self.mode {
            CalendarMode::Month => {
                let first = self.anchor.with_day(1).unwrap_or(self.anchor);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(first);
                (first, last)
            }
            CalendarMode::Week => {
                let offset = u64::from(self.anchor.weekday().num_days_from_sunday());
                let start = self
                    .anchor
                    .checked_sub_days(Days::new(offset))
                    .unwrap_or(self.anchor);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
                (start, end)
            }
            CalendarMode::Day => (self.anchor, self.anchor),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let (start, end) = self.range();
        start <= date && date <= end
    }

    /// Move the window by one unit of the current mode.
    pub fn navigate(&mut self, step: Navigate, today: NaiveDate) {
        let moved = match (step, self.mode) {
            (Navigate::Today, _) => Some(today),
            (Navigate::Prev, CalendarMode::Month) => self.anchor.checked_sub_months(Months::new(1)),
            (Navigate::Next, CalendarMode::Month) => self.anchor.checked_add_months(Months::new(1)),
            (Navigate::Prev, CalendarMode::Week) => self.anchor.checked_sub_days(Days::new(7)),
            (Navigate::Next, CalendarMode::Week) => self.anchor.checked_add_days(Days::new(7)),
            (Navigate::Prev, CalendarMode::Day) => self.anchor.pred_opt(),
            (Navigate::Next, CalendarMode::Day) => self.anchor.succ_opt(),
        };
        if let Some(anchor) = moved {
            self.anchor = anchor;
        }
    }

    /// Toolbar label, e.g. `March 2024`.
    pub fn label(&self) -> String {
        match self.mode {
            CalendarMode::Month => self.anchor.format("%B %Y").to_string(),
            CalendarMode::Week => {
                let (start, end) = self.range();
                format!("{} - {}", start.format("%b %d"), end.format("%b %d %Y"))
            }
            CalendarMode::Day => self.anchor.format("%A, %b %d %Y").to_string(),
        }
    }

    /// Events inside the window, ordered by date then id.
    pub fn events(&self, todos: &[Todo], today: NaiveDate) -> Vec<CalendarEvent> {
        let mut events: Vec<CalendarEvent> = todos
            .iter()
            .map(|todo| CalendarEvent::from_todo(todo, today))
            .filter(|event| self.contains(event.date))
            .collect();
        events.sort_by_key(|event| (event.date, event.id));
        events
    }
}
