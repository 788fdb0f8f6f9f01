//! Todo board persisted under `todos`.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use stowage_cell::{CellOptions, CellResult, Subscription, SyncedCell};
use stowage_core::{Priority, Todo, TodoPatch};
use stowage_store::SharedStorage;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Storage slot for the todo list.
pub const TODOS_KEY: &str = "todos";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodoSummary {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
}

#[derive(Clone, Debug)]
pub struct TodoBoard {
    cell: SyncedCell<Vec<Todo>>,
}

impl TodoBoard {
    pub fn new(storage: SharedStorage) -> CellResult<Self> {
        Self::with_options(storage, CellOptions::default())
    }

    pub fn with_options(storage: SharedStorage, options: CellOptions<Vec<Todo>>) -> CellResult<Self> {
        Ok(Self {
            cell: SyncedCell::create_with(storage, TODOS_KEY, Vec::new(), options)?,
        })
    }

    pub fn list(&self) -> Vec<Todo> {
        self.cell.get()
    }

    pub fn get(&self, id: u64) -> Option<Todo> {
        self.cell.with(|todos| todos.iter().find(|t| t.id == id).cloned())
    }

    /// Append a task. Blank titles are rejected.
    pub fn add(
        &self,
        title: &str,
        due_date: Option<NaiveDate>,
        priority: Option<Priority>,
    ) -> AppResult<Todo> {
        self.add_at(title, due_date, priority, Utc::now().timestamp_millis().max(0) as u64)
    }

    /// As [`TodoBoard::add`], stamping the id from `now_ms`.
    ///
    /// Ids are creation timestamps in milliseconds, bumped past the highest
    /// existing id so two adds in the same millisecond stay distinct.
    pub fn add_at(
        &self,
        title: &str,
        due_date: Option<NaiveDate>,
        priority: Option<Priority>,
        now_ms: u64,
    ) -> AppResult<Todo> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::BlankTitle);
        }
        let todo = self.cell.try_modify(|todos| {
            let next = match todos.iter().map(|t| t.id).max() {
                Some(max) => max.checked_add(1).ok_or(AppError::IdsExhausted("todo"))?,
                None => 0,
            };
            let todo = Todo {
                id: now_ms.max(next),
                title: title.to_string(),
                completed: false,
                due_date,
                priority,
            };
            todos.push(todo.clone());
            Ok::<_, AppError>(todo)
        })?;
        debug!(id = todo.id, "todo added");
        Ok(todo)
    }

    pub fn update(&self, id: u64, patch: &TodoPatch) -> AppResult<Todo> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(AppError::BlankTitle);
            }
        }
        self.cell.try_modify(|todos| {
            let todo = todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(AppError::TodoNotFound(id))?;
            todo.apply(patch);
            Ok(todo.clone())
        })
    }

    /// Flip a task's completion flag.
    pub fn toggle(&self, id: u64) -> AppResult<Todo> {
        self.cell.try_modify(|todos| {
            let todo = todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(AppError::TodoNotFound(id))?;
            todo.completed = !todo.completed;
            Ok(todo.clone())
        })
    }

    /// Remove a task. Returns true if it existed.
    pub fn delete(&self, id: u64) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.cell.update(|todos| todos.iter().filter(|t| t.id != id).cloned().collect());
        debug!(id, "todo deleted");
        true
    }

    /// Drop every completed task; returns how many were removed.
    pub fn clear_completed(&self) -> usize {
        let done = self.cell.with(|todos| todos.iter().filter(|t| t.completed).count());
        if done > 0 {
            self.cell.update(|todos| todos.iter().filter(|t| !t.completed).cloned().collect());
        }
        done
    }

    pub fn summary(&self, today: NaiveDate) -> TodoSummary {
        self.cell.with(|todos| TodoSummary {
            total: todos.len(),
            completed: todos.iter().filter(|t| t.completed).count(),
            overdue: todos
                .iter()
                .filter(|t| !t.completed && t.due_date.is_some_and(|due| due < today))
                .count(),
        })
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&Vec<Todo>) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Subscription {
        self.cell.subscribe(observer)
    }

    pub fn cell(&self) -> &SyncedCell<Vec<Todo>> {
        &self.cell
    }
}
