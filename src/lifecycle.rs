//! State transitions of a task's due-date and recurrence fields.
//!
//! All date arithmetic is delegated to [`crate::recurrence`] and all raw
//! date input passes through [`crate::dates::normalize_due_date`]. The
//! functions here mutate only the task they are handed and never touch
//! storage; the command layer decides what to persist.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::dates::normalize_due_date;
use crate::models::{HouseholdTask, Recurrence};
use crate::recurrence::{next_due_date, RecurrenceError};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
}

/// Input for creating a task. The due date arrives as raw JSON and is
/// normalized; anything unparseable leaves the task without a deadline.
pub struct NewTask {
    pub title: String,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub due_date: Value,
    pub recurrence: Option<Recurrence>,
}

/// Build a new task. `next_due_date` always starts empty: for recurring
/// tasks it is computed on first completion, not at creation.
pub fn create_task(
    id: u64,
    draft: NewTask,
    now: DateTime<Utc>,
) -> Result<HouseholdTask, LifecycleError> {
    if draft.title.trim().is_empty() {
        return Err(LifecycleError::EmptyTitle);
    }
    Ok(HouseholdTask {
        id,
        owner: draft.owner,
        title: draft.title,
        description: draft.description,
        due_date: normalize_due_date(&draft.due_date),
        next_due_date: None,
        completed: false,
        recurrence: draft.recurrence,
        created_at: now,
        updated_at: now,
    })
}

/// What completing a task did to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// One-time task closed out; due fields untouched.
    Done,
    /// Occurrence advanced: the task is open again with a new due date.
    Advanced { due: DateTime<Utc> },
    /// The rule's end date was reached; the task stays completed with no
    /// further deadlines.
    Ended,
}

/// Complete the current occurrence.
///
/// One-time tasks become permanently completed. Recurring tasks advance:
/// the engine computes the next occurrence from the current due date (or
/// from `now` when there is none), the occurrence after that is
/// precomputed into `next_due_date`, and `completed` resets to false. The
/// occurrence completes; the task itself stays open. When the next
/// occurrence would pass the rule's end date the recurrence is exhausted
/// and the task ends with both due fields cleared.
///
/// Engine errors propagate before any field is touched; a task never
/// half-completes on a corrupt rule.
pub fn complete_task(
    task: &mut HouseholdTask,
    now: DateTime<Utc>,
) -> Result<CompletionOutcome, RecurrenceError> {
    let Some(rule) = task.recurrence.clone() else {
        task.completed = true;
        task.updated_at = now;
        return Ok(CompletionOutcome::Done);
    };

    let next = next_due_date(task.due_date.unwrap_or(now), &rule, now)?;
    if past_end(&rule, next) {
        task.completed = true;
        task.due_date = None;
        task.next_due_date = None;
        task.updated_at = now;
        return Ok(CompletionOutcome::Ended);
    }

    let following = next_due_date(next, &rule, now)?;
    task.due_date = Some(next);
    task.next_due_date = (!past_end(&rule, following)).then_some(following);
    task.completed = false;
    task.updated_at = now;
    Ok(CompletionOutcome::Advanced { due: next })
}

fn past_end(rule: &Recurrence, candidate: DateTime<Utc>) -> bool {
    rule.end_date.is_some_and(|end| candidate > end)
}

/// Field edits. `None` leaves a field alone. The recurrence field is
/// double-wrapped so `Some(None)` can clear an existing rule.
#[derive(Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Value>,
    pub recurrence: Option<Option<Recurrence>>,
}

/// Apply edits to a task.
///
/// A changed recurrence (set or cleared) drops `next_due_date`: the stale
/// precomputation belongs to the old rule, and the new one fills it in at
/// the next completion.
pub fn edit_task(
    task: &mut HouseholdTask,
    changes: TaskChanges,
    now: DateTime<Utc>,
) -> Result<(), LifecycleError> {
    if let Some(title) = changes.title {
        if title.trim().is_empty() {
            return Err(LifecycleError::EmptyTitle);
        }
        task.title = title;
    }
    if let Some(owner) = changes.owner {
        task.owner = Some(owner);
    }
    if let Some(description) = changes.description {
        task.description = Some(description);
    }
    if let Some(raw) = changes.due_date {
        task.due_date = normalize_due_date(&raw);
    }
    if let Some(recurrence) = changes.recurrence {
        task.recurrence = recurrence;
        task.next_due_date = None;
    }
    task.updated_at = now;
    Ok(())
}
