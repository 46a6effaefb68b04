use std::io::{self, Write};

use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::Value;

use crate::dates::parse_date_str;
use crate::lifecycle::{
    complete_task, create_task, edit_task, CompletionOutcome, NewTask, TaskChanges,
};
use crate::models::{Recurrence, RecurrencePattern};
use crate::storage::{delete_database, load_tasks, save_tasks};

/// Assemble a recurrence rule from the CLI flags.
///
/// Reports the problem on stderr and returns `None` when the pattern is
/// unknown, the interval is zero, or the end date does not parse. Unlike a
/// due date, a broken rule aborts the command: silently dropping it would
/// change what the user asked to schedule.
fn build_recurrence(
    recur: &str,
    every: Option<u32>,
    until: Option<&str>,
    tz: Option<String>,
    silent: bool,
) -> Option<Recurrence> {
    let Some(pattern) = RecurrencePattern::parse(recur) else {
        if !silent {
            eprintln!(
                "Unknown recurrence pattern '{}'. Supported: daily, weekly, biweekly, monthly, quarterly, yearly.",
                recur
            );
        }
        return None;
    };
    if every == Some(0) {
        if !silent {
            eprintln!("Recurrence interval must be at least 1.");
        }
        return None;
    }
    let end_date = match until {
        Some(u) => match parse_date_str(u) {
            Some(d) => Some(d),
            None => {
                if !silent {
                    eprintln!("Invalid end date '{}'. Use YYYY-MM-DD.", u);
                }
                return None;
            }
        },
        None => None,
    };
    Some(Recurrence {
        pattern,
        interval: every.unwrap_or(1),
        weekdays: None,
        month_day: None,
        end_date,
        timezone: tz,
    })
}

/// Adds a new task to the database.
///
/// A due date that fails to parse leaves the task without a deadline
/// rather than aborting; a broken recurrence rule aborts.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    title: String,
    owner: Option<String>,
    note: Option<String>,
    due: Option<String>,
    recur: Option<String>,
    every: Option<u32>,
    until: Option<String>,
    tz: Option<String>,
    silent: bool,
) {
    let recurrence = match &recur {
        Some(r) => match build_recurrence(r, every, until.as_deref(), tz, silent) {
            Some(rule) => Some(rule),
            None => return,
        },
        None => None,
    };

    let mut tasks = load_tasks();
    let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
    let due_value = due.clone().map(Value::String).unwrap_or(Value::Null);
    let task = match create_task(
        next_id,
        NewTask {
            title,
            owner,
            description: note,
            due_date: due_value,
            recurrence,
        },
        Utc::now(),
    ) {
        Ok(t) => t,
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
            return;
        }
    };
    if due.is_some() && task.due_date.is_none() && !silent {
        eprintln!(
            "Unrecognized due date '{}'; leaving the task without a deadline.",
            due.unwrap_or_default()
        );
    }

    tasks.push(task);
    if let Err(e) = save_tasks(&tasks) {
        if !silent {
            eprintln!("Failed to save tasks: {}", e);
        }
    } else if !silent {
        println!("Task added (id = {})", next_id);
    }
}

/// Marks the current occurrence of a task as complete.
///
/// Recurring tasks reopen with the next due date; a rule whose end date
/// has been reached leaves the task permanently completed. Nothing is
/// persisted when the rule cannot be advanced.
pub fn cmd_complete(id: u64, silent: bool) {
    let mut tasks = load_tasks();
    let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
        if !silent {
            eprintln!("Task {} not found.", id);
        }
        return;
    };

    match complete_task(task, Utc::now()) {
        Ok(CompletionOutcome::Done) => {
            if !silent {
                println!("Task {} marked as complete.", id);
            }
        }
        Ok(CompletionOutcome::Advanced { due }) => {
            if !silent {
                println!(
                    "Task {} complete. Next occurrence due {}.",
                    id,
                    due.format("%Y-%m-%d")
                );
            }
        }
        Ok(CompletionOutcome::Ended) => {
            if !silent {
                println!("Task {} complete. Its recurrence has ended.", id);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("Cannot complete task {}: {}", id, e);
            }
            return;
        }
    }

    if let Err(e) = save_tasks(&tasks) {
        if !silent {
            eprintln!("Failed to save tasks: {}", e);
        }
    }
}

/// Removes a task from the database by ID.
pub fn cmd_remove(id: u64, silent: bool) {
    let mut tasks = load_tasks();
    let len_before = tasks.len();
    tasks.retain(|t| t.id != id);
    if tasks.len() == len_before {
        if !silent {
            eprintln!("Task {} not found.", id);
        }
    } else if let Err(e) = save_tasks(&tasks) {
        if !silent {
            eprintln!("Failed to save tasks: {}", e);
        }
    } else if !silent {
        println!("Task {} removed.", id);
    }
}

/// Edits an existing task's details.
///
/// `--no-recur` clears the recurrence rule; setting a new rule replaces
/// it. Either way the precomputed next occurrence is dropped until the
/// task is next completed.
#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    id: u64,
    title: Option<String>,
    owner: Option<String>,
    note: Option<String>,
    due: Option<String>,
    recur: Option<String>,
    no_recur: bool,
    every: Option<u32>,
    until: Option<String>,
    tz: Option<String>,
    silent: bool,
) {
    let recurrence = if no_recur {
        Some(None)
    } else {
        match &recur {
            Some(r) => match build_recurrence(r, every, until.as_deref(), tz, silent) {
                Some(rule) => Some(Some(rule)),
                None => return,
            },
            None => None,
        }
    };

    let mut tasks = load_tasks();
    let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
        if !silent {
            eprintln!("Task {} not found.", id);
        }
        return;
    };

    let changes = TaskChanges {
        title,
        owner,
        description: note,
        due_date: due.map(Value::String),
        recurrence,
    };
    if let Err(e) = edit_task(task, changes, Utc::now()) {
        if !silent {
            eprintln!("{}", e);
        }
        return;
    }

    if let Err(e) = save_tasks(&tasks) {
        if !silent {
            eprintln!("Failed to save tasks: {}", e);
        }
    } else if !silent {
        println!("Task {} updated.", id);
    }
}

fn format_due(due: Option<DateTime<Utc>>) -> String {
    match due {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".into(),
    }
}

/// Lists tasks in a formatted table.
///
/// Open tasks come first, ordered by due date with no-deadline tasks
/// last. Completed tasks are hidden unless `all` is true.
pub fn cmd_list(all: bool) {
    let mut tasks = load_tasks();
    if !all {
        tasks.retain(|t| !t.completed);
    }
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    tasks.sort_by_key(|t| (t.completed, t.due_date.is_none(), t.due_date));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Owner").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Next").add_attribute(Attribute::Bold),
            Cell::new("Repeats").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    let now = Utc::now();
    for t in tasks {
        let overdue = t.is_overdue(now);
        let (status, status_color) = if t.completed {
            ("Done", Color::Green)
        } else if overdue {
            ("Overdue", Color::Red)
        } else {
            ("Pending", Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(t.owner.unwrap_or_default()),
            Cell::new(format_due(t.due_date)).fg(if overdue && !t.completed {
                Color::Red
            } else {
                Color::Reset
            }),
            Cell::new(format_due(t.next_due_date)),
            Cell::new(t.recurrence.as_ref().map(Recurrence::describe).unwrap_or_else(|| "-".into())),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Resets the database by deleting all tasks.
pub fn cmd_reset(force: bool) {
    if !force {
        print!("Are you sure you want to delete all tasks? This cannot be undone. [y/N] ");
        io::stdout().flush().unwrap();
        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
