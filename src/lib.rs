//! # Couplet
//!
//! A terminal task manager for two people sharing a household. Couplet keeps
//! a single shared list of chores with due dates, and its core is the
//! recurring-due-date engine: completing a recurring task rolls it forward to
//! the next occurrence instead of closing it.
//!
//! ## Features
//!
//! *   **Recurring tasks**: daily, weekly, biweekly, monthly, quarterly and
//!     yearly cadences with an optional step multiplier and end date.
//! *   **Timezone-correct scheduling**: calendar steps are applied in the
//!     rule's IANA timezone, so a weekly chore stays on the same local
//!     weekday across DST changes.
//! *   **Overdue catch-up**: completing a long-overdue recurring task
//!     advances it from today, not from the stale deadline.
//! *   **Data persistence**: tasks are stored in standard XDG data
//!     directories (JSON format).
//!
//! ## Usage
//!
//! ```bash
//! # One-time chore with a deadline
//! couplet add "Renew car insurance" --owner alex --due 2025-11-30
//!
//! # Recurring chore, every two weeks, anchored to Berlin wall-clock time
//! couplet add "Water the plants" --recur weekly --every 2 --tz Europe/Berlin
//!
//! # List open tasks / complete one
//! couplet list
//! couplet complete 3
//! ```
//!
//! ## Data storage
//!
//! Tasks are saved in your local data directory:
//! *   Linux: `~/.local/share/couplet/tasks.json`
//! *   macOS: `~/Library/Application Support/couplet/tasks.json`
//! *   Windows: `%APPDATA%\couplet\tasks.json`
//!
//! You can override this by setting the `COUPLET_DB` environment variable.
//!
//! ## Recurrence
//!
//! Completing a recurring task computes the next occurrence from its due
//! date (or from the completion time when the task was overdue), stores the
//! occurrence after that as a preview, and reopens the task. When a rule has
//! an end date, the cycle stops once the next occurrence would pass it and
//! the task stays completed.

pub mod commands;
pub mod dates;
pub mod lifecycle;
pub mod models;
pub mod recurrence;
pub mod storage;
