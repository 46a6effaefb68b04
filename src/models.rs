use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::is_overdue;

/// Cadence of a recurring task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
    /// Reserved for weekday-set rules; not yet schedulable.
    Custom,
}

impl RecurrencePattern {
    /// Parse from a user-supplied label. Returns `None` for anything
    /// outside the supported set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "biweekly" => Some(Self::Biweekly),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" => Some(Self::Yearly),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A recurrence rule as it crosses the API boundary.
///
/// Field names are camelCase on the wire; `interval` defaults to 1 when
/// absent and `timezone` is an IANA zone name, UTC when absent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub pattern: RecurrencePattern,
    /// Step multiplier for daily/weekly/monthly/yearly.
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Weekday set (0 = Sunday) for the reserved custom pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<Vec<u8>>,
    /// Day-of-month constraint (1-31) for the reserved custom pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_day: Option<u8>,
    /// Past this instant the rule stops producing occurrences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

fn default_interval() -> u32 {
    1
}

impl Recurrence {
    /// Rule with the given pattern and all the defaults.
    pub fn new(pattern: RecurrencePattern) -> Self {
        Self {
            pattern,
            interval: 1,
            weekdays: None,
            month_day: None,
            end_date: None,
            timezone: None,
        }
    }

    /// Short human-readable form for table output, e.g. "weekly (every 2)".
    pub fn describe(&self) -> String {
        let mut s = self.pattern.as_label().to_string();
        if self.interval > 1 {
            s.push_str(&format!(" (every {})", self.interval));
        }
        if let Some(end) = self.end_date {
            s.push_str(&format!(" until {}", end.format("%Y-%m-%d")));
        }
        s
    }
}

/// A shared household task.
///
/// `due_date` is the current occurrence's deadline; `next_due_date` is the
/// precomputed deadline of the following occurrence and is only ever set
/// for recurring tasks. All instants are stored in UTC.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HouseholdTask {
    /// Unique identifier, assigned at creation.
    pub id: u64,
    /// Which partner the task belongs to.
    #[serde(default)]
    pub owner: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `None` means a checklist-style task with no deadline.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    /// `None` means one-time.
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HouseholdTask {
    /// True when the current deadline is strictly in the past. A task
    /// without a deadline is never overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| is_overdue(due, now))
    }
}
