//! Due-date arithmetic for recurring tasks.
//!
//! The calendar math is civil: the start instant is converted to wall-clock
//! components in the rule's timezone, the calendar unit is added there, and
//! the result is converted back to a UTC instant. Adding raw 24-hour spans
//! would drift the local hour across DST transitions, so "weekly" would stop
//! landing on the same local weekday.
//!
//! These functions are pure. "Now" is always an explicit argument; only the
//! command layer defaults it to the system clock.

use chrono::{DateTime, Days, Duration, LocalResult, Months, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::models::{Recurrence, RecurrencePattern};

#[derive(Debug, Error)]
pub enum RecurrenceError {
    #[error("unsupported recurrence pattern '{pattern}'")]
    UnsupportedPattern { pattern: String },

    #[error("recurrence interval must be at least 1")]
    InvalidInterval,

    #[error("unknown timezone '{zone}'")]
    UnknownTimezone { zone: String },

    #[error("next occurrence is out of calendar range")]
    OutOfRange,
}

/// Compute the next occurrence after advancing `base` by one step of `rule`.
///
/// The step is applied to `base` first; if the candidate is not strictly in
/// the future relative to `now`, the step is applied to `now` instead. An
/// overdue task therefore advances from its completion time rather than
/// producing a next date that is itself already stale, while a step from a
/// recent base keeps its calendar anchoring (monthly from Jan 31 clamps to
/// Feb 29, it does not slide to Mar 1).
///
/// `rule.end_date` is not enforced here; the lifecycle layer owns that
/// policy.
pub fn next_due_date(
    base: DateTime<Utc>,
    rule: &Recurrence,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, RecurrenceError> {
    if rule.interval == 0 {
        return Err(RecurrenceError::InvalidInterval);
    }
    let tz = resolve_zone(rule)?;
    let candidate = advance(base, rule, &tz)?;
    if candidate > now {
        Ok(candidate)
    } else {
        advance(now, rule, &tz)
    }
}

/// True iff `due` is strictly before `now`.
pub fn is_overdue(due: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    due < now
}

fn resolve_zone(rule: &Recurrence) -> Result<Tz, RecurrenceError> {
    match &rule.timezone {
        None => Ok(Tz::UTC),
        Some(name) => name
            .parse()
            .map_err(|_| RecurrenceError::UnknownTimezone { zone: name.clone() }),
    }
}

/// One calendar step of `rule` from `start`, computed in `tz` wall-clock
/// time. Always strictly later than `start`.
fn advance(start: DateTime<Utc>, rule: &Recurrence, tz: &Tz) -> Result<DateTime<Utc>, RecurrenceError> {
    let civil = start.with_timezone(tz).naive_local();
    let stepped = match rule.pattern {
        RecurrencePattern::Daily => civil.checked_add_days(Days::new(u64::from(rule.interval))),
        RecurrencePattern::Weekly => {
            civil.checked_add_days(Days::new(7 * u64::from(rule.interval)))
        }
        // A fixed two-week step; the interval field does not apply.
        RecurrencePattern::Biweekly => civil.checked_add_days(Days::new(14)),
        // checked_add_months clamps to the last valid day of the target month
        RecurrencePattern::Monthly => civil.checked_add_months(Months::new(rule.interval)),
        RecurrencePattern::Quarterly => civil.checked_add_months(Months::new(3)),
        RecurrencePattern::Yearly => {
            let months = rule
                .interval
                .checked_mul(12)
                .ok_or(RecurrenceError::OutOfRange)?;
            civil.checked_add_months(Months::new(months))
        }
        RecurrencePattern::Custom => {
            // Reserved: a non-advancing date would recomplete forever.
            return Err(RecurrenceError::UnsupportedPattern {
                pattern: RecurrencePattern::Custom.as_label().to_string(),
            });
        }
    }
    .ok_or(RecurrenceError::OutOfRange)?;
    Ok(from_civil(tz, stepped))
}

/// Map a wall-clock time in `tz` back to a UTC instant.
///
/// A repeated hour (fall-back) resolves to its first occurrence. A skipped
/// hour (spring-forward) slides forward to the first valid wall-clock time
/// after the gap.
fn from_civil(tz: &Tz, civil: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&civil) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(first, _) => first.with_timezone(&Utc),
        LocalResult::None => {
            // Gaps are at most a few hours in any real zone.
            let mut probe = civil;
            for _ in 0..8 {
                probe += Duration::minutes(30);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
            civil.and_utc()
        }
    }
}
