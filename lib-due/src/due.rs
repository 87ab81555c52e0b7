//! Human wording for due dates, e.g. `Due in 3 days` or `Overdue: Due about 2 hours ago`.

use chrono::{DateTime, TimeDelta, Utc};

pub const NO_DUE_DATE: &str = "No due date";

/// Like `Mar 4, 2024 4:59 AM`.
pub fn format_due(due_at: Option<DateTime<Utc>>) -> String {
    match due_at {
        Some(due_at) => due_at.format("%b %-d, %Y %-I:%M %p").to_string(),
        None => NO_DUE_DATE.to_owned(),
    }
}

pub fn describe_due(due_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match due_at {
        None => NO_DUE_DATE.to_owned(),
        Some(due_at) if due_at < now => format!("Overdue: Due {}", relative(due_at, now)),
        Some(due_at) => format!("Due {}", relative(due_at, now)),
    }
}

/// `in 3 days` or `3 days ago`.
pub fn relative(when: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = when - now;
    let distance = distance(delta.abs());
    if delta < TimeDelta::zero() {
        format!("{distance} ago")
    } else {
        format!("in {distance}")
    }
}

/// Months are 30 days. A year past the first is "about", "over" or "almost" depending on how
/// many months it runs into the next.
fn distance(delta: TimeDelta) -> String {
    const MINUTES_PER_HOUR: i64 = 60;
    const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;
    const MINUTES_PER_MONTH: i64 = 30 * MINUTES_PER_DAY;

    let minutes = (delta.num_seconds() + 30) / 60;
    let rounded = |unit: i64| (minutes + unit / 2) / unit;

    match minutes {
        0 => "less than a minute".to_owned(),
        m if m < 45 => plural(m, "minute"),
        m if m < 90 => "about 1 hour".to_owned(),
        m if m < MINUTES_PER_DAY => format!("about {} hours", rounded(MINUTES_PER_HOUR)),
        m if m < 42 * MINUTES_PER_HOUR => "1 day".to_owned(),
        m if m < MINUTES_PER_MONTH => plural(rounded(MINUTES_PER_DAY), "day"),
        m if m < 2 * MINUTES_PER_MONTH => {
            format!("about {}", plural(rounded(MINUTES_PER_MONTH), "month"))
        }
        m if m / MINUTES_PER_MONTH < 12 => plural(rounded(MINUTES_PER_MONTH), "month"),
        m => {
            let months = m / MINUTES_PER_MONTH;
            let (years, extra_months) = (months / 12, months % 12);
            match extra_months {
                0..=2 => format!("about {}", plural(years, "year")),
                3..=8 => format!("over {}", plural(years, "year")),
                _ => format!("almost {}", plural(years + 1, "year")),
            }
        }
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
