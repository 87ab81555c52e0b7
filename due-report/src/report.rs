use core::fmt;
use std::io;

use anyhow::Result;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use lib_due::aggregate::OverdueAndUpcoming;
use lib_due::classify::{AssignmentStatus, AssignmentType, ClassifiedAssignment};
use lib_due::due::{describe_due, format_due};
use serde::Serialize;

/// One line of the CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow<'a> {
    course: &'a str,
    assignment: &'a str,
    #[serde(rename = "type")]
    kind: AssignmentType,
    status: AssignmentStatus,
    due: String,
    url: &'a str,
}

impl<'a> ReportRow<'a> {
    pub fn new(assignment: &'a ClassifiedAssignment) -> Self {
        Self {
            course: course_label(assignment),
            assignment: assignment.name(),
            kind: assignment.kind(),
            status: assignment.status(),
            due: format_due(assignment.due_at()),
            url: assignment.assignment().html_url(),
        }
    }
}

fn course_label(assignment: &ClassifiedAssignment) -> &str {
    match assignment.course_code() {
        "" => assignment.course_name(),
        code => code,
    }
}

pub fn write_csv<'a>(
    assignments: impl IntoIterator<Item = &'a ClassifiedAssignment>,
    writer: impl io::Write,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for assignment in assignments {
        writer.serialize(ReportRow::new(assignment))?;
    }
    writer.flush()?;
    Ok(())
}

/// Plain-text table with due dates worded relative to `now`.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    assignments: &'a [&'a ClassifiedAssignment],
    now: DateTime<Utc>,
}

impl<'a> Table<'a> {
    pub fn new(assignments: &'a [&'a ClassifiedAssignment], now: DateTime<Utc>) -> Self {
        Self { assignments, now }
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.assignments.is_empty() {
            return writeln!(f, "Nothing to show.");
        }

        let rows = self
            .assignments
            .iter()
            .map(|assignment| {
                [
                    course_label(assignment).to_owned(),
                    assignment.name().to_owned(),
                    assignment.kind().to_string(),
                    describe_due(assignment.due_at(), self.now),
                ]
            })
            .collect_vec();
        let header = ["Course", "Assignment", "Type", "Due"].map(str::to_owned);

        let mut widths = header.clone().map(|cell| cell.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        for row in std::iter::once(&header).chain(&rows) {
            let line = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .join("  ");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub overdue: usize,
    pub upcoming: usize,
}

impl From<&OverdueAndUpcoming<'_>> for Summary {
    fn from(split: &OverdueAndUpcoming<'_>) -> Self {
        Self {
            overdue: split.overdue.len(),
            upcoming: split.upcoming.len(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let assignments = |n: usize| if n == 1 { "assignment" } else { "assignments" };
        write!(
            f,
            "{} overdue {}, {} upcoming {}",
            self.overdue,
            assignments(self.overdue),
            self.upcoming,
            assignments(self.upcoming),
        )
    }
}
