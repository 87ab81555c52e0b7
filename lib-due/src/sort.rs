use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::classify::ClassifiedAssignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    DueDate,
    CourseName,
    Name,
    Type,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Picking the current field again flips the direction; a new field starts ascending.
    pub fn toggle_or_set(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.reversed();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Stable. Undated assignments go last in both directions.
    pub fn sort(&self, assignments: &mut [&ClassifiedAssignment]) {
        assignments.sort_by(|left, right| self.compare(left, right));
    }

    pub fn compare(&self, left: &ClassifiedAssignment, right: &ClassifiedAssignment) -> Ordering {
        let directed = |ordering: Ordering| match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };

        match self.field {
            SortField::DueDate => compare_due(left.due_at(), right.due_at(), directed),
            SortField::CourseName => directed(collate(left.course_name(), right.course_name())),
            SortField::Name => directed(collate(left.name(), right.name())),
            SortField::Type => directed(collate(left.kind().as_str(), right.kind().as_str())),
            SortField::Status => directed(collate(left.status().as_str(), right.status().as_str())),
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortField::DueDate, SortDirection::Ascending)
    }
}

fn compare_due(
    left: Option<DateTime<Utc>>,
    right: Option<DateTime<Utc>>,
    directed: impl Fn(Ordering) -> Ordering,
) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => directed(left.cmp(&right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Dictionary order: letters compare case-insensitively, and on a tie lowercase comes first.
fn collate(left: &str, right: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    folded(left)
        .cmp(&folded(right))
        .then_with(|| right.cmp(left))
}

#[cfg(test)]
mod tests {
    use canvas_api::assignment::{Assignment, AssignmentId};
    use canvas_api::course::{Course, CourseId};
    use chrono::TimeDelta;

    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-03-01T12:00:00Z".parse().unwrap()
    }

    fn classified(id: u64, name: &str, course: &str, due_in_days: Option<i64>) -> ClassifiedAssignment {
        let course = Course::new(CourseId::new(id), course.to_owned(), String::new());
        let assignment = Assignment::new(AssignmentId::new(id), course.id(), name.to_owned())
            .with_due_at(due_in_days.map(|days| now() + TimeDelta::days(days)));
        ClassifiedAssignment::merge(assignment, &course, now())
    }

    fn sorted<'a>(state: SortState, assignments: &'a [ClassifiedAssignment]) -> Vec<&'a str> {
        let mut refs: Vec<_> = assignments.iter().collect();
        state.sort(&mut refs);
        refs.into_iter().map(ClassifiedAssignment::name).collect()
    }

    fn dated_and_undated() -> Vec<ClassifiedAssignment> {
        vec![
            classified(1, "undated A", "X", None),
            classified(2, "in 3 days", "X", Some(3)),
            classified(3, "undated B", "X", None),
            classified(4, "yesterday", "X", Some(-1)),
            classified(5, "also in 3 days", "X", Some(3)),
        ]
    }

    #[test]
    fn due_ascending_puts_undated_last() {
        let state = SortState::default();
        assert_eq!(
            sorted(state, &dated_and_undated()),
            ["yesterday", "in 3 days", "also in 3 days", "undated A", "undated B"]
        );
    }

    #[test]
    fn due_descending_still_puts_undated_last() {
        let state = SortState::new(SortField::DueDate, SortDirection::Descending);
        assert_eq!(
            sorted(state, &dated_and_undated()),
            ["in 3 days", "also in 3 days", "yesterday", "undated A", "undated B"]
        );
    }

    #[test]
    fn names_collate_case_insensitively() {
        let assignments = vec![
            classified(1, "beta", "X", None),
            classified(2, "Alpha", "X", None),
            classified(3, "alpha", "X", None),
            classified(4, "Gamma", "X", None),
        ];
        let state = SortState::new(SortField::Name, SortDirection::Ascending);
        assert_eq!(sorted(state, &assignments), ["alpha", "Alpha", "beta", "Gamma"]);
    }

    #[test]
    fn course_name_descending() {
        let assignments = vec![
            classified(1, "a", "Biology", None),
            classified(2, "b", "art", None),
            classified(3, "c", "Chemistry", None),
        ];
        let state = SortState::new(SortField::CourseName, SortDirection::Descending);
        assert_eq!(sorted(state, &assignments), ["c", "a", "b"]);
    }

    #[test]
    fn status_sorts_by_label() {
        let assignments = dated_and_undated();
        let state = SortState::new(SortField::Status, SortDirection::Ascending);
        // overdue < undated < upcoming, ties stay in input order
        assert_eq!(
            sorted(state, &assignments),
            ["yesterday", "undated A", "undated B", "in 3 days", "also in 3 days"]
        );
    }

    #[test]
    fn reselecting_flips_direction() {
        let mut state = SortState::default();
        state.toggle_or_set(SortField::DueDate);
        assert_eq!(state.direction, SortDirection::Descending);

        state.toggle_or_set(SortField::Type);
        assert_eq!(state, SortState::new(SortField::Type, SortDirection::Ascending));

        state.toggle_or_set(SortField::Type);
        state.toggle_or_set(SortField::Type);
        assert_eq!(state.direction, SortDirection::Ascending);
    }
}
