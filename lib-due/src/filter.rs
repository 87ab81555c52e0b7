use std::collections::HashSet;
use std::hash::Hash;

use canvas_api::course::CourseId;

use crate::classify::{AssignmentStatus, AssignmentType, ClassifiedAssignment};

/// What the user has narrowed the board down to. Each dimension with nothing selected lets
/// everything through; otherwise an assignment must match one selection in every dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    courses: HashSet<CourseId>,
    types: HashSet<AssignmentType>,
    statuses: HashSet<AssignmentStatus>,
    search: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(mut self, courses: impl IntoIterator<Item = CourseId>) -> Self {
        self.courses = courses.into_iter().collect();
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = AssignmentType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = AssignmentStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn toggle_course(&mut self, course: CourseId) {
        toggle(&mut self.courses, course);
    }

    pub fn toggle_type(&mut self, kind: AssignmentType) {
        toggle(&mut self.types, kind);
    }

    pub fn toggle_status(&mut self, status: AssignmentStatus) {
        toggle(&mut self.statuses, status);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn courses(&self) -> &HashSet<CourseId> {
        &self.courses
    }

    pub fn types(&self) -> &HashSet<AssignmentType> {
        &self.types
    }

    pub fn statuses(&self) -> &HashSet<AssignmentStatus> {
        &self.statuses
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    fn has_search(&self) -> bool {
        !self.search.trim().is_empty()
    }

    /// Number of selections, counting a search as one, e.g. for a badge on the filter panel.
    pub fn active_filter_count(&self) -> usize {
        self.courses.len() + self.types.len() + self.statuses.len() + usize::from(self.has_search())
    }

    pub fn matches(&self, assignment: &ClassifiedAssignment) -> bool {
        selected(&self.courses, &assignment.course_id())
            && selected(&self.types, &assignment.kind())
            && selected(&self.statuses, &assignment.status())
            && self.matches_search(assignment)
    }

    /// Case-insensitive substring of the assignment name or the course name.
    fn matches_search(&self, assignment: &ClassifiedAssignment) -> bool {
        if !self.has_search() {
            return true;
        }
        let query = self.search.to_lowercase();
        assignment.name().to_lowercase().contains(&query)
            || assignment.course_name().to_lowercase().contains(&query)
    }

    pub fn apply<'a>(
        &'a self,
        assignments: &'a [ClassifiedAssignment],
    ) -> impl Iterator<Item = &'a ClassifiedAssignment> + 'a {
        assignments
            .iter()
            .filter(move |assignment| self.matches(assignment))
    }
}

fn selected<T: Eq + Hash>(selection: &HashSet<T>, value: &T) -> bool {
    selection.is_empty() || selection.contains(value)
}

fn toggle<T: Eq + Hash>(selection: &mut HashSet<T>, value: T) {
    if !selection.remove(&value) {
        selection.insert(value);
    }
}
