use canvas_api::client::Session;
use canvas_api::course::Course;
use canvas_api::error::ApiError;
use canvas_api::services::lms_service::LmsService;
use chrono::{DateTime, Utc};

use crate::aggregate::{self, Aggregate, CourseFetchFailure, OverdueAndUpcoming};
use crate::classify::ClassifiedAssignment;
use crate::filter::FilterCriteria;
use crate::sort::{SortField, SortState};

/// The dashboard: the latest fetched data plus how the user is looking at it.
///
/// A refresh replaces the data wholesale and keeps the filter and sort. Nothing orders two
/// overlapping refreshes; whichever finishes last wins.
#[derive(Debug, Default)]
pub struct Board {
    courses: Vec<Course>,
    assignments: Vec<ClassifiedAssignment>,
    failures: Vec<CourseFetchFailure>,
    refreshed_at: Option<DateTime<Utc>>,
    criteria: FilterCriteria,
    sort: SortState,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh(&mut self, canvas: &Session<impl LmsService>) -> Result<(), ApiError> {
        self.refresh_at(canvas, Utc::now()).await
    }

    /// On error the previous data stays in place.
    pub async fn refresh_at(
        &mut self,
        canvas: &Session<impl LmsService>,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let aggregate = aggregate::all_incomplete(canvas, now).await?;
        self.replace(aggregate, now);
        Ok(())
    }

    fn replace(&mut self, aggregate: Aggregate, refreshed_at: DateTime<Utc>) {
        let (courses, assignments, failures) = aggregate.into_parts();
        self.courses = courses;
        self.assignments = assignments;
        self.failures = failures;
        self.refreshed_at = Some(refreshed_at);
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn assignments(&self) -> &[ClassifiedAssignment] {
        &self.assignments
    }

    pub fn failures(&self) -> &[CourseFetchFailure] {
        &self.failures
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.sort.toggle_or_set(field);
    }

    /// Filtered, then sorted.
    pub fn visible(&self) -> Vec<&ClassifiedAssignment> {
        let mut visible: Vec<_> = self.criteria.apply(&self.assignments).collect();
        self.sort.sort(&mut visible);
        visible
    }

    pub fn overdue_and_upcoming(&self) -> OverdueAndUpcoming<'_> {
        aggregate::overdue_and_upcoming(&self.assignments)
    }
}
