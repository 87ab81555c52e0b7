use canvas_api::client::Session;
use canvas_api::course::{Course, CourseId};
use canvas_api::error::ApiError;
use canvas_api::services::lms_service::LmsService;
use chrono::{DateTime, Utc};
use futures::future;
use itertools::{Either, Itertools};
use thiserror::Error;
use tracing::{info, warn};

use crate::classify::{AssignmentStatus, ClassifiedAssignment};

/// Everything the dashboard shows after one refresh.
#[derive(Debug, Default)]
pub struct Aggregate {
    courses: Vec<Course>,
    assignments: Vec<ClassifiedAssignment>,
    failures: Vec<CourseFetchFailure>,
}

impl Aggregate {
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Flattened in course order, then in the order of [`canvas_api::assignment::merge_buckets`].
    pub fn assignments(&self) -> &[ClassifiedAssignment] {
        &self.assignments
    }

    pub fn failures(&self) -> &[CourseFetchFailure] {
        &self.failures
    }

    pub fn partial_error(&self) -> Option<PartialFetchError> {
        (!self.failures.is_empty()).then(|| PartialFetchError {
            failed: self.failures.iter().map(|failure| failure.course_id).collect(),
        })
    }

    pub fn into_parts(self) -> (Vec<Course>, Vec<ClassifiedAssignment>, Vec<CourseFetchFailure>) {
        (self.courses, self.assignments, self.failures)
    }
}

/// The outcome of fetching one course's assignments.
#[derive(Debug)]
pub enum CourseFetch {
    Fetched(Vec<ClassifiedAssignment>),
    Failed(CourseFetchFailure),
}

#[derive(Debug)]
pub struct CourseFetchFailure {
    course_id: CourseId,
    course_name: String,
    error: ApiError,
}

impl CourseFetchFailure {
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    pub fn error(&self) -> &ApiError {
        &self.error
    }
}

/// Some courses' assignments could not be fetched; the rest were.
#[derive(Debug, Clone, Error)]
#[error("could not fetch assignments for {} course(s): {}", .failed.len(), .failed.iter().join(", "))]
pub struct PartialFetchError {
    failed: Vec<CourseId>,
}

impl PartialFetchError {
    pub fn failed(&self) -> &[CourseId] {
        &self.failed
    }
}

/// Fetches the active courses, then every course's incomplete assignments at once. A course whose
/// assignments can't be fetched contributes nothing; only a failure to list the courses is
/// returned as an error.
#[tracing::instrument(skip(canvas), err)]
pub async fn all_incomplete(
    canvas: &Session<impl LmsService>,
    now: DateTime<Utc>,
) -> Result<Aggregate, ApiError> {
    let courses = canvas.get_active_courses_at(now).await?;

    let fetches = future::join_all(
        courses
            .iter()
            .map(|course| fetch_course(canvas, course, now)),
    )
    .await;

    let (per_course, failures): (Vec<_>, Vec<_>) =
        fetches.into_iter().partition_map(|fetch| match fetch {
            CourseFetch::Fetched(assignments) => Either::Left(assignments),
            CourseFetch::Failed(failure) => Either::Right(failure),
        });
    let assignments = per_course.into_iter().flatten().collect_vec();

    info!(
        courses = courses.len(),
        assignments = assignments.len(),
        failed = failures.len(),
        "aggregated incomplete assignments"
    );

    let aggregate = Aggregate {
        courses,
        assignments,
        failures,
    };
    if let Some(err) = aggregate.partial_error() {
        warn!(%err, "partial fetch");
    }
    Ok(aggregate)
}

async fn fetch_course(
    canvas: &Session<impl LmsService>,
    course: &Course,
    now: DateTime<Utc>,
) -> CourseFetch {
    match canvas.get_incomplete_assignments(course.id()).await {
        Ok(assignments) => CourseFetch::Fetched(
            assignments
                .into_iter()
                .map(|assignment| ClassifiedAssignment::merge(assignment, course, now))
                .collect(),
        ),
        Err(error) => {
            warn!(course_id = %course.id(), course = course.name(), %error, "could not fetch assignments for course");
            CourseFetch::Failed(CourseFetchFailure {
                course_id: course.id(),
                course_name: course.name().to_owned(),
                error,
            })
        }
    }
}

#[derive(Debug, Default)]
pub struct OverdueAndUpcoming<'a> {
    pub overdue: Vec<&'a ClassifiedAssignment>,
    pub upcoming: Vec<&'a ClassifiedAssignment>,
}

/// Splits by status, keeping relative order. Undated assignments are in neither half.
pub fn overdue_and_upcoming(assignments: &[ClassifiedAssignment]) -> OverdueAndUpcoming<'_> {
    let (overdue, upcoming) = assignments
        .iter()
        .filter_map(|assignment| match assignment.status() {
            AssignmentStatus::Overdue => Some(Either::Left(assignment)),
            AssignmentStatus::Upcoming => Some(Either::Right(assignment)),
            AssignmentStatus::Undated => None,
        })
        .partition_map(|either| either);
    OverdueAndUpcoming { overdue, upcoming }
}
