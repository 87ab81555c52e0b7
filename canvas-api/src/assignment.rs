use std::fmt;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, DefaultOnNull, DisplayFromStr, PickFirst, serde_as};

use crate::course::CourseId;
use crate::submission::Submission;

pub const DISCUSSION_SUBMISSION_TYPE: &str = "discussion_topic";
pub const EXTERNAL_TOOL_SUBMISSION_TYPE: &str = "external_tool";

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    id: AssignmentId,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    points_possible: Option<f64>,
    course_id: CourseId,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    html_url: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    submission_types: Vec<String>,
    #[serde(default)]
    has_submitted_submissions: bool,
    #[serde(default)]
    published: bool,
    #[serde(default)]
    submission: Option<Submission>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    quiz_id: Option<u64>,
    #[serde(default)]
    locked_for_user: bool,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    lock_at: Option<DateTime<Utc>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    unlock_at: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn new(id: AssignmentId, course_id: CourseId, name: String) -> Self {
        Self {
            id,
            name,
            description: None,
            due_at: None,
            points_possible: None,
            course_id,
            html_url: String::new(),
            submission_types: Vec::new(),
            has_submitted_submissions: false,
            published: true,
            submission: None,
            quiz_id: None,
            locked_for_user: false,
            lock_at: None,
            unlock_at: None,
        }
    }

    pub fn with_due_at(mut self, due_at: Option<DateTime<Utc>>) -> Self {
        self.due_at = due_at;
        self
    }

    pub fn with_submission_types<S: Into<String>>(
        mut self,
        types: impl IntoIterator<Item = S>,
    ) -> Self {
        self.submission_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_quiz_id(mut self, quiz_id: u64) -> Self {
        self.quiz_id = Some(quiz_id);
        self
    }

    pub fn with_submission(mut self, submission: Submission) -> Self {
        self.submission = Some(submission);
        self
    }

    pub fn id(&self) -> AssignmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }

    pub fn points_possible(&self) -> Option<f64> {
        self.points_possible
    }

    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    pub fn html_url(&self) -> &str {
        &self.html_url
    }

    pub fn submission_types(&self) -> &[String] {
        &self.submission_types
    }

    pub fn has_submission_type(&self, submission_type: &str) -> bool {
        self.submission_types.iter().any(|t| t == submission_type)
    }

    pub fn has_submitted_submissions(&self) -> bool {
        self.has_submitted_submissions
    }

    pub fn published(&self) -> bool {
        self.published
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn quiz_id(&self) -> Option<u64> {
        self.quiz_id
    }

    pub fn locked_for_user(&self) -> bool {
        self.locked_for_user
    }

    pub fn lock_at(&self) -> Option<DateTime<Utc>> {
        self.lock_at
    }

    pub fn unlock_at(&self) -> Option<DateTime<Utc>> {
        self.unlock_at
    }
}

/// Server-side assignment categories for the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Unsubmitted,
    Upcoming,
    Overdue,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unsubmitted => "unsubmitted",
            Self::Upcoming => "upcoming",
            Self::Overdue => "overdue",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// Combines the unsubmitted and upcoming buckets of one course: each id appears once, the
/// unsubmitted copy wins, and unsubmitted assignments come first, both in received order.
pub fn merge_buckets(unsubmitted: Vec<Assignment>, upcoming: Vec<Assignment>) -> Vec<Assignment> {
    unsubmitted
        .into_iter()
        .chain(upcoming)
        .unique_by(Assignment::id)
        .collect()
}

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    id: u64,
}

impl AssignmentId {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn as_u64(self) -> u64 {
        self.id
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.id.fmt(f)
    }
}
