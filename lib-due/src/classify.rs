use core::fmt;

use canvas_api::assignment::{
    Assignment, AssignmentId, DISCUSSION_SUBMISSION_TYPE, EXTERNAL_TOOL_SUBMISSION_TYPE,
};
use canvas_api::course::{Course, CourseId};
use canvas_api::submission::Submission;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize)]
pub enum AssignmentType {
    Assignment,
    Quiz,
    Discussion,
    ExternalTool,
}

impl AssignmentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assignment => "Assignment",
            Self::Quiz => "Quiz",
            Self::Discussion => "Discussion",
            Self::ExternalTool => "ExternalTool",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Overdue,
    Upcoming,
    Undated,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Upcoming => "upcoming",
            Self::Undated => "undated",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// First match wins: a quiz id, then a discussion, then an external tool.
pub fn classify_type(assignment: &Assignment) -> AssignmentType {
    if assignment.quiz_id().is_some() {
        AssignmentType::Quiz
    } else if assignment.has_submission_type(DISCUSSION_SUBMISSION_TYPE) {
        AssignmentType::Discussion
    } else if assignment.has_submission_type(EXTERNAL_TOOL_SUBMISSION_TYPE) {
        AssignmentType::ExternalTool
    } else {
        AssignmentType::Assignment
    }
}

/// Anything past due is overdue, whatever its submission says. Missing, unsubmitted and late
/// submissions are only traced.
pub fn classify_status(assignment: &Assignment, now: DateTime<Utc>) -> AssignmentStatus {
    let Some(due_at) = assignment.due_at() else {
        return AssignmentStatus::Undated;
    };

    if due_at < now {
        let submission = assignment.submission();
        trace!(
            id = %assignment.id(),
            missing = submission.is_some_and(Submission::missing),
            unsubmitted = submission.is_some_and(Submission::is_unsubmitted),
            late = submission.is_some_and(Submission::late),
            "past due"
        );
        AssignmentStatus::Overdue
    } else {
        AssignmentStatus::Upcoming
    }
}

/// An assignment as the dashboard shows it. The source assignment is kept untouched; the rest is
/// derived from it and its course on every refresh.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedAssignment {
    #[serde(flatten)]
    assignment: Assignment,
    course_name: String,
    course_code: String,
    #[serde(rename = "type")]
    kind: AssignmentType,
    status: AssignmentStatus,
}

impl ClassifiedAssignment {
    pub fn merge(assignment: Assignment, course: &Course, now: DateTime<Utc>) -> Self {
        let kind = classify_type(&assignment);
        let status = classify_status(&assignment, now);
        Self {
            assignment,
            course_name: course.name().to_owned(),
            course_code: course.course_code().to_owned(),
            kind,
            status,
        }
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn id(&self) -> AssignmentId {
        self.assignment.id()
    }

    pub fn name(&self) -> &str {
        self.assignment.name()
    }

    pub fn course_id(&self) -> CourseId {
        self.assignment.course_id()
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.assignment.due_at()
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    pub fn kind(&self) -> AssignmentType {
        self.kind
    }

    pub fn status(&self) -> AssignmentStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-03-01T12:00:00Z".parse().unwrap()
    }

    fn assignment() -> Assignment {
        Assignment::new(AssignmentId::new(1), CourseId::new(7), "Problem Set".to_owned())
    }

    fn submission(value: serde_json::Value) -> Submission {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn type_priority() {
        let quiz_discussion = assignment()
            .with_quiz_id(3)
            .with_submission_types([DISCUSSION_SUBMISSION_TYPE]);
        assert_eq!(classify_type(&quiz_discussion), AssignmentType::Quiz);

        let discussion_tool = assignment()
            .with_submission_types([EXTERNAL_TOOL_SUBMISSION_TYPE, DISCUSSION_SUBMISSION_TYPE]);
        assert_eq!(classify_type(&discussion_tool), AssignmentType::Discussion);

        let tool = assignment().with_submission_types(["online_upload", EXTERNAL_TOOL_SUBMISSION_TYPE]);
        assert_eq!(classify_type(&tool), AssignmentType::ExternalTool);

        let upload = assignment().with_submission_types(["online_upload"]);
        assert_eq!(classify_type(&upload), AssignmentType::Assignment);
        assert_eq!(classify_type(&assignment()), AssignmentType::Assignment);
    }

    #[test]
    fn undated_without_due_date() {
        assert_eq!(classify_status(&assignment(), now()), AssignmentStatus::Undated);
    }

    #[test]
    fn future_and_now_are_upcoming() {
        let tomorrow = assignment().with_due_at(Some(now() + TimeDelta::days(1)));
        assert_eq!(classify_status(&tomorrow, now()), AssignmentStatus::Upcoming);

        let right_now = assignment().with_due_at(Some(now()));
        assert_eq!(classify_status(&right_now, now()), AssignmentStatus::Upcoming);
    }

    #[test]
    fn past_due_is_overdue_whatever_the_submission() {
        let yesterday = Some(now() - TimeDelta::days(1));
        let submissions = [
            None,
            Some(submission(json!({ "workflow_state": "unsubmitted", "missing": true }))),
            Some(submission(json!({ "workflow_state": "unsubmitted", "missing": false }))),
            Some(submission(json!({ "workflow_state": "submitted", "late": true }))),
            Some(submission(json!({ "workflow_state": "graded", "score": 9.5 }))),
        ];

        for submission in submissions {
            let mut past_due = assignment().with_due_at(yesterday);
            if let Some(submission) = submission.clone() {
                past_due = past_due.with_submission(submission);
            }
            assert_eq!(
                classify_status(&past_due, now()),
                AssignmentStatus::Overdue,
                "{submission:?}"
            );
        }
    }

    #[test]
    fn merge_copies_course_metadata() {
        let course = Course::new(CourseId::new(7), "Discrete Math".to_owned(), "EECS 203".to_owned());
        let source = assignment()
            .with_quiz_id(4)
            .with_due_at(Some(now() - TimeDelta::hours(2)));

        let classified = ClassifiedAssignment::merge(source, &course, now());
        assert_eq!(classified.course_name(), "Discrete Math");
        assert_eq!(classified.course_code(), "EECS 203");
        assert_eq!(classified.kind(), AssignmentType::Quiz);
        assert_eq!(classified.status(), AssignmentStatus::Overdue);
        assert_eq!(classified.assignment().name(), "Problem Set");
    }

    #[test]
    fn serializes_with_flattened_assignment() {
        let course = Course::new(CourseId::new(7), "Discrete Math".to_owned(), "EECS 203".to_owned());
        let classified = ClassifiedAssignment::merge(assignment(), &course, now());
        let value = serde_json::to_value(&classified).unwrap();
        assert_eq!(value["name"], "Problem Set");
        assert_eq!(value["course_name"], "Discrete Math");
        assert_eq!(value["type"], "Assignment");
        assert_eq!(value["status"], "undated");
    }
}
