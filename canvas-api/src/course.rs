use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, serde_as};

/// Courses whose term ended less than this many days ago still count as active.
pub const ACTIVE_GRACE_DAYS: i64 = 14;

/// Workflow states of courses the user can still work in.
pub const ACTIVE_WORKFLOW_STATES: [&str; 3] = ["available", "completed", "active"];

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    course_code: Option<String>,
    #[serde(default)]
    workflow_state: Option<String>,
    #[serde(default)]
    enrollment_term_id: Option<u64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    start_at: Option<DateTime<Utc>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    term: Option<Term>,
}

impl Course {
    pub fn new(id: CourseId, name: String, course_code: String) -> Self {
        Self {
            id,
            name: Some(name),
            course_code: Some(course_code),
            workflow_state: None,
            enrollment_term_id: None,
            start_at: None,
            end_at: None,
            term: None,
        }
    }

    pub fn with_term(mut self, term: Term) -> Self {
        self.term = Some(term);
        self
    }

    pub fn with_workflow_state(mut self, state: String) -> Self {
        self.workflow_state = Some(state);
        self
    }

    pub fn id(&self) -> CourseId {
        self.id
    }

    /// Empty when the LMS sent no name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn course_code(&self) -> &str {
        self.course_code.as_deref().unwrap_or_default()
    }

    pub fn workflow_state(&self) -> Option<&str> {
        self.workflow_state.as_deref()
    }

    pub fn enrollment_term_id(&self) -> Option<u64> {
        self.enrollment_term_id
    }

    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        self.start_at
    }

    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        self.end_at
    }

    pub fn term(&self) -> Option<&Term> {
        self.term.as_ref()
    }

    /// Whether the course belongs on the dashboard. Rules, first applicable wins:
    /// 1. unnamed courses are placeholders and never active
    /// 2. a term end date must fall after `now` minus the grace period
    /// 3. otherwise a workflow state must be one of [`ACTIVE_WORKFLOW_STATES`]
    /// 4. otherwise the course is active
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if self.name().trim().is_empty() {
            return false;
        }

        if let Some(term_end) = self.term.as_ref().and_then(Term::end_at) {
            return term_end > now - TimeDelta::days(ACTIVE_GRACE_DAYS);
        }

        match self.workflow_state.as_deref() {
            Some(state) if !state.is_empty() => ACTIVE_WORKFLOW_STATES.contains(&state),
            _ => true,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Term {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    start_at: Option<DateTime<Utc>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    end_at: Option<DateTime<Utc>>,
}

impl Term {
    pub fn ending(end_at: DateTime<Utc>) -> Self {
        Self {
            end_at: Some(end_at),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        self.start_at
    }

    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        self.end_at
    }
}

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    id: u64,
}

impl CourseId {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn as_u64(self) -> u64 {
        self.id
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.id.fmt(f)
    }
}
