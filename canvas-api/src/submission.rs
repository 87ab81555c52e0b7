use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, serde_as};

/// The current user's submission, inlined into an assignment by `include[]=submission`.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    workflow_state: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    submission_type: Option<String>,
    #[serde(default)]
    late: bool,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default)]
    attempt: Option<u32>,
}

impl Submission {
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn workflow_state(&self) -> Option<&str> {
        self.workflow_state.as_deref()
    }

    pub fn is_unsubmitted(&self) -> bool {
        self.workflow_state.as_deref() == Some("unsubmitted")
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn submission_type(&self) -> Option<&str> {
        self.submission_type.as_deref()
    }

    pub fn late(&self) -> bool {
        self.late
    }

    pub fn missing(&self) -> bool {
        self.missing
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    pub fn attempt(&self) -> Option<u32> {
        self.attempt
    }
}
