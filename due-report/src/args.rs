use anyhow::{Context, Result};
use canvas_api::course::Course;
use canvas_api::course_selector::CourseSelector;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lib_due::classify::{AssignmentStatus, AssignmentType};
use lib_due::filter::FilterCriteria;
use lib_due::sort::{SortDirection, SortField, SortState};

/// Incomplete Canvas assignments across all active courses.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show overdue and upcoming assignments.
    List(ListArgs),
    /// Check a Canvas access token and remember it.
    Login {
        #[arg(long, env = "CANVAS_TOKEN", hide_env_values = true)]
        token: String,
        /// Canvas API root, e.g. `https://umich.instructure.com/api/v1`
        #[arg(long, env = "CANVAS_BASE_URL")]
        base_url: Option<String>,
    },
    /// Forget the stored token.
    Logout,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only these courses, by id, course code, or name
    #[arg(long = "course", value_name = "COURSE")]
    pub courses: Vec<String>,

    #[arg(long = "type", value_enum, value_name = "TYPE")]
    pub types: Vec<TypeArg>,

    #[arg(long = "status", value_enum, value_name = "STATUS")]
    pub statuses: Vec<StatusArg>,

    /// Case-insensitive match on the assignment or course name
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_enum, default_value_t = SortArg::Due)]
    pub sort: SortArg,

    #[arg(long)]
    pub desc: bool,

    /// Write CSV to stdout instead of a table
    #[arg(long)]
    pub csv: bool,
}

impl ListArgs {
    /// Course selectors are resolved against the fetched courses, so this runs after a refresh.
    pub fn criteria(&self, courses: &[Course]) -> Result<FilterCriteria> {
        let course_ids = self
            .courses
            .iter()
            .map(|selector| {
                CourseSelector::new(selector.clone())
                    .select_from(courses)
                    .map(Course::id)
                    .with_context(|| format!("no active course matches {selector:?}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut criteria = FilterCriteria::new()
            .with_courses(course_ids)
            .with_types(self.types.iter().copied().map(AssignmentType::from))
            .with_statuses(self.statuses.iter().copied().map(AssignmentStatus::from));
        if let Some(search) = &self.search {
            criteria.set_search(search.clone());
        }
        Ok(criteria)
    }

    pub fn sort_state(&self) -> SortState {
        let direction = if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        SortState::new(self.sort.into(), direction)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    Assignment,
    Quiz,
    Discussion,
    ExternalTool,
}

impl From<TypeArg> for AssignmentType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Assignment => Self::Assignment,
            TypeArg::Quiz => Self::Quiz,
            TypeArg::Discussion => Self::Discussion,
            TypeArg::ExternalTool => Self::ExternalTool,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Overdue,
    Upcoming,
    Undated,
}

impl From<StatusArg> for AssignmentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Overdue => Self::Overdue,
            StatusArg::Upcoming => Self::Upcoming,
            StatusArg::Undated => Self::Undated,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Due,
    Course,
    Name,
    Type,
    Status,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Due => Self::DueDate,
            SortArg::Course => Self::CourseName,
            SortArg::Name => Self::Name,
            SortArg::Type => Self::Type,
            SortArg::Status => Self::Status,
        }
    }
}
