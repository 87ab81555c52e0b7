use crate::assignment::AssignmentId;
use crate::course::CourseId;

pub const PER_PAGE: u32 = 100;
/// Pagination safety net: 100 pages of 100.
pub const MAX_PAGES: usize = 100;

pub const PROFILE_PATH: &str = "/users/self/profile";
pub const COURSES_PATH: &str = "/courses";
pub const ASSIGNMENTS_COURSE_PATH: &str = "/assignments";

pub fn course_path(course_id: CourseId, path: &str) -> String {
    format!("{COURSES_PATH}/{course_id}{path}")
}

pub fn assignment_path(course_id: CourseId, assignment_id: AssignmentId) -> String {
    course_path(
        course_id,
        &format!("{ASSIGNMENTS_COURSE_PATH}/{assignment_id}"),
    )
}
