use crate::course::Course;

/// Picks a course from user input, trying the id, then the course code, then the name.
#[derive(Debug, Clone)]
pub struct CourseSelector {
    selector: String,
}

impl CourseSelector {
    pub fn new(selector: String) -> Self {
        Self { selector }
    }

    pub fn select_from<'a>(&self, courses: &'a [Course]) -> Option<&'a Course> {
        self.select_as_id(courses)
            .or_else(|| self.select_as_course_code(courses))
            .or_else(|| self.select_as_name(courses))
    }

    fn select_as_id<'a>(&self, courses: &'a [Course]) -> Option<&'a Course> {
        courses
            .iter()
            .find(|course| course.id().to_string() == self.selector)
    }

    fn select_as_course_code<'a>(&self, courses: &'a [Course]) -> Option<&'a Course> {
        courses
            .iter()
            .find(|course| course.course_code().eq_ignore_ascii_case(&self.selector))
    }

    fn select_as_name<'a>(&self, courses: &'a [Course]) -> Option<&'a Course> {
        courses
            .iter()
            .find(|course| course.name().eq_ignore_ascii_case(&self.selector))
    }
}
