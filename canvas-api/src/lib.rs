pub mod assignment;
pub mod client;
pub mod course;
pub mod course_selector;
pub mod creds;
pub mod error;
pub mod services;
pub mod submission;
pub mod user;

mod util;
