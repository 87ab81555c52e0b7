pub mod lms_service;

mod link;
