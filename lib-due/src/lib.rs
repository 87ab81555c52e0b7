//! Turning the LMS's raw courses and assignments into the dashboard's to-do list.
//!
//! # Terminology:
//! - Incomplete: an assignment in the user's unsubmitted or upcoming bucket
//! - Classified: an incomplete assignment tagged with its course, [`classify::AssignmentType`]
//!     and [`classify::AssignmentStatus`]
//! - Board: the dashboard's view over the classified assignments, with its filter and sort

pub mod aggregate;
pub mod board;
pub mod classify;
pub mod due;
pub mod filter;
pub mod sort;
