//! API endpoint handlers.

pub mod follow_up;
pub mod health;
pub mod page;
pub mod reports;
pub mod samples;
