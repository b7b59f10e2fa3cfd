//! Route handlers grouped by resource.

pub mod courses;
pub mod health;
pub mod memberships;
pub mod programs;
