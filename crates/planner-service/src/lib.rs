pub mod error;
pub mod planner;
