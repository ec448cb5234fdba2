//! Planner server - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can reach
//! every layer through one `planner_test::` path.

#![allow(ambiguous_glob_reexports)]

pub mod component {
    pub use planner_core::*;
    pub use planner_service::*;

    pub mod config {
        pub use planner_app::config::ConfigHandler;
        pub use planner_core::config::*;
    }
}

pub use planner_app::app;
pub use planner_app::planner_handler::PlannerServiceHandler;
