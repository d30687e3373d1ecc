//! Weekly timetable planner.
//!
//! Takes selected days, working hours, rest periods and subjects with weekly
//! hour targets, and packs the subjects into half-hour slots after checking
//! the request for conflicts.

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod parser;
pub mod schedule;
pub mod web;

pub use error::{PlannerError, Result};
