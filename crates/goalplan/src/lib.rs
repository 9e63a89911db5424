//! Command-line front end for the goal analytics engine
//!
//! Loads a YAML goal file, runs [`goalplan_core`] over every goal and renders
//! the combined plan as text, JSON or YAML.

pub mod format;
pub mod input;
pub mod logging;
pub mod report;

pub use input::{GoalFile, InputError};
pub use logging::init_logging;
pub use report::{OutputFormat, PlanReport, build_report, render};
