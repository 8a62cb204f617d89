//! Core types for the jobscope dashboard: configuration, job service
//! documents and the view models rendered by the dashboard.

pub mod chart;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod tables;

pub use chart::{ChartAction, ChartView};
pub use config::JobscopeConfig;
pub use display::{compare_two_dates, get_duration, object_as_list, NA_MARKER};
pub use error::{JobscopeError, Result};
pub use tables::{FailureTable, JobRow, ProjectRow, ProjectsTable};
