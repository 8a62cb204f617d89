//! Documents returned by the job service REST API.
//!
//! Only the fields the dashboard reads are modelled; anything else in a
//! response is ignored.

use crate::error::{JobscopeError, Result};

mod failure;
mod job;
mod project;

pub use failure::{FailedJob, FailureLine, FailureReport, ScoredLine};
pub use job::{Job, JobCounts, JobList, JobOutput, JobUrls, PeriodCount, PeriodType, PeriodUrls};
pub use project::{ProjectList, ProjectStatus, ProjectStatusUrls, ProjectSummary, ProjectUrls};

/// Check that a project name or job id is usable as a single path segment.
pub fn check_segment(segment: &str) -> Result<()> {
    let valid = !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));

    if valid {
        Ok(())
    } else {
        Err(JobscopeError::InvalidArgument(format!(
            "Not a valid name: {:?}",
            segment
        )))
    }
}
