//! Row view models for the dashboard tables.
//!
//! Each table owns its rows for a single render. Lookups by row index go
//! through the table value, never through shared state.

use std::cmp::Ordering;

use serde::Serialize;

use crate::display::{
    average_processing_time, format_score, get_duration, job_totals, or_na, remove_seconds,
    NA_MARKER,
};
use crate::error::{JobscopeError, Result};
use crate::models::{FailedJob, FailureLine, FailureReport, Job, JobUrls, ProjectSummary};

/// A row of the server status table.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRow {
    pub id: String,
    /// Raw score, used for ordering.
    #[serde(skip)]
    pub prio_score: Option<f64>,
    pub priority: String,
    pub name: String,
    /// `total/left/failed`.
    pub jobs: String,
    pub average_time: String,
    pub started: String,
    pub deadline: String,
    pub last_added: String,
    pub last_claimed: String,
    pub details_url: String,
}

impl From<&ProjectSummary> for ProjectRow {
    fn from(project: &ProjectSummary) -> Self {
        Self {
            id: project.id.clone(),
            prio_score: project.prio_score,
            priority: project
                .prio_score
                .map(format_score)
                .unwrap_or_else(|| NA_MARKER.to_string()),
            name: or_na(project.name.as_deref()),
            jobs: job_totals(
                project.nr_jobs_added,
                project.nr_jobs_finished,
                project.nr_jobs_failed,
            ),
            average_time: average_processing_time(
                project.total_processing_time.unwrap_or(0.0),
                project.nr_jobs_finished,
                project.nr_jobs_failed,
            ),
            started: remove_seconds(project.created_at.as_deref()),
            deadline: remove_seconds(project.deadline.as_deref()),
            last_added: remove_seconds(project.last_job_added_at.as_deref()),
            last_claimed: remove_seconds(project.last_job_claimed_at.as_deref()),
            details_url: format!("/projects/{}", project.id),
        }
    }
}

/// Projects ordered by priority, highest first; projects without a score last.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectsTable {
    pub rows: Vec<ProjectRow>,
}

impl ProjectsTable {
    pub fn new(projects: &[ProjectSummary]) -> Self {
        let mut rows: Vec<ProjectRow> = projects.iter().map(ProjectRow::from).collect();
        rows.sort_by(|a, b| match (a.prio_score, b.prio_score) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row of the jobs table.
#[derive(Debug, Clone, Serialize)]
pub struct JobRow {
    pub id: String,
    pub job_type: String,
    pub worker: String,
    pub status: String,
    pub added: String,
    pub claimed: String,
    pub finished: String,
    pub failed: String,
    pub duration: String,
    /// Link to the level-2 data product, when it can be derived.
    pub level2_url: Option<String>,
    /// Where the row's console output is fetched from on expansion.
    pub output_url: Option<String>,
}

impl From<&Job> for JobRow {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            job_type: or_na(job.job_type.as_deref()),
            worker: or_na(job.worker.as_deref()),
            status: or_na(job.status.as_deref()),
            added: or_na(job.added.as_deref()),
            claimed: or_na(job.claimed.as_deref()),
            finished: or_na(job.finished.as_deref()),
            failed: or_na(job.failed.as_deref()),
            duration: get_duration(
                job.claimed.as_deref(),
                job.finished.as_deref(),
                job.failed.as_deref(),
            ),
            level2_url: level2_uri(&job.urls),
            output_url: job.urls.output.clone(),
        }
    }
}

/// Rows for a job listing, in the order the job service returned them.
pub fn job_rows(jobs: &[Job]) -> Vec<JobRow> {
    jobs.iter().map(JobRow::from).collect()
}

/// Derive the level-2 data link for a job from its input and output URLs.
///
/// The project is the path segment two after `rest_api` in the output URL
/// (`.../rest_api/v4/{project}/jobs/...`); the link is the input URL with
/// `l1_log` replaced by `level2/{project}`.
pub fn level2_uri(urls: &JobUrls) -> Option<String> {
    let output = urls.output.as_deref()?;
    let input = urls.input.as_deref()?;

    let parts: Vec<&str> = output.split('/').collect();
    let project = parts
        .iter()
        .rposition(|part| *part == "rest_api")
        .and_then(|index| parts.get(index + 2))
        .filter(|project| !project.is_empty())?;

    Some(input.replacen("l1_log", &format!("level2/{}", project), 1))
}

/// A row of the failure lines table.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRow {
    /// Row index within the table, used to ask for the row's jobs.
    pub row: usize,
    pub score: String,
    /// The line followed by the number of lines it shares with its jobs.
    pub line: String,
    pub nr_jobs: usize,
}

/// A failed job as shown when a failure line is opened.
#[derive(Debug, Clone, Serialize)]
pub struct FailedJobRow {
    pub id: String,
    pub processing_time: String,
    pub worker: String,
    pub failed: String,
}

impl From<&FailedJob> for FailedJobRow {
    fn from(job: &FailedJob) -> Self {
        Self {
            id: job.id.clone(),
            processing_time: or_na(job.processing_time),
            worker: or_na(job.worker.as_deref()),
            failed: or_na(job.failed.as_deref()),
        }
    }
}

/// Failure lines of one report, highest score first.
#[derive(Debug, Clone)]
pub struct FailureTable {
    report: FailureReport,
    /// Indices into `report.lines`, in display order.
    order: Vec<usize>,
}

impl FailureTable {
    pub fn from_report(report: FailureReport) -> Self {
        let mut order: Vec<usize> = (0..report.lines.len()).collect();
        // Stable, so equal scores keep the job service's order.
        order.sort_by(|a, b| {
            report.lines[*b]
                .score
                .partial_cmp(&report.lines[*a].score)
                .unwrap_or(Ordering::Equal)
        });
        Self { report, order }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The failure line shown at `row`.
    pub fn line(&self, row: usize) -> Result<&FailureLine> {
        self.order
            .get(row)
            .map(|index| &self.report.lines[*index])
            .ok_or_else(|| JobscopeError::NotFound(format!("Failure line {}", row)))
    }

    pub fn rows(&self) -> Vec<FailureRow> {
        self.order
            .iter()
            .enumerate()
            .map(|(row, index)| {
                let line = &self.report.lines[*index];
                FailureRow {
                    row,
                    score: format_score(line.score),
                    line: format!("{} ({})", line.line, line.common_lines.len()),
                    nr_jobs: line.jobs.len(),
                }
            })
            .collect()
    }

    /// The lines shared by the jobs of `row`, as a preformatted block.
    pub fn common_lines_html(&self, row: usize) -> Result<String> {
        let line = self.line(row)?;
        let mut text = String::from("<pre>");
        for common in &line.common_lines {
            text.push_str(&format!("{}\t{}\n", format_score(common.score), common.line));
        }
        text.push_str("</pre>");
        Ok(text)
    }

    /// Jobs whose output contains the line at `row`.
    ///
    /// Ids missing from the report's job map are skipped.
    pub fn failed_jobs(&self, row: usize) -> Result<Vec<FailedJobRow>> {
        let line = self.line(row)?;
        Ok(line
            .jobs
            .iter()
            .filter_map(|id| match self.report.jobs.get(id) {
                Some(job) => Some(FailedJobRow::from(job)),
                None => {
                    tracing::debug!(job_id = %id, "Failure line references unknown job");
                    None
                }
            })
            .collect())
    }
}
