use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use jobscope_core::display::NA_MARKER;
use jobscope_core::tables::{ProjectRow, ProjectsTable};
use jobscope_runtime::ApiClient;

use super::load_config;

/// Print the projects table once and exit.
#[derive(Parser)]
pub struct StatusCommand {
    /// Configuration file path. Defaults apply when it does not exist.
    #[arg(short, long, default_value = "jobscope.toml")]
    pub config: String,

    /// Job service base URL (overrides config).
    #[arg(long)]
    pub upstream: Option<String>,

    /// Print the rows as JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusCommand {
    /// Execute the status command.
    pub async fn execute(self) -> Result<()> {
        let config = load_config(&self.config, self.upstream.as_deref())?;
        let client = ApiClient::new(&config.upstream)?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching projects from {}", client.api_root()));

        let list = client.list_projects().await;
        pb.finish_and_clear();
        let table = ProjectsTable::new(&list?.projects);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&table.rows)?);
            return Ok(());
        }

        if table.is_empty() {
            println!("No projects");
            return Ok(());
        }

        let mut lines = render_table(&table.rows).into_iter();
        if let Some(header) = lines.next() {
            println!("{}", style(header).bold());
        }
        for line in lines {
            println!("{}", line);
        }
        Ok(())
    }
}

const COLUMNS: [&str; 7] = [
    "Priority",
    "Project",
    "Name",
    "Jobs Tot/Left/Err",
    "Average time (s)",
    "Deadline",
    "Last claimed",
];

fn cells(row: &ProjectRow) -> [String; 7] {
    [
        plain(&row.priority),
        row.id.clone(),
        plain(&row.name),
        row.jobs.clone(),
        plain(&row.average_time),
        plain(&row.deadline),
        plain(&row.last_claimed),
    ]
}

/// The N/A marker as terminal text.
fn plain(value: &str) -> String {
    value.replace(NA_MARKER, "N/A")
}

/// Header line followed by one aligned line per row.
fn render_table(rows: &[ProjectRow]) -> Vec<String> {
    let body: Vec<[String; 7]> = rows.iter().map(cells).collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![aligned(COLUMNS.iter().copied(), &widths)];
    for row in &body {
        lines.push(aligned(row.iter().map(String::as_str), &widths));
    }
    lines
}

fn aligned<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", value, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscope_core::models::ProjectSummary;

    fn project(id: &str, prio_score: Option<f64>) -> ProjectSummary {
        ProjectSummary {
            id: id.to_string(),
            name: Some(format!("{} project", id)),
            nr_jobs_added: 10,
            nr_jobs_finished: 3,
            nr_jobs_failed: 1,
            total_processing_time: Some(40.0),
            prio_score,
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_replaces_marker() {
        assert_eq!(plain(NA_MARKER), "N/A");
        assert_eq!(plain("2016-01-01T10:00"), "2016-01-01T10:00");
    }

    #[test]
    fn test_render_table() {
        let table = ProjectsTable::new(&[project("B", None), project("A", Some(2.0))]);
        let lines = render_table(&table.rows);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Priority  Project  Name"));
        assert!(lines[1].starts_with("2         A        A project"));
        assert!(lines[2].starts_with("N/A       B        B project"));
        assert!(lines.iter().all(|line| !line.contains("<i>")));
    }
}
