//! Bar chart of job activity per period.
//!
//! A [`ChartView`] is built from one job count document and carries
//! everything the browser needs to draw the plot and react to clicks,
//! so the page script holds no chart state of its own.

use serde::Serialize;

use crate::display::parse_timestamp;
use crate::error::{JobscopeError, Result};
use crate::models::{JobCounts, PeriodCount, PeriodType};

/// One of the four bar series, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Claimed,
    Finished,
    Failed,
    Workers,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 4] = [
        SeriesKind::Claimed,
        SeriesKind::Finished,
        SeriesKind::Failed,
        SeriesKind::Workers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::Claimed => "claimed",
            SeriesKind::Finished => "finished",
            SeriesKind::Failed => "failed",
            SeriesKind::Workers => "workers",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SeriesKind::Claimed => "#2c5aa0",
            SeriesKind::Finished => "#5aa02c",
            SeriesKind::Failed => "#a02c5a",
            SeriesKind::Workers => "#101010",
        }
    }

    /// Position of the bar within its period group, starting at 1.
    pub fn order(&self) -> u8 {
        match self {
            SeriesKind::Claimed => 1,
            SeriesKind::Finished => 2,
            SeriesKind::Failed => 3,
            SeriesKind::Workers => 4,
        }
    }

    fn value(&self, count: &PeriodCount) -> u64 {
        match self {
            SeriesKind::Claimed => count.jobs_claimed,
            SeriesKind::Finished => count.jobs_finished,
            SeriesKind::Failed => count.jobs_failed,
            SeriesKind::Workers => count.active_workers,
        }
    }

    fn url<'a>(&self, count: &'a PeriodCount) -> &'a str {
        match self {
            SeriesKind::Claimed => &count.urls.jobs_claimed,
            SeriesKind::Finished => &count.urls.jobs_finished,
            SeriesKind::Failed => &count.urls.jobs_failed,
            SeriesKind::Workers => &count.urls.active_workers,
        }
    }
}

/// Bar width in milliseconds for a period type.
pub fn bar_width_ms(period_type: PeriodType) -> i64 {
    match period_type {
        PeriodType::Daily => 14_400_000,
        PeriodType::Hourly => 600_000,
    }
}

/// What the dashboard does in response to a click on the plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartAction {
    /// Load `jobs_url` into the jobs table, and zoom into `zoom_url` if set.
    Drill {
        jobs_url: String,
        zoom_url: Option<String>,
    },
    /// Go back to the project's daily chart.
    ResetZoom,
    /// Nothing to do.
    Nothing,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    /// Period start as epoch milliseconds.
    pub x: i64,
    pub y: u64,
    pub tooltip: String,
    pub action: ChartAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub kind: SeriesKind,
    pub label: &'static str,
    pub color: &'static str,
    pub order: u8,
    pub points: Vec<ChartPoint>,
}

/// Everything needed to draw one state of the overview plot.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub period_type: PeriodType,
    pub bar_width_ms: i64,
    pub series: Vec<ChartSeries>,
    /// Action for clicks that hit no bar, or hit a workers bar.
    pub background_action: ChartAction,
}

impl ChartView {
    /// Build the chart for a job count document.
    pub fn from_counts(counts: &JobCounts) -> Result<Self> {
        let period_type = counts.period_type;
        let starts = counts
            .counts
            .iter()
            .map(|count| parse_timestamp(&count.period).map(|t| t.timestamp_millis()))
            .collect::<Result<Vec<_>>>()?;

        let series = SeriesKind::ALL
            .iter()
            .map(|kind| ChartSeries {
                kind: *kind,
                label: kind.label(),
                color: kind.color(),
                order: kind.order(),
                points: counts
                    .counts
                    .iter()
                    .zip(&starts)
                    .map(|(count, x)| {
                        let y = kind.value(count);
                        ChartPoint {
                            x: *x,
                            y,
                            tooltip: format!("{}: {} {}", count.period, y, kind.label()),
                            action: point_action(*kind, count, period_type),
                        }
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            period_type,
            bar_width_ms: bar_width_ms(period_type),
            series,
            background_action: background_action(period_type),
        })
    }

    /// Resolve a click on bar `point` of series `series`, or on the background.
    pub fn click(&self, hit: Option<(usize, usize)>) -> Result<ChartAction> {
        let Some((series, point)) = hit else {
            return Ok(self.background_action.clone());
        };
        self.series
            .get(series)
            .and_then(|s| s.points.get(point))
            .map(|p| p.action.clone())
            .ok_or_else(|| {
                JobscopeError::NotFound(format!("No bar {} in series {}", point, series))
            })
    }

    pub fn len(&self) -> usize {
        self.series.first().map(|s| s.points.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn point_action(kind: SeriesKind, count: &PeriodCount, period_type: PeriodType) -> ChartAction {
    if kind == SeriesKind::Workers {
        return background_action(period_type);
    }
    ChartAction::Drill {
        jobs_url: kind.url(count).to_string(),
        zoom_url: match period_type {
            PeriodType::Daily => Some(count.urls.zoom.clone()),
            PeriodType::Hourly => None,
        },
    }
}

fn background_action(period_type: PeriodType) -> ChartAction {
    match period_type {
        PeriodType::Daily => ChartAction::Nothing,
        PeriodType::Hourly => ChartAction::ResetZoom,
    }
}
