/// How a metric is rendered in the per-metric chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// A trend across increasing load levels, drawn as a connected line.
    Line,
    /// A total count, drawn as bars.
    Bar,
}

/// The metrics tracked across runs and scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    AvgResponseTime,
    MaxResponseTime,
    RequestsPerSec,
    TotalRequests,
    TotalFailures,
    SuccessPercentage,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::AvgResponseTime,
        Metric::MaxResponseTime,
        Metric::RequestsPerSec,
        Metric::TotalRequests,
        Metric::TotalFailures,
        Metric::SuccessPercentage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::AvgResponseTime => "Average Response Time (ms)",
            Metric::MaxResponseTime => "Max Response Time (ms)",
            Metric::RequestsPerSec => "Requests per Second (req/s)",
            Metric::TotalRequests => "Total Requests",
            Metric::TotalFailures => "Total Failures",
            Metric::SuccessPercentage => "Success Percentage (%)",
        }
    }

    /// The column this metric is read from in a run statistics file. `None` for metrics which
    /// are computed from other columns rather than read directly.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Metric::AvgResponseTime => Some("Average Response Time"),
            Metric::MaxResponseTime => Some("Max Response Time"),
            Metric::RequestsPerSec => Some("Requests/s"),
            Metric::TotalRequests => Some("Request Count"),
            Metric::TotalFailures => Some("Failure Count"),
            Metric::SuccessPercentage => None,
        }
    }

    pub fn chart_kind(&self) -> ChartKind {
        match self {
            Metric::AvgResponseTime => ChartKind::Line,
            Metric::MaxResponseTime => ChartKind::Line,
            Metric::RequestsPerSec => ChartKind::Line,
            Metric::TotalRequests => ChartKind::Bar,
            Metric::TotalFailures => ChartKind::Bar,
            Metric::SuccessPercentage => ChartKind::Line,
        }
    }

    /// File name stem for this metric's chart artifact, derived from the display label with the
    /// unit annotation stripped, lower-cased and spaces joined with underscores.
    pub fn artifact_stem(&self) -> String {
        let label = self.label();
        let without_unit = label.split('(').next().unwrap_or(label).trim();
        without_unit.to_lowercase().replace(' ', "_")
    }
}
