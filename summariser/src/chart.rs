use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::metric::{ChartKind, Metric};
use crate::report::ComparisonTable;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 500;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 60.0;

/// Render one SVG chart per tracked metric into `out_dir`.
///
/// A metric with no data in any scenario is skipped with a warning rather than rendered as an
/// empty chart. Returns the paths written.
pub fn render_charts(table: &ComparisonTable, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create chart directory {}", out_dir.display()))?;

    let mut written = Vec::new();
    for metric in Metric::ALL {
        let points = table
            .rows()
            .iter()
            .map(|summary| (summary.scenario_name.clone(), summary.metric_mean(metric)))
            .collect::<Vec<_>>();

        if points.iter().all(|(_, value)| value.is_none()) {
            log::warn!(
                "No valid data to plot for '{}', skipping chart",
                metric.label()
            );
            continue;
        }

        let svg = match metric.chart_kind() {
            ChartKind::Line => line_chart(metric.label(), &points),
            ChartKind::Bar => bar_chart(metric.label(), &points),
        };

        let path = out_dir.join(format!("chart_{}.svg", metric.artifact_stem()));
        std::fs::write(&path, svg)
            .with_context(|| format!("Failed to write chart {}", path.display()))?;
        log::info!("Chart '{}' saved as {}", metric.label(), path.display());
        written.push(path);
    }

    Ok(written)
}

struct Scale {
    y_max: f64,
    plot_width: f64,
    plot_height: f64,
}

impl Scale {
    fn new(points: &[(String, Option<f64>)]) -> Self {
        let y_max = points
            .iter()
            .filter_map(|(_, value)| *value)
            .fold(0.0_f64, f64::max);
        Self {
            // Leave headroom for the value annotations above the highest point.
            y_max: if y_max > 0.0 { y_max * 1.15 } else { 1.0 },
            plot_width: WIDTH as f64 - MARGIN_LEFT - MARGIN_RIGHT,
            plot_height: HEIGHT as f64 - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }

    fn x(&self, index: usize, count: usize) -> f64 {
        MARGIN_LEFT + (index as f64 + 0.5) * self.plot_width / count as f64
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + self.plot_height * (1.0 - value / self.y_max)
    }
}

fn chart_open(title: &str) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" "#,
            r#"viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            "\n",
            r#"<rect width="{w}" height="{h}" fill="white"/>"#,
            "\n",
            r#"<text x="{cx}" y="30" text-anchor="middle" font-size="18">{title}</text>"#,
            "\n",
        ),
        w = WIDTH,
        h = HEIGHT,
        cx = WIDTH / 2,
        title = title,
    )
}

fn chart_axes(out: &mut String, scale: &Scale, points: &[(String, Option<f64>)]) {
    let bottom = MARGIN_TOP + scale.plot_height;
    let right = MARGIN_LEFT + scale.plot_width;

    // Horizontal gridlines with their value labels.
    for step in 0..=4 {
        let value = scale.y_max * step as f64 / 4.0;
        let y = scale.y(value);
        let _ = writeln!(
            out,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#ddd"/>"##
        );
        let _ = writeln!(
            out,
            r#"<text x="{x:.1}" y="{ly:.1}" text-anchor="end" font-size="11">{value:.1}</text>"#,
            x = MARGIN_LEFT - 8.0,
            ly = y + 4.0,
        );
    }

    let _ = writeln!(
        out,
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{bottom:.1}" stroke="black"/>"#
    );
    let _ = writeln!(
        out,
        r#"<line x1="{MARGIN_LEFT}" y1="{bottom:.1}" x2="{right:.1}" y2="{bottom:.1}" stroke="black"/>"#
    );

    for (index, (name, _)) in points.iter().enumerate() {
        let _ = writeln!(
            out,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="13">{name}</text>"#,
            x = scale.x(index, points.len()),
            y = bottom + 24.0,
        );
    }
}

fn line_chart(title: &str, points: &[(String, Option<f64>)]) -> String {
    let scale = Scale::new(points);
    let mut out = chart_open(title);
    chart_axes(&mut out, &scale, points);

    // Connect only the scenarios that have a value for this metric.
    let coords = points
        .iter()
        .enumerate()
        .filter_map(|(index, (_, value))| {
            value.map(|value| (scale.x(index, points.len()), scale.y(value), value))
        })
        .collect::<Vec<_>>();

    let polyline = coords
        .iter()
        .map(|(x, y, _)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(
        out,
        r##"<polyline points="{polyline}" fill="none" stroke="#1f77b4" stroke-width="2.5"/>"##
    );

    for (x, y, value) in coords {
        let _ = writeln!(
            out,
            r##"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="#1f77b4"/>"##
        );
        let _ = writeln!(
            out,
            r#"<text x="{x:.1}" y="{ty:.1}" text-anchor="middle" font-size="12">{value:.2}</text>"#,
            ty = y - 10.0,
        );
    }

    out.push_str("</svg>\n");
    out
}

fn bar_chart(title: &str, points: &[(String, Option<f64>)]) -> String {
    let scale = Scale::new(points);
    let mut out = chart_open(title);
    chart_axes(&mut out, &scale, points);

    let bottom = MARGIN_TOP + scale.plot_height;
    let bar_width = scale.plot_width / points.len() as f64 * 0.6;

    for (index, (_, value)) in points.iter().enumerate() {
        let Some(value) = *value else { continue };
        let x = scale.x(index, points.len());
        let y = scale.y(value);
        let _ = writeln!(
            out,
            r##"<rect x="{rx:.1}" y="{y:.1}" width="{bar_width:.1}" height="{rh:.1}" fill="#2ca02c"/>"##,
            rx = x - bar_width / 2.0,
            rh = bottom - y,
        );
        let _ = writeln!(
            out,
            r#"<text x="{x:.1}" y="{ty:.1}" text-anchor="middle" font-size="12">{value:.2}</text>"#,
            ty = y - 8.0,
        );
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScenarioSummary;

    fn table() -> ComparisonTable {
        let mut light = ScenarioSummary::empty("light");
        light.avg_response_time_ms = Some(55.0);
        light.total_requests = Some(100.0);
        let mut peak = ScenarioSummary::empty("peak");
        peak.avg_response_time_ms = Some(80.0);
        peak.total_requests = Some(400.0);
        ComparisonTable::new(vec![light, peak])
    }

    #[test]
    fn charts_are_written_for_metrics_with_data_only() {
        let dir = tempfile::tempdir().unwrap();

        let written = render_charts(&table(), dir.path()).unwrap();

        let names = written
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["chart_average_response_time.svg", "chart_total_requests.svg"]
        );
    }

    #[test]
    fn line_chart_annotates_each_point() {
        let svg = line_chart(
            "Average Response Time (ms)",
            &[
                ("light".to_string(), Some(55.0)),
                ("moderate".to_string(), None),
                ("peak".to_string(), Some(80.0)),
            ],
        );

        assert!(svg.contains("55.00"));
        assert!(svg.contains("80.00"));
        assert!(svg.contains("<polyline"));
        // The missing point contributes neither a vertex nor an annotation.
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn bar_chart_annotates_each_bar() {
        let svg = bar_chart(
            "Total Requests",
            &[
                ("light".to_string(), Some(100.0)),
                ("peak".to_string(), Some(400.0)),
            ],
        );

        assert_eq!(svg.matches("<rect x=").count(), 2);
        assert!(svg.contains("100.00"));
        assert!(svg.contains("400.00"));
    }
}
