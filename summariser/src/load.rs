use std::path::{Path, PathBuf};

use polars::prelude::*;
use thiserror::Error;

use crate::metric::Metric;
use crate::model::RunRecord;

/// Name of the totals row written by the instruments crate.
const AGGREGATE_ROW_NAME: &str = "Aggregated";

/// A run statistics file that could not contribute a [RunRecord]. These are collected rather
/// than raised so one bad file never blocks its siblings.
#[derive(Debug, Error)]
pub enum LoadDiagnostic {
    #[error("No aggregate row and the final row is a placeholder in {path}, skipping file")]
    MalformedRecord { path: PathBuf },
    #[error("Failed to parse {path}, skipping file: {source}")]
    UnparseableFile {
        path: PathBuf,
        source: PolarsError,
    },
}

/// Load all `run<N>_stats.csv` files for one scenario directory, in ascending run order.
///
/// A missing directory or an empty one yields zero records and a warning, not an error. Files
/// that cannot contribute a record are returned as diagnostics alongside the records that could
/// be produced.
pub fn load_scenario_runs(
    scenario_name: &str,
    dir: &Path,
) -> (Vec<RunRecord>, Vec<LoadDiagnostic>) {
    if !dir.is_dir() {
        log::warn!(
            "Scenario directory {} not found, skipping scenario '{}'",
            dir.display(),
            scenario_name
        );
        return (Vec::new(), Vec::new());
    }

    let mut files = discover_run_files(dir);
    if files.is_empty() {
        log::warn!(
            "No run*_stats.csv files found in {} for scenario '{}'",
            dir.display(),
            scenario_name
        );
        return (Vec::new(), Vec::new());
    }
    files.sort_by_key(|(run_index, _)| *run_index);

    log::info!(
        "Found {} stats files for scenario '{}'",
        files.len(),
        scenario_name
    );

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();
    for (run_index, path) in files {
        match load_run_file(scenario_name, run_index, &path) {
            Ok(record) => records.push(record),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    (records, diagnostics)
}

fn discover_run_files(dir: &Path) -> Vec<(u32, PathBuf)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let name = path.file_name()?.to_str()?;
            let run_index = run_index_from_filename(name)?;
            Some((run_index, path))
        })
        .collect()
}

fn run_index_from_filename(name: &str) -> Option<u32> {
    name.strip_prefix("run")?
        .strip_suffix("_stats.csv")?
        .parse()
        .ok()
}

fn load_run_file(
    scenario_name: &str,
    run_index: u32,
    path: &Path,
) -> Result<RunRecord, LoadDiagnostic> {
    let unparseable = |source| LoadDiagnostic::UnparseableFile {
        path: path.to_path_buf(),
        source,
    };

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(unparseable)?;

    let aggregate = find_aggregate_row(&frame, path)?;

    let record = RunRecord {
        scenario_name: scenario_name.to_string(),
        run_index,
        request_count: numeric_cell(&aggregate, Metric::TotalRequests, path),
        failure_count: numeric_cell(&aggregate, Metric::TotalFailures, path),
        avg_response_time_ms: numeric_cell(&aggregate, Metric::AvgResponseTime, path),
        max_response_time_ms: numeric_cell(&aggregate, Metric::MaxResponseTime, path),
        requests_per_sec: numeric_cell(&aggregate, Metric::RequestsPerSec, path),
    };

    if let (Some(requests), Some(failures)) = (record.request_count, record.failure_count) {
        if failures > requests {
            log::warn!(
                "Failure count {} exceeds request count {} in {}",
                failures,
                requests,
                path.display()
            );
        }
    }

    Ok(record)
}

/// Locate the row totalling across all request types.
///
/// Preferred is the row named `Aggregated`. When absent we fall back to the final row of the
/// file, a documented heuristic that relies on how these files are laid out, so exercising it
/// is warned about. The fallback row is only trusted when it is not itself a placeholder row
/// with an empty `Type`.
fn find_aggregate_row(frame: &DataFrame, path: &Path) -> Result<DataFrame, LoadDiagnostic> {
    let by_name = frame
        .clone()
        .lazy()
        .filter(col("Name").eq(lit(AGGREGATE_ROW_NAME)))
        .collect()
        .map_err(|source| LoadDiagnostic::UnparseableFile {
            path: path.to_path_buf(),
            source,
        })?;
    if by_name.height() > 0 {
        return Ok(by_name);
    }

    log::warn!(
        "'{}' row not found in {}, falling back to the final row",
        AGGREGATE_ROW_NAME,
        path.display()
    );

    let last = frame.tail(Some(1));
    if last.height() == 0 || !fallback_row_is_usable(&last) {
        return Err(LoadDiagnostic::MalformedRecord {
            path: path.to_path_buf(),
        });
    }

    Ok(last)
}

fn fallback_row_is_usable(row: &DataFrame) -> bool {
    let Ok(column) = row.column("Type") else {
        return false;
    };
    let Ok(value) = column.get(0) else {
        return false;
    };
    match value.get_str() {
        Some(kind) => !kind.is_empty() && kind != "None",
        None => false,
    }
}

/// Read one metric's value from the aggregate row. A missing column or an unusable cell yields
/// a missing value for that metric, never a hard failure.
fn numeric_cell(row: &DataFrame, metric: Metric, path: &Path) -> Option<f64> {
    let name = metric
        .column()
        .expect("Only metrics backed by a column can be read from a file");

    let column = match row.column(name) {
        Ok(column) => column,
        Err(_) => {
            log::warn!(
                "Column '{}' not found in {} for metric '{}'",
                name,
                path.display(),
                metric.label()
            );
            return None;
        }
    };

    match column.get(0) {
        Ok(AnyValue::Null) | Err(_) => None,
        Ok(value) => match value.try_extract::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!(
                    "Non-numeric value in column '{}' of {}",
                    name,
                    path.display()
                );
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_indexes_parse_from_matching_filenames_only() {
        assert_eq!(run_index_from_filename("run1_stats.csv"), Some(1));
        assert_eq!(run_index_from_filename("run42_stats.csv"), Some(42));
        assert_eq!(run_index_from_filename("run_stats.csv"), None);
        assert_eq!(run_index_from_filename("run1_stats.json"), None);
        assert_eq!(run_index_from_filename("summary.csv"), None);
    }
}
