use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::stats::OperationStats;

/// Column order matches what the summariser expects to find, one row per operation plus the
/// `Aggregated` totals row last with an empty `Type`.
const HEADER: &str =
    "Name,Type,Request Count,Failure Count,Average Response Time,Min Response Time,Max Response Time,Requests/s";

fn write_row(out: &mut impl Write, stats: &OperationStats) -> std::io::Result<()> {
    writeln!(
        out,
        "{},{},{},{},{:.2},{:.2},{:.2},{:.6}",
        stats.name,
        stats.kind,
        stats.request_count,
        stats.failure_count,
        stats.avg_time_ms,
        stats.min_time_ms,
        stats.max_time_ms,
        stats.requests_per_sec,
    )
}

pub(crate) fn write_stats_file(
    dir: &Path,
    run_index: u32,
    rows: &[OperationStats],
    aggregate: &OperationStats,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create stats directory {}", dir.display()))?;

    let path = dir.join(format!("run{}_stats.csv", run_index));
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create stats file {}", path.display()))?;

    writeln!(file, "{}", HEADER)?;
    for row in rows {
        write_row(&mut file, row)?;
    }
    write_row(&mut file, aggregate)?;

    Ok(path)
}
