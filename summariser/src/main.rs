use std::path::PathBuf;

use clap::Parser;
use gust_summariser::{analyze_scenarios, chart, report, DECLARED_SCENARIOS};

#[derive(Parser, Debug)]
#[command(about = "Aggregate Gust run statistics into a comparison table and charts", long_about = None)]
struct SummariserCli {
    /// Directory containing one subdirectory of run statistics per scenario
    #[clap(long, default_value = "results")]
    results_dir: PathBuf,

    /// Directory to write the charts and the JSON report into
    #[clap(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = SummariserCli::parse();

    let table = analyze_scenarios(&cli.results_dir, &DECLARED_SCENARIOS)?;

    println!("\nMean results per scenario");
    println!("{}", table.render());

    let report_path = report::write_json_report(&table, &cli.out_dir)?;
    log::info!("Report written to {}", report_path.display());

    let charts = chart::render_charts(&table, &cli.out_dir)?;
    log::info!("{} charts generated", charts.len());

    Ok(())
}
