use anyhow::{Context, Result};
use tracing::info;

use tvs_cli::replay::replay;
use tvs_cli::scenario::load_scenario;
use tvs_cli::summary::print_report;

use crate::cli::{CheckArgs, OutputArg, ReplayArgs};

pub fn run_replay(args: &ReplayArgs) -> Result<()> {
    let scenario = load_scenario(&args.scenario)
        .with_context(|| format!("load scenario {}", args.scenario.display()))?;
    let report = replay(&scenario);
    match args.output {
        OutputArg::Table => print_report(&report, args.rows),
        OutputArg::Json => {
            let text = serde_json::to_string_pretty(&report).context("serialize report")?;
            println!("{text}");
        }
    }
    Ok(())
}

pub fn run_check(args: &CheckArgs) -> Result<()> {
    let scenario = load_scenario(&args.scenario)
        .with_context(|| format!("check scenario {}", args.scenario.display()))?;
    info!(events = scenario.events.len(), "scenario is valid");
    println!(
        "{}: {} events, {} rows, {} columns",
        args.scenario.display(),
        scenario.events.len(),
        scenario.config.source.rows.len(),
        scenario.config.source.columns.len()
    );
    Ok(())
}
