use crate::analyzers::display_type_label;
use crate::cli::args::{Cli, Commands};
use crate::config::EngineConfig;
use crate::engine::{DashboardEngine, LoadReport};
use crate::error::{ProcessingError, Result};
use crate::models::{DashboardStats, PollutantComplianceSummary, SampleStats, StatusFilter};
use crate::utils::progress::ProgressReporter;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = EngineConfig::load(cli.config.as_deref())?;
    let engine = DashboardEngine::new(config)?;
    let json = cli.json;

    match cli.command {
        Commands::Pollutants { input, category } => {
            load_dataset(&engine, &input, json)?;

            let pollutants = match category {
                Some(category) => engine.pollutants_in(category.into()),
                None => engine.unique_pollutants(),
            };

            if json {
                return print_json(&pollutants);
            }
            for pollutant in &pollutants {
                match engine.definition_for(pollutant) {
                    Some(definition) if !definition.is_empty() => {
                        println!("{:<24} {}", pollutant, definition)
                    }
                    _ => println!("{}", pollutant),
                }
            }
            println!("\n{} pollutants", pollutants.len());
        }

        Commands::Locations {
            input,
            material_type,
        } => {
            load_dataset(&engine, &input, json)?;
            let locations = engine.unique_locations(&material_type);

            if json {
                return print_json(&locations);
            }
            println!("Locations for {}:", display_type_label(&material_type));
            for location in &locations {
                println!("  {}", location);
            }
        }

        Commands::Timeseries {
            input,
            pollutant,
            bucketing,
            filter,
        } => {
            load_dataset(&engine, &input, json)?;
            let filter = filter.to_filter().with_pollutant(pollutant.clone());
            let series = engine.time_series(&filter, bucketing.into());

            if json {
                return print_json(&series);
            }
            if series.is_empty() {
                println!("No samples for {} under the current filter", pollutant);
                return Ok(());
            }

            let snapshot = engine.snapshot();
            let unit = snapshot.unit_for(&pollutant).unwrap_or_default();
            println!("{} ({})", pollutant, unit);
            for bucket in &series.buckets {
                println!(
                    "  {:<20} {:>12.4}  n={}",
                    bucket.key.to_string(),
                    bucket.mean,
                    bucket.count
                );
            }
            println!(
                "\nSamples: {}, period mean: {:.4} ({})",
                series.sample_count(),
                series.period_mean,
                series.period_status
            );
            if let Some((low, high)) = series.axis_range() {
                println!("Axis range: {:.4} .. {:.4}", low, high);
            }
        }

        Commands::Compliance {
            input,
            status,
            filter,
        } => {
            let status_filter: StatusFilter = status.parse()?;
            load_dataset(&engine, &input, json)?;
            let table = engine.compliance_table(&filter.to_filter(), status_filter);

            if json {
                return print_json(&table);
            }
            print_compliance_table(&table);
        }

        Commands::Summary { input, filter } => {
            let report = load_dataset(&engine, &input, json)?;
            let filter = filter.to_filter();
            let stats = engine.dashboard_stats(&filter);
            let samples = engine.sample_stats(&filter);

            if json {
                #[derive(Serialize)]
                struct SummaryOutput<'a> {
                    load: &'a LoadReport,
                    stats: &'a DashboardStats,
                    samples: &'a SampleStats,
                }
                return print_json(&SummaryOutput {
                    load: &report,
                    stats: &stats,
                    samples: &samples,
                });
            }

            println!("{}", stats.summary());
            println!(
                "\nSamples: {} (min {:.4}, max {:.4}, mean {:.4})",
                samples.sample_count, samples.min_value, samples.max_value, samples.average
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    let installed = match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}

fn load_dataset(engine: &DashboardEngine, input: &Path, quiet: bool) -> Result<LoadReport> {
    let progress =
        ProgressReporter::new_spinner(&format!("Loading {}...", input.display()), quiet);

    match engine.load(input) {
        Ok(report) => {
            progress.finish_with_message(&format!(
                "Loaded {} records ({} rows dropped)",
                report.records_loaded, report.rows_dropped
            ));
            Ok(report)
        }
        Err(e) => {
            progress.abandon_with_message("Load failed");
            Err(e)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_compliance_table(table: &[PollutantComplianceSummary]) {
    if table.is_empty() {
        println!("No pollutants match the current filter");
        return;
    }

    println!(
        "{:<24} {:>6} {:>14} {:>12} {:<10} Status",
        "Pollutant", "Sites", "Non-Compliant", "Average", "Unit"
    );
    for summary in table {
        println!(
            "{:<24} {:>6} {:>14} {:>12.4} {:<10} {}",
            summary.pollutant,
            summary.total_sites,
            summary.non_compliant_sites,
            summary.average_value,
            summary.unit,
            summary.status
        );
        if !summary.non_compliant_locations.is_empty() {
            println!("    at: {}", summary.non_compliant_locations.join(", "));
        }
    }
}
