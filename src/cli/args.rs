use crate::analyzers::PollutantCategory;
use crate::models::{Bucketing, EndBound, FilterCriteria, TimeWindow};
use crate::utils::constants::{ALL_LOCATIONS, ALL_TYPES};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pollutant-processor")]
#[command(about = "Water-quality sample analysis and compliance reporting")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Engine configuration file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the pollutants in a dataset
    Pollutants {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(long, value_enum, help = "Restrict to a pollutant category")]
        category: Option<CategoryArg>,
    },

    /// List sampling locations, optionally for one material type
    Locations {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short = 't', long, default_value = ALL_TYPES)]
        material_type: String,
    },

    /// Average results per time bucket for one pollutant
    Timeseries {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long)]
        pollutant: String,

        #[arg(long, value_enum, default_value = "instant")]
        bucketing: BucketingArg,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Flag-based compliance per pollutant across sites
    Compliance {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            default_value = "All",
            help = "All, Compliant, Warning or Non-Compliant"
        )]
        status: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Dashboard-wide status summary
    Summary {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    #[arg(short, long, default_value = ALL_LOCATIONS)]
    pub location: String,

    #[arg(short = 't', long, default_value = ALL_TYPES)]
    pub material_type: String,

    #[arg(long, requires = "to", help = "Window start date (YYYY-MM-DD)")]
    pub from: Option<NaiveDate>,

    #[arg(long, requires = "from", help = "Window end date (YYYY-MM-DD)")]
    pub to: Option<NaiveDate>,

    #[arg(long, help = "Treat the end date as an exclusive bound")]
    pub exclusive_end: bool,
}

impl FilterArgs {
    pub fn to_filter(&self) -> FilterCriteria {
        let filter = FilterCriteria::new()
            .with_location(self.location.clone())
            .with_material_type(self.material_type.clone());

        match (self.from, self.to) {
            (Some(from), Some(to)) => {
                let end_bound = if self.exclusive_end {
                    EndBound::Exclusive
                } else {
                    EndBound::ExtendedByDay
                };
                filter.with_window(TimeWindow::from_dates(from, to, end_bound))
            }
            _ => filter,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BucketingArg {
    Raw,
    Instant,
}

impl From<BucketingArg> for Bucketing {
    fn from(arg: BucketingArg) -> Self {
        match arg {
            BucketingArg::Raw => Bucketing::Raw,
            BucketingArg::Instant => Bucketing::Instant,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CategoryArg {
    Pop,
    Common,
    Litter,
}

impl From<CategoryArg> for PollutantCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Pop => PollutantCategory::PersistentOrganic,
            CategoryArg::Common => PollutantCategory::Common,
            CategoryArg::Litter => PollutantCategory::Litter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_summary_defaults_to_wildcards() {
        let cli = parse(&["pollutant-processor", "summary", "-i", "data.csv"]);
        match cli.command {
            Commands::Summary { filter, .. } => {
                let filter = filter.to_filter();
                assert!(filter.is_all_locations());
                assert!(filter.is_all_types());
                assert!(filter.window.is_none());
            }
            _ => panic!("expected summary command"),
        }
    }

    #[test]
    fn test_window_requires_both_dates() {
        let result = Cli::try_parse_from([
            "pollutant-processor",
            "summary",
            "-i",
            "data.csv",
            "--from",
            "2024-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_timeseries_window_and_bucketing() {
        let cli = parse(&[
            "pollutant-processor",
            "timeseries",
            "-i",
            "data.csv",
            "-p",
            "Lead",
            "--bucketing",
            "raw",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--exclusive-end",
        ]);
        match cli.command {
            Commands::Timeseries {
                pollutant,
                bucketing,
                filter,
                ..
            } => {
                assert_eq!(pollutant, "Lead");
                assert_eq!(Bucketing::from(bucketing), Bucketing::Raw);
                let window = filter.to_filter().window.unwrap();
                assert_eq!(window.end_bound, EndBound::Exclusive);
            }
            _ => panic!("expected timeseries command"),
        }
    }
}
