use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use savings_estimator::config::{self, Config, PricingInterval};
use savings_estimator::estimator::{PolicyEdit, Region};
use savings_estimator::exit_codes::exit_code_for_anyhow;
use savings_estimator::pricing::PricingCatalog;
use savings_estimator::report::{self, RegionReport};
use savings_estimator::validation::{self, KNOWN_REGIONS};
use savings_estimator::DataWarning;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "savings-estimator")]
#[command(
    about = "Estimate Spot savings for AWS AutoScaling Groups",
    long_about = "savings-estimator projects what AutoScaling Groups would cost if converted from on-demand to Spot instances, keeping a configurable on-demand floor per group.\n\nIt works on exported ASG descriptions and a pricing catalog, and produces the policy tags the Spot optimizer reads."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    output: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Project current and Spot-converted costs for a region
    Estimate {
        #[command(flatten)]
        input: InputArgs,
        /// Pricing interval for per-group figures (hourly, monthly)
        #[arg(long)]
        interval: Option<PricingInterval>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Print the policy tags to write back to each AutoScaling Group
    Tags {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// List known AWS regions
    Regions,
    /// Initialize a configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".savings-estimator.toml")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct InputArgs {
    /// JSON file with AutoScaling Group descriptions
    #[arg(long)]
    groups: PathBuf,
    /// JSON pricing catalog
    #[arg(long)]
    catalog: PathBuf,
    /// AWS region the groups belong to (defaults to the configured region)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,
}

/// Region-wide overrides, applied to every group before estimating
#[derive(Args)]
struct OverrideArgs {
    /// Minimum number of on-demand instances for every group
    #[arg(long)]
    override_on_demand_number: Option<u64>,
    /// Minimum percentage of on-demand instances for every group (0-100)
    #[arg(long, value_parser = validation::parse_on_demand_percent)]
    override_on_demand_percent: Option<f64>,
    /// Enable or disable Spot conversion for every group
    #[arg(long)]
    override_enabled: Option<bool>,
}

impl OverrideArgs {
    fn edits(&self) -> Vec<PolicyEdit> {
        let mut edits = Vec::new();
        if let Some(n) = self.override_on_demand_number {
            edits.push(PolicyEdit::SetMinOnDemandCount(n));
        }
        if let Some(p) = self.override_on_demand_percent {
            edits.push(PolicyEdit::SetMinOnDemandPercent(p));
        }
        if let Some(enabled) = self.override_enabled {
            edits.push(PolicyEdit::SetEnabled(enabled));
        }
        edits
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for_anyhow(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Estimate {
            input,
            interval,
            overrides,
        } => {
            let (region, warnings) = load_region(&input, &overrides, &config)?;
            let interval = interval.unwrap_or(config.pricing.interval);
            let multiplier = config.multiplier(interval);
            let totals = region.aggregate(
                config.multiplier(PricingInterval::Monthly),
                &config.fee_schedule(),
            );
            let report = RegionReport::build(&region, interval, multiplier, totals, warnings);

            if cli.output == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report::print_text(&report);
            }
        }
        Commands::Tags { input, overrides } => {
            let (region, _) = load_region(&input, &overrides, &config)?;
            let tags = region.materialize_tags();
            if cli.output == "json" {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else if tags.is_empty() {
                println!("No tags to write");
            } else {
                for tag in &tags {
                    println!("{}\t{}={}", tag.resource_id, tag.key, tag.value);
                }
            }
        }
        Commands::Regions => {
            for region in KNOWN_REGIONS {
                println!("{}", region);
            }
        }
        Commands::Init { output } => {
            config::init_config(&output)?;
        }
    }

    Ok(())
}

fn load_region(
    input: &InputArgs,
    overrides: &OverrideArgs,
    config: &Config,
) -> Result<(Region, Vec<DataWarning>)> {
    let region_name = input
        .region
        .clone()
        .unwrap_or_else(|| config.pricing.region.clone());
    validation::validate_region(&region_name)?;

    let catalog = load_catalog(&input.catalog)?;
    let descriptions = Region::read_descriptions(&input.groups)
        .with_context(|| format!("Failed to read groups: {}", input.groups.display()))?;

    let (mut region, warnings) = Region::load(&region_name, Arc::new(catalog), descriptions);
    for edit in overrides.edits() {
        region.edit_all(edit);
    }
    Ok((region, warnings))
}

fn load_catalog(path: &Path) -> Result<PricingCatalog> {
    PricingCatalog::load(path)
        .with_context(|| format!("Failed to load pricing catalog: {}", path.display()))
}
