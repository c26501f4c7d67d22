use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quote_cli::app::{self, CatalogReport, PremiumReport, ProgressReport};
use quote_cli::{csv_loader, logging};
use quote_core::calculations::{PremiumCalculator, ProgressModel};
use quote_core::store::KeyValueStore;
use quote_core::{
    DEFAULT_EXCESS_AMOUNT, PolicyPeriod, QuoteInputs, Step, VehicleType, standard_catalog,
};
use tracing::info;

/// Motor insurance quote tools: premium estimates and wizard progress.
#[derive(Parser, Debug)]
#[command(name = "motor-quote")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log filter, e.g. "debug" or "quote_core=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price one combination of coverages
    Premium {
        /// Coverage id; repeat for several
        #[arg(short, long = "coverage")]
        coverages: Vec<String>,

        /// Vehicle type, e.g. private_car or truck
        #[arg(short, long)]
        vehicle: Option<String>,

        /// Excess amount
        #[arg(short, long, default_value_t = DEFAULT_EXCESS_AMOUNT)]
        excess: u32,

        /// Policy period in months
        #[arg(short, long, default_value_t = 12)]
        period: u32,
    },

    /// Price every row of a CSV file
    Batch {
        /// CSV with columns coverages, vehicle_type, excess_amount, policy_period
        file: PathBuf,
    },

    /// List the coverage packages on offer
    Catalog,

    /// Inspect or change saved wizard progress
    Progress {
        /// Store backend ("toml" or "memory")
        #[arg(short, long, default_value = "toml")]
        backend: String,

        /// Store location; empty uses $MOTOR_QUOTE_STORE or ./quote-session.toml
        #[arg(short, long, default_value = "")]
        store: String,

        #[command(subcommand)]
        action: ProgressAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProgressAction {
    /// Record a step's completion percentage (clamped to 0-100)
    Set {
        #[arg(value_parser = parse_step)]
        step: Step,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Print a step's completion percentage
    Get {
        #[arg(value_parser = parse_step)]
        step: Step,
    },
    /// Print every step and the overall percentage
    Show,
    /// Clear all step progress
    Reset,
}

fn parse_step(s: &str) -> Result<Step, String> {
    Step::parse(s).ok_or_else(|| {
        let names: Vec<&str> = Step::ALL.iter().map(Step::as_str).collect();
        format!("unknown step '{s}' (expected one of: {})", names.join(", "))
    })
}

fn run_premium(
    coverages: Vec<String>,
    vehicle: Option<String>,
    excess: u32,
    period: u32,
) {
    let inputs = QuoteInputs::new(
        coverages,
        vehicle.as_deref().map(VehicleType::parse),
        excess,
        PolicyPeriod::from_months(period),
    );
    let result = PremiumCalculator::default().calculate(&inputs, standard_catalog());

    println!(
        "{}",
        PremiumReport {
            inputs: &inputs,
            result: &result,
        }
    );
}

fn run_batch(file: &Path) -> Result<()> {
    let rows = csv_loader::load_from_file(file)
        .with_context(|| format!("Failed to load quotes from: {}", file.display()))?;
    info!(rows = rows.len(), file = %file.display(), "batch loaded");

    let calculator = PremiumCalculator::default();
    for (idx, inputs) in rows.iter().enumerate() {
        let result = calculator.calculate(inputs, standard_catalog());
        println!("{:>4}  {}", idx + 1, app::format_amount(result.premium));
    }
    Ok(())
}

fn run_progress(
    backend: &str,
    location: &str,
    action: ProgressAction,
) -> Result<()> {
    let store = app::open_store(backend, location)
        .with_context(|| format!("Failed to open '{backend}' store"))?;
    let mut model = ProgressModel::new(store);

    match action {
        ProgressAction::Set { step, value } => {
            model.set_step_progress(step, value);
            println!("{}: {}%", step.label(), model.step_progress(step));
        }
        ProgressAction::Get { step } => {
            println!("{}", model.step_progress(step));
        }
        ProgressAction::Show => {
            println!("{}", ProgressReport(&model.snapshot()));
        }
        ProgressAction::Reset => {
            model.reset();
            println!("Progress cleared.");
        }
    }

    model
        .store_mut()
        .flush()
        .context("Failed to save progress")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let (name, result) = match cli.command {
        Command::Premium {
            coverages,
            vehicle,
            excess,
            period,
        } => {
            run_premium(coverages, vehicle, excess, period);
            ("premium", Ok(()))
        }
        Command::Batch { file } => ("batch", run_batch(&file)),
        Command::Catalog => {
            print!("{}", CatalogReport(standard_catalog()));
            ("catalog", Ok(()))
        }
        Command::Progress {
            backend,
            store,
            action,
        } => ("progress", run_progress(&backend, &store, action)),
    };

    logging::log_command_error(name, &result);
    result
}
