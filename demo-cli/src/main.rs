use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, error};
use units_core::{ConversionTable, Quantity, Unit, UnitsError};

/// Unit-aware arithmetic from the command line
#[derive(Parser, Debug)]
#[command(name = "units-demo")]
#[command(about = "Convert and combine quantities with units", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a value from one unit to another
    Convert {
        /// Raw value
        value: f64,
        /// Source unit, e.g. meters
        unit: Unit,
        /// Target unit, e.g. inches
        target: Unit,
    },
    /// Add two quantities, deferring when their units differ
    Add {
        /// Left value
        left: f64,
        /// Left unit
        left_unit: Unit,
        /// Right value
        right: f64,
        /// Right unit
        right_unit: Unit,
        /// Reduce the sum into this unit
        #[arg(short, long)]
        into: Option<Unit>,
    },
    /// List the unit catalog grouped by dimension
    Units,
}

fn run(args: Args) -> Result<(), UnitsError> {
    match args.command {
        Command::Convert {
            value,
            unit,
            target,
        } => {
            let quantity = Quantity::with_unit(value, unit);
            let converted = quantity.convert_to_unit(target)?;
            println!("{quantity} = {converted}");
        }
        Command::Add {
            left,
            left_unit,
            right,
            right_unit,
            into,
        } => {
            let left = Quantity::with_unit(left, left_unit);
            let sum = left.try_add(&Quantity::with_unit(right, right_unit))?;
            debug!(deferred = sum.is_deferred(), "Computed sum");
            println!("{sum}");
            if let Some(target) = into {
                println!("= {}", sum.as_unit(target)?);
            }
        }
        Command::Units => {
            for (dimension, units) in ConversionTable::global().families() {
                println!("{dimension}:");
                for unit in units {
                    println!("  {:<12} x{} (base)", unit.name(), unit.base_factor());
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
