//! CLI definition and dispatch.

use chrono::TimeDelta;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::{CsvAdapter, write_encoded};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::asset::{AssetAddress, AssetRegistry, AssetType};
use crate::domain::data::{AnySeries, DataList, DataType, Sample};
use crate::domain::error::ArchivistError;
use crate::domain::format::timeframe_label;
use crate::domain::indicator::IndicatorDataBuilder;
use crate::domain::set_settings::SetSettings;
use crate::domain::time_unit::MIN_TIME_FRAME;
use crate::ports::sample_port::SamplePort;

#[derive(Parser, Debug)]
#[command(name = "archivist", about = "Market data codec, aggregation and indicators")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect asset addresses
    Address {
        #[command(subcommand)]
        action: AddressCommand,
    },
    /// Inspect set settings
    Set {
        #[command(subcommand)]
        action: SetCommand,
    },
    /// Roll native samples into a coarser timeframe
    Aggregate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        data_type: AggregateType,
        /// Bucket size in seconds
        #[arg(short, long)]
        timeframe: i64,
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        precision: i8,
    },
    /// Feed samples through an indicator
    Indicator {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        asset: String,
        #[arg(long = "arg")]
        args: Vec<String>,
        /// State file, read first when present and rewritten afterwards
        #[arg(short, long)]
        state: Option<PathBuf>,
        /// Defaults to the asset's registry decimals
        #[arg(short, long, allow_negative_numbers = true)]
        precision: Option<i8>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// Print the parsed structure as JSON
    Parse { address: String },
    /// Validate against the registry and print the storage key
    Validate { address: String },
}

#[derive(Subcommand, Debug)]
pub enum SetCommand {
    /// Load and validate a set, printing each asset address
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateType {
    Unit,
    Qty,
}

impl From<AggregateType> for DataType {
    fn from(t: AggregateType) -> Self {
        match t {
            AggregateType::Unit => DataType::Unit,
            AggregateType::Qty => DataType::Quantity,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let registry = AssetRegistry::default();
    let result = match &cli.command {
        Command::Address {
            action: AddressCommand::Parse { address },
        } => run_address_parse(address),
        Command::Address {
            action: AddressCommand::Validate { address },
        } => run_address_validate(&registry, address),
        Command::Set {
            action: SetCommand::Validate { config },
        } => run_set_validate(&registry, config),
        Command::Aggregate {
            input,
            data_type,
            timeframe,
            precision,
        } => run_aggregate(input, (*data_type).into(), *timeframe, *precision),
        Command::Indicator {
            input,
            asset,
            args,
            state,
            precision,
        } => run_indicator(&registry, input, asset, args, state.as_deref(), *precision),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&cli.command, &err),
    }
}

fn report(command: &Command, err: &ArchivistError) -> ExitCode {
    match (command, err) {
        (
            Command::Address {
                action: AddressCommand::Parse { address } | AddressCommand::Validate { address },
            },
            ArchivistError::AddressParse(parse_err),
        ) => eprintln!("error: {}", parse_err.display_with_context(address)),
        _ => eprintln!("error: {err}"),
    }
    ExitCode::from(err)
}

fn run_address_parse(address: &str) -> Result<(), ArchivistError> {
    let parsed = AssetAddress::from(address).parse()?;
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

fn run_address_validate(registry: &AssetRegistry, address: &str) -> Result<(), ArchivistError> {
    let parsed = AssetAddress::from(address).parse()?;
    parsed.validate(registry)?;
    let canonical = parsed.build();
    println!("address: {}", canonical);
    println!("key:     {}", canonical.key());
    println!("column:  {}", parsed.csv_column_name(true)?);
    println!("name:    {}", parsed.pretty_string());
    Ok(())
}

fn run_set_validate(registry: &AssetRegistry, config: &Path) -> Result<(), ArchivistError> {
    eprintln!("Validating set: {}", config.display());
    let adapter = FileConfigAdapter::from_file(config)?;
    let set = SetSettings::load(&adapter)?;
    set.validate(registry)?;
    for (name, address) in set.addresses()? {
        println!("{}\t{}", name, address);
    }
    eprintln!("\nSet configuration is valid.");
    Ok(())
}

fn run_aggregate(
    input: &Path,
    data_type: DataType,
    timeframe: i64,
    precision: i8,
) -> Result<(), ArchivistError> {
    let timeframe =
        TimeDelta::try_seconds(timeframe).ok_or_else(|| ArchivistError::InvalidTimeframe {
            reason: format!("{}s is out of range", timeframe),
        })?;
    let label = timeframe_label(timeframe)?;

    let mut series = AnySeries::new(data_type);
    for (time, value) in CsvAdapter::new(input.to_path_buf()).load_samples()? {
        series.append(Sample::new(data_type, value, time));
    }
    let aggregated = series.resample(MIN_TIME_FRAME, timeframe);
    info!(
        input = series.len(),
        output = aggregated.len(),
        timeframe = %label,
        "aggregated samples"
    );

    write_encoded(io::stdout().lock(), "encoded", &aggregated.samples(), precision)
}

fn run_indicator(
    registry: &AssetRegistry,
    input: &Path,
    asset: &str,
    args: &[String],
    state: Option<&Path>,
    precision: Option<i8>,
) -> Result<(), ArchivistError> {
    let asset_type: AssetType = asset.parse()?;
    if !asset_type.is_indicator() {
        return Err(ArchivistError::ConfigInvalid {
            section: "indicator".to_string(),
            key: "asset".to_string(),
            reason: format!("{} is not an indicator", asset_type),
        });
    }
    let precision = match precision {
        Some(p) => p,
        None => registry
            .get(asset_type)
            .map(|c| c.default_decimals)
            .unwrap_or(-1),
    };
    let prev_state = match state {
        Some(path) if path.exists() => Some(fs::read(path)?),
        _ => None,
    };

    let mut builder = IndicatorDataBuilder::new(registry, asset_type, prev_state, args, precision)?;

    let mut points = Vec::new();
    for (time, value) in CsvAdapter::new(input.to_path_buf()).load_samples()? {
        let point = builder.compute_unsafe(&[Sample::new(DataType::Unit, value, time)])?;
        points.push(Sample::Point(point));
    }
    write_encoded(io::stdout().lock(), "value", &points, precision)?;

    if let Some(path) = state {
        fs::write(path, builder.prev_state())?;
        info!(state = %path.display(), "indicator state saved");
    }
    Ok(())
}
