use std::{
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use log::{LevelFilter, error, info, warn};
use telemetry_toolkit::{
    AppConfig, Column, DerivedTelemetry, ExportFormat, ExportOptions, FilterPreset, HeaderNaming,
    SeriesStats, TelemetryError, TelemetryFilter,
    telemetry::{self, selection},
    writer,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Config file to use instead of the one in the user config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a telemetry CSV, add derived channels and export it
    Derive {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Use descriptive CSV headers (velocity_kmh, timestamp_seconds, position_meters)
        #[arg(long)]
        renamed: bool,

        /// Comma separated list of columns to export
        #[arg(long)]
        columns: Option<String>,
    },
    /// Print the derived rows that pass a threshold filter
    Filter {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        preset: Option<FilterPreset>,

        #[arg(long)]
        min_speed: Option<f64>,

        #[arg(long)]
        min_brake: Option<f64>,

        #[arg(long)]
        min_rpm: Option<f64>,

        /// Only print the first N matching rows
        #[arg(long)]
        head: Option<usize>,
    },
    /// Print count, mean, standard deviation, min and max of a column
    Stats {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, default_value = "speed_kmh")]
        column: String,
    },
    /// Print the built-in sample session with derived channels
    Sample,
    /// Write the default config to --config or the user config directory
    InitConfig {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, TelemetryError> {
    match path {
        Some(path) => AppConfig::from_file(path),
        None => Ok(AppConfig::from_local_file()?.unwrap_or_default()),
    }
}

fn load_and_derive(input: &Path) -> Result<Vec<DerivedTelemetry>, TelemetryError> {
    let records = telemetry::load_telemetry_csv(input)?;
    telemetry::derive(&records)
}

fn derive_file(
    config: &AppConfig,
    input: &Path,
    output: Option<&Path>,
    format: Option<ExportFormat>,
    renamed: bool,
    columns: Option<&str>,
) -> Result<(), TelemetryError> {
    let derived = load_and_derive(input)?;

    let options = ExportOptions {
        format: format.unwrap_or(config.export_format),
        columns: match columns {
            Some(names) => Column::parse_list(names)?,
            None => Column::ALL.to_vec(),
        },
        naming: if renamed {
            HeaderNaming::Renamed
        } else {
            config.header_naming
        },
    };

    match output {
        Some(output) => writer::export_telemetry(output, &derived, &options),
        None => writer::write_telemetry(io::stdout().lock(), &derived, &options),
    }
}

fn filter_file(
    config: &AppConfig,
    input: &Path,
    preset: Option<FilterPreset>,
    overrides: TelemetryFilter,
    head: Option<usize>,
) -> Result<(), TelemetryError> {
    let mut filter = preset
        .map(|p| config.filter_for(p).clone())
        .unwrap_or_default();
    filter.min_speed_kmh = overrides.min_speed_kmh.or(filter.min_speed_kmh);
    filter.min_brake_pressure_bar = overrides
        .min_brake_pressure_bar
        .or(filter.min_brake_pressure_bar);
    filter.min_rpm = overrides.min_rpm.or(filter.min_rpm);
    if filter.is_empty() {
        warn!("No filter thresholds given, every row will be printed");
    }

    let derived = load_and_derive(input)?;
    let matching = selection::filter_records(&derived, &filter);
    info!("{} of {} rows match {:?}", matching.len(), derived.len(), filter);

    let rows = selection::slice_rows(&matching, 0..head.unwrap_or(usize::MAX));
    writer::write_csv(io::stdout().lock(), rows, &Column::ALL, config.header_naming)
}

fn column_stats(input: &Path, column: &str) -> Result<(), TelemetryError> {
    let column: Column = column.parse()?;
    let derived = load_and_derive(input)?;

    // derive never returns an empty sequence
    if let Some(stats) = SeriesStats::for_column(&derived, column) {
        println!("column: {column}");
        println!("count:  {}", stats.count);
        println!("mean:   {:.3}", stats.mean);
        match stats.std {
            Some(std) => println!("std:    {std:.3}"),
            None => println!("std:    n/a"),
        }
        println!("min:    {:.3}", stats.min);
        println!("max:    {:.3}", stats.max);
    }
    Ok(())
}

fn sample(config: &AppConfig) -> Result<(), TelemetryError> {
    let derived = telemetry::derive(&telemetry::sample_session())?;
    writer::write_csv(io::stdout().lock(), &derived, &Column::ALL, config.header_naming)
}

fn init_config(path: Option<&Path>, force: bool) -> Result<(), TelemetryError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::default_path()?,
    };
    if AppConfig::write_default(&path, force)? {
        info!("Wrote default config to {:?}", path);
    } else {
        warn!("{:?} already exists, pass --force to replace it", path);
    }
    Ok(())
}

fn run(cli: &Args) -> Result<(), TelemetryError> {
    // init-config must work even when the current config does not parse
    let config = || load_config(cli.config.as_deref());
    match &cli.command {
        Commands::Derive {
            input,
            output,
            format,
            renamed,
            columns,
        } => derive_file(
            &config()?,
            input,
            output.as_deref(),
            *format,
            *renamed,
            columns.as_deref(),
        ),
        Commands::Filter {
            input,
            preset,
            min_speed,
            min_brake,
            min_rpm,
            head,
        } => {
            let overrides = TelemetryFilter {
                min_speed_kmh: *min_speed,
                min_brake_pressure_bar: *min_brake,
                min_rpm: *min_rpm,
            };
            filter_file(&config()?, input, *preset, overrides, *head)
        }
        Commands::Stats { input, column } => column_stats(input, column),
        Commands::Sample => sample(&config()?),
        Commands::InitConfig { force } => init_config(cli.config.as_deref(), *force),
    }
}

fn main() -> ExitCode {
    let cli = Args::parse();

    let mut logger = colog::default_builder();
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", snafu::Report::from_error(e));
            ExitCode::FAILURE
        }
    }
}
