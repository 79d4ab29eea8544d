use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

use sat_doppler::config::Config;
use sat_doppler::output::{ConsoleSink, OutputFormat, SEPARATOR};
use sat_doppler::predict::{EphemerisProvider, PredictError, SatelliteHandle, Sgp4Satellite};
use sat_doppler::tracker::{Clock, FixedClock, ReportSink, SystemClock, Tracker};

#[derive(Parser)]
#[command(name = "sat-doppler")]
#[command(about = "Real-time Doppler correction for satellite uplink and downlink")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a configuration file without fetching element sets
    Validate { config: String },
    /// Track the configured satellite until interrupted
    Run {
        #[command(flatten)]
        common: CommonArgs,
        /// Stop after this many reports
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Print a single report
    Once {
        #[command(flatten)]
        common: CommonArgs,
        /// RFC 3339 instant to evaluate instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

#[derive(Args)]
struct CommonArgs {
    config: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Run { common, ticks } => run(&common, ticks).await,
        Commands::Once { common, at } => once(&common, at).await,
    }
}

fn validate(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let station = match config.station() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("Configuration is valid");
    println!("  satellite: {}", config.satellite.name);
    println!("  elements:  {}", config.satellite.tle.describe());
    println!("  station:   {}", station);
    println!(
        "  receive {} MHz, transmit {} MHz, every {} ms",
        config.radio.receive_mhz,
        config.radio.transmit_mhz,
        config.interval.as_millis()
    );
    ExitCode::SUCCESS
}

async fn run(args: &CommonArgs, ticks: Option<u64>) -> ExitCode {
    let (config, satellite) = match prepare(&args.config).await {
        Some(prepared) => prepared,
        None => return ExitCode::FAILURE,
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupt received, stopping");
            interrupt.cancel();
        }
    });

    let mut sink = ConsoleSink::new(io::stdout(), args.format);
    track(&config, &satellite, SystemClock, &mut sink, args.format, cancel, ticks).await
}

async fn once(args: &CommonArgs, at: Option<DateTime<Utc>>) -> ExitCode {
    let (config, satellite) = match prepare(&args.config).await {
        Some(prepared) => prepared,
        None => return ExitCode::FAILURE,
    };

    let clock = FixedClock(at.unwrap_or_else(Utc::now));
    let mut sink = ConsoleSink::new(io::stdout(), args.format);
    track(
        &config,
        &satellite,
        clock,
        &mut sink,
        args.format,
        CancellationToken::new(),
        Some(1),
    )
    .await
}

/// Loads the configuration and resolves the satellite. Failures here are
/// fatal and reported before any tracking starts.
async fn prepare(path: &str) -> Option<(Config, Sgp4Satellite)> {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return None;
        }
    };

    let catalog = match config.satellite.tle.load().await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Element set error: {}", e);
            return None;
        }
    };
    log::info!("{} element sets from {}", catalog.len(), catalog.source());

    match catalog.fetch_satellite(&config.satellite.name) {
        Ok(satellite) => Some((config, satellite)),
        Err(e) => {
            eprintln!("Element set error: {}", e);
            if let PredictError::UnknownSatellite(_) = e {
                eprintln!("Names in {}:", catalog.source());
                for name in catalog.names() {
                    eprintln!("  {}", name);
                }
            }
            None
        }
    }
}

async fn track<H: SatelliteHandle, C: Clock, S: ReportSink>(
    config: &Config,
    satellite: &H,
    clock: C,
    sink: &mut S,
    format: OutputFormat,
    cancel: CancellationToken,
    ticks: Option<u64>,
) -> ExitCode {
    let station = match config.station() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // keep stdout parseable in JSON mode
    if format == OutputFormat::Text {
        println!("{}", satellite.info());
        println!("{}", station);
        println!("{}", SEPARATOR);
    } else {
        log::info!("Satellite: {}", satellite.info());
        log::info!("Station: {}", station);
    }

    let tracker = Tracker::new(station, satellite, clock, config.frequency_plan())
        .with_calculator(config.doppler_calculator())
        .with_interval(config.interval);

    match tracker.run(sink, cancel, ticks).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Tracking failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
