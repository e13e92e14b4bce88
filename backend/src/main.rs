//! Crop Physics Engine - command line interface
//!
//! Runs the water balance, VPD, crop growth and yield stress analyses over sensor
//! exports and satellite series, printing JSON (or CSV for the water balance).

use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_physics::external::{DiseaseSignalClient, HttpSatelliteClient, StaticSatelliteSource};
use crop_physics::services::io::{export_to_csv, read_sensor_file};
use crop_physics::{AnalysisRequest, AppError, AppResult, Config, PhysicsService};
use shared::{DiseaseDetection, GpsCoordinates, PhysicsResult};

#[derive(Parser, Debug)]
#[command(name = "cpe")]
#[command(about = "Physics-informed water balance and crop stress analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Daily water balance with the full analysis result
    WaterBalance {
        #[command(flatten)]
        common: CommonArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Vapour pressure deficit per sensor day
    Vpd {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Growing degree days, LAI and growth stage
    CropGrowth {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Combined VPD and water stress with the yield outlook
    YieldStress {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// First day of the analysis window (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// Last day of the analysis window (YYYY-MM-DD), defaults to today
    #[arg(long)]
    end: Option<String>,

    /// Field latitude in degrees
    #[arg(long, env = "CPE_FIELD_LAT", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Field longitude in degrees
    #[arg(long, env = "CPE_FIELD_LNG", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Sensor readings, JSON array or CSV export
    #[arg(long)]
    sensors: Option<PathBuf>,

    /// Satellite series JSON; fetched from the configured endpoint when omitted
    #[arg(long)]
    satellite: Option<PathBuf>,

    /// Disease detections JSON (`[{class, confidence}]`)
    #[arg(long)]
    detections: Option<PathBuf>,

    /// Field identifier for the disease signal service
    #[arg(long)]
    field_id: Option<String>,

    /// Attainable yield in kg/ha, overrides configuration
    #[arg(long)]
    base_yield: Option<f64>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cpe=debug,crop_physics=debug,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    tracing::info!("Environment: {}", config.environment);

    let cli = Cli::parse();

    if let Err(e) = run(cli.command, config).await {
        let response = e.to_response();
        eprintln!("{}", serde_json::to_string_pretty(&response)?);
        std::process::exit(if e.is_fatal_input() { 2 } else { 1 });
    }

    Ok(())
}

async fn run(command: Command, config: Config) -> AppResult<()> {
    let (common, default_days) = match &command {
        Command::WaterBalance { common, .. } => (common, 30),
        Command::Vpd { common } => (common, 7),
        Command::CropGrowth { common } => (common, 30),
        Command::YieldStress { common } => (common, 14),
    };

    let request = build_request(common, default_days)?;
    let service = PhysicsService::new(config.engine.clone())?
        .with_optional_satellite(HttpSatelliteClient::from_config(&config.satellite)?)
        .with_optional_disease_signals(DiseaseSignalClient::from_config(&config.disease)?);

    let result = service.analyze(request).await?;

    let output = match &command {
        Command::WaterBalance {
            format: OutputFormat::Csv,
            ..
        } => {
            print!("{}", export_to_csv(&result.water_balance)?);
            return Ok(());
        }
        Command::WaterBalance { .. } => serde_json::to_value(&result)?,
        Command::Vpd { .. } => vpd_view(&result),
        Command::CropGrowth { .. } => crop_growth_view(&result),
        Command::YieldStress { .. } => yield_stress_view(&result),
    };

    let text = if common.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", text);
    Ok(())
}

fn build_request(args: &CommonArgs, default_days: u64) -> AppResult<AnalysisRequest> {
    let today = Utc::now().date_naive();
    let end = args.end.clone().unwrap_or_else(|| today.to_string());
    let start = match &args.start {
        Some(start) => start.clone(),
        None => {
            let end_date = shared::parse_iso_date("end", &end)?;
            days_before(end_date, default_days).to_string()
        }
    };

    let location = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            shared::validate_coordinates(lat, lng).map_err(|m| AppError::Validation {
                field: "lat/lng".to_string(),
                message: m.to_string(),
            })?;
            GpsCoordinates::from_degrees(lat, lng)
        }
        (None, None) => None,
        _ => {
            return Err(AppError::Configuration(
                "--lat and --lng must be given together".to_string(),
            ))
        }
    };

    let readings = match &args.sensors {
        Some(path) => read_sensor_file(path)?,
        None => Vec::new(),
    };

    let satellite = match &args.satellite {
        Some(path) => Some(StaticSatelliteSource::from_file(path)?.into_data()),
        None => None,
    };

    let detections = match &args.detections {
        Some(path) => Some(read_detections(path)?),
        None => None,
    };

    Ok(AnalysisRequest {
        start_date: start,
        end_date: end,
        location,
        field_id: args.field_id.clone(),
        readings,
        satellite,
        irrigation: Default::default(),
        detections,
        base_yield_kg_per_ha: args.base_yield,
    })
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

fn read_detections(path: &Path) -> AppResult<Vec<DiseaseDetection>> {
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    Ok(serde_json::from_reader(file)?)
}

fn vpd_view(result: &PhysicsResult) -> serde_json::Value {
    json!({
        "vpdAnalysis": result.vpd_analysis,
        "averageVPD": result.summary.average_vpd,
        "maxVPD": result.summary.max_vpd,
        "metadata": result.metadata,
    })
}

fn crop_growth_view(result: &PhysicsResult) -> serde_json::Value {
    json!({
        "cropGrowth": result.crop_growth,
        "currentGrowthStage": result.summary.current_growth_stage,
        "accumulatedGDD": result.summary.accumulated_gdd,
        "currentLAI": result.summary.current_lai,
        "metadata": result.metadata,
    })
}

fn yield_stress_view(result: &PhysicsResult) -> serde_json::Value {
    json!({
        "yieldStress": result.yield_stress,
        "averageYieldImpactPercent": result.summary.average_yield_impact_percent,
        "yieldOutlook": result.yield_outlook,
        "disease": result.disease,
        "recommendations": result.recommendations,
        "metadata": result.metadata,
    })
}
