use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use powerscan_flir::{estimate_from_brightness, FlirExtractor, ESTIMATE_WARNING};
use powerscan_models::{PdfRequest, TemperatureClamp, ThermalMode, ThermalResponse};
use reqwest::{multipart, Client};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "powerscan-cli")]
#[command(about = "CLI tool for PowerScan thermal extraction and reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, default_value = "http://localhost:10000")]
    endpoint: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract temperatures from a FLIR JPEG locally
    Extract {
        /// Image file
        file: PathBuf,
        /// Minimum temperature clamp (°C)
        #[arg(long)]
        min_temp: Option<f64>,
        /// Maximum temperature clamp (°C)
        #[arg(long)]
        max_temp: Option<f64>,
        /// Estimate from brightness instead of reading radiometric data
        #[arg(long)]
        estimate: bool,
    },
    /// Upload a FLIR JPEG to a running server
    Upload {
        /// Image file
        file: PathBuf,
        #[arg(long)]
        min_temp: Option<f64>,
        #[arg(long)]
        max_temp: Option<f64>,
    },
    /// Generate a PDF report from a JSON request
    Report {
        /// JSON file with measure_data, image URLs and elements
        request: PathBuf,
        /// Output PDF path
        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Extract {
            file,
            min_temp,
            max_temp,
            estimate,
        } => extract(&file, TemperatureClamp { min_temp, max_temp }, estimate)?,
        Commands::Upload {
            file,
            min_temp,
            max_temp,
        } => {
            upload(&client, &cli.endpoint, &file, TemperatureClamp { min_temp, max_temp }).await?
        }
        Commands::Report { request, out } => report(&client, &cli.endpoint, &request, &out).await?,
    }

    Ok(())
}

fn extract(file: &Path, clamp: TemperatureClamp, estimate: bool) -> Result<()> {
    info!("Extracting temperatures from {}", file.display());
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;

    let response: ThermalResponse = if estimate {
        // clamp bounds double as the estimation range
        let image = estimate_from_brightness(
            &bytes,
            clamp.min_temp.unwrap_or(20.0),
            clamp.max_temp.unwrap_or(45.0),
        )?;
        image.into_response(ThermalMode::Estimated, Some(ESTIMATE_WARNING.to_string()))
    } else {
        let mut image = FlirExtractor::new().extract(&bytes)?;
        image.clamp(clamp);
        image.into_response(ThermalMode::FlirSdk, None)
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn upload(client: &Client, endpoint: &str, file: &Path, clamp: TemperatureClamp) -> Result<()> {
    info!("Uploading {} to {}", file.display(), endpoint);
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.jpg".to_string());

    let form = multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name(filename));
    let response = client
        .post(format!("{endpoint}/upload"))
        .query(&clamp)
        .multipart(form)
        .send()
        .await?;

    if response.status().is_success() {
        let thermal: ThermalResponse = response.json().await?;
        println!("✅ {}x{} frame", thermal.width, thermal.height);
        println!("   Min: {:.2} °C", thermal.min_temp);
        println!("   Max: {:.2} °C", thermal.max_temp);
    } else {
        let error_text = response.text().await?;
        error!("Upload failed: {}", error_text);
        bail!(error_text);
    }
    Ok(())
}

async fn report(client: &Client, endpoint: &str, request: &Path, out: &Path) -> Result<()> {
    let body = std::fs::read_to_string(request)
        .with_context(|| format!("reading {}", request.display()))?;
    let request: PdfRequest = serde_json::from_str(&body).context("parsing report request")?;
    info!("Requesting report for measure {}", request.measure_data.id_unico);

    let response = client
        .post(format!("{endpoint}/api/report/pdf"))
        .json(&request)
        .send()
        .await?;

    if response.status().is_success() {
        let pdf = response.bytes().await?;
        std::fs::write(out, &pdf).with_context(|| format!("writing {}", out.display()))?;
        println!("📄 Report written to {} ({} bytes)", out.display(), pdf.len());
    } else {
        let error_text = response.text().await?;
        error!("Report generation failed: {}", error_text);
        bail!(error_text);
    }
    Ok(())
}
