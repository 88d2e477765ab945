//! gemquote CLI: submit a piece for pricing, get an instant ballpark, or list
//! stored submissions.
//!
//! `submit` talks to the API at GEMQUOTE_API_URL. `submissions` reads the blob
//! store directly using the server's STORAGE_BACKEND settings.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gemquote_cli::{init_tracing, parse_day, render_ballpark, summarize_record};
use gemquote_client::{
    ApiClient, ClientConfig, IntakeController, IntakeOrchestrator, IntakeState, IntakeTrigger,
    JsonFileSessionStore, PhotoFile, RandomEtaEstimator, SharedIntakeController,
    SimulatedQueueEstimator,
};
use gemquote_core::models::{Brand, Channel};
use gemquote_core::pricing::ballpark;
use gemquote_core::Config;
use gemquote_storage::keys::submissions_prefix_for;
use gemquote_storage::{create_storage, BlobStore};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "gemquote", about = "Jewelry pricing beta intake")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a photo and join today's beta queue
    Submit {
        /// Path to the photo (JPEG/PNG up to 10MB)
        #[arg(long)]
        file: PathBuf,
        /// Where the report is emailed
        #[arg(long)]
        email: String,
        /// Where you plan to sell: Etsy, Shopify, "Craft fair", Instagram
        #[arg(long)]
        channel: Channel,
        /// Materials used, e.g. "20ga copper wire, 4mm glass beads"
        #[arg(long)]
        materials: Option<String>,
        /// Time spent, in hours
        #[arg(long)]
        hours: Option<f64>,
        /// Brand positioning: budget, mid, premium
        #[arg(long, default_value = "mid")]
        brand: Brand,
    },
    /// Instant price range from materials cost and time spent
    Ballpark {
        /// Materials cost in dollars
        #[arg(long)]
        materials: Decimal,
        /// Hours spent
        #[arg(long)]
        hours: Decimal,
        /// Brand positioning: budget, mid, premium
        #[arg(long, default_value = "mid")]
        brand: Brand,
    },
    /// List submission records stored for a UTC day
    Submissions {
        /// Day as YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<String>,
        /// Print each full record instead of a one-line summary
        #[arg(long)]
        full: bool,
    },
}

async fn submit(
    file: PathBuf,
    email: String,
    channel: Channel,
    materials: Option<String>,
    hours: Option<f64>,
    brand: Brand,
) -> anyhow::Result<bool> {
    let config = ClientConfig::from_env()?;
    let transport = Arc::new(ApiClient::new(&config).context("Failed to create API client")?);
    let session = Arc::new(JsonFileSessionStore::in_temp_dir());
    let queue = Arc::new(SimulatedQueueEstimator::new(session, config.daily_slot_limit));

    let mut intake = IntakeOrchestrator::new(transport, queue, Arc::new(RandomEtaEstimator::new()))
        .with_user_agent(format!("gemquote-cli/{}", env!("CARGO_PKG_VERSION")));

    let controller = SharedIntakeController::new();
    let _subscription = intake.subscribe(&controller);
    let controller: Arc<dyn IntakeController> = Arc::new(controller);
    IntakeTrigger::new("gemquote submit", controller).activate();
    intake.poll_open_request();

    let photo = PhotoFile::from_path(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let form = intake.form_mut()?;
    form.photo = Some(photo);
    form.email = email;
    form.channel = Some(channel);
    form.materials = materials.unwrap_or_default();
    form.hours = hours;
    form.brand = brand;

    println!("Slots left today: {}", intake.slots_left_display());
    println!("Joining…");

    let state = intake.submit().await?.clone();
    match state {
        IntakeState::Success { record_id, .. } => {
            if let Some(confirmation) = intake.confirmation() {
                println!("{}", confirmation);
            }
            tracing::debug!(record_id = %record_id, "Submission stored");
            println!("We’ll email your PDF report. Want a quick ballpark now? Run `gemquote ballpark`.");
            Ok(true)
        }
        _ => {
            eprintln!("{}", intake.notice().unwrap_or(gemquote_client::FAILURE_NOTICE));
            Ok(false)
        }
    }
}

async fn list_submissions(date: Option<String>, full: bool) -> anyhow::Result<()> {
    let day = parse_day(date.as_deref())?;
    let config = Config::from_env()?;
    config.validate().context("Configuration validation failed")?;
    let storage: Arc<dyn BlobStore> = create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;

    let keys = storage.list(&submissions_prefix_for(day)).await?;
    if keys.is_empty() {
        println!("No submissions for {}", day);
        return Ok(());
    }

    for key in &keys {
        let body = storage.get(key).await?;
        let record: serde_json::Value = serde_json::from_slice(&body)
            .with_context(|| format!("Record {} is not valid JSON", key))?;
        if full {
            println!("# {}\n{}", key, serde_json::to_string_pretty(&record)?);
        } else {
            println!("{}", summarize_record(key, &record));
        }
    }
    println!("{} submission(s) for {}", keys.len(), day);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            file,
            email,
            channel,
            materials,
            hours,
            brand,
        } => {
            if !submit(file, email, channel, materials, hours, brand).await? {
                std::process::exit(1);
            }
        }
        Commands::Ballpark {
            materials,
            hours,
            brand,
        } => {
            let estimate = ballpark(materials, hours, brand)?;
            println!("{}", render_ballpark(&estimate));
        }
        Commands::Submissions { date, full } => {
            list_submissions(date, full).await?;
        }
    }

    Ok(())
}
