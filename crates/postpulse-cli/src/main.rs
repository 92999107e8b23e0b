use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "postpulse")]
#[command(about = "postpulse command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a profile to scrape.
    AddProfile {
        /// LinkedIn profile URL.
        #[arg(long)]
        url: String,
        /// Human-readable name for the profile.
        #[arg(long)]
        name: Option<String>,
    },
    /// Run a scrape for a profile and ingest its posts.
    Scrape {
        #[arg(long)]
        profile_id: Uuid,
        /// LinkedIn profile URL to scrape.
        #[arg(long)]
        profile_url: String,
        #[arg(long)]
        max_posts: Option<u32>,
    },
    /// Show a profile's scrape status.
    Status {
        #[arg(long)]
        profile_id: Uuid,
    },
    /// Analyze post text from a file (or stdin) and print the result as JSON.
    Analyze {
        /// File to read; stdin when omitted.
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::AddProfile { url, name } => add_profile(&url, name.as_deref()).await,
        Commands::Scrape {
            profile_id,
            profile_url,
            max_posts,
        } => scrape(profile_id, &profile_url, max_posts).await,
        Commands::Status { profile_id } => status(profile_id).await,
        Commands::Analyze { file } => analyze(file.as_deref()),
    }
}

async fn add_profile(url: &str, name: Option<&str>) -> anyhow::Result<()> {
    let config = postpulse_core::load_app_config()?;
    let pool = connect(&config).await?;

    let row = postpulse_db::insert_profile(&pool, name, url).await?;
    println!("created profile {} ({})", row.id, row.linkedin_url);
    Ok(())
}

async fn scrape(profile_id: Uuid, profile_url: &str, max_posts: Option<u32>) -> anyhow::Result<()> {
    let config = postpulse_core::load_app_config()?;
    let pool = connect(&config).await?;

    if postpulse_db::get_profile(&pool, profile_id).await?.is_none() {
        anyhow::bail!("profile {profile_id} not found");
    }

    let client = postpulse_scraper::HarvestClient::with_base_url(
        &config.harvest_api_token,
        &config.harvest_actor,
        config.harvest_request_timeout_secs,
        &config.harvest_base_url,
    )?;
    let ingest = postpulse_ingest::IngestConfig::from_app_config(&config);
    let store = postpulse_ingest::PgStore::new(pool);

    let outcome = postpulse_ingest::run_scrape(
        &client,
        &store,
        &ingest,
        profile_id,
        profile_url,
        max_posts.unwrap_or(config.default_max_posts),
    )
    .await?;

    println!(
        "scraped {} posts, stored {}",
        outcome.posts_scraped, outcome.posts_stored
    );
    Ok(())
}

async fn status(profile_id: Uuid) -> anyhow::Result<()> {
    let config = postpulse_core::load_app_config()?;
    let pool = connect(&config).await?;

    let profile = postpulse_db::get_profile(&pool, profile_id)
        .await?
        .with_context(|| format!("profile {profile_id} not found"))?;

    match profile.last_scraped_at {
        Some(at) => println!("{} (last scraped {})", profile.scrape_status, at.to_rfc3339()),
        None => println!("{} (never scraped)", profile.scrape_status),
    }
    Ok(())
}

fn analyze(file: Option<&std::path::Path>) -> anyhow::Result<()> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("could not read stdin")?;
            buf
        }
    };

    let analysis = postpulse_ingest::analyze(&content);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

async fn connect(config: &postpulse_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = postpulse_db::PoolConfig::from_app_config(config);
    let pool = postpulse_db::connect_pool(&config.database_url, pool_config).await?;
    postpulse_db::run_migrations(&pool).await?;
    Ok(pool)
}
