use clap::{Parser, Subcommand};

mod verify;

#[derive(Debug, Parser)]
#[command(name = "sitecheck-cli")]
#[command(about = "Website verification for business locations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check reachability, HTTPS support, and published address/hours/phone
    /// for every location with a website URI.
    Verify {
        /// Cap the number of locations processed this run.
        #[arg(long)]
        limit: Option<i64>,
        /// List what would be verified without touching the network or database.
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply pending database migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = sitecheck_core::load_app_config_from_env()
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Verify { limit, dry_run } => verify::run_verify(&config, limit, dry_run).await,
        Commands::Migrate => run_migrate(&config).await,
    }
}

async fn run_migrate(config: &sitecheck_core::AppConfig) -> anyhow::Result<()> {
    let pool = sitecheck_db::connect_pool(&config.database_url, verify::pool_config(config)).await?;
    let applied = sitecheck_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}
