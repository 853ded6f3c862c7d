mod enrich;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vcintel_core::CompanyStage;

#[derive(Debug, Parser)]
#[command(name = "vcintel-cli")]
#[command(about = "Enrich company profiles from their public websites")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full enrichment pipeline and print the result as JSON
    Enrich {
        /// Company website (scheme optional, e.g. acme.io)
        website: String,
        /// Display name used by the synthetic page and heuristic fallback
        #[arg(long)]
        name: Option<String>,
        /// Sector, e.g. Fintech
        #[arg(long)]
        sector: Option<String>,
        /// Funding stage: Pre-Seed, Seed, Series A or Series B+
        #[arg(long)]
        stage: Option<CompanyStage>,
        /// Headquarters location
        #[arg(long)]
        location: Option<String>,
        /// Caller identifier echoed on the result
        #[arg(long)]
        company_id: Option<String>,
    },
    /// Print the homepage URLs that would be tried, in order
    Candidates {
        website: String,
    },
    /// Fetch one page and print its visible text
    Fetch {
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vcintel_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Enrich {
            website,
            name,
            sector,
            stage,
            location,
            company_id,
        } => {
            let request = vcintel_core::EnrichmentRequest {
                website,
                company_id,
                name,
                sector,
                stage,
                location,
            };
            enrich::run_enrich(&config, &request).await?;
        }
        Commands::Candidates { website } => enrich::run_candidates(&website)?,
        Commands::Fetch { url } => enrich::run_fetch(&config, &url).await?,
    }

    Ok(())
}
