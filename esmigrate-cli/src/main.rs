use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use esmigrate::{Config, HttpClient, MemoryClient, MigrationStep, Up0002};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "esmigrate")]
#[command(about = "Apply esmigrate steps to an Elasticsearch cluster")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply step 0002-java to an index
    Apply {
        /// Target index
        #[arg(short, long)]
        index: String,

        /// Cluster URL, overrides the config file
        #[arg(long, env = "ESMIGRATE_URL")]
        url: Option<String>,
    },

    /// Dry-run step 0002-java in memory and print the write it would send
    Plan {
        /// Target index
        #[arg(short, long)]
        index: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Apply { index, url } => {
            if let Some(url) = url {
                config.elasticsearch.url = url;
            }
            let client = HttpClient::from_config(&config.elasticsearch)
                .context("Invalid Elasticsearch configuration")?;

            tracing::info!("Applying {} to '{}' via {}", Up0002.id(), index, client.base_url());
            Up0002
                .execute(&client, &index)
                .await
                .with_context(|| format!("Step {} failed on index '{}'", Up0002.id(), index))?;
            println!("Applied {} to '{}'", Up0002.id(), index);
        }
        Commands::Plan { index } => {
            let dry_run = MemoryClient::new();
            Up0002
                .execute(&dry_run, &index)
                .await
                .with_context(|| format!("Dry run rejected index '{}'", index))?;
            let request = Up0002.request(&index);
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}
