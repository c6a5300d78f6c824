//! Dexter CLI - creature catalog browser
//!
//! This binary provides the command-line interface for the dexter catalog.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use dexter::output::{render_catalog_page, render_detail, render_status};
use dexter::progress::{create_progress_bar, load_all_with_progress};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dexter_catalog::{clamp_page, CatalogSession};
use dexter_core::config::Config;
use dexter_core::FilterCriteria;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "dexter")]
#[command(about = "Browse a PokeAPI-compatible creature catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Upstream API base URL (overrides config and environment)
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST server and load the catalog in the background
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// List catalog entities
    List {
        /// Case-insensitive name search; evolution relatives are included
        #[arg(short, long)]
        search: Option<String>,

        /// Exact type name, e.g. "fire"
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        entity_type: Option<String>,

        /// Exact generation name, e.g. "generation-i"
        #[arg(short, long)]
        generation: Option<String>,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Load the whole catalog before filtering
        #[arg(long)]
        all: bool,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the detail record of one entity
    Show {
        /// Entity name
        name: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List entity types known to the upstream
    Types,
    /// List generations known to the upstream
    Generations,
    /// Load the first batch and report catalog progress
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let config = load_config(cli.config.as_deref(), cli.base_url)?;

    match cli.command {
        Some(Commands::Serve { port }) => serve(config, port).await,
        Some(Commands::List {
            search,
            entity_type,
            generation,
            page,
            all,
            json,
        }) => {
            let criteria = FilterCriteria {
                search_term: search.unwrap_or_default(),
                entity_type: entity_type.unwrap_or_default(),
                generation: generation.unwrap_or_default(),
            };
            list(&config, &criteria, page, all, json).await
        }
        Some(Commands::Show { name, json }) => show(&config, &name, json).await,
        Some(Commands::Types) => {
            let session = create_session(&config)?;
            for name in session.list_types().await? {
                println!("{name}");
            }
            Ok(())
        }
        Some(Commands::Generations) => {
            let session = create_session(&config)?;
            for name in session.list_generations().await? {
                println!("{name}");
            }
            Ok(())
        }
        Some(Commands::Status) => status(&config).await,
        None => {
            println!("Run 'dexter list' to browse the catalog, or --help for more options");
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "dexter={level},dexter_core={level},dexter_upstream={level},\
             dexter_catalog={level},dexter_server={level},tower_http={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn load_config(config_path: Option<&Path>, base_url: Option<String>) -> Result<Config> {
    let mut config = Config::load(config_path).context("Failed to load configuration")?;
    if let Some(base_url) = base_url {
        config.upstream.base_url = Some(base_url);
    }
    config.validate()?;
    Ok(config)
}

fn create_session(config: &Config) -> Result<CatalogSession> {
    CatalogSession::from_config(config).context("Failed to create catalog session")
}

/// Start the REST server
async fn serve(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    info!(
        "Starting dexter server on {}:{}",
        config.server.host, config.server.port
    );
    println!(
        "Serving catalog on http://{}:{} (Ctrl+C to stop)",
        config.server.host, config.server.port
    );

    dexter_server::run_server(config).await?;
    Ok(())
}

async fn list(
    config: &Config,
    criteria: &FilterCriteria,
    page: usize,
    all: bool,
    json: bool,
) -> Result<()> {
    let session = create_session(config)?;

    if all {
        let pb = create_progress_bar(session.expected_total());
        load_all_with_progress(&session, &pb)
            .await
            .context("Failed to load the catalog")?;
    } else {
        session
            .load_initial_batch()
            .await
            .context("Failed to load the first catalog batch")?;
    }

    let mut result = session.query_catalog(criteria, page).await;
    let page = clamp_page(page, result.total_pages);
    if result.items.is_empty() && result.total_pages > 0 {
        result = session.query_catalog(criteria, page).await;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_catalog_page(&result, page, &session.status()));
    }
    Ok(())
}

async fn show(config: &Config, name: &str, json: bool) -> Result<()> {
    let session = create_session(config)?;
    let record = session.get_entity_detail(name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", render_detail(&record));
    }
    Ok(())
}

async fn status(config: &Config) -> Result<()> {
    let session = create_session(config)?;
    session
        .load_initial_batch()
        .await
        .context("Failed to load the first catalog batch")?;
    println!(
        "{}",
        render_status(&session.status(), session.expected_total())
    );
    Ok(())
}
