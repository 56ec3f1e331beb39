//! Citation Graph Server - Entry Point
//!
//! Serves the diagram client, answers one-off filter queries, and fetches
//! datasets from Semantic Scholar.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use citation_graph::config::{ClientConfig, Config};
use citation_graph::fetch::DatasetFetcher;
use citation_graph::models::FilterSpec;
use citation_graph::server::DiagramServer;
use citation_graph::{SemanticScholarClient, dataset, engine, formatters};

#[derive(Parser, Debug)]
#[command(name = "citation-graph")]
#[command(about = "Interactive citation graph server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the diagram client
    Serve {
        /// Transport mode: http or stdio
        #[arg(long, default_value = "http")]
        transport: Transport,

        /// HTTP server port (only used with --transport http)
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Nested paper dataset
        #[arg(long, env = "CITATION_GRAPH_DATASET")]
        dataset: Option<PathBuf>,

        /// Directory with the bundled diagram client
        #[arg(long, env = "CITATION_GRAPH_STATIC_DIR")]
        static_dir: Option<PathBuf>,
    },

    /// Print the papers matching a filter
    Query {
        /// Nested paper dataset
        #[arg(long, env = "CITATION_GRAPH_DATASET")]
        dataset: Option<PathBuf>,

        /// Filter as JSON (e.g. '{"paperIds": ["abc"], "additionalChildLevels": 1}')
        #[arg(long)]
        filter: Option<String>,

        /// Output format
        #[arg(long, default_value = "markdown")]
        format: OutputFormat,
    },

    /// Fetch a dataset from Semantic Scholar
    Fetch {
        /// Paper ID the dataset grows from
        #[arg(long)]
        root: String,

        /// Output file
        #[arg(long)]
        output: PathBuf,

        /// Semantic Scholar API key (optional, enables higher rate limits)
        #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY")]
        api_key: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// HTTP with the WebSocket action protocol
    #[default]
    Http,
    /// Line-delimited actions over standard input/output
    Stdio,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Logs go to stderr so stdout stays free for stdio actions and query output.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

/// Base configuration with command-line overrides applied.
fn load_config(dataset_path: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(path) = dataset_path {
        config.dataset_path = path;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting citation graph");

    match cli.command {
        Command::Serve { transport, port, dataset: dataset_path, static_dir } => {
            let mut config = load_config(dataset_path)?;
            if let Some(port) = port {
                config.port = port;
            }
            if static_dir.is_some() {
                config.static_dir = static_dir;
            }

            let server = DiagramServer::from_config(config)?;
            match transport {
                Transport::Http => server.run_http().await?,
                Transport::Stdio => server.run_stdio().await?,
            }
        }
        Command::Query { dataset: dataset_path, filter, format } => {
            let config = load_config(dataset_path)?;
            let filter: Option<FilterSpec> = filter.as_deref().map(serde_json::from_str).transpose()?;

            let tree = dataset::load_tree(&config.dataset_path)?;
            let flat = dataset::flatten(&tree);
            let papers = engine::filter_papers(&flat, filter.as_ref());

            let output = match format {
                OutputFormat::Markdown => formatters::format_papers_markdown(&papers),
                OutputFormat::Json => {
                    serde_json::to_string_pretty(&formatters::format_papers_json(&papers))?
                }
            };
            println!("{output}");
        }
        Command::Fetch { root, output, api_key } => {
            let client = SemanticScholarClient::new(ClientConfig::new(api_key))?;
            tracing::info!(root = %root, has_api_key = client.has_api_key(), "Fetching dataset");

            let mut fetcher = DatasetFetcher::new(client);
            let tree = fetcher.fetch_tree(&root).await?;
            dataset::save_tree(&tree, &output)?;

            tracing::info!(papers = fetcher.fetched_count(), output = %output.display(), "Done");
        }
    }

    Ok(())
}
