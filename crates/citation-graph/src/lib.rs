//! Citation Graph Server
//!
//! Serves an interactive citation graph to a browser diagram client. A nested
//! paper dataset is flattened once, then every filter request from the client
//! is answered with a freshly computed diagram model.
//!
//! # Features
//!
//! - **Filtering**: paper IDs, title, author, year range, fields of study, open access
//! - **Neighborhood expansion**: bounded hops along citations and inverse citations
//! - **Diagram assembly**: paper nodes with label compartments and deduplicated edges
//! - **Transports**: WebSocket action protocol over HTTP, or line-delimited stdio
//! - **Dataset fetcher**: grows a dataset from the Semantic Scholar Graph API
//!
//! # Example
//!
//! ```no_run
//! use citation_graph::{config::Config, dataset, engine::GraphGenerator};
//! use citation_graph::models::{FilterSpec, RenderOptions};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let tree = dataset::load_tree(&config.dataset_path)?;
//!     let generator = GraphGenerator::new(tree, &config);
//!
//!     let filter = FilterSpec::default().with_paper_ids(["root"]).with_levels(1, 1);
//!     let graph = generator.compute_graph(Some(&filter), RenderOptions::default());
//!     println!("{} papers", graph.paper_ids().len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod models;
pub mod server;

pub use client::SemanticScholarClient;
pub use config::Config;
pub use engine::GraphGenerator;
pub use error::{ClientError, DatasetError, ServerError};
