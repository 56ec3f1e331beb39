//! Graph generation: filtering, expansion and diagram assembly.
//!
//! [`GraphGenerator::compute_graph`] is the single entry point turning a
//! filter request into a [`GraphModel`]. The flattened dataset is computed
//! lazily on first use and shared read-only afterwards; results are cached
//! per request since the computation is pure.

pub mod assembler;
pub mod filter;

use std::sync::{Arc, OnceLock};

use moka::future::Cache;

use crate::config::Config;
use crate::dataset::{self, FlatDataset};
use crate::models::{FilterSpec, GRAPH_ID, GRAPH_TYPE, GraphModel, PaperTree, RenderOptions};

pub use assembler::assemble;
pub use filter::filter_papers;

type CacheKey = (Option<FilterSpec>, RenderOptions);

/// Builds diagram models from one dataset.
pub struct GraphGenerator {
    /// Nested source tree, flattened on first use.
    tree: Option<PaperTree>,

    dataset: OnceLock<Arc<FlatDataset>>,

    /// Computed models keyed by request.
    cache: Option<Cache<CacheKey, Arc<GraphModel>>>,

    title_max_chars: usize,
}

impl GraphGenerator {
    /// Create a generator over a nested paper tree.
    #[must_use]
    pub fn new(tree: PaperTree, config: &Config) -> Self {
        Self {
            tree: Some(tree),
            dataset: OnceLock::new(),
            cache: config.caches_results().then(|| {
                Cache::builder()
                    .max_capacity(config.cache_max_size)
                    .time_to_live(config.cache_ttl)
                    .build()
            }),
            title_max_chars: config.title_max_chars,
        }
    }

    /// Create a generator over an already flat dataset.
    #[must_use]
    pub fn from_dataset(dataset: FlatDataset, config: &Config) -> Self {
        Self {
            tree: None,
            dataset: OnceLock::from(Arc::new(dataset)),
            ..Self::new(PaperTree::default(), config)
        }
    }

    /// The flattened dataset, computed on first call.
    #[must_use]
    pub fn dataset(&self) -> Arc<FlatDataset> {
        Arc::clone(self.dataset.get_or_init(|| {
            let flat = self.tree.as_ref().map(dataset::flatten).unwrap_or_default();
            tracing::info!(
                papers = flat.len(),
                authors = flat.authors.len(),
                root = %flat.root_id,
                "Flattened dataset"
            );
            Arc::new(flat)
        }))
    }

    /// Compute the diagram model for a filter request.
    ///
    /// Metadata (authors, fields, years, root) always describes the full
    /// dataset so the filter panel can offer every option.
    #[must_use]
    pub fn compute_graph(
        &self,
        filter: Option<&FilterSpec>,
        render_options: RenderOptions,
    ) -> GraphModel {
        let dataset = self.dataset();
        let papers = filter::filter_papers(&dataset, filter);
        let children = assembler::assemble(&papers, self.title_max_chars);

        GraphModel {
            kind: GRAPH_TYPE.to_string(),
            id: GRAPH_ID.to_string(),
            children,
            root_id: dataset.root_id.clone(),
            authors: dataset.authors.clone(),
            fields_of_study: dataset.fields_of_study.clone(),
            years: dataset.years.clone(),
            render_options,
        }
    }

    /// Cached variant of [`Self::compute_graph`].
    pub async fn generate(
        &self,
        filter: Option<FilterSpec>,
        render_options: RenderOptions,
    ) -> Arc<GraphModel> {
        let Some(cache) = &self.cache else {
            return Arc::new(self.compute_graph(filter.as_ref(), render_options));
        };

        let key = (filter, render_options);
        let filter = key.0.clone();
        cache
            .get_with(key, async move {
                tracing::debug!("Graph cache miss");
                Arc::new(self.compute_graph(filter.as_ref(), render_options))
            })
            .await
    }
}

impl std::fmt::Debug for GraphGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphGenerator")
            .field("flattened", &self.dataset.get().is_some())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
