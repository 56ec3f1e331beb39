//! Growing a nested dataset from the Semantic Scholar API.
//!
//! Starting at a root paper, each fetched record has a bounded number of its
//! citations and references replaced by their own fetched records, recursively.
//! Citations grow from the end of the list (most recent first), references
//! from the start. Requests are issued one at a time.

use std::collections::HashSet;

use futures::future::BoxFuture;

use crate::client::SemanticScholarClient;
use crate::config::{fetch, fields};
use crate::error::{ClientError, ClientResult};
use crate::models::PaperTree;

/// Which lists of a fetched record are expanded further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Root record: both directions.
    Both,
    /// Reached through a citation: keep following citations.
    Citations,
    /// Reached through a reference: keep following references.
    References,
}

impl FetchKind {
    const fn follows_citations(self) -> bool {
        matches!(self, Self::Both | Self::Citations)
    }

    const fn follows_references(self) -> bool {
        matches!(self, Self::Both | Self::References)
    }
}

/// Bounds on how far the tree grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Children expanded per record and direction.
    pub max_per_level: usize,

    /// No more citations are expanded once this many citation-side fetches ran.
    pub max_citation_fetches: usize,

    /// No more references are expanded once this many reference-side fetches ran.
    pub max_reference_fetches: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_per_level: fetch::MAX_PER_LEVEL,
            max_citation_fetches: fetch::MAX_CITATION_FETCHES,
            max_reference_fetches: fetch::MAX_REFERENCE_FETCHES,
        }
    }
}

/// Recursive dataset fetcher.
#[derive(Debug)]
pub struct DatasetFetcher {
    client: SemanticScholarClient,
    limits: FetchLimits,
    fetched: HashSet<String>,
    citation_fetches: usize,
    reference_fetches: usize,
}

impl DatasetFetcher {
    /// Create a fetcher with default limits.
    #[must_use]
    pub fn new(client: SemanticScholarClient) -> Self {
        Self::with_limits(client, FetchLimits::default())
    }

    /// Create a fetcher with custom limits.
    #[must_use]
    pub fn with_limits(client: SemanticScholarClient, limits: FetchLimits) -> Self {
        Self {
            client,
            limits,
            fetched: HashSet::new(),
            citation_fetches: 0,
            reference_fetches: 0,
        }
    }

    /// Fetch the nested tree rooted at `root_id`.
    ///
    /// # Errors
    ///
    /// Returns error if the root cannot be fetched, or a nested request fails
    /// for any reason other than the paper not being found.
    pub async fn fetch_tree(&mut self, root_id: &str) -> ClientResult<PaperTree> {
        let tree = self.fetch(root_id.to_string(), FetchKind::Both).await?;
        tracing::info!(
            papers = self.fetched.len(),
            citation_fetches = self.citation_fetches,
            reference_fetches = self.reference_fetches,
            "Fetched paper tree"
        );
        Ok(tree)
    }

    /// Number of distinct papers fetched so far.
    #[must_use]
    pub fn fetched_count(&self) -> usize {
        self.fetched.len()
    }

    fn fetch(&mut self, paper_id: String, kind: FetchKind) -> BoxFuture<'_, ClientResult<PaperTree>> {
        Box::pin(async move {
            let mut node = self.client.get_paper_tree(&paper_id, fields::TREE).await?;
            self.record(node.paper_id.clone().unwrap_or(paper_id), kind);

            if kind.follows_citations()
                && !node.citations.is_empty()
                && self.citation_fetches < self.limits.max_citation_fetches
            {
                let len = node.citations.len();
                for i in (len.saturating_sub(self.limits.max_per_level)..len).rev() {
                    if let Some(child) = self.expand(&node.citations[i], FetchKind::Citations).await? {
                        node.citations[i] = child;
                    }
                }
            }

            if kind.follows_references()
                && !node.references.is_empty()
                && self.reference_fetches < self.limits.max_reference_fetches
            {
                let len = node.references.len().min(self.limits.max_per_level);
                for i in 0..len {
                    if let Some(child) = self.expand(&node.references[i], FetchKind::References).await? {
                        node.references[i] = child;
                    }
                }
            }

            Ok(node)
        })
    }

    /// Fetch a shallow child record unless it was fetched before.
    ///
    /// A child the API does not know stays a stub.
    async fn expand(&mut self, shallow: &PaperTree, kind: FetchKind) -> ClientResult<Option<PaperTree>> {
        let Some(id) = shallow.paper_id.as_deref() else {
            return Ok(None);
        };
        if self.fetched.contains(id) {
            return Ok(None);
        }

        match self.fetch(id.to_string(), kind).await {
            Ok(child) => Ok(Some(child)),
            Err(ClientError::NotFound { .. }) => {
                tracing::warn!(paper_id = id, "Paper not found, keeping stub");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn record(&mut self, paper_id: String, kind: FetchKind) {
        if kind.follows_citations() {
            self.citation_fetches += 1;
        }
        if kind.follows_references() {
            self.reference_fetches += 1;
        }
        tracing::debug!(
            paper_id = %paper_id,
            citation_fetches = self.citation_fetches,
            reference_fetches = self.reference_fetches,
            "Fetched paper"
        );
        self.fetched.insert(paper_id);
    }
}
