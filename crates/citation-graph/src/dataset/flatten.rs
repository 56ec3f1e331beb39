//! Nested tree to flat adjacency-list conversion.

use std::collections::HashSet;

use super::FlatDataset;
use crate::models::{Paper, PaperTree};

/// Flatten a nested paper tree into a deduplicated dataset.
///
/// Walks the tree depth-first in pre-order, citations before references. A
/// paper is kept the first time its ID is seen with a title; later records
/// with the same ID are ignored along with their subtrees. Stub records are
/// dropped but their children are still walked, so a stub never hides papers
/// only reachable through it.
#[must_use]
pub fn flatten(root: &PaperTree) -> FlatDataset {
    let mut retained: HashSet<&str> = HashSet::new();
    let mut papers = Vec::new();
    let mut stubs = 0usize;

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(id) = node.paper_id.as_deref() {
            if retained.contains(id) {
                continue;
            }
            if !node.is_stub() {
                retained.insert(id);
                papers.push(Paper::from(node));
            }
        }
        if node.is_stub() {
            stubs += 1;
        }

        // Reversed so the first citation is popped next.
        stack.extend(node.references.iter().rev());
        stack.extend(node.citations.iter().rev());
    }

    tracing::debug!(papers = papers.len(), stubs, "Flattened paper tree");

    FlatDataset::from_papers(papers, root.paper_id.clone().unwrap_or_default())
}
