//! Paper dataset: loading the nested tree and its flat, indexed form.

mod flatten;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Deserialize;

use crate::error::{DatasetError, DatasetResult};
use crate::models::{Paper, PaperAuthor, PaperTree};

pub use flatten::flatten;

/// Load the nested paper tree from a JSON file.
///
/// The tree nests one JSON level per citation hop, so the parser's recursion
/// limit is lifted.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not a paper tree, or the root
/// record has no ID.
pub fn load_tree(path: impl AsRef<Path>) -> DatasetResult<PaperTree> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DatasetError::io(path, e))?;

    let mut de = serde_json::Deserializer::from_reader(BufReader::new(file));
    de.disable_recursion_limit();
    let tree = PaperTree::deserialize(&mut de)?;
    de.end()?;

    tracing::info!(path = %path.display(), "Loaded paper tree");
    check_root(tree)
}

/// Parse a nested paper tree from a JSON string.
///
/// # Errors
///
/// Returns error if the input is not a paper tree or the root has no ID.
pub fn parse_tree(json: &str) -> DatasetResult<PaperTree> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let tree = PaperTree::deserialize(&mut de)?;
    de.end()?;
    check_root(tree)
}

/// Write a nested paper tree as JSON.
///
/// # Errors
///
/// Returns error if the file cannot be written.
pub fn save_tree(tree: &PaperTree, path: impl AsRef<Path>) -> DatasetResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DatasetError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer(&mut writer, tree)?;
    writer.flush().map_err(|e| DatasetError::io(path, e))?;

    tracing::info!(path = %path.display(), "Saved paper tree");
    Ok(())
}

fn check_root(tree: PaperTree) -> DatasetResult<PaperTree> {
    if tree.paper_id.is_none() {
        return Err(DatasetError::MissingRootId);
    }
    Ok(tree)
}

/// Flat, deduplicated dataset with lookup indexes.
///
/// Built once and never mutated; filtering only reads it.
#[derive(Debug, Clone, Default)]
pub struct FlatDataset {
    /// Papers in first-visit order.
    pub papers: Vec<Paper>,

    /// Unique authors across all papers.
    pub authors: Vec<PaperAuthor>,

    /// Unique fields of study, first-seen order.
    pub fields_of_study: Vec<String>,

    /// Sorted unique publication years.
    pub years: Vec<i32>,

    /// ID of the paper the dataset was grown from.
    pub root_id: String,

    index: HashMap<String, usize>,

    /// For each paper, the papers whose citation list contains it.
    inverse_citations: Vec<Vec<usize>>,
}

impl FlatDataset {
    /// Build a dataset from already flat papers.
    ///
    /// Duplicate IDs keep their first occurrence. Citation and reference counts
    /// are recomputed against the IDs present.
    #[must_use]
    pub fn from_papers(papers: Vec<Paper>, root_id: impl Into<String>) -> Self {
        let mut index = HashMap::with_capacity(papers.len());
        let mut unique = Vec::with_capacity(papers.len());
        for paper in papers {
            if !index.contains_key(&paper.paper_id) {
                index.insert(paper.paper_id.clone(), unique.len());
                unique.push(paper);
            }
        }
        let mut papers = unique;

        for paper in &mut papers {
            paper.citations_count = count_present(&paper.citations, &index);
            paper.references_count = count_present(&paper.references, &index);
        }

        let mut inverse_citations = vec![Vec::new(); papers.len()];
        for (citing, paper) in papers.iter().enumerate() {
            for id in &paper.citations {
                if let Some(&cited) = index.get(id) {
                    let entry: &mut Vec<usize> = &mut inverse_citations[cited];
                    if entry.last() != Some(&citing) {
                        entry.push(citing);
                    }
                }
            }
        }

        let (authors, fields_of_study) = unique_metadata(&papers);

        let mut years: Vec<i32> = papers.iter().filter_map(|p| p.year).collect();
        years.sort_unstable();
        years.dedup();

        Self {
            papers,
            authors,
            fields_of_study,
            years,
            root_id: root_id.into(),
            index,
            inverse_citations,
        }
    }

    /// Number of papers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Whether the dataset has no papers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Position of a paper in `papers`.
    #[must_use]
    pub fn index_of(&self, paper_id: &str) -> Option<usize> {
        self.index.get(paper_id).copied()
    }

    /// Look up a paper by ID.
    #[must_use]
    pub fn get(&self, paper_id: &str) -> Option<&Paper> {
        self.index_of(paper_id).map(|i| &self.papers[i])
    }

    /// Check whether a paper ID survived flattening.
    #[must_use]
    pub fn contains(&self, paper_id: &str) -> bool {
        self.index.contains_key(paper_id)
    }

    /// Papers whose citation list contains the paper at `idx`, in dataset order.
    #[must_use]
    pub fn inverse_citations(&self, idx: usize) -> &[usize] {
        self.inverse_citations.get(idx).map(Vec::as_slice).unwrap_or_default()
    }
}

fn unique_metadata(papers: &[Paper]) -> (Vec<PaperAuthor>, Vec<String>) {
    let mut seen_authors = HashSet::new();
    let mut authors = Vec::new();
    let mut seen_fields = HashSet::new();
    let mut fields_of_study = Vec::new();

    for paper in papers {
        for author in &paper.authors {
            if let Some(key) = author.dedup_key() {
                if seen_authors.insert(key) {
                    authors.push(author.clone());
                }
            }
        }
        for field in paper.fields() {
            if seen_fields.insert(field.as_str()) {
                fields_of_study.push(field.clone());
            }
        }
    }

    (authors, fields_of_study)
}

fn count_present(ids: &[String], index: &HashMap<String, usize>) -> u32 {
    ids.iter().filter(|id| index.contains_key(id.as_str())).count() as u32
}
