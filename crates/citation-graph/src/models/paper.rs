//! Paper data models: the nested dataset form and the flat graph form.

use serde::{Deserialize, Serialize};

/// Author reference as stored on a paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperAuthor {
    /// Semantic Scholar author ID.
    #[serde(default)]
    pub author_id: Option<String>,

    /// Author name.
    #[serde(default)]
    pub name: Option<String>,
}

impl PaperAuthor {
    /// Get the author name, falling back to "Unknown" if not available.
    #[must_use]
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Key used to deduplicate authors: the ID when present, otherwise the name.
    #[must_use]
    pub fn dedup_key(&self) -> Option<&str> {
        self.author_id.as_deref().or(self.name.as_deref())
    }
}

/// A paper record in the nested dataset.
///
/// Every record embeds the papers citing it and the papers it references as
/// nested sub-trees. Records that were never expanded by the fetcher only
/// carry a `paperId` and act as stubs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperTree {
    /// Semantic Scholar paper ID (the API returns null for unresolved papers).
    #[serde(default)]
    pub paper_id: Option<String>,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// List of authors.
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<PaperAuthor>,

    /// Fields of study (e.g., "Computer Science", "Medicine").
    #[serde(default)]
    pub fields_of_study: Option<Vec<String>>,

    /// Whether this paper is open access.
    #[serde(default)]
    pub is_open_access: Option<bool>,

    /// Papers citing this paper.
    #[serde(default, deserialize_with = "null_as_default")]
    pub citations: Vec<PaperTree>,

    /// Papers this paper cites.
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<PaperTree>,
}

impl PaperTree {
    /// Create a stub record carrying only an ID.
    #[must_use]
    pub fn stub(paper_id: impl Into<String>) -> Self {
        Self { paper_id: Some(paper_id.into()), ..Self::default() }
    }

    /// A record is retained in the flat graph only with an ID and a non-empty title.
    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.paper_id.is_none() || self.title.as_deref().is_none_or(str::is_empty)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A paper in flat form, with citations and references as ID lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Unique paper ID.
    pub paper_id: String,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// List of authors.
    #[serde(default)]
    pub authors: Vec<PaperAuthor>,

    /// Fields of study.
    #[serde(default)]
    pub fields_of_study: Option<Vec<String>>,

    /// Whether this paper is open access.
    #[serde(default)]
    pub is_open_access: Option<bool>,

    /// IDs of papers citing this paper.
    #[serde(default)]
    pub citations: Vec<String>,

    /// IDs of papers this paper cites.
    #[serde(default)]
    pub references: Vec<String>,

    /// Citations whose citing paper is part of the flattened dataset.
    #[serde(default)]
    pub citations_count: u32,

    /// References whose cited paper is part of the flattened dataset.
    #[serde(default)]
    pub references_count: u32,

    /// Pulled in by neighborhood expansion rather than matched directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<bool>,

    /// Matched the base filter before expansion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered: Option<bool>,

    /// Part of the filter result in highlight-only mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<bool>,
}

impl Paper {
    /// Get the paper title, falling back to "Untitled" if not available.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// Fields of study as a slice (empty when unknown).
    #[must_use]
    pub fn fields(&self) -> &[String] {
        self.fields_of_study.as_deref().unwrap_or_default()
    }

    /// Whether expansion added this paper.
    #[must_use]
    pub fn is_added(&self) -> bool {
        self.added.unwrap_or(false)
    }

    /// Get author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .filter_map(|a| a.name.as_ref())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Drop every citation and reference edge of this paper.
    pub fn clear_wires(&mut self) {
        self.citations.clear();
        self.references.clear();
    }
}

impl From<&PaperTree> for Paper {
    fn from(tree: &PaperTree) -> Self {
        fn ids(children: &[PaperTree]) -> Vec<String> {
            children.iter().filter_map(|c| c.paper_id.clone()).collect()
        }

        Self {
            paper_id: tree.paper_id.clone().unwrap_or_default(),
            title: tree.title.clone(),
            year: tree.year,
            authors: tree.authors.clone(),
            fields_of_study: tree.fields_of_study.clone(),
            is_open_access: tree.is_open_access,
            citations: ids(&tree.citations),
            references: ids(&tree.references),
            ..Self::default()
        }
    }
}
