//! Compact JSON output formatting.

use serde_json::{Value, json};

use crate::models::Paper;

/// Create a compact paper representation for JSON output.
///
/// Adjacency lists are reduced to their counts.
#[must_use]
pub fn compact_paper(paper: &Paper) -> Value {
    let mut obj = json!({
        "id": paper.paper_id,
        "title": paper.title_or_default(),
        "year": paper.year,
        "citedBy": paper.citations_count,
        "references": paper.references_count,
    });

    if !paper.authors.is_empty() {
        obj["authors"] =
            json!(paper.authors.iter().filter_map(|a| a.name.as_ref()).collect::<Vec<_>>());
    }

    if !paper.fields().is_empty() {
        obj["fields"] = json!(paper.fields());
    }

    if let Some(open) = paper.is_open_access {
        obj["openAccess"] = json!(open);
    }

    for (key, flag) in
        [("added", paper.added), ("filtered", paper.filtered), ("highlighted", paper.highlighted)]
    {
        if let Some(flag) = flag {
            obj[key] = json!(flag);
        }
    }

    obj
}

/// Format a paper list as a JSON document.
#[must_use]
pub fn format_papers_json(papers: &[Paper]) -> Value {
    json!({
        "total": papers.len(),
        "papers": papers.iter().map(compact_paper).collect::<Vec<_>>(),
    })
}
