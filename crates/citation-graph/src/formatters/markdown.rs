//! Markdown output formatting.

use crate::models::Paper;

/// Format a list of papers as Markdown.
#[must_use]
pub fn format_papers_markdown(papers: &[Paper]) -> String {
    if papers.is_empty() {
        return "No papers found.".to_string();
    }

    let added = papers.iter().filter(|p| p.is_added()).count();
    let mut output = format!("# Papers ({} results, {} added by expansion)\n\n", papers.len(), added);

    for (i, paper) in papers.iter().enumerate() {
        output.push_str(&format_paper_markdown(paper, i + 1));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format a single paper as Markdown.
#[must_use]
pub fn format_paper_markdown(paper: &Paper, index: usize) -> String {
    let mut output = format!("## {}. {}\n\n", index, paper.title_or_default());

    if !paper.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", paper.author_names()));
    }

    let mut meta = Vec::new();
    if let Some(year) = paper.year {
        meta.push(format!("**Year**: {year}"));
    }
    meta.push(format!("**Cited by**: {}", paper.citations_count));
    meta.push(format!("**References**: {}", paper.references_count));
    if paper.is_open_access == Some(true) {
        meta.push("**Open Access**".to_string());
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    if !paper.fields().is_empty() {
        output.push_str(&format!("**Fields**: {}\n\n", paper.fields().join(", ")));
    }

    let mut flags = Vec::new();
    if paper.is_added() {
        flags.push("added");
    }
    if paper.filtered == Some(true) {
        flags.push("matched");
    }
    if paper.highlighted == Some(true) {
        flags.push("highlighted");
    }
    if !flags.is_empty() {
        output.push_str(&format!("**Status**: {}\n\n", flags.join(", ")));
    }

    output.push_str(&format!(
        "**Link**: [S2](https://www.semanticscholar.org/paper/{})\n",
        paper.paper_id
    ));

    output
}
