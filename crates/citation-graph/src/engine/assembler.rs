//! Paper list to diagram element tree.

use std::collections::HashSet;

use crate::models::{Compartment, Edge, GraphElement, Label, LayoutOptions, Paper, PaperNode};

/// Zoom level below which the title and year labels are hidden.
const TITLE_MIN_ZOOM: f64 = 0.3;
/// Zoom level below which field-of-study badges are hidden.
const FIELD_MIN_ZOOM: f64 = 0.5;
/// Zoom level below which author labels are hidden.
const AUTHOR_MIN_ZOOM: f64 = 0.7;

/// Build the diagram children for the given papers: all nodes, then all edges.
///
/// An edge is emitted for every citation or reference whose other endpoint is
/// part of `papers`. A citation and its mirrored reference describe the same
/// directed pair and produce a single edge.
#[must_use]
pub fn assemble(papers: &[Paper], title_max_chars: usize) -> Vec<GraphElement> {
    let present: HashSet<&str> = papers.iter().map(|p| p.paper_id.as_str()).collect();
    let mut wired: HashSet<(&str, &str)> = HashSet::new();

    let mut nodes = Vec::with_capacity(papers.len());
    let mut edges = Vec::new();

    for paper in papers {
        nodes.push(GraphElement::Paper(paper_node(paper, title_max_chars)));

        let id = paper.paper_id.as_str();
        let citing = paper.citations.iter().map(|c| (id, c.as_str()));
        let cited = paper.references.iter().map(|r| (r.as_str(), id));

        for (source, target) in citing.chain(cited) {
            if present.contains(source) && present.contains(target) && wired.insert((source, target))
            {
                edges.push(GraphElement::Edge(Edge::new(source, target)));
            }
        }
    }

    tracing::trace!(nodes = nodes.len(), edges = edges.len(), "Assembled graph");

    nodes.extend(edges);
    nodes
}

/// Truncate a title to `max_chars` characters, marking the cut with `...`.
#[must_use]
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &title[..cut]),
        None => title.to_string(),
    }
}

fn paper_node(paper: &Paper, title_max_chars: usize) -> PaperNode {
    let id = &paper.paper_id;
    let title = paper.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(id.as_str());

    let header = compartment(
        format!("{id}-header"),
        "vbox",
        vec![
            label(format!("{id}-title"), truncate_title(title, title_max_chars), TITLE_MIN_ZOOM),
            label(
                format!("{id}-year"),
                paper.year.map(|y| y.to_string()).unwrap_or_default(),
                TITLE_MIN_ZOOM,
            ),
        ],
    );

    let authors = compartment(
        format!("{id}-authors"),
        "vbox",
        paper
            .authors
            .iter()
            .enumerate()
            .map(|(idx, author)| {
                let name = author.name_or_default().to_string();
                label(format!("{id}-author-{idx}"), name, AUTHOR_MIN_ZOOM)
            })
            .collect(),
    );

    let mut fields = compartment(
        format!("{id}-fieldsOfStudy"),
        "hbox",
        paper.fields().iter().map(|field| field_badge(id, field)).collect(),
    );
    fields.layout_options = Some(LayoutOptions { h_gap: Some(5.0), ..LayoutOptions::default() });

    PaperNode {
        id: id.clone(),
        paper_id: id.clone(),
        year: paper.year,
        fields_of_study: paper.fields_of_study.clone(),
        added: paper.added,
        filtered: paper.filtered,
        highlighted: paper.highlighted,
        layout: "vbox".to_string(),
        layout_options: Some(LayoutOptions {
            h_align: Some("left".to_string()),
            ..LayoutOptions::default()
        }),
        children: vec![
            GraphElement::Compartment(header),
            GraphElement::Compartment(authors),
            GraphElement::Compartment(fields),
        ],
    }
}

fn field_badge(id: &str, field: &str) -> GraphElement {
    let mut text = label(format!("{id}-fieldOfStudy-{field}"), field.to_string(), FIELD_MIN_ZOOM);
    if let GraphElement::Label(l) = &mut text {
        l.layout_options = Some(padding(5.0));
    }

    let mut badge = compartment(format!("{id}-fieldOfStudy-{field}-badge"), "vbox", vec![text]);
    badge.layout_options = Some(padding(15.0));
    badge.min_zoom_level = Some(FIELD_MIN_ZOOM);
    GraphElement::Badge(badge)
}

fn padding(amount: f64) -> LayoutOptions {
    LayoutOptions {
        padding_left: Some(amount),
        padding_right: Some(amount),
        ..LayoutOptions::default()
    }
}

fn compartment(id: String, layout: &str, children: Vec<GraphElement>) -> Compartment {
    Compartment {
        id,
        layout: layout.to_string(),
        layout_options: None,
        min_zoom_level: None,
        children,
    }
}

fn label(id: String, text: String, min_zoom: f64) -> GraphElement {
    GraphElement::Label(Label { id, text, min_zoom_level: Some(min_zoom), layout_options: None })
}
