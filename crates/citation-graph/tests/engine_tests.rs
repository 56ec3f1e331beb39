//! End-to-end tests for flattening, filtering and graph generation.
//!
//! Uses the nested dataset in `tests/fixtures/papers.json`:
//! root is cited by c1 and c2 (and a stub hiding c4), cites r1 and an
//! untitled r2; c1 and c2 are both cited by c3.

use citation_graph::config::Config;
use citation_graph::dataset::{self, FlatDataset};
use citation_graph::engine::{GraphGenerator, filter_papers};
use citation_graph::models::{FilterSpec, GraphElement, Paper, RenderOptions, YearRange};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/papers.json");

fn fixture() -> FlatDataset {
    dataset::flatten(&dataset::load_tree(FIXTURE).unwrap())
}

fn ids(papers: &[Paper]) -> Vec<&str> {
    papers.iter().map(|p| p.paper_id.as_str()).collect()
}

fn added(papers: &[Paper]) -> Vec<(&str, bool)> {
    papers.iter().map(|p| (p.paper_id.as_str(), p.is_added())).collect()
}

fn flat(id: &str, year: i32, citations: &[&str]) -> Paper {
    Paper {
        paper_id: id.to_string(),
        title: Some(id.to_string()),
        year: Some(year),
        citations: citations.iter().map(|s| (*s).to_string()).collect(),
        ..Paper::default()
    }
}

// =============================================================================
// Flattening
// =============================================================================

#[test]
fn test_fixture_flattens_in_preorder() {
    let dataset = fixture();

    assert_eq!(
        dataset.papers.iter().map(|p| p.paper_id.as_str()).collect::<Vec<_>>(),
        vec!["root", "c1", "c3", "c2", "c4", "r1"]
    );
    assert!(!dataset.contains("stub1"));
    assert!(!dataset.contains("r2"));
    assert_eq!(dataset.years, vec![2014, 2017, 2018, 2019, 2020]);
    assert_eq!(dataset.fields_of_study, vec!["Computer Science", "Medicine"]);
}

#[test]
fn test_fixture_counts_restricted_to_present_ids() {
    let dataset = fixture();
    let root = dataset.get("root").unwrap();

    assert_eq!(root.citations, vec!["c1", "c2", "stub1"]);
    assert_eq!(root.citations_count, 2);
    assert_eq!(root.references, vec!["r1", "r2"]);
    assert_eq!(root.references_count, 1);
}

#[test]
fn test_fixture_authors_unique() {
    let dataset = fixture();
    let names: Vec<_> = dataset.authors.iter().map(|a| a.name_or_default()).collect();

    assert_eq!(
        names,
        vec!["Ashish Vaswani", "Jacob Devlin", "Yinhan Liu", "Alec Radford", "Ilya Sutskever"]
    );
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_worked_example() {
    let dataset = FlatDataset::from_papers(
        vec![flat("A", 2020, &["B"]), flat("B", 2021, &["C"]), flat("C", 2022, &[])],
        "A",
    );
    let filter = FilterSpec::default().with_paper_ids(["A"]).with_levels(1, 0);

    let result = filter_papers(&dataset, Some(&filter));
    assert_eq!(added(&result), vec![("A", false), ("B", true)]);
}

#[test]
fn test_chain_hop_limit() {
    let dataset = FlatDataset::from_papers(
        vec![
            flat("A", 2000, &["B"]),
            flat("B", 2001, &["C"]),
            flat("C", 2002, &["D"]),
            flat("D", 2003, &[]),
        ],
        "A",
    );

    let one = FilterSpec::default().with_paper_ids(["A"]).with_levels(1, 0);
    assert_eq!(ids(&filter_papers(&dataset, Some(&one))), vec!["A", "B"]);

    let three = FilterSpec::default().with_paper_ids(["A"]).with_levels(3, 0);
    assert_eq!(ids(&filter_papers(&dataset, Some(&three))), vec!["A", "B", "C", "D"]);
}

#[test]
fn test_child_expansion_skips_missing_ids() {
    let filter = FilterSpec::default().with_paper_ids(["root"]).with_levels(1, 0);
    let result = filter_papers(&fixture(), Some(&filter));

    assert_eq!(added(&result), vec![("root", false), ("c1", true), ("c2", true)]);
}

#[test]
fn test_child_expansion_depth_first() {
    let filter = FilterSpec::default().with_paper_ids(["root"]).with_levels(2, 0);
    let result = filter_papers(&fixture(), Some(&filter));

    assert_eq!(ids(&result), vec!["root", "c1", "c3", "c2"]);
}

#[test]
fn test_parent_expansion_follows_inverse_citations() {
    let filter = FilterSpec::default().with_paper_ids(["c3"]).with_levels(0, 2);
    let result = filter_papers(&fixture(), Some(&filter));

    assert_eq!(
        added(&result),
        vec![("c3", false), ("c1", true), ("root", true), ("c2", true)]
    );
}

#[test]
fn test_shared_neighbor_emitted_once() {
    let filter = FilterSpec::default().with_paper_ids(["c1", "c2"]).with_levels(1, 1);
    let result = filter_papers(&fixture(), Some(&filter));

    assert_eq!(
        added(&result),
        vec![("c1", false), ("c3", true), ("c2", false), ("root", true)]
    );
    let filtered: Vec<_> =
        result.iter().filter(|p| p.filtered == Some(true)).map(|p| p.paper_id.as_str()).collect();
    assert_eq!(filtered, vec!["c1", "c2"]);
}

#[test]
fn test_unknown_field_sentinel() {
    let dataset = fixture();

    let unknown = FilterSpec { fields_of_study_filter: vec!["unknown".into()], ..FilterSpec::default() };
    assert_eq!(ids(&filter_papers(&dataset, Some(&unknown))), vec!["c2"]);

    let medicine = FilterSpec {
        fields_of_study_filter: vec!["Medicine".into(), "unknown".into()],
        ..FilterSpec::default()
    };
    assert_eq!(ids(&filter_papers(&dataset, Some(&medicine))), vec!["c2", "c4"]);
}

#[test]
fn test_year_range() {
    let dataset = fixture();

    let range = FilterSpec {
        year_filter: Some(YearRange { from: 2018, to: 2019 }),
        ..FilterSpec::default()
    };
    assert_eq!(ids(&filter_papers(&dataset, Some(&range))), vec!["c1", "c3", "c2"]);

    let disabled = FilterSpec {
        year_filter: Some(YearRange { from: 2018, to: 0 }),
        ..FilterSpec::default()
    };
    assert_eq!(filter_papers(&dataset, Some(&disabled)).len(), dataset.len());
}

#[test]
fn test_text_filters_case_insensitive() {
    let dataset = fixture();

    let author = FilterSpec { author_filter: "DEVLIN".into(), ..FilterSpec::default() };
    assert_eq!(ids(&filter_papers(&dataset, Some(&author))), vec!["c1"]);

    let title = FilterSpec { title_filter: "language".into(), ..FilterSpec::default() };
    assert_eq!(ids(&filter_papers(&dataset, Some(&title))), vec!["c1", "c2"]);
}

#[test]
fn test_open_access() {
    let closed = FilterSpec { is_open_access: Some(false), ..FilterSpec::default() };
    assert_eq!(ids(&filter_papers(&fixture(), Some(&closed))), vec!["c3", "c2"]);
}

#[test]
fn test_empty_result_is_not_an_error() {
    let filter = FilterSpec::default().with_paper_ids(["does-not-exist"]).with_levels(2, 2);
    assert!(filter_papers(&fixture(), Some(&filter)).is_empty());
}

// =============================================================================
// Graph generation
// =============================================================================

#[test]
fn test_unfiltered_graph() {
    let tree = dataset::load_tree(FIXTURE).unwrap();
    let generator = GraphGenerator::new(tree, &Config::for_testing(FIXTURE));
    let graph = generator.compute_graph(None, RenderOptions::default());

    assert_eq!(graph.root_id, "root");
    assert_eq!(graph.paper_ids(), vec!["root", "c1", "c3", "c2", "c4", "r1"]);

    let edges: Vec<_> = graph.edges().map(|e| e.id.as_str()).collect();
    assert_eq!(edges, vec!["root-c1", "root-c2", "r1-root", "c1-c3", "c2-c3"]);

    let first_edge = graph.children.iter().position(|c| matches!(c, GraphElement::Edge(_)));
    assert_eq!(first_edge, Some(6));
}

#[test]
fn test_hide_wires_graph_has_no_edges() {
    let tree = dataset::load_tree(FIXTURE).unwrap();
    let generator = GraphGenerator::new(tree, &Config::for_testing(FIXTURE));
    let filter = FilterSpec { hide_wires: true, ..FilterSpec::default() };

    let graph = generator.compute_graph(Some(&filter), RenderOptions::default());
    assert_eq!(graph.paper_ids().len(), 6);
    assert_eq!(graph.edges().count(), 0);
}

#[test]
fn test_graph_wire_format() {
    let tree = dataset::load_tree(FIXTURE).unwrap();
    let generator = GraphGenerator::new(tree, &Config::for_testing(FIXTURE));
    let filter = FilterSpec::default().with_paper_ids(["root"]).with_levels(1, 0);

    let graph = generator.compute_graph(Some(&filter), RenderOptions::default());
    let value = serde_json::to_value(&graph).unwrap();

    assert_eq!(value["type"], "graph");
    assert_eq!(value["rootId"], "root");
    assert_eq!(value["years"][0], 2014);
    assert_eq!(value["children"][0]["type"], "node:paper");
    assert_eq!(value["children"][0]["added"], false);
    assert_eq!(value["children"][1]["added"], true);
    assert_eq!(
        value["children"][1]["children"][0]["children"][0]["text"],
        "BERT: Pre-training of Deep Bidirectional Transform..."
    );
}
