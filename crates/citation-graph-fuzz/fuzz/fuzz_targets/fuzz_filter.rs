#![no_main]

use std::collections::HashSet;

use citation_graph::dataset::FlatDataset;
use citation_graph::engine::filter_papers;
use citation_graph::models::{FilterSpec, Paper};
use libfuzzer_sys::fuzz_target;

fn dataset() -> FlatDataset {
    let papers = (0..8)
        .map(|i| Paper {
            paper_id: format!("p{i}"),
            title: Some(format!("Paper {i}")),
            year: Some(2010 + i),
            citations: vec![format!("p{}", (i + 1) % 8), format!("p{}", (i * 3) % 8)],
            ..Paper::default()
        })
        .collect();
    FlatDataset::from_papers(papers, "p0")
}

fuzz_target!(|data: &[u8]| {
    if let Ok(mut filter) = serde_json::from_slice::<FilterSpec>(data) {
        // Keep expansion bounded; the dataset is tiny anyway
        filter.additional_child_levels = filter.additional_child_levels.min(16);
        filter.additional_parent_levels = filter.additional_parent_levels.min(16);

        let result = filter_papers(&dataset(), Some(&filter));
        let unique: HashSet<_> = result.iter().map(|p| p.paper_id.as_str()).collect();
        assert_eq!(unique.len(), result.len());
    }
});
