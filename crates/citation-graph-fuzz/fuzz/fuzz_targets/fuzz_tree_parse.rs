#![no_main]

use citation_graph::dataset;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text either fails to parse or flattens without panicking
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(tree) = dataset::parse_tree(text) {
            let flat = dataset::flatten(&tree);
            assert!(flat.papers.iter().all(|p| flat.contains(&p.paper_id)));
        }
    }
});
