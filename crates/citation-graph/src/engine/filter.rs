//! Filter and neighborhood-expansion engine.
//!
//! Turns the full flat dataset plus a [`FilterSpec`] into the annotated list
//! of visible papers. Pure and synchronous: the dataset is only read.

use std::collections::HashSet;

use crate::dataset::FlatDataset;
use crate::models::{FilterSpec, Paper, UNKNOWN_FIELD};

/// Compute the visible papers for a filter request.
///
/// Without a filter (or with `reset`) the full dataset is returned unchanged.
/// Otherwise the base predicates select the seed papers, the optional
/// expansion grows them along citations and inverse citations, and
/// `hideWires` finally clears adjacency.
#[must_use]
pub fn filter_papers(dataset: &FlatDataset, filter: Option<&FilterSpec>) -> Vec<Paper> {
    let Some(filter) = filter.filter(|f| !f.reset) else {
        return dataset.papers.clone();
    };

    let predicate = BasePredicate::new(filter);
    let matched: Vec<usize> = dataset
        .papers
        .iter()
        .enumerate()
        .filter(|(_, paper)| predicate.matches(paper))
        .map(|(idx, _)| idx)
        .collect();

    let mut is_match = vec![false; dataset.len()];
    for &idx in &matched {
        is_match[idx] = true;
    }

    let visible: Vec<(usize, bool)> = if filter.expands() {
        expand(
            dataset,
            &matched,
            filter.additional_child_levels,
            filter.additional_parent_levels,
        )
    } else {
        matched.iter().map(|&idx| (idx, false)).collect()
    };

    tracing::debug!(
        matched = matched.len(),
        visible = visible.len(),
        child_levels = filter.additional_child_levels,
        parent_levels = filter.additional_parent_levels,
        "Filtered papers"
    );

    let mut papers = if filter.highlight_only {
        highlight(dataset, &visible, &is_match, filter.hide_wires_of_hidden_nodes)
    } else {
        visible
            .iter()
            .map(|&(idx, added)| annotate(&dataset.papers[idx], added, is_match[idx]))
            .collect()
    };

    if filter.hide_wires {
        papers.iter_mut().for_each(Paper::clear_wires);
    }

    papers
}

fn annotate(paper: &Paper, added: bool, filtered: bool) -> Paper {
    Paper { added: Some(added), filtered: Some(filtered), ..paper.clone() }
}

/// Base filter with its strings normalized once per request.
struct BasePredicate<'a> {
    paper_ids: HashSet<&'a str>,
    title: Option<String>,
    author: Option<String>,
    filter: &'a FilterSpec,
}

impl<'a> BasePredicate<'a> {
    fn new(filter: &'a FilterSpec) -> Self {
        let lowered = |s: &str| (!s.is_empty()).then(|| s.to_lowercase());
        Self {
            paper_ids: filter.paper_ids.iter().map(String::as_str).collect(),
            title: lowered(&filter.title_filter),
            author: lowered(&filter.author_filter),
            filter,
        }
    }

    /// Conjunction of the base predicates in their fixed order.
    fn matches(&self, paper: &Paper) -> bool {
        self.matches_ids(paper)
            && self.matches_title(paper)
            && self.matches_author(paper)
            && self.matches_year(paper)
            && self.matches_fields(paper)
            && self.matches_open_access(paper)
    }

    fn matches_ids(&self, paper: &Paper) -> bool {
        self.paper_ids.is_empty() || self.paper_ids.contains(paper.paper_id.as_str())
    }

    fn matches_title(&self, paper: &Paper) -> bool {
        let Some(needle) = &self.title else { return true };
        paper.title.as_ref().is_some_and(|t| t.to_lowercase().contains(needle.as_str()))
    }

    fn matches_author(&self, paper: &Paper) -> bool {
        let Some(needle) = &self.author else { return true };
        paper
            .authors
            .iter()
            .filter_map(|a| a.name.as_ref())
            .any(|name| name.to_lowercase().contains(needle.as_str()))
    }

    fn matches_year(&self, paper: &Paper) -> bool {
        match self.filter.year_filter {
            Some(range) if range.is_active() => paper.year.is_some_and(|y| range.contains(y)),
            _ => true,
        }
    }

    fn matches_fields(&self, paper: &Paper) -> bool {
        let wanted = &self.filter.fields_of_study_filter;
        if wanted.is_empty() {
            return true;
        }
        let fields = paper.fields();
        if fields.is_empty() {
            return wanted.iter().any(|f| f == UNKNOWN_FIELD);
        }
        fields.iter().any(|f| wanted.contains(f))
    }

    fn matches_open_access(&self, paper: &Paper) -> bool {
        self.filter.is_open_access.is_none_or(|wanted| paper.is_open_access == Some(wanted))
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    /// Along `citations`: towards papers citing the current one.
    Child,
    /// Along inverse citations: papers whose citation list holds the current one.
    Parent,
}

/// Expansion state shared by every walk of one request.
struct Expansion<'a> {
    dataset: &'a FlatDataset,
    seen: Vec<bool>,
    unseen: usize,
    emitted: Vec<(usize, bool)>,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Enter(usize, u32),
    Exit(usize, u32),
}

impl Expansion<'_> {
    /// Depth-limited DFS from `seed`, emitting each paper on first discovery.
    ///
    /// `done` holds, per paper, the lowest level at which its expansion in this
    /// direction has completed. Everything within the remaining budget of such
    /// a paper is already discovered, so reaching it again at that level or
    /// deeper is skipped. Papers still being expanded are walked again.
    fn walk(&mut self, seed: usize, limit: u32, direction: Direction, done: &mut [u32]) {
        let mut stack = vec![Frame::Enter(seed, 0)];

        while let Some(frame) = stack.pop() {
            if self.unseen == 0 {
                return;
            }

            let (idx, level) = match frame {
                Frame::Exit(idx, level) => {
                    done[idx] = done[idx].min(level);
                    continue;
                }
                Frame::Enter(idx, level) => (idx, level),
            };

            if level > limit || done[idx] <= level {
                continue;
            }

            if !self.seen[idx] {
                self.seen[idx] = true;
                self.unseen -= 1;
                self.emitted.push((idx, level > 0));
            }

            if level == limit {
                done[idx] = done[idx].min(level);
                continue;
            }

            stack.push(Frame::Exit(idx, level));

            // Pushed in reverse so neighbors are visited in list order.
            match direction {
                Direction::Child => {
                    let paper = &self.dataset.papers[idx];
                    for id in paper.citations.iter().rev() {
                        if let Some(next) = self.dataset.index_of(id) {
                            stack.push(Frame::Enter(next, level + 1));
                        }
                    }
                }
                Direction::Parent => {
                    for &next in self.dataset.inverse_citations(idx).iter().rev() {
                        stack.push(Frame::Enter(next, level + 1));
                    }
                }
            }
        }
    }
}

/// Largest hop budget honored per direction; larger requests are capped.
pub const MAX_HOP_LEVELS: u32 = 64;

/// Grow the seed papers by the given hop budgets.
///
/// Budgets are capped at [`MAX_HOP_LEVELS`], which bounds the walk depth.
/// All child walks run before all parent walks. Returns `(index, added)` in
/// emission order; seeds reached first by another seed's walk stay `added`.
fn expand(
    dataset: &FlatDataset,
    seeds: &[usize],
    child_levels: u32,
    parent_levels: u32,
) -> Vec<(usize, bool)> {
    if child_levels > MAX_HOP_LEVELS || parent_levels > MAX_HOP_LEVELS {
        tracing::warn!(child_levels, parent_levels, max = MAX_HOP_LEVELS, "Capping hop budget");
    }
    let child_levels = child_levels.min(MAX_HOP_LEVELS);
    let parent_levels = parent_levels.min(MAX_HOP_LEVELS);

    let mut expansion = Expansion {
        dataset,
        seen: vec![false; dataset.len()],
        unseen: dataset.len(),
        emitted: Vec::new(),
    };

    let mut done = vec![u32::MAX; dataset.len()];
    for &seed in seeds {
        expansion.walk(seed, child_levels, Direction::Child, &mut done);
    }

    let mut done = vec![u32::MAX; dataset.len()];
    for &seed in seeds {
        expansion.walk(seed, parent_levels, Direction::Parent, &mut done);
    }

    expansion.emitted
}

/// Keep every paper, marking the visible ones as highlighted.
fn highlight(
    dataset: &FlatDataset,
    visible: &[(usize, bool)],
    is_match: &[bool],
    hide_wires_of_hidden: bool,
) -> Vec<Paper> {
    let mut added = vec![None; dataset.len()];
    for &(idx, was_added) in visible {
        added[idx] = Some(was_added);
    }
    let highlighted: HashSet<&str> =
        visible.iter().map(|&(idx, _)| dataset.papers[idx].paper_id.as_str()).collect();

    dataset
        .papers
        .iter()
        .enumerate()
        .map(|(idx, paper)| {
            let mut out = match added[idx] {
                Some(was_added) => annotate(paper, was_added, is_match[idx]),
                None => Paper { filtered: Some(false), ..paper.clone() },
            };
            out.highlighted = Some(added[idx].is_some());

            if hide_wires_of_hidden {
                if added[idx].is_some() {
                    out.citations.retain(|id| highlighted.contains(id.as_str()));
                    out.references.retain(|id| highlighted.contains(id.as_str()));
                } else {
                    out.clear_wires();
                }
            }
            out
        })
        .collect()
}
