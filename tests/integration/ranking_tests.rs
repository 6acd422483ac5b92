//! Integration tests for indexing and ranking
//!
//! These drive the public API from documents to ranked pages, without any
//! network access.

use sumi_rank::rank::round_to_epsilon;
use sumi_rank::{
    rank_pages, Document, LinkIndex, PageRankSolver, RankError, RankedPage, TransitionMatrix,
};

/// Builds a document whose body links to each of `targets`
fn page(url: &str, targets: &[&str]) -> Document {
    let anchors: String = targets
        .iter()
        .map(|t| format!(r#"<a href="{}">link</a>"#, t))
        .collect();
    Document::new(url, format!("<html><body>{}</body></html>", anchors))
}

fn index_of(pages: &[(&str, &[&str])]) -> LinkIndex {
    let mut index = LinkIndex::new();
    for (url, targets) in pages {
        index.push(page(url, targets)).expect("unique URLs");
    }
    index.sort_urls();
    index
}

fn rank(pages: &[(&str, &[&str])]) -> Vec<RankedPage> {
    let index = index_of(pages);
    let matrix = TransitionMatrix::from_index(&index).unwrap();
    let result = PageRankSolver::default().solve(&matrix).unwrap();
    rank_pages(&index, &result, 0.000001)
}

fn solve(index: &LinkIndex) -> Vec<f64> {
    let matrix = TransitionMatrix::from_index(index).unwrap();
    PageRankSolver::default().solve(&matrix).unwrap().scores
}

#[test]
fn test_three_cycle_ranks_equally() {
    let index = index_of(&[
        ("https://site.test/c", &["/a"]),
        ("https://site.test/a", &["/b"]),
        ("https://site.test/b", &["/c"]),
    ]);
    let matrix = TransitionMatrix::from_index(&index).unwrap();
    let result = PageRankSolver::default().solve(&matrix).unwrap();

    let ranked = rank_pages(&index, &result, 0.000001);
    assert_eq!(ranked.len(), 3);
    for page in &ranked {
        assert_eq!(page.page_rank, 0.333333);
    }
    // Equal ranks fall back to URL order
    assert_eq!(ranked[0].url, "https://site.test/a");
}

#[test]
fn test_dangling_page_ranking() {
    let index = index_of(&[
        ("https://site.test/a", &["/b"]),
        ("https://site.test/b", &[]),
        ("https://site.test/c", &["/a"]),
    ]);
    let matrix = TransitionMatrix::from_index(&index).unwrap();
    let result = PageRankSolver::new(0.85, 0.000001)
        .unwrap()
        .solve(&matrix)
        .unwrap();

    assert!(result.error < 0.000001);

    let ranked = rank_pages(&index, &result, 0.000001);
    let urls: Vec<&str> = ranked.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        ["https://site.test/b", "https://site.test/a", "https://site.test/c"]
    );

    let total: f64 = ranked.iter().map(|p| p.page_rank).sum();
    assert!((total - 1.0).abs() < 1e-5);
}

#[test]
fn test_single_page_site() {
    let index = index_of(&[("https://site.test/", &["/", "#top"])]);
    let matrix = TransitionMatrix::from_index(&index).unwrap();
    let result = PageRankSolver::default().solve(&matrix).unwrap();

    assert_eq!(result.iterations, 1);
    let ranked = rank_pages(&index, &result, 0.000001);
    assert_eq!(ranked[0].page_rank, 1.0);
}

#[test]
fn test_duplicate_document_is_rejected() {
    let mut index = LinkIndex::new();
    index.push(page("https://site.test/", &["/a"])).unwrap();

    let err = index.push(page("https://site.test/", &["/b"])).unwrap_err();
    assert!(matches!(err, RankError::DuplicateDocument { .. }));
    assert_eq!(index.len(), 1);
    assert!(index.has_outlink("https://site.test/", "https://site.test/a"));
}

#[test]
fn test_empty_index_cannot_be_ranked() {
    let err = TransitionMatrix::from_index(&LinkIndex::new()).unwrap_err();
    assert!(matches!(err, RankError::EmptyGraph));
}

#[test]
fn test_ranking_is_independent_of_push_order() {
    let pages: [(&str, &[&str]); 4] = [
        ("https://site.test/a", &["/b", "/c"]),
        ("https://site.test/b", &["/c"]),
        ("https://site.test/c", &["/a"]),
        ("https://site.test/d", &["/c"]),
    ];
    let mut reversed = pages;
    reversed.reverse();

    assert_eq!(rank(&pages), rank(&reversed));
}

#[test]
fn test_links_outside_index_do_not_change_ranking() {
    let closed = index_of(&[
        ("https://site.test/a", &["/b"]),
        ("https://site.test/b", &["/a"]),
    ]);
    let open = index_of(&[
        ("https://site.test/a", &["/b", "https://other.test/"]),
        ("https://site.test/b", &["/a", "/never-crawled"]),
    ]);

    assert_eq!(solve(&closed), solve(&open));
}

#[test]
fn test_iteration_limit_is_reported() {
    let index = index_of(&[
        ("https://site.test/a", &["/b"]),
        ("https://site.test/b", &[]),
        ("https://site.test/c", &["/a"]),
    ]);
    let matrix = TransitionMatrix::from_index(&index).unwrap();
    let solver = PageRankSolver::new(0.85, 1e-12)
        .unwrap()
        .with_max_iterations(2)
        .unwrap();

    match solver.solve(&matrix) {
        Err(RankError::ConvergenceTimeout { iterations, .. }) => assert_eq!(iterations, 2),
        other => panic!("expected ConvergenceTimeout, got {:?}", other),
    }
}

#[test]
fn test_rounding_follows_epsilon() {
    assert_eq!(round_to_epsilon(0.1234567, 0.001), 0.123);
    assert_eq!(round_to_epsilon(0.1234567, 0.000001), 0.123457);
}
