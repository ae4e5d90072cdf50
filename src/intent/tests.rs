use super::*;
use crate::retrieval::MockRetrieval;

fn h(a: &str, b: &str, c: &str, d: &str) -> CategoryHierarchy {
    CategoryHierarchy::new(a, b, c, d)
}

#[test]
fn test_most_frequent_picks_majority() {
    let values = ["Shoes", "Watches", "Shoes", "Bags", "Shoes"];
    assert_eq!(most_frequent(values), Some("Shoes"));
}

#[test]
fn test_most_frequent_ignores_empty_values() {
    let values = ["", "", "", "Watches", " "];
    assert_eq!(most_frequent(values), Some("Watches"));
    assert_eq!(most_frequent(["", ""]), None);
    assert_eq!(most_frequent(Vec::<&str>::new()), None);
}

#[test]
fn test_most_frequent_tie_goes_to_first_seen() {
    assert_eq!(most_frequent(["b", "a", "a", "b"]), Some("b"));
    assert_eq!(most_frequent(["z", "y", "x"]), Some("z"));
}

#[test]
fn test_vote_is_per_level() {
    let neighbours = vec![
        h("Footwear", "Men", "Shoes", "Sneakers"),
        h("Footwear", "Women", "Shoes", ""),
        h("Clothing", "Women", "Shoes", ""),
        h("Footwear", "Men", "Sandals", ""),
        h("Footwear", "Women", "Shoes", ""),
    ];

    assert_eq!(vote(&neighbours), h("Footwear", "Women", "Shoes", "Sneakers"));
}

#[test]
fn test_vote_leaves_unknown_levels_empty() {
    let neighbours = vec![h("Watches", "", "", ""), h("Watches", "", "", "")];
    let hierarchy = vote(&neighbours);

    assert_eq!(hierarchy, h("Watches", "", "", ""));
    assert!(!hierarchy.is_complete());
    assert!(vote(&[]).is_empty());
}

#[test]
fn test_augmented_query_format() {
    let text = augmented_query("red shoes", &h("Footwear", "Men", "Shoes", "Sneakers"));
    assert_eq!(
        text,
        "Item *red shoes* is of category hierarchy Footwear and Men and Shoes and Sneakers"
    );
}

#[tokio::test]
async fn test_infer_hierarchy_issues_intent_probe() {
    let retrieval = Arc::new(MockRetrieval::new());
    retrieval.set_neighbours(vec![
        h("Footwear", "Men", "Shoes", "Sneakers"),
        h("Footwear", "Men", "Shoes", "Sneakers"),
        h("Bags", "Men", "Backpacks", "Daypacks"),
    ]);
    let engine = IntentInferenceEngine::new(retrieval.clone());

    let hierarchy = engine.infer_hierarchy(vec![0.2; 8]).await.expect("infer");

    assert_eq!(hierarchy, h("Footwear", "Men", "Shoes", "Sneakers"));
    let probes = retrieval.probe_requests();
    assert_eq!(probes.len(), 1);
    assert_eq!(probes[0], KnnSearch::intent_probe(vec![0.2; 8]));
    assert!(retrieval.knn_requests().is_empty());
}

#[tokio::test]
async fn test_infer_hierarchy_propagates_failure() {
    let retrieval = Arc::new(MockRetrieval::new());
    retrieval.set_fail(true);
    let engine = IntentInferenceEngine::new(retrieval);

    assert!(engine.infer_hierarchy(vec![0.0; 4]).await.is_err());
}
