//! Category intent inference by nearest-neighbour voting.
//!
//! The hierarchy of the few closest products decides which category the query most likely
//! targets. The result biases the main retrieval twice: as text in the augmented query and as
//! term boosts when every level is known.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::retrieval::{CategoryHierarchy, KnnSearch, RetrievalEngine, RetrievalResult};

/// Infers a [`CategoryHierarchy`] for a query embedding.
#[derive(Clone)]
pub struct IntentInferenceEngine {
    retrieval: Arc<dyn RetrievalEngine>,
}

impl IntentInferenceEngine {
    pub fn new(retrieval: Arc<dyn RetrievalEngine>) -> Self {
        Self { retrieval }
    }

    /// Majority vote over the hierarchy of the nearest neighbours of `query_vector`.
    #[instrument(skip_all, fields(dim = query_vector.len()))]
    pub async fn infer_hierarchy(
        &self,
        query_vector: Vec<f32>,
    ) -> RetrievalResult<CategoryHierarchy> {
        let neighbours = self
            .retrieval
            .probe_hierarchy(&KnnSearch::intent_probe(query_vector))
            .await?;

        let hierarchy = vote(&neighbours);
        debug!(
            neighbours = neighbours.len(),
            path = %hierarchy.path(),
            "inferred category hierarchy"
        );
        Ok(hierarchy)
    }
}

/// Per-level majority vote. Levels without any value stay empty.
pub fn vote(neighbours: &[CategoryHierarchy]) -> CategoryHierarchy {
    let level = |i: usize| {
        most_frequent(neighbours.iter().map(|n| n.levels()[i]))
            .unwrap_or_default()
            .to_string()
    };
    CategoryHierarchy::from_levels([level(0), level(1), level(2), level(3)])
}

/// Most frequent non-empty value; ties go to the value seen first.
pub fn most_frequent<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values.into_iter().map(str::trim).filter(|v| !v.is_empty()) {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    // `max_by_key` keeps the last maximum, so scan in reverse to prefer first appearance.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| value)
}

/// Natural-language query carrying the inferred hierarchy, embedded for the main retrieval.
pub fn augmented_query(query: &str, hierarchy: &CategoryHierarchy) -> String {
    let [a, b, c, d] = hierarchy.levels();
    format!(
        "Item *{}* is of category hierarchy {} and {} and {} and {}",
        query, a, b, c, d
    )
}
