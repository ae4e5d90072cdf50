use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{RetrievalError, RetrievalResult};
use super::model::{CandidateResult, CategoryCount, CategoryHierarchy};
use super::query::KnnSearch;
use super::RetrievalEngine;

/// In-memory [`RetrievalEngine`] that records every request.
///
/// `knn_search` pages over the configured products using `from`/`size`; `fetch_by_ids`
/// answers in index order, not request order, like the real index.
#[derive(Default)]
pub struct MockRetrieval {
    products: Mutex<Vec<CandidateResult>>,
    neighbours: Mutex<Vec<CategoryHierarchy>>,
    knn_requests: Mutex<Vec<KnnSearch>>,
    probe_requests: Mutex<Vec<KnnSearch>>,
    fetch_requests: Mutex<Vec<Vec<String>>>,
    browse_calls: AtomicUsize,
    category_calls: AtomicUsize,
    fail: AtomicBool,
}

impl MockRetrieval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<CandidateResult>) -> Self {
        let mock = Self::new();
        mock.set_products(products);
        mock
    }

    /// Creates `count` products with ids `P0..P{count-1}`.
    pub fn with_numbered_products(count: usize) -> Self {
        Self::with_products(
            (0..count)
                .map(|i| CandidateResult::new(format!("P{}", i), format!("Product {}", i)))
                .collect(),
        )
    }

    pub fn set_products(&self, products: Vec<CandidateResult>) {
        *self.products.lock() = products;
    }

    /// Hierarchies returned by intent probes, in neighbour rank order.
    pub fn set_neighbours(&self, neighbours: Vec<CategoryHierarchy>) {
        *self.neighbours.lock() = neighbours;
    }

    /// Makes every call fail until reset.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn knn_requests(&self) -> Vec<KnnSearch> {
        self.knn_requests.lock().clone()
    }

    pub fn probe_requests(&self) -> Vec<KnnSearch> {
        self.probe_requests.lock().clone()
    }

    pub fn fetch_requests(&self) -> Vec<Vec<String>> {
        self.fetch_requests.lock().clone()
    }

    /// Total number of index calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.knn_requests.lock().len()
            + self.probe_requests.lock().len()
            + self.fetch_requests.lock().len()
            + self.browse_calls.load(Ordering::SeqCst)
            + self.category_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> RetrievalResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RetrievalError::Unavailable {
                reason: "mock retrieval failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RetrievalEngine for MockRetrieval {
    async fn probe_hierarchy(
        &self,
        request: &KnnSearch,
    ) -> RetrievalResult<Vec<CategoryHierarchy>> {
        self.probe_requests.lock().push(request.clone());
        self.check()?;
        Ok(self
            .neighbours
            .lock()
            .iter()
            .take(request.size)
            .cloned()
            .collect())
    }

    async fn knn_search(&self, request: &KnnSearch) -> RetrievalResult<Vec<CandidateResult>> {
        self.knn_requests.lock().push(request.clone());
        self.check()?;
        Ok(self
            .products
            .lock()
            .iter()
            .skip(request.from)
            .take(request.size)
            .cloned()
            .collect())
    }

    async fn fetch_by_ids(&self, ids: &[String]) -> RetrievalResult<Vec<CandidateResult>> {
        self.fetch_requests.lock().push(ids.to_vec());
        self.check()?;
        Ok(self
            .products
            .lock()
            .iter()
            .filter(|p| ids.contains(&p.product_id))
            .cloned()
            .collect())
    }

    async fn browse(&self, size: usize) -> RetrievalResult<Vec<CandidateResult>> {
        self.browse_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.products.lock().iter().take(size).cloned().collect())
    }

    async fn categories(&self) -> RetrievalResult<Vec<CategoryCount>> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut counts: Vec<CategoryCount> = Vec::new();
        for product in self.products.lock().iter() {
            let name = &product.hierarchy.category;
            if name.is_empty() {
                continue;
            }
            match counts.iter_mut().find(|c| &c.category == name) {
                Some(count) => count.product_count += 1,
                None => counts.push(CategoryCount {
                    category: name.clone(),
                    product_count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| b.product_count.cmp(&a.product_count));
        Ok(counts)
    }

    async fn is_ready(&self) -> bool {
        !self.fail.load(Ordering::SeqCst)
    }
}
