use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{CandidateProfile, FilterCriteria, JobPosting, ScoredJob};

/// In-process memo of query results
///
/// The engine is a pure function of `(catalog revision, profile, criteria)`,
/// so a repeated identical query can be answered from here. Entries expire
/// after the configured TTL; a catalog swap changes the revision and with it
/// every key.
pub struct ResultCache {
    recommendations: moka::future::Cache<RecommendKey, Arc<Vec<ScoredJob>>>,
    searches: moka::future::Cache<SearchKey, Arc<Vec<JobPosting>>>,
}

impl ResultCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);

        Self {
            recommendations: moka::future::CacheBuilder::new(capacity)
                .time_to_live(ttl)
                .build(),
            searches: moka::future::CacheBuilder::new(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get_recommendations(&self, key: &RecommendKey) -> Option<Arc<Vec<ScoredJob>>> {
        let hit = self.recommendations.get(key).await;
        tracing::trace!(
            "Recommendation cache {} for user {} at revision {}",
            if hit.is_some() { "hit" } else { "miss" },
            key.profile.user_id,
            key.revision
        );
        hit
    }

    pub async fn insert_recommendations(&self, key: RecommendKey, results: Arc<Vec<ScoredJob>>) {
        self.recommendations.insert(key, results).await;
    }

    pub async fn get_search(&self, key: &SearchKey) -> Option<Arc<Vec<JobPosting>>> {
        let hit = self.searches.get(key).await;
        tracing::trace!(
            "Search cache {} at revision {}",
            if hit.is_some() { "hit" } else { "miss" },
            key.revision
        );
        hit
    }

    pub async fn insert_search(&self, key: SearchKey, results: Arc<Vec<JobPosting>>) {
        self.searches.insert(key, results).await;
    }

    pub fn invalidate_all(&self) {
        self.recommendations.invalidate_all();
        self.searches.invalidate_all();
        tracing::debug!("Result cache invalidated");
    }

    /// Flush moka's pending maintenance so entry counts are current
    pub async fn sync(&self) {
        self.recommendations.run_pending_tasks().await;
        self.searches.run_pending_tasks().await;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            recommendation_entries: self.recommendations.entry_count(),
            search_entries: self.searches.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub recommendation_entries: u64,
    pub search_entries: u64,
}

/// Exact key of a recommend query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecommendKey {
    pub revision: u64,
    pub profile: CandidateProfile,
    pub criteria: FilterCriteria,
}

/// Exact key of a search query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub revision: u64,
    pub criteria: FilterCriteria,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub fn recommend(revision: u64, profile: &CandidateProfile, criteria: &FilterCriteria) -> RecommendKey {
        RecommendKey {
            revision,
            profile: profile.clone(),
            criteria: criteria.clone(),
        }
    }

    pub fn search(revision: u64, criteria: &FilterCriteria) -> SearchKey {
        SearchKey {
            revision,
            criteria: criteria.clone(),
        }
    }
}
