use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::SkillNormalizer;
use crate::models::{CandidateProfile, JobPosting};

/// Errors raised by catalog and profile providers
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to read seed data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid job posting: {0}")]
    InvalidPosting(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the catalog shared by every concurrent query
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub revision: u64,
    pub jobs: Arc<Vec<JobPosting>>,
}

impl CatalogSnapshot {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Supplies the job catalog to filter
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn snapshot(&self) -> Result<CatalogSnapshot, ProviderError>;
}

/// Supplies candidate profiles; an unknown user is `Ok(None)`, not an error
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn get_profile(&self, user_id: u64) -> Result<Option<CandidateProfile>, ProviderError>;
}

/// Seed file layout: `{ "jobs": [...], "profiles": [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub jobs: Vec<JobPosting>,
    pub profiles: Vec<CandidateProfile>,
}

/// In-memory catalog and profile store
///
/// Stands in for the persistence layer. Postings are validated and their
/// skills canonicalized once, at load time, so queries only ever read.
pub struct InMemoryStore {
    catalog: RwLock<CatalogSnapshot>,
    profiles: RwLock<HashMap<u64, CandidateProfile>>,
    normalizer: SkillNormalizer,
}

impl InMemoryStore {
    pub fn new(normalizer: SkillNormalizer) -> Self {
        Self {
            catalog: RwLock::new(CatalogSnapshot::default()),
            profiles: RwLock::new(HashMap::new()),
            normalizer,
        }
    }

    /// Build a store from already parsed seed data
    pub fn from_seed(seed: SeedData, normalizer: SkillNormalizer) -> Result<Self, ProviderError> {
        let jobs = prepare_jobs(seed.jobs, &normalizer)?;
        let profiles = seed
            .profiles
            .into_iter()
            .map(|profile| {
                let profile = canonical_profile(profile, &normalizer);
                (profile.user_id, profile)
            })
            .collect();

        Ok(Self {
            catalog: RwLock::new(CatalogSnapshot {
                revision: 1,
                jobs: Arc::new(jobs),
            }),
            profiles: RwLock::new(profiles),
            normalizer,
        })
    }

    /// Load a JSON seed file
    pub async fn load<P: AsRef<Path>>(path: P, normalizer: SkillNormalizer) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let seed: SeedData = serde_json::from_str(&raw)?;

        tracing::info!(
            "Loaded seed data from {}: {} jobs, {} profiles",
            path.display(),
            seed.jobs.len(),
            seed.profiles.len()
        );

        Self::from_seed(seed, normalizer)
    }

    /// Swap in a new catalog; in-flight queries keep their old snapshot
    pub async fn replace_jobs(&self, jobs: Vec<JobPosting>) -> Result<u64, ProviderError> {
        let jobs = prepare_jobs(jobs, &self.normalizer)?;

        let mut catalog = self.catalog.write().await;
        catalog.revision += 1;
        catalog.jobs = Arc::new(jobs);

        tracing::info!("Catalog replaced: revision {}, {} jobs", catalog.revision, catalog.len());
        Ok(catalog.revision)
    }

    pub async fn upsert_profile(&self, profile: CandidateProfile) {
        let profile = canonical_profile(profile, &self.normalizer);
        self.profiles.write().await.insert(profile.user_id, profile);
    }
}

#[async_trait]
impl CatalogProvider for InMemoryStore {
    async fn snapshot(&self) -> Result<CatalogSnapshot, ProviderError> {
        Ok(self.catalog.read().await.clone())
    }
}

#[async_trait]
impl ProfileProvider for InMemoryStore {
    async fn get_profile(&self, user_id: u64) -> Result<Option<CandidateProfile>, ProviderError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }
}

fn prepare_jobs(jobs: Vec<JobPosting>, normalizer: &SkillNormalizer) -> Result<Vec<JobPosting>, ProviderError> {
    let mut seen = HashSet::with_capacity(jobs.len());

    jobs.into_iter()
        .map(|mut job| {
            if !job.salary_range.is_valid() {
                return Err(ProviderError::InvalidPosting(format!(
                    "job {} has salary min {} above max {}",
                    job.id, job.salary_range.min, job.salary_range.max
                )));
            }
            if !seen.insert(job.id) {
                return Err(ProviderError::InvalidPosting(format!("duplicate job id {}", job.id)));
            }
            job.required_skills = normalizer.apply(&job.required_skills);
            Ok(job)
        })
        .collect()
}

fn canonical_profile(mut profile: CandidateProfile, normalizer: &SkillNormalizer) -> CandidateProfile {
    profile.skills = normalizer.apply(&profile.skills);
    profile
}
