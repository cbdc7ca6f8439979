use std::borrow::Cow;

use crate::core::{
    cancel::CancellationFlag,
    filters::{select_jobs, select_jobs_with_cancel},
    normalize::SkillNormalizer,
    ranking::rank,
    scoring::{score_job, ScoringParams},
};
use crate::error::MatchError;
use crate::models::{CandidateProfile, FilterCriteria, JobPosting, ScoredJob};

/// Default number of postings scanned between cancellation checks
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Query façade: the single entry point collaborators call
///
/// # Pipeline
/// 1. Validate criteria (and profile presence for `recommend`)
/// 2. Filter the catalog
/// 3. Score each survivor against the profile
/// 4. Rank by score, recency, then id
///
/// The matcher holds configuration only. It is cheap to clone and safe to
/// share across concurrent queries over one catalog snapshot.
#[derive(Debug, Clone)]
pub struct JobMatcher {
    params: ScoringParams,
    normalizer: SkillNormalizer,
    chunk_size: usize,
}

impl JobMatcher {
    pub fn new(params: ScoringParams) -> Self {
        Self {
            params,
            normalizer: SkillNormalizer::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScoringParams::default())
    }

    /// Canonicalize criteria and profile skills through an alias table.
    /// Catalog postings are expected to be canonicalized by their provider.
    pub fn with_normalizer(mut self, normalizer: SkillNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    pub fn normalizer(&self) -> &SkillNormalizer {
        &self.normalizer
    }

    /// Score a single job; a missing profile scores 0
    pub fn score(&self, profile: Option<&CandidateProfile>, job: &JobPosting) -> ScoredJob {
        let profile = profile.map(|p| self.canonical_profile(p));
        score_job(profile.as_deref(), job, &self.params)
    }

    /// Filter, score and rank the catalog for a candidate
    ///
    /// # Errors
    /// * `InvalidCriteria` - the salary range has `min > max`
    /// * `MissingProfile` - no profile was supplied
    pub fn recommend(
        &self,
        profile: Option<&CandidateProfile>,
        catalog: &[JobPosting],
        criteria: &FilterCriteria,
    ) -> Result<Vec<ScoredJob>, MatchError> {
        criteria.ensure_valid()?;
        let profile = profile.ok_or(MatchError::MissingProfile)?;
        let criteria = self.canonical_criteria(criteria);

        let survivors = select_jobs(catalog, &criteria);
        Ok(self.score_and_rank(profile, survivors))
    }

    /// [`recommend`](Self::recommend) with a cancellation check between
    /// catalog chunks
    pub fn recommend_with_cancel(
        &self,
        profile: Option<&CandidateProfile>,
        catalog: &[JobPosting],
        criteria: &FilterCriteria,
        cancel: &CancellationFlag,
    ) -> Result<Vec<ScoredJob>, MatchError> {
        criteria.ensure_valid()?;
        let profile = profile.ok_or(MatchError::MissingProfile)?;
        let criteria = self.canonical_criteria(criteria);

        let survivors = select_jobs_with_cancel(catalog, &criteria, cancel, self.chunk_size)?;
        if cancel.is_cancelled() {
            return Err(MatchError::Cancelled);
        }
        Ok(self.score_and_rank(profile, survivors))
    }

    /// Filter the catalog without scoring, preserving catalog order
    pub fn search(
        &self,
        catalog: &[JobPosting],
        criteria: &FilterCriteria,
    ) -> Result<Vec<JobPosting>, MatchError> {
        criteria.ensure_valid()?;
        let criteria = self.canonical_criteria(criteria);

        Ok(select_jobs(catalog, &criteria).into_iter().cloned().collect())
    }

    pub fn search_with_cancel(
        &self,
        catalog: &[JobPosting],
        criteria: &FilterCriteria,
        cancel: &CancellationFlag,
    ) -> Result<Vec<JobPosting>, MatchError> {
        criteria.ensure_valid()?;
        let criteria = self.canonical_criteria(criteria);

        let survivors = select_jobs_with_cancel(catalog, &criteria, cancel, self.chunk_size)?;
        Ok(survivors.into_iter().cloned().collect())
    }

    fn score_and_rank(&self, profile: &CandidateProfile, survivors: Vec<&JobPosting>) -> Vec<ScoredJob> {
        let canonical = self.canonical_profile(profile);
        let profile: &CandidateProfile = &canonical;
        let scored: Vec<ScoredJob> = survivors
            .into_iter()
            .map(|job| score_job(Some(profile), job, &self.params))
            .collect();

        tracing::debug!("Scored {} surviving jobs for user {}", scored.len(), profile.user_id);
        rank(scored)
    }

    fn canonical_profile<'p>(&self, profile: &'p CandidateProfile) -> Cow<'p, CandidateProfile> {
        if self.normalizer.alias_count() == 0 {
            return Cow::Borrowed(profile);
        }
        let mut owned = profile.clone();
        owned.skills = self.normalizer.apply(&profile.skills);
        Cow::Owned(owned)
    }

    fn canonical_criteria<'c>(&self, criteria: &'c FilterCriteria) -> Cow<'c, FilterCriteria> {
        if self.normalizer.alias_count() == 0 || criteria.skills.is_empty() {
            return Cow::Borrowed(criteria);
        }
        let mut owned = criteria.clone();
        owned.skills = self.normalizer.apply(&criteria.skills);
        Cow::Owned(owned)
    }
}

impl Default for JobMatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
