use std::collections::BTreeSet;

use crate::core::cancel::CancellationFlag;
use crate::core::normalize::normalize_skills;
use crate::error::MatchError;
use crate::models::{ExperienceLevel, FilterCriteria, JobPosting, JobType, SalaryRange};

/// Criteria with text lower-cased and skills normalized once per query
#[derive(Debug)]
pub struct PreparedCriteria<'a> {
    search_text: Option<String>,
    location_text: Option<String>,
    skills: BTreeSet<String>,
    job_types: &'a BTreeSet<JobType>,
    salary_range: Option<SalaryRange>,
    experience_level: Option<ExperienceLevel>,
}

impl<'a> PreparedCriteria<'a> {
    pub fn new(criteria: &'a FilterCriteria) -> Self {
        Self {
            search_text: lowered(&criteria.search_text),
            location_text: lowered(&criteria.location_text),
            skills: normalize_skills(criteria.skills.iter()),
            job_types: &criteria.job_types,
            salary_range: criteria.salary_range,
            experience_level: criteria.experience_level,
        }
    }
}

fn lowered(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Check a job against every criteria dimension
///
/// Unset dimensions pass. Skills and job types are any-match.
#[inline]
pub fn matches_criteria(job: &JobPosting, criteria: &PreparedCriteria<'_>) -> bool {
    if let Some(text) = &criteria.search_text {
        if !matches_search_text(job, text) {
            return false;
        }
    }

    if let Some(text) = &criteria.location_text {
        if !job.location.to_lowercase().contains(text.as_str()) {
            return false;
        }
    }

    if !criteria.skills.is_empty()
        && job.required_skills.is_disjoint(&criteria.skills) {
        return false;
    }

    if !criteria.job_types.is_empty()
        && !criteria.job_types.contains(&job.job_type) {
        return false;
    }

    if let Some(range) = &criteria.salary_range {
        if !job.salary_range.overlaps(range) {
            return false;
        }
    }

    // A job with no stated requirement has no implied level and never
    // satisfies a level filter.
    if let Some(level) = criteria.experience_level {
        if job.experience_level() != Some(level) {
            return false;
        }
    }

    true
}

/// Case-insensitive substring match on title, company or description
#[inline]
fn matches_search_text(job: &JobPosting, needle: &str) -> bool {
    job.title.to_lowercase().contains(needle)
        || job.company.to_lowercase().contains(needle)
        || job.description.to_lowercase().contains(needle)
}

/// Select the admissible jobs by reference, preserving catalog order
pub fn select_jobs<'c>(catalog: &'c [JobPosting], criteria: &FilterCriteria) -> Vec<&'c JobPosting> {
    if criteria.is_empty() {
        return catalog.iter().collect();
    }

    let prepared = PreparedCriteria::new(criteria);
    catalog
        .iter()
        .filter(|job| matches_criteria(job, &prepared))
        .collect()
}

/// Chunked variant of [`select_jobs`] that honours a cancellation flag
///
/// The flag is checked before each chunk of `chunk_size` jobs. A cancelled
/// scan returns [`MatchError::Cancelled`] and no partial result.
pub fn select_jobs_with_cancel<'c>(
    catalog: &'c [JobPosting],
    criteria: &FilterCriteria,
    cancel: &CancellationFlag,
    chunk_size: usize,
) -> Result<Vec<&'c JobPosting>, MatchError> {
    let prepared = PreparedCriteria::new(criteria);
    let mut selected = Vec::new();

    for chunk in catalog.chunks(chunk_size.max(1)) {
        if cancel.is_cancelled() {
            tracing::debug!("Catalog scan cancelled after {} survivors", selected.len());
            return Err(MatchError::Cancelled);
        }
        selected.extend(chunk.iter().filter(|job| matches_criteria(job, &prepared)));
    }

    Ok(selected)
}

/// Stable filter: survivors keep their relative catalog order
pub fn filter_jobs(catalog: &[JobPosting], criteria: &FilterCriteria) -> Vec<JobPosting> {
    select_jobs(catalog, criteria).into_iter().cloned().collect()
}
