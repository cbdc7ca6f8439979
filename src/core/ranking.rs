use std::cmp::Ordering;

use crate::models::ScoredJob;

/// Total order used for ranking
///
/// Score descending, then `posted_at` descending, then job id ascending.
#[inline]
pub fn compare_scored(a: &ScoredJob, b: &ScoredJob) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.job.posted_at.cmp(&a.job.posted_at))
        .then_with(|| a.job.id.cmp(&b.job.id))
}

/// Sort scored jobs into their deterministic ranking
///
/// Input order never leaks into the output: any permutation of the same
/// scored jobs ranks identically.
pub fn rank(mut scored: Vec<ScoredJob>) -> Vec<ScoredJob> {
    scored.sort_by(compare_scored);
    scored
}
