use std::collections::BTreeMap;

use crate::models::{CandidateProfile, JobPosting, ScoredJob};

pub const SKILL_WEIGHT: f64 = 50.0;
pub const LOCATION_WEIGHT: f64 = 20.0;
pub const EXPERIENCE_WEIGHT: f64 = 20.0;
pub const SALARY_WEIGHT: f64 = 10.0;

pub const SKILLS_COMPONENT: &str = "skills";
pub const LOCATION_COMPONENT: &str = "location";
pub const EXPERIENCE_COMPONENT: &str = "experience";
pub const SALARY_COMPONENT: &str = "salary";

/// Tunables for the sub-scores; the component weights themselves are fixed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Distance outside the job's salary band, as a fraction of the desired
    /// salary, at which the salary sub-score reaches zero. Must be > 0.
    pub salary_tolerance_ratio: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            salary_tolerance_ratio: 0.25,
        }
    }
}

/// Calculate a match score (0-100) for a job against a candidate profile
///
/// Scoring formula:
/// score = round(
///     skill_fit * 50 +        # share of the job's required skills held
///     location_fit * 20 +     # binary: substring match or remote job
///     experience_fit * 20 +   # triangular falloff around the level midpoint
///     salary_fit * 10         # linear decay outside the job's band
/// )
///
/// A missing profile yields score 0 rather than an error. The breakdown keeps
/// each weighted sub-score unrounded.
pub fn score_job(
    profile: Option<&CandidateProfile>,
    job: &JobPosting,
    params: &ScoringParams,
) -> ScoredJob {
    let Some(profile) = profile else {
        return ScoredJob {
            job: job.clone(),
            score: 0,
            score_breakdown: breakdown(0.0, 0.0, 0.0, 0.0),
            matched_skills: Vec::new(),
        };
    };

    let (skill_fit, matched_skills) = calculate_skill_score(profile, job);
    let location_fit = calculate_location_score(&profile.location, job);
    let experience_fit = calculate_experience_score(profile.years_experience, job);
    let salary_fit = calculate_salary_score(profile.desired_salary, job, params.salary_tolerance_ratio);

    let skills = skill_fit * SKILL_WEIGHT;
    let location = location_fit * LOCATION_WEIGHT;
    let experience = experience_fit * EXPERIENCE_WEIGHT;
    let salary = salary_fit * SALARY_WEIGHT;

    let total = (skills + location + experience + salary).round().clamp(0.0, 100.0);

    ScoredJob {
        job: job.clone(),
        score: total as u8,
        score_breakdown: breakdown(skills, location, experience, salary),
        matched_skills,
    }
}

fn breakdown(skills: f64, location: f64, experience: f64, salary: f64) -> BTreeMap<String, f64> {
    BTreeMap::from([
        (SKILLS_COMPONENT.to_string(), skills),
        (LOCATION_COMPONENT.to_string(), location),
        (EXPERIENCE_COMPONENT.to_string(), experience),
        (SALARY_COMPONENT.to_string(), salary),
    ])
}

/// Calculate skill overlap (0-1) and the overlapping skills
///
/// A job with no required skills is trivially satisfied and scores 1.0.
/// A profile with no skills scores 0.0 against any job that requires some.
#[inline]
fn calculate_skill_score(profile: &CandidateProfile, job: &JobPosting) -> (f64, Vec<String>) {
    if job.required_skills.is_empty() {
        return (1.0, Vec::new());
    }

    let matched: Vec<String> = job
        .required_skills
        .intersection(&profile.skills)
        .cloned()
        .collect();

    let fit = matched.len() as f64 / job.required_skills.len() as f64;
    (fit, matched)
}

/// Calculate location affinity (0 or 1)
/// Remote jobs always match; otherwise the profile location must appear
/// within the job location, ignoring case.
#[inline]
fn calculate_location_score(profile_location: &str, job: &JobPosting) -> f64 {
    if job.is_remote_location() {
        return 1.0;
    }

    let wanted = profile_location.trim().to_lowercase();
    if wanted.is_empty() {
        return 0.0;
    }

    if job.location.to_lowercase().contains(&wanted) {
        1.0
    } else {
        0.0
    }
}

/// Calculate experience fit (0-1)
/// Peaks at the midpoint of the job's implied level and falls to zero one
/// band width away in either direction.
#[inline]
fn calculate_experience_score(years: u32, job: &JobPosting) -> f64 {
    let Some(level) = job.experience_level() else {
        return 1.0;
    };

    let deviation = (years as f64 - level.midpoint()).abs();
    (1.0 - deviation / level.band_width()).max(0.0)
}

/// Calculate salary fit (0-1)
/// Full inside the band, then linear decay by distance to the nearest bound.
#[inline]
fn calculate_salary_score(desired: Option<u32>, job: &JobPosting, tolerance_ratio: f64) -> f64 {
    let Some(desired) = desired else {
        return 1.0;
    };

    let distance = job.salary_range.distance_to(desired);
    if distance == 0 {
        return 1.0;
    }

    let tolerance = desired as f64 * tolerance_ratio;
    if tolerance <= 0.0 {
        return 0.0;
    }

    (1.0 - distance as f64 / tolerance).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobType, SalaryRange};
    use chrono::{TimeZone, Utc};

    fn create_test_job(skills: &[&str], location: &str, min_experience: Option<u32>) -> JobPosting {
        JobPosting {
            id: 1,
            title: "Senior Frontend Developer".to_string(),
            company: "TechCorp Inc.".to_string(),
            description: String::new(),
            location: location.to_string(),
            salary_range: SalaryRange::new(120_000, 150_000),
            job_type: JobType::FullTime,
            required_skills: crate::core::normalize::normalize_skills(skills),
            min_experience,
            posted_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    fn create_test_profile(skills: &[&str], years: u32) -> CandidateProfile {
        CandidateProfile::new(1, skills, "San Francisco", years)
    }

    #[test]
    fn test_perfect_match_scores_100() {
        let job = create_test_job(&["React", "TypeScript"], "San Francisco, CA", Some(5));
        let profile = create_test_profile(&["react", "typescript"], 7).with_desired_salary(130_000);

        let scored = score_job(Some(&profile), &job, &ScoringParams::default());

        // 7 years against the Senior midpoint of 7.5 costs 2 experience points
        assert_eq!(scored.score, 98);
        assert_eq!(scored.score_breakdown[SKILLS_COMPONENT], 50.0);
        assert_eq!(scored.score_breakdown[LOCATION_COMPONENT], 20.0);
        assert_eq!(scored.score_breakdown[SALARY_COMPONENT], 10.0);
        assert_eq!(scored.matched_skills, vec!["react", "typescript"]);
    }

    #[test]
    fn test_missing_profile_scores_zero() {
        let job = create_test_job(&["React"], "Remote", None);
        let scored = score_job(None, &job, &ScoringParams::default());

        assert_eq!(scored.score, 0);
        assert!(scored.score_breakdown.values().all(|v| *v == 0.0));
        assert!(scored.matched_skills.is_empty());
    }

    #[test]
    fn test_skill_score() {
        let job = create_test_job(&["React", "TypeScript", "Node.js", "AWS"], "Austin, TX", None);

        let (none, _) = calculate_skill_score(&create_test_profile(&[], 3), &job);
        assert_eq!(none, 0.0);

        let (half, matched) = calculate_skill_score(&create_test_profile(&["react", "aws", "go"], 3), &job);
        assert_eq!(half, 0.5);
        assert_eq!(matched, vec!["aws", "react"]);

        let open_job = create_test_job(&[], "Austin, TX", None);
        let (full, _) = calculate_skill_score(&create_test_profile(&[], 3), &open_job);
        assert_eq!(full, 1.0);
    }

    #[test]
    fn test_location_score() {
        let sf = create_test_job(&[], "San Francisco, CA", None);
        let remote = create_test_job(&[], " remote ", None);

        assert_eq!(calculate_location_score("san francisco", &sf), 1.0);
        assert_eq!(calculate_location_score("New York", &sf), 0.0);
        assert_eq!(calculate_location_score("", &sf), 0.0);
        assert_eq!(calculate_location_score("New York", &remote), 1.0);
        assert_eq!(calculate_location_score("", &remote), 1.0);
    }

    #[test]
    fn test_experience_score() {
        // No stated requirement
        assert_eq!(calculate_experience_score(0, &create_test_job(&[], "", None)), 1.0);

        // Mid level: midpoint 3.5, width 3
        let mid = create_test_job(&[], "", Some(3));
        assert_eq!(calculate_experience_score(2, &mid), 0.5);
        assert_eq!(calculate_experience_score(7, &mid), 0.0);
        assert_eq!(calculate_experience_score(30, &mid), 0.0);

        // Entry level: midpoint 1, width 2
        let entry = create_test_job(&[], "", Some(0));
        assert_eq!(calculate_experience_score(1, &entry), 1.0);
        assert_eq!(calculate_experience_score(3, &entry), 0.0);
    }

    #[test]
    fn test_salary_score() {
        let job = create_test_job(&[], "", None);

        assert_eq!(calculate_salary_score(None, &job, 0.25), 1.0);
        assert_eq!(calculate_salary_score(Some(130_000), &job, 0.25), 1.0);
        assert_eq!(calculate_salary_score(Some(120_000), &job, 0.25), 1.0);

        // 200k wants 50k above the max; tolerance is 50k
        assert_eq!(calculate_salary_score(Some(200_000), &job, 0.25), 0.0);
        // 160k is 10k above; tolerance 40k
        assert_eq!(calculate_salary_score(Some(160_000), &job, 0.25), 0.75);
        // zero desired salary below the band has no tolerance
        assert_eq!(calculate_salary_score(Some(0), &job, 0.25), 0.0);
    }

    #[test]
    fn test_score_is_deterministic() {
        let job = create_test_job(&["React", "Docker", "Python"], "Remote", Some(4));
        let profile = create_test_profile(&["python"], 1).with_desired_salary(90_000);
        let params = ScoringParams::default();

        let a = score_job(Some(&profile), &job, &params);
        let b = score_job(Some(&profile), &job, &params);
        assert_eq!(a, b);
        for (key, value) in &a.score_breakdown {
            assert_eq!(value.to_bits(), b.score_breakdown[key].to_bits());
        }
    }
}
