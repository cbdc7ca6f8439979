// Property checks for the matching engine

use chrono::{TimeZone, Utc};
use job_match::core::{filter_jobs, normalize_skills, rank, score_job, JobMatcher, ScoringParams};
use job_match::models::{CandidateProfile, ExperienceLevel, FilterCriteria, JobPosting, JobType, SalaryRange};

const SKILL_POOL: &[&str] = &["React", "TypeScript", "Node.js", "AWS", "Python", "Docker", "Go", "Java"];
const LOCATIONS: &[&str] = &["San Francisco, CA", "Remote", "New York, NY", "Austin, TX"];

/// Deterministic spread of postings covering every job type and level
fn sample_catalog(n: u64) -> Vec<JobPosting> {
    (0..n)
        .map(|i| {
            let skills: Vec<&str> = SKILL_POOL
                .iter()
                .enumerate()
                .filter(|(k, _)| (i as usize + k) % 3 == 0)
                .map(|(_, s)| *s)
                .collect();
            let min = 60_000 + (i as u32 % 7) * 15_000;

            JobPosting {
                id: 1000 - i,
                title: format!("Engineer {}", i),
                company: format!("Company {}", i % 4),
                description: "Build things".to_string(),
                location: LOCATIONS[i as usize % LOCATIONS.len()].to_string(),
                salary_range: SalaryRange::new(min, min + 30_000),
                job_type: JobType::ALL[i as usize % JobType::ALL.len()],
                required_skills: normalize_skills(skills),
                min_experience: if i % 5 == 0 { None } else { Some(i as u32 % 13) },
                posted_at: Utc.with_ymd_and_hms(2024, 6, 1 + (i as u32 % 3), 0, 0, 0).unwrap(),
            }
        })
        .collect()
}

fn sample_profiles() -> Vec<CandidateProfile> {
    vec![
        CandidateProfile::new(1, Vec::<String>::new(), "", 0),
        CandidateProfile::new(2, ["React", "AWS"], "San Francisco", 6).with_desired_salary(125_000),
        CandidateProfile::new(3, SKILL_POOL.iter(), "Austin", 25).with_desired_salary(0),
        CandidateProfile::new(4, ["Go"], "Nowhere", 2).with_desired_salary(4_000_000),
    ]
}

fn sample_criteria() -> Vec<FilterCriteria> {
    vec![
        FilterCriteria::default(),
        FilterCriteria {
            skills: normalize_skills(["Go", "Rust"]),
            ..Default::default()
        },
        FilterCriteria {
            search_text: Some("company 2".to_string()),
            job_types: [JobType::Remote, JobType::Contract].into_iter().collect(),
            ..Default::default()
        },
        FilterCriteria {
            location_text: Some("tx".to_string()),
            salary_range: Some(SalaryRange::new(90_000, 120_000)),
            experience_level: Some(ExperienceLevel::Mid),
            ..Default::default()
        },
    ]
}

#[test]
fn test_filter_is_idempotent() {
    let catalog = sample_catalog(60);
    for criteria in sample_criteria() {
        let once = filter_jobs(&catalog, &criteria);
        let twice = filter_jobs(&once, &criteria);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_empty_criteria_is_identity() {
    let catalog = sample_catalog(25);
    assert_eq!(filter_jobs(&catalog, &FilterCriteria::default()), catalog);
}

#[test]
fn test_filter_result_is_ordered_subsequence() {
    let catalog = sample_catalog(60);
    for criteria in sample_criteria() {
        let survivors = filter_jobs(&catalog, &criteria);
        let mut cursor = catalog.iter();
        for job in &survivors {
            assert!(cursor.any(|c| c.id == job.id), "job {} out of order", job.id);
        }
    }
}

#[test]
fn test_recommend_is_deterministic() {
    let matcher = JobMatcher::with_defaults();
    let catalog = sample_catalog(60);
    let mut reversed = catalog.clone();
    reversed.reverse();

    for profile in sample_profiles() {
        for criteria in sample_criteria() {
            let a = matcher.recommend(Some(&profile), &catalog, &criteria).unwrap();
            let b = matcher.recommend(Some(&profile), &catalog, &criteria).unwrap();
            assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );

            // Traversal order of the catalog does not change the ranking
            let c = matcher.recommend(Some(&profile), &reversed, &criteria).unwrap();
            assert_eq!(a, c);
        }
    }
}

#[test]
fn test_score_bounds() {
    let params = ScoringParams::default();
    for profile in sample_profiles() {
        for job in sample_catalog(60) {
            let scored = score_job(Some(&profile), &job, &params);
            assert!(scored.score <= 100);
            for value in scored.score_breakdown.values() {
                assert!(*value >= 0.0 && *value <= 50.0);
            }
        }
    }
}

#[test]
fn test_adding_matching_skill_never_decreases_score() {
    let params = ScoringParams::default();
    for job in sample_catalog(40) {
        for base in sample_profiles() {
            let before = score_job(Some(&base), &job, &params).score;
            for skill in &job.required_skills {
                let mut richer = base.clone();
                richer.skills.insert(skill.clone());
                let after = score_job(Some(&richer), &job, &params).score;
                assert!(after >= before, "job {} skill {}", job.id, skill);
            }
        }
    }
}

#[test]
fn test_any_match_skill_filter() {
    let go = JobPosting {
        required_skills: normalize_skills(["Go"]),
        ..sample_catalog(1).remove(0)
    };
    let java = JobPosting {
        id: go.id + 1,
        required_skills: normalize_skills(["Java"]),
        ..go.clone()
    };
    let criteria = FilterCriteria {
        skills: normalize_skills(["Go", "Rust"]),
        ..Default::default()
    };

    let survivors = filter_jobs(&[go.clone(), java], &criteria);
    assert_eq!(survivors, vec![go]);
}

#[test]
fn test_salary_overlap_filter() {
    let job = JobPosting {
        salary_range: SalaryRange::new(100_000, 130_000),
        ..sample_catalog(1).remove(0)
    };
    let partial = FilterCriteria {
        salary_range: Some(SalaryRange::new(120_000, 150_000)),
        ..Default::default()
    };
    let disjoint = FilterCriteria {
        salary_range: Some(SalaryRange::new(140_000, 160_000)),
        ..Default::default()
    };

    assert_eq!(filter_jobs(std::slice::from_ref(&job), &partial).len(), 1);
    assert!(filter_jobs(std::slice::from_ref(&job), &disjoint).is_empty());
}

#[test]
fn test_rank_is_a_permutation() {
    let params = ScoringParams::default();
    let profile = &sample_profiles()[1];
    let scored: Vec<_> = sample_catalog(30)
        .iter()
        .map(|job| score_job(Some(profile), job, &params))
        .collect();

    let ranked = rank(scored.clone());
    assert_eq!(ranked.len(), scored.len());

    let mut before: Vec<u64> = scored.iter().map(|s| s.job.id).collect();
    let mut after: Vec<u64> = ranked.iter().map(|s| s.job.id).collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn test_disjoint_skills_score_zero_skill_component() {
    let params = ScoringParams::default();
    let profile = CandidateProfile::new(9, ["Haskell"], "", 0);
    for job in sample_catalog(20).into_iter().filter(|j| !j.required_skills.is_empty()) {
        let scored = score_job(Some(&profile), &job, &params);
        assert_eq!(scored.score_breakdown["skills"], 0.0);
        assert!(scored.matched_skills.is_empty());
    }
}
