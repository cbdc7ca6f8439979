// Core engine exports
pub mod cancel;
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod ranking;
pub mod scoring;

pub use cancel::CancellationFlag;
pub use filters::{filter_jobs, matches_criteria, select_jobs, select_jobs_with_cancel, PreparedCriteria};
pub use matcher::{JobMatcher, DEFAULT_CHUNK_SIZE};
pub use normalize::{normalize_skill, normalize_skills, SkillNormalizer};
pub use ranking::{compare_scored, rank};
pub use scoring::{score_job, ScoringParams};
