//! Job Match - deterministic job recommendation and filtering engine
//!
//! This library scores job postings against a candidate profile, filters a
//! catalog by multi-dimensional criteria and ranks the survivors in a total,
//! reproducible order. The engine itself is pure; the `services` and
//! `routes` modules wrap it in a thin request/response boundary.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{JobMatcher, CancellationFlag, SkillNormalizer, ScoringParams, normalize_skills};
pub use error::MatchError;
pub use models::{CandidateProfile, JobPosting, JobType, ExperienceLevel, SalaryRange, FilterCriteria, ScoredJob};
