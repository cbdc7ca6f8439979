// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CandidateProfile, JobPosting, JobType, ExperienceLevel, SalaryRange, FilterCriteria, ScoredJob};
pub use requests::{CriteriaPayload, RecommendRequest, SearchRequest};
pub use responses::{RecommendResponse, SearchResponse, HealthResponse, ErrorResponse};
