use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::MatchError;
use crate::models::domain::{parse_experience_level, parse_job_types, FilterCriteria, SalaryRange};

/// Filter criteria as sent over the wire
///
/// Enum labels stay raw strings here so an unknown job type or experience
/// level surfaces as `InvalidCriteria` rather than a body parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CriteriaPayload {
    #[serde(alias = "search")]
    pub search_text: Option<String>,
    #[serde(alias = "location")]
    pub location_text: Option<String>,
    pub skills: Vec<String>,
    #[serde(alias = "jobType")]
    pub job_types: Vec<String>,
    pub salary_range: Option<SalaryRange>,
    pub experience_level: Option<String>,
}

impl TryFrom<CriteriaPayload> for FilterCriteria {
    type Error = MatchError;

    fn try_from(payload: CriteriaPayload) -> Result<Self, Self::Error> {
        let criteria = FilterCriteria {
            search_text: payload.search_text,
            location_text: payload.location_text,
            skills: crate::core::normalize_skills(payload.skills),
            job_types: parse_job_types(&payload.job_types)?,
            salary_range: payload.salary_range,
            experience_level: parse_experience_level(payload.experience_level.as_deref())?,
        };
        criteria.ensure_valid()?;
        Ok(criteria)
    }
}

/// Request to rank the catalog against a stored candidate profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "user_id")]
    pub user_id: u64,
    #[serde(default)]
    pub criteria: CriteriaPayload,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u16,
    #[serde(default)]
    pub offset: usize,
}

/// Request to browse the catalog without a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub criteria: CriteriaPayload,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u16,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> u16 {
    20
}
