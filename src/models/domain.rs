use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::core::normalize::normalize_skills;
use crate::error::MatchError;

/// Candidate profile as supplied by the profile provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub user_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "deserialize_skill_set", default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub years_experience: u32,
    #[serde(default)]
    pub desired_salary: Option<u32>,
}

impl CandidateProfile {
    pub fn new<I, S>(user_id: u64, skills: I, location: impl Into<String>, years_experience: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            user_id,
            name: String::new(),
            skills: normalize_skills(skills),
            location: location.into(),
            years_experience,
            desired_salary: None,
        }
    }

    pub fn with_desired_salary(mut self, salary: u32) -> Self {
        self.desired_salary = Some(salary);
        self
    }
}

/// Employment arrangement of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Remote,
    Hybrid,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Remote,
        JobType::Hybrid,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Remote => "Remote",
            JobType::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobType {
    type Err = MatchError;

    /// Accepts `FullTime`, `full_time`, `Full-time` and the like
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match enum_key(s).as_str() {
            "fulltime" => Ok(JobType::FullTime),
            "parttime" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "remote" => Ok(JobType::Remote),
            "hybrid" => Ok(JobType::Hybrid),
            _ => Err(MatchError::invalid(format!("unknown job type '{}'", s))),
        }
    }
}

impl<'de> Deserialize<'de> for JobType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Experience level bucket
///
/// | Level  | Years      |
/// |--------|------------|
/// | Entry  | 0 - 1      |
/// | Mid    | 2 - 4      |
/// | Senior | 5 - 9      |
/// | Lead   | 10 and up  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=1 => ExperienceLevel::Entry,
            2..=4 => ExperienceLevel::Mid,
            5..=9 => ExperienceLevel::Senior,
            _ => ExperienceLevel::Lead,
        }
    }

    /// Half-open `[lo, hi)` year range of the band.
    ///
    /// Lead is unbounded for bucketing; its upper bound here only fixes the
    /// midpoint and width used by the experience sub-score.
    pub fn year_range(&self) -> (u32, u32) {
        match self {
            ExperienceLevel::Entry => (0, 2),
            ExperienceLevel::Mid => (2, 5),
            ExperienceLevel::Senior => (5, 10),
            ExperienceLevel::Lead => (10, 15),
        }
    }

    pub fn midpoint(&self) -> f64 {
        let (lo, hi) = self.year_range();
        (lo + hi) as f64 / 2.0
    }

    pub fn band_width(&self) -> f64 {
        let (lo, hi) = self.year_range();
        (hi - lo) as f64
    }
}

impl FromStr for ExperienceLevel {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match enum_key(s).as_str() {
            "entry" | "entrylevel" => Ok(ExperienceLevel::Entry),
            "mid" | "midlevel" => Ok(ExperienceLevel::Mid),
            "senior" | "seniorlevel" => Ok(ExperienceLevel::Senior),
            "lead" | "principal" | "leadprincipal" => Ok(ExperienceLevel::Lead),
            _ => Err(MatchError::invalid(format!("unknown experience level '{}'", s))),
        }
    }
}

impl<'de> Deserialize<'de> for ExperienceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Lower-cased alphanumerics only, so label spelling variants collapse
fn enum_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Inclusive salary band, serialized as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
}

impl SalaryRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Partial overlap counts; containment is not required
    pub fn overlaps(&self, other: &SalaryRange) -> bool {
        self.max >= other.min && self.min <= other.max
    }

    /// Distance from `value` to the nearest bound, zero when inside
    pub fn distance_to(&self, value: u32) -> u32 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0
        }
    }
}

impl From<(u32, u32)> for SalaryRange {
    fn from((min, max): (u32, u32)) -> Self {
        Self { min, max }
    }
}

impl From<SalaryRange> for (u32, u32) {
    fn from(range: SalaryRange) -> Self {
        (range.min, range.max)
    }
}

/// A job posting, owned by the catalog provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub salary_range: SalaryRange,
    pub job_type: JobType,
    #[serde(deserialize_with = "deserialize_skill_set", default, alias = "skills")]
    pub required_skills: BTreeSet<String>,
    #[serde(default)]
    pub min_experience: Option<u32>,
    pub posted_at: DateTime<Utc>,
}

impl JobPosting {
    /// Level implied by the stated minimum experience, if any
    pub fn experience_level(&self) -> Option<ExperienceLevel> {
        self.min_experience.map(ExperienceLevel::from_years)
    }

    pub fn is_remote_location(&self) -> bool {
        self.location.trim().eq_ignore_ascii_case("remote")
    }
}

/// Caller-supplied filter parameters; unset dimensions always pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    #[serde(alias = "search")]
    pub search_text: Option<String>,
    #[serde(alias = "location")]
    pub location_text: Option<String>,
    #[serde(deserialize_with = "deserialize_skill_set")]
    pub skills: BTreeSet<String>,
    #[serde(alias = "jobType", deserialize_with = "deserialize_job_types")]
    pub job_types: BTreeSet<JobType>,
    pub salary_range: Option<SalaryRange>,
    #[serde(deserialize_with = "deserialize_experience_level")]
    pub experience_level: Option<ExperienceLevel>,
}

impl FilterCriteria {
    /// True when every dimension is unset, i.e. the identity filter
    pub fn is_empty(&self) -> bool {
        blank(&self.search_text)
            && blank(&self.location_text)
            && self.skills.is_empty()
            && self.job_types.is_empty()
            && self.salary_range.is_none()
            && self.experience_level.is_none()
    }

    /// Reject malformed criteria instead of silently correcting them
    pub fn ensure_valid(&self) -> Result<(), MatchError> {
        if let Some(range) = &self.salary_range {
            if !range.is_valid() {
                return Err(MatchError::invalid(format!(
                    "salary range min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

fn blank(text: &Option<String>) -> bool {
    text.as_deref().map_or(true, |t| t.trim().is_empty())
}

/// Parse job type labels; blank entries mean "any" and are skipped
pub fn parse_job_types<I, S>(labels: I) -> Result<BTreeSet<JobType>, MatchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .filter(|label| !label.as_ref().trim().is_empty())
        .map(|label| label.as_ref().parse())
        .collect()
}

/// Parse an optional experience level; a blank label means no constraint
pub fn parse_experience_level(label: Option<&str>) -> Result<Option<ExperienceLevel>, MatchError> {
    match label.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => label.parse().map(Some),
    }
}

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredJob {
    pub job: JobPosting,
    pub score: u8,
    pub score_breakdown: BTreeMap<String, f64>,
    pub matched_skills: Vec<String>,
}

fn deserialize_job_types<'de, D>(deserializer: D) -> Result<BTreeSet<JobType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    parse_job_types(raw).map_err(serde::de::Error::custom)
}

fn deserialize_experience_level<'de, D>(deserializer: D) -> Result<Option<ExperienceLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    parse_experience_level(raw.as_deref()).map_err(serde::de::Error::custom)
}

fn deserialize_skill_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(normalize_skills(raw))
}
