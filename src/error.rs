use thiserror::Error;

/// Errors surfaced by the query façade
///
/// Every variant is raised before any filtering or scoring work is handed
/// back to the caller, so a caller never observes a partially computed
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("A candidate profile is required to compute recommendations")]
    MissingProfile,

    #[error("Query cancelled before the catalog scan completed")]
    Cancelled,
}

impl MatchError {
    pub fn invalid(message: impl Into<String>) -> Self {
        MatchError::InvalidCriteria(message.into())
    }

    /// Stable machine-readable code, used as the `error` field of HTTP bodies
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::InvalidCriteria(_) => "invalid_criteria",
            MatchError::MissingProfile => "missing_profile",
            MatchError::Cancelled => "cancelled",
        }
    }
}
