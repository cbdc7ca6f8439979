use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::core::{CancellationFlag, JobMatcher};
use crate::error::MatchError;
use crate::models::{
    ErrorResponse, FilterCriteria, HealthResponse, RecommendRequest, RecommendResponse, SearchRequest, SearchResponse,
};
use crate::services::{CacheKey, CatalogProvider, ProfileProvider, ProviderError, ResultCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub profiles: Arc<dyn ProfileProvider>,
    pub cache: Option<Arc<ResultCache>>,
    pub matcher: JobMatcher,
    pub scan_timeout: Duration,
}

/// Errors returned by the HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Match(e) => e.code(),
            ApiError::Provider(_) => "provider_error",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Match(MatchError::InvalidCriteria(_)) => StatusCode::BAD_REQUEST,
            ApiError::Match(MatchError::MissingProfile) => StatusCode::NOT_FOUND,
            ApiError::Match(MatchError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Configure all job-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/jobs/recommend", web::post().to(recommend))
        .route("/jobs/search", web::post().to(search));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (status, revision, count) = match state.catalog.snapshot().await {
        Ok(snapshot) => ("healthy", snapshot.revision, snapshot.len()),
        Err(e) => {
            tracing::warn!("Catalog unavailable during health check: {}", e);
            ("degraded", 0, 0)
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        catalog_revision: revision,
        job_count: count,
    })
}

/// Recommend endpoint
///
/// POST /api/v1/jobs/recommend
///
/// Request body:
/// ```json
/// {
///   "userId": 42,
///   "criteria": { "jobTypes": ["Full-time"], "salaryRange": [100000, 150000] },
///   "limit": 20,
///   "offset": 0
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let req = req.into_inner();
    // Fail fast before touching any provider
    let criteria = FilterCriteria::try_from(req.criteria)?;

    let query_id = Uuid::new_v4();
    tracing::info!("Recommending jobs for user {} (query {})", req.user_id, query_id);

    let profile = state
        .profiles
        .get_profile(req.user_id)
        .await?
        .ok_or(MatchError::MissingProfile)?;
    let snapshot = state.catalog.snapshot().await?;

    let key = CacheKey::recommend(snapshot.revision, &profile, &criteria);
    let cached = match &state.cache {
        Some(cache) => cache.get_recommendations(&key).await,
        None => None,
    };

    let ranked = match cached {
        Some(ranked) => ranked,
        None => {
            let matcher = state.matcher.clone();
            let jobs = Arc::clone(&snapshot.jobs);
            let ranked = run_scan(state.scan_timeout, move |cancel| {
                matcher.recommend_with_cancel(Some(&profile), &jobs, &criteria, cancel)
            })
            .await?;

            let ranked = Arc::new(ranked);
            if let Some(cache) = &state.cache {
                cache.insert_recommendations(key, Arc::clone(&ranked)).await;
            }
            ranked
        }
    };

    let (results, next_offset) = paginate(&ranked, req.offset, req.limit as usize);

    tracing::info!(
        "Returning {} of {} recommendations for user {} (catalog revision {})",
        results.len(),
        ranked.len(),
        req.user_id,
        snapshot.revision
    );

    Ok(HttpResponse::Ok().json(RecommendResponse {
        query_id,
        results,
        total_results: ranked.len(),
        next_offset,
    }))
}

/// Search endpoint, used when the caller has no profile
///
/// POST /api/v1/jobs/search
async fn search(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let req = req.into_inner();
    let criteria = FilterCriteria::try_from(req.criteria)?;

    let query_id = Uuid::new_v4();
    let snapshot = state.catalog.snapshot().await?;

    let key = CacheKey::search(snapshot.revision, &criteria);
    let cached = match &state.cache {
        Some(cache) => cache.get_search(&key).await,
        None => None,
    };

    let found = match cached {
        Some(found) => found,
        None => {
            let matcher = state.matcher.clone();
            let jobs = Arc::clone(&snapshot.jobs);
            let found = run_scan(state.scan_timeout, move |cancel| {
                matcher.search_with_cancel(&jobs, &criteria, cancel)
            })
            .await?;

            let found = Arc::new(found);
            if let Some(cache) = &state.cache {
                cache.insert_search(key, Arc::clone(&found)).await;
            }
            found
        }
    };

    let (results, next_offset) = paginate(&found, req.offset, req.limit as usize);

    tracing::info!(
        "Search {} matched {} jobs (catalog revision {})",
        query_id,
        found.len(),
        snapshot.revision
    );

    Ok(HttpResponse::Ok().json(SearchResponse {
        query_id,
        results,
        total_results: found.len(),
        next_offset,
    }))
}

/// Run a catalog scan on the blocking pool, cancelling it after `timeout`.
/// A zero timeout has already elapsed, so the scan starts cancelled.
async fn run_scan<T, F>(timeout: Duration, scan: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&CancellationFlag) -> Result<T, MatchError> + Send + 'static,
{
    let cancel = CancellationFlag::new();
    if timeout.is_zero() {
        cancel.cancel();
    }

    let watchdog = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::warn!("Catalog scan exceeded {:?}, cancelling", timeout);
            cancel.cancel();
        })
    };

    let result = web::block(move || scan(&cancel)).await;
    watchdog.abort();

    result
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

/// Slice one page out of a ranked result; `next_offset` is `None` on the
/// last page
pub fn paginate<T: Clone>(items: &[T], offset: usize, limit: usize) -> (Vec<T>, Option<usize>) {
    let start = offset.min(items.len());
    let end = start.saturating_add(limit).min(items.len());
    let next = if end < items.len() { Some(end) } else { None };
    (items[start..end].to_vec(), next)
}
