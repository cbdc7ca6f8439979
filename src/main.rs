use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use job_match::config::{LogFormat, Settings};
use job_match::routes::{self, AppState};
use job_match::services::{InMemoryStore, ResultCache};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.logging.log_format() {
        Ok(LogFormat::Json) => subscriber.json().init(),
        Ok(LogFormat::Pretty) => subscriber.pretty().init(),
        _ => subscriber.compact().init(),
    }

    info!("Starting job matching service...");

    // Load the catalog and profiles
    let store = match InMemoryStore::load(&settings.catalog.seed_path, settings.skill_normalizer()).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to load catalog from {}: {}", settings.catalog.seed_path, e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
        }
    };

    // Result cache is optional - the engine is pure, so it only saves work
    let cache = if settings.cache.enabled {
        info!(
            "Result cache enabled ({} entries, TTL: {}s)",
            settings.cache.capacity, settings.cache.ttl_secs
        );
        Some(Arc::new(ResultCache::new(settings.cache.capacity, settings.cache.ttl_secs)))
    } else {
        info!("Result cache disabled");
        None
    };

    let matcher = settings.matcher();
    info!(
        "Matcher initialized (salary tolerance {}, {} skill aliases)",
        matcher.params().salary_tolerance_ratio,
        matcher.normalizer().alias_count()
    );

    // Build application state
    let app_state = AppState {
        catalog: store.clone(),
        profiles: store,
        cache,
        matcher,
        scan_timeout: Duration::from_millis(settings.matching.scan_timeout_ms),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
