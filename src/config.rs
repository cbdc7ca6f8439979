use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::{JobMatcher, ScoringParams, SkillNormalizer};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub skills: SkillSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// JSON seed file with `jobs` and `profiles`
    #[serde(default = "default_seed_path")]
    pub seed_path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            seed_path: default_seed_path(),
        }
    }
}

fn default_seed_path() -> String { "data/catalog.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_enabled() -> bool { true }
fn default_cache_capacity() -> u64 { 1000 }
fn default_cache_ttl() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Catalog scans running longer than this are cancelled
    #[serde(default = "default_scan_timeout_ms")]
    pub scan_timeout_ms: u64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            scan_timeout_ms: default_scan_timeout_ms(),
        }
    }
}

fn default_chunk_size() -> usize { crate::core::DEFAULT_CHUNK_SIZE }
fn default_scan_timeout_ms() -> u64 { 2000 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_salary_tolerance_ratio")]
    pub salary_tolerance_ratio: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            salary_tolerance_ratio: default_salary_tolerance_ratio(),
        }
    }
}

fn default_salary_tolerance_ratio() -> f64 { 0.25 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillSettings {
    /// `alias = "canonical"` pairs, e.g. `js = "javascript"`
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LoggingSettings {
    pub fn log_format(&self) -> Result<LogFormat, ConfigError> {
        match self.format.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" | "text" => Ok(LogFormat::Compact),
            other => Err(ConfigError::Message(format!(
                "logging.format must be json, pretty or compact, got '{}'",
                other
            ))),
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with JOBMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JOBMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_platform_overrides(settings)?;
        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("JOBMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scoring.salary_tolerance_ratio > 0.0) {
            return Err(ConfigError::Message(format!(
                "scoring.salary_tolerance_ratio must be positive, got {}",
                self.scoring.salary_tolerance_ratio
            )));
        }
        self.logging.log_format()?;
        if self.matching.chunk_size == 0 {
            return Err(ConfigError::Message("matching.chunk_size must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn skill_normalizer(&self) -> SkillNormalizer {
        SkillNormalizer::with_aliases(self.skills.aliases.iter())
    }

    /// Build the query façade described by these settings
    pub fn matcher(&self) -> JobMatcher {
        JobMatcher::new(ScoringParams {
            salary_tolerance_ratio: self.scoring.salary_tolerance_ratio,
        })
        .with_normalizer(self.skill_normalizer())
        .with_chunk_size(self.matching.chunk_size)
    }
}

/// Honour the conventional `PORT` and `CATALOG_SEED_PATH` variables set by
/// container platforms
fn apply_platform_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(port) = env::var("PORT") {
        builder = builder.set_override("server.port", port)?;
    }
    if let Ok(path) = env::var("CATALOG_SEED_PATH") {
        builder = builder.set_override("catalog.seed_path", path)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.cache.ttl_secs, 300);
        assert_eq!(settings.scoring.salary_tolerance_ratio, 0.25);
        assert_eq!(settings.matching.chunk_size, crate::core::DEFAULT_CHUNK_SIZE);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_log_format_parsing() {
        let mut settings = Settings::default();
        assert_eq!(settings.logging.log_format().unwrap(), LogFormat::Json);

        settings.logging.format = "Pretty".to_string();
        assert_eq!(settings.logging.log_format().unwrap(), LogFormat::Pretty);

        settings.logging.format = "xml".to_string();
        assert!(settings.logging.log_format().is_err());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_tolerance() {
        let mut settings = Settings::default();
        settings.scoring.salary_tolerance_ratio = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_aliases_feed_normalizer() {
        let mut settings = Settings::default();
        settings.skills.aliases.insert("JS".to_string(), "JavaScript".to_string());

        let normalizer = settings.skill_normalizer();
        assert_eq!(normalizer.canonicalize("js"), Some("javascript".to_string()));
        assert_eq!(settings.matcher().normalizer().alias_count(), 1);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let settings: Settings = Config::builder()
            .set_override("server.port", 9000)
            .unwrap()
            .set_override("skills.aliases.k8s", "kubernetes")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.skills.aliases.get("k8s").map(String::as_str), Some("kubernetes"));
    }
}
