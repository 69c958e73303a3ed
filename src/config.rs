use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::CompatibilityWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub tables: TableSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub service_key: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_leads_table")]
    pub leads: String,
    #[serde(default = "default_customers_table")]
    pub customers: String,
    #[serde(default = "default_properties_table")]
    pub properties: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            leads: default_leads_table(),
            customers: default_customers_table(),
            properties: default_properties_table(),
        }
    }
}

fn default_leads_table() -> String { "leads".to_string() }
fn default_customers_table() -> String { "customers".to_string() }
fn default_properties_table() -> String { "properties".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    /// Per-instance tier; kept short since other instances cannot clear it
    pub local_ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    /// How many available listings are pulled from the store per request
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,
    #[serde(default)]
    pub min_score: u8,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            candidate_pool: default_candidate_pool(),
            min_score: 0,
        }
    }
}

fn default_limit() -> u16 { 10 }
fn default_max_limit() -> u16 { 100 }
fn default_candidate_pool() -> usize { 500 }

impl RecommendationSettings {
    /// Resolve a requested limit against the configured default and cap
    pub fn resolve_limit(&self, requested: Option<u16>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1)) as usize
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_budget_weight")]
    pub budget: u8,
    #[serde(default = "default_bedrooms_exact_weight")]
    pub bedrooms_exact: u8,
    #[serde(default = "default_bedrooms_near_weight")]
    pub bedrooms_near: u8,
    #[serde(default = "default_location_weight")]
    pub location: u8,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            budget: default_budget_weight(),
            bedrooms_exact: default_bedrooms_exact_weight(),
            bedrooms_near: default_bedrooms_near_weight(),
            location: default_location_weight(),
        }
    }
}

impl From<&WeightsConfig> for CompatibilityWeights {
    fn from(w: &WeightsConfig) -> Self {
        Self {
            budget: w.budget,
            bedrooms_exact: w.bedrooms_exact,
            bedrooms_near: w.bedrooms_near,
            location: w.location,
        }
    }
}

fn default_budget_weight() -> u8 { 40 }
fn default_bedrooms_exact_weight() -> u8 { 30 }
fn default_bedrooms_near_weight() -> u8 { 15 }
fn default_location_weight() -> u8 { 30 }

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
fn default_log_format() -> String { "plain".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ESTATE__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ESTATE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ESTATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path, with the same env overrides as [`Settings::load`]
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ESTATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }
}

/// Apply the conventional unprefixed variables on top of the loaded config
///
/// DATABASE_URL, SUPABASE_URL and SUPABASE_SERVICE_KEY win over file values
/// so the service can run with the same .env as the rest of the stack.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in [
        ("DATABASE_URL", "database.url"),
        ("SUPABASE_URL", "supabase.url"),
        ("SUPABASE_SERVICE_KEY", "supabase.service_key"),
        ("REDIS_URL", "cache.redis_url"),
    ] {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
