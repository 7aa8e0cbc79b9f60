use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://cardvault.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_USERNAME: &str = "trainer";
pub const DEFAULT_SET_CACHE_TTL_HOURS: i64 = 24;
/// One year; larger values are treated as invalid
pub const MAX_SET_CACHE_TTL_HOURS: i64 = 24 * 366;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub default_username: String,
    pub set_cache_ttl_hours: i64,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            default_username: env::var("DEFAULT_USERNAME")
                .ok()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            set_cache_ttl_hours: env::var("SET_CACHE_TTL_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .filter(|h: &i64| (1..=MAX_SET_CACHE_TTL_HOURS).contains(h))
                .unwrap_or(DEFAULT_SET_CACHE_TTL_HOURS),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }
}
