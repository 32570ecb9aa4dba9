use std::path::PathBuf;

const DEFAULT_PORT: u16 = 39100;
const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub test_mode: bool,
    /// Lifetime of bearer tokens issued at login.
    pub token_ttl_days: i64,
    /// Roster imported on startup when the members table is empty.
    pub roster_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let token_ttl_days = std::env::var("SANTA_TOKEN_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_DAYS);

        let roster_path = std::env::var("SANTA_ROSTER_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:santa.db?mode=rwc".to_string()),
            test_mode: std::env::var("SANTA_TEST_MODE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            token_ttl_days,
            roster_path,
        }
    }
}
