pub mod config;
pub mod container;
pub mod item;
pub mod plan;

use chrono::{DateTime, NaiveDate, Utc};
use weekplan_core::{Config, Database};

/// `--user` if given, else the configured default user.
pub fn resolve_user(explicit: Option<String>) -> String {
    let user = explicit.unwrap_or_else(|| Config::load_or_default().default_user);
    tracing::debug!(%user, "resolved user");
    user
}

/// Open the database with the configured estimate catalog.
pub fn open_db(config: &Config) -> Result<Database, Box<dyn std::error::Error>> {
    Ok(Database::open()?.with_catalog(config.catalog()))
}

/// Parse an RFC 3339 instant or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{raw}': expected RFC 3339 or YYYY-MM-DD"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
