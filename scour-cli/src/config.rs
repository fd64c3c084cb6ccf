//! Configuration
//!
//! Resolves the action inputs into a [`Config`]. Inputs arrive either as CLI
//! flags or as the `INPUT_*` environment variables GitHub Actions uses to
//! deliver `with:` values.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Months, Utc};

use scour_core::domain::{RepoId, RetentionPolicy};

/// Resolved configuration for one retention sweep.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository the sweep operates on
    pub repo: RepoId,

    /// API base URL (e.g., "https://api.github.com")
    pub api_url: String,

    /// Bearer token for the API
    pub token: String,

    /// The retention policy applied to every artifact
    pub policy: RetentionPolicy,

    /// When set, deletions are simulated instead of issued
    pub dry_run: bool,
}

impl Config {
    /// Resolves raw inputs into a configuration.
    ///
    /// `age` is required and must be of the form `"<number> <unit>"`.
    /// `skip_tags` is boolean-like and defaults to true; unrecognized values
    /// also fall back to the default. `skip_recent` defaults to 0 and rejects
    /// non-numeric values.
    pub fn resolve(
        repository: &str,
        token: String,
        api_url: String,
        age: &str,
        skip_tags: Option<&str>,
        skip_recent: Option<&str>,
        dry_run: bool,
    ) -> Result<Self> {
        let repo = RepoId::parse(repository)
            .with_context(|| format!("repository must be \"owner/repo\", got \"{repository}\""))?;

        let config = Self {
            repo,
            api_url,
            token,
            policy: RetentionPolicy {
                max_age: parse_age(age, Utc::now())?,
                skip_tags: parse_flag(skip_tags, true),
                skip_recent: parse_count(skip_recent)?,
            },
            dry_run,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            anyhow::bail!("token cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        Ok(())
    }
}

/// Parses an age input like `"30 days"` into the deletion cutoff `now - age`.
///
/// Accepted units: seconds, minutes, hours, days, weeks, months, years
/// (singular or plural, case-insensitive). Months and years are subtracted
/// calendar-aware rather than as fixed spans.
pub fn parse_age(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let mut parts = input.split_whitespace();
    let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
        anyhow::bail!("age must be \"<number> <unit>\", got \"{input}\"");
    };

    let amount: u32 = amount
        .parse()
        .with_context(|| format!("age value must be a number, got \"{amount}\""))?;

    let unit = unit.to_ascii_lowercase();
    let unit = unit.strip_suffix('s').unwrap_or(&unit);

    let span = match unit {
        "second" => Duration::try_seconds(i64::from(amount)),
        "minute" => Duration::try_minutes(i64::from(amount)),
        "hour" => Duration::try_hours(i64::from(amount)),
        "day" => Duration::try_days(i64::from(amount)),
        "week" => Duration::try_weeks(i64::from(amount)),
        "month" => {
            return now
                .checked_sub_months(Months::new(amount))
                .context("age is out of range");
        }
        "year" => {
            let months = amount.checked_mul(12).context("age is out of range")?;
            return now
                .checked_sub_months(Months::new(months))
                .context("age is out of range");
        }
        _ => anyhow::bail!("unsupported age unit \"{unit}\""),
    };

    let span = span.context("age is out of range")?;

    now.checked_sub_signed(span).context("age is out of range")
}

/// Parses a boolean-like input (`y`/`yes`/`true`/`1`/`on` and the negations).
///
/// Absent, empty, and unrecognized values all resolve to `default`.
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "on" => true,
        "n" | "no" | "false" | "0" | "off" => false,
        _ => default,
    }
}

/// Parses the skip-recent count. Absent or empty means 0.
pub fn parse_count(value: Option<&str>) -> Result<u32> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(0);
    };

    value
        .parse()
        .with_context(|| format!("skip-recent option must be a number, got \"{value}\""))
}
