use std::{env, fmt::Display, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use tracing::info;

use crate::{
    conditions::{ConditionOptions, SeasonDiscount},
    reference::SEASON_ORDER,
};

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub page_size: i64,
    /// Share of all known seasons at which the season filter is dropped.
    /// `None` keeps the filter no matter how many seasons are selected.
    pub season_discount_ratio: Option<f64>,
    pub filter_options_ttl: Duration,
    pub allowed_origins: Vec<String>,
    pub debug_mode: bool,
    pub skip_migrations: bool,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let page_size: i64 = try_load(&lookup, "PAGE_SIZE", "100")?;
        if page_size <= 0 {
            bail!("PAGE_SIZE must be positive, got {page_size}");
        }

        let season_discount_ratio = match lookup("SEASON_DISCOUNT_RATIO") {
            Some(raw) if !raw.trim().is_empty() => {
                let ratio: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid SEASON_DISCOUNT_RATIO value: {raw}"))?;
                if !(ratio > 0.0 && ratio <= 1.0) {
                    bail!("SEASON_DISCOUNT_RATIO must be in (0, 1], got {ratio}");
                }
                Some(ratio)
            }
            _ => None,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: try_load(&lookup, "PORT", "3001")?,
            page_size,
            season_discount_ratio,
            filter_options_ttl: Duration::from_secs(try_load(
                &lookup,
                "FILTER_OPTIONS_TTL_SECS",
                "600",
            )?),
            allowed_origins,
            debug_mode: flag(&lookup, "DEBUG_MODE"),
            skip_migrations: flag(&lookup, "SKIP_MIGRATIONS"),
        })
    }

    pub fn condition_options(&self) -> ConditionOptions {
        ConditionOptions {
            season_discount: self.season_discount_ratio.map(|ratio| SeasonDiscount {
                ratio,
                total_seasons: SEASON_ORDER.len(),
            }),
        }
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value {raw:?}: {e}"))
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}
