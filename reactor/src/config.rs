use std::env;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::adapters::discord::DEFAULT_API_URL;
use crate::domain::entities::{
    seconds, DelayBounds, Emoji, ReactionSpec, DEFAULT_DELAY_MAX, DEFAULT_DELAY_MIN,
    DEFAULT_KEYWORD, DEFAULT_TARGET_NAME,
};
use crate::error::ConfigError;

/// Pause after every channel fetch or guild search
const DEFAULT_SOURCE_DELAY: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct Config {
    pub token: String,
    /// Explicit channel links; empty means discover every guild and DM
    pub channel_links: Vec<String>,
    pub keywords: Vec<String>,
    /// UTC calendar date messages must be from
    pub date_filter: Option<NaiveDate>,
    pub reactions: ReactionSpec,
    pub reaction_delay: DelayBounds,
    /// Literal name that counts as a mention of the target user
    pub target_name: String,
    pub api_url: String,
    pub source_delay: Duration,
    /// Scan text channels one by one when guild search is forbidden
    pub guild_channel_fallback: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok(), Utc::now().date_naive())
    }

    /// Build from any key lookup. `today` resolves `DATE_FILTER=today`.
    pub fn from_lookup<F>(lookup: F, today: NaiveDate) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("DISCORD_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let channel_links = split_list(&lookup("CHANNEL_LINKS").unwrap_or_default());

        let mut keywords = split_list(&lookup("KEYWORDS").unwrap_or_default());
        if keywords.is_empty() {
            keywords.push(DEFAULT_KEYWORD.to_string());
        }

        let date_filter = lookup("DATE_FILTER")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match parse_date_filter(&raw, today) {
                Some(date) => Some(date),
                None => {
                    tracing::warn!(
                        "Invalid date format: {}, expected YYYY-MM-DD or 'today'. Date filter ignored",
                        raw
                    );
                    None
                }
            });

        let reactions = parse_reactions(&lookup("REACTION_EMOJIS").unwrap_or_default());
        let reaction_delay = parse_delay_bounds(
            lookup("REACTION_DELAY_MIN").as_deref(),
            lookup("REACTION_DELAY_MAX").as_deref(),
        );

        let target_name = lookup("TARGET_NAME")
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_TARGET_NAME.to_string());

        let api_url = lookup("DISCORD_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let source_delay = match lookup("SOURCE_FETCH_DELAY") {
            None => seconds(DEFAULT_SOURCE_DELAY),
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs >= 0.0 => seconds(secs),
                _ => {
                    tracing::warn!(
                        "Invalid SOURCE_FETCH_DELAY '{}', using {}s",
                        raw,
                        DEFAULT_SOURCE_DELAY
                    );
                    seconds(DEFAULT_SOURCE_DELAY)
                }
            },
        };

        let guild_channel_fallback = lookup("GUILD_CHANNEL_FALLBACK")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Self {
            token,
            channel_links,
            keywords,
            date_filter,
            reactions,
            reaction_delay,
            target_name,
            api_url,
            source_delay,
            guild_channel_fallback,
        })
    }

    /// Check if explicit channel links are configured
    pub fn has_channel_links(&self) -> bool {
        !self.channel_links.is_empty()
    }
}

/// Comma-separated list, trimmed, empties dropped
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// `today`, `YYYY-MM-DD`, or an ISO datetime whose date part is used
fn parse_date_filter(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    if raw.eq_ignore_ascii_case("today") {
        return Some(today);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|d| d.date())
        })
}

fn parse_reactions(raw: &str) -> ReactionSpec {
    let emojis: Vec<Emoji> = split_list(raw)
        .iter()
        .filter_map(|token| match token.parse::<Emoji>() {
            Ok(emoji) => Some(emoji),
            Err(e) => {
                tracing::warn!("Skipping reaction emoji '{}': {}", token, e);
                None
            }
        })
        .collect();

    if emojis.is_empty() {
        ReactionSpec::default()
    } else {
        ReactionSpec::from_emojis(emojis)
    }
}

fn parse_delay_bounds(min: Option<&str>, max: Option<&str>) -> DelayBounds {
    let parse = |raw: Option<&str>, default: f64| match raw.map(str::trim) {
        None | Some("") => Some(default),
        Some(raw) => raw.parse::<f64>().ok(),
    };

    let (Some(min), Some(max)) = (
        parse(min, DEFAULT_DELAY_MIN),
        parse(max, DEFAULT_DELAY_MAX),
    ) else {
        tracing::warn!(
            "Invalid delay values, using defaults ({}-{}s)",
            DEFAULT_DELAY_MIN,
            DEFAULT_DELAY_MAX
        );
        return DelayBounds::default();
    };

    match DelayBounds::new(min, max) {
        Some(bounds) => {
            if min > max {
                tracing::warn!(
                    "REACTION_DELAY_MIN ({}) exceeds REACTION_DELAY_MAX ({}), swapping",
                    min,
                    max
                );
            }
            bounds
        }
        None => {
            tracing::warn!(
                "Invalid delay values, using defaults ({}-{}s)",
                DEFAULT_DELAY_MIN,
                DEFAULT_DELAY_MAX
            );
            DelayBounds::default()
        }
    }
}
