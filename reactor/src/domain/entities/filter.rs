//! Match criteria: keywords, target mention, optional date

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::ports::DiscordMessage;

pub const DEFAULT_KEYWORD: &str = "birthday";
pub const DEFAULT_TARGET_NAME: &str = "Hieu Le";

/// Result of checking a message timestamp against the date filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateCheck {
    /// No date filter configured, or the message date equals the target
    Pass,
    /// Message is from a different UTC day
    OtherDay(NaiveDate),
    /// Timestamp missing or not RFC 3339
    Unparseable(String),
}

/// Fixed per-run filter for deciding which messages get reactions
#[derive(Debug, Clone)]
pub struct MatchFilter {
    keywords: Vec<String>,
    keywords_lower: Vec<String>,
    target_date: Option<NaiveDate>,
    target_user_id: String,
    target_name: String,
    target_name_lower: String,
}

impl MatchFilter {
    /// Falls back to the default keyword when `keywords` is empty
    pub fn new(
        keywords: Vec<String>,
        target_date: Option<NaiveDate>,
        target_user_id: impl Into<String>,
        target_name: impl Into<String>,
    ) -> Self {
        let keywords = if keywords.is_empty() {
            vec![DEFAULT_KEYWORD.to_string()]
        } else {
            keywords
        };
        let keywords_lower = keywords.iter().map(|k| k.to_lowercase()).collect();
        let target_name = target_name.into();
        let target_name_lower = target_name.to_lowercase();

        Self {
            keywords,
            keywords_lower,
            target_date,
            target_user_id: target_user_id.into(),
            target_name,
            target_name_lower,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First keyword, used for server-side search queries
    pub fn primary_keyword(&self) -> &str {
        &self.keywords[0]
    }

    pub fn target_date(&self) -> Option<NaiveDate> {
        self.target_date
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// The first configured keyword found in `content`, case-insensitively
    pub fn matched_keyword(&self, content: &str) -> Option<&str> {
        let content = content.to_lowercase();
        self.keywords_lower
            .iter()
            .position(|k| content.contains(k.as_str()))
            .map(|i| self.keywords[i].as_str())
    }

    pub fn names_target(&self, content: &str) -> bool {
        content.to_lowercase().contains(&self.target_name_lower)
    }

    /// Structured mention, the literal target name, or an inline
    /// `<@id>` / `<@!id>` token
    pub fn mentions_target(&self, message: &DiscordMessage) -> bool {
        if message.mentions.iter().any(|u| u.id == self.target_user_id) {
            return true;
        }
        if self.names_target(&message.content) {
            return true;
        }
        let plain = format!("<@{}>", self.target_user_id);
        let nickname = format!("<@!{}>", self.target_user_id);
        message.content.contains(&plain) || message.content.contains(&nickname)
    }

    pub fn check_date(&self, timestamp: Option<&str>) -> DateCheck {
        let Some(target) = self.target_date else {
            return DateCheck::Pass;
        };
        let Some(timestamp) = timestamp else {
            return DateCheck::Unparseable("missing timestamp".to_string());
        };
        match DateTime::parse_from_rfc3339(timestamp) {
            Ok(ts) => {
                let date = ts.with_timezone(&Utc).date_naive();
                if date == target {
                    DateCheck::Pass
                } else {
                    DateCheck::OtherDay(date)
                }
            }
            Err(e) => DateCheck::Unparseable(format!("{}: {}", timestamp, e)),
        }
    }
}
