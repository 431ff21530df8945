//! Message matcher
//!
//! Fetches candidate messages (a channel's latest page, or a guild-wide
//! search) and keeps the ones that hit a keyword, mention the target, and
//! fall on the configured date.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{DateCheck, MatchFilter};
use crate::domain::ports::{DiscordClient, DiscordMessage, Pacer};
use crate::error::DiscordError;

/// Discord's maximum page size, and the only page fetched per channel
pub const PAGE_SIZE: u8 = 100;

const MATCH_PREVIEW: usize = 100;
const NEAR_MISS_PREVIEW: usize = 150;
const NEAR_MISS_SHOWN: usize = 3;

/// A message that passed every filter
#[derive(Debug, Clone)]
pub struct Match {
    pub message: DiscordMessage,
    /// The configured keyword that hit first
    pub keyword: String,
}

/// Outcome of filtering one page of messages
#[derive(Debug, Default)]
pub struct ChannelScan {
    pub matches: Vec<Match>,
    /// Passed keyword and date but did not mention the target
    pub near_misses: Vec<DiscordMessage>,
}

/// Outcome of a guild-wide search
#[derive(Debug)]
pub enum GuildSearch {
    Results(Vec<Match>),
    /// 403: no search permission in this guild
    Forbidden,
    /// Any other failure, already logged
    Failed,
}

impl GuildSearch {
    pub fn matches(self) -> Vec<Match> {
        match self {
            GuildSearch::Results(matches) => matches,
            GuildSearch::Forbidden | GuildSearch::Failed => Vec::new(),
        }
    }
}

/// First `max` characters of `content`, with an ellipsis when cut
pub fn preview(content: &str, max: usize) -> String {
    match content.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}

/// Apply keyword, date and mention tests in order, keeping platform order
pub fn select_matches(messages: Vec<DiscordMessage>, filter: &MatchFilter) -> ChannelScan {
    let mut scan = ChannelScan::default();

    for message in messages {
        let Some(keyword) = filter.matched_keyword(&message.content).map(String::from) else {
            continue;
        };

        match filter.check_date(message.timestamp.as_deref()) {
            DateCheck::Pass => {}
            DateCheck::OtherDay(_) => continue,
            DateCheck::Unparseable(reason) => {
                tracing::warn!("Failed to parse timestamp of message {}: {}", message.id, reason);
                continue;
            }
        }

        if filter.mentions_target(&message) {
            tracing::info!(
                "Match (keyword: '{}'): '{}'",
                keyword,
                preview(&message.content, MATCH_PREVIEW)
            );
            scan.matches.push(Match { message, keyword });
        } else {
            scan.near_misses.push(message);
        }
    }

    scan
}

/// Server-side search over-matches; keep hits whose content carries both the
/// primary keyword and the target name
pub fn gate_search_results(messages: Vec<DiscordMessage>, filter: &MatchFilter) -> Vec<Match> {
    let keyword = filter.primary_keyword().to_lowercase();
    messages
        .into_iter()
        .filter(|m| m.content.to_lowercase().contains(&keyword) && filter.names_target(&m.content))
        .map(|message| Match {
            message,
            keyword: filter.primary_keyword().to_string(),
        })
        .collect()
}

pub struct MessageMatcher<DC, P>
where
    DC: DiscordClient,
    P: Pacer,
{
    discord: Arc<DC>,
    pacer: Arc<P>,
    /// Fixed throttle after every fetch
    fetch_delay: Duration,
}

impl<DC, P> MessageMatcher<DC, P>
where
    DC: DiscordClient,
    P: Pacer,
{
    pub fn new(discord: Arc<DC>, pacer: Arc<P>, fetch_delay: Duration) -> Self {
        Self {
            discord,
            pacer,
            fetch_delay,
        }
    }

    /// Scan the most recent page of a channel. A failed fetch yields no
    /// matches.
    pub async fn scan_channel(&self, channel_id: &str, filter: &MatchFilter) -> Vec<Match> {
        let result = self.discord.channel_messages(channel_id, PAGE_SIZE).await;
        self.pacer.pause(self.fetch_delay).await;

        let messages = match result {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to fetch messages in channel {}: {}", channel_id, e);
                return Vec::new();
            }
        };

        tracing::info!("Fetched {} messages from channel", messages.len());
        tracing::info!("Searching for keywords: {}", filter.keywords().join(", "));
        if let Some(date) = filter.target_date() {
            tracing::info!("Filtering messages from: {}", date);
        }
        if messages.len() == PAGE_SIZE as usize {
            tracing::debug!(
                "Channel {} has more history; only the latest {} messages are inspected",
                channel_id,
                PAGE_SIZE
            );
        }

        let scan = select_matches(messages, filter);
        if scan.matches.is_empty() && !scan.near_misses.is_empty() {
            log_near_misses(&scan.near_misses);
        }
        scan.matches
    }

    /// Guild-wide search for the primary keyword plus the target name
    pub async fn search_guild(&self, guild_id: &str, filter: &MatchFilter) -> GuildSearch {
        let query = format!("{} {}", filter.primary_keyword(), filter.target_name());
        let result = self.discord.search_guild_messages(guild_id, &query).await;
        self.pacer.pause(self.fetch_delay).await;

        match result {
            Ok(messages) => GuildSearch::Results(gate_search_results(messages, filter)),
            Err(DiscordError::Forbidden) => {
                tracing::warn!("No search permission in this guild");
                GuildSearch::Forbidden
            }
            Err(DiscordError::Api { status, .. }) => {
                tracing::warn!("Search returned status {}", status);
                GuildSearch::Failed
            }
            Err(e) => {
                tracing::error!("Failed to search in guild {}: {}", guild_id, e);
                GuildSearch::Failed
            }
        }
    }
}

fn log_near_misses(near_misses: &[DiscordMessage]) {
    tracing::warn!(
        "Found {} message(s) with keywords but NONE mention you",
        near_misses.len()
    );
    tracing::info!("Showing first few messages:");
    for (i, message) in near_misses.iter().take(NEAR_MISS_SHOWN).enumerate() {
        tracing::info!(
            "  {}. '{}'",
            i + 1,
            preview(&message.content, NEAR_MISS_PREVIEW)
        );
        if message.mentions.is_empty() {
            tracing::info!("     Mentions: (none)");
        } else {
            let names: Vec<&str> = message
                .mentions
                .iter()
                .map(|u| {
                    if u.username.is_empty() {
                        "Unknown"
                    } else {
                        u.username.as_str()
                    }
                })
                .collect();
            tracing::info!("     Mentions: {}", names.join(", "));
        }
    }
}
