//! Source enumerator
//!
//! Turns configured channel links into sources, or lists guilds and DM
//! channels when none are configured. Listing failures are logged and
//! treated as empty.

use std::sync::Arc;

use crate::domain::entities::{Container, Source};
use crate::domain::ports::{DiscordChannel, DiscordClient, DiscordGuild};

/// Configured links split into usable sources and rejected strings
#[derive(Debug, Default)]
pub struct ParsedLinks {
    pub sources: Vec<Source>,
    pub invalid: Vec<String>,
}

/// Parse every link, keeping input order. Invalid links are reported, never
/// fatal.
pub fn parse_links(links: &[String]) -> ParsedLinks {
    let mut parsed = ParsedLinks::default();
    for link in links {
        match Source::parse_link(link) {
            Ok(source) => parsed.sources.push(source),
            Err(e) => {
                tracing::warn!("Invalid channel link: {} ({})", link, e);
                parsed.invalid.push(link.clone());
            }
        }
    }
    parsed
}

pub struct SourceEnumerator<DC>
where
    DC: DiscordClient,
{
    discord: Arc<DC>,
}

impl<DC> SourceEnumerator<DC>
where
    DC: DiscordClient,
{
    pub fn new(discord: Arc<DC>) -> Self {
        Self { discord }
    }

    pub async fn guilds(&self) -> Vec<DiscordGuild> {
        match self.discord.list_guilds().await {
            Ok(guilds) => guilds,
            Err(e) => {
                tracing::error!("Failed to get guilds: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn dm_channels(&self) -> Vec<DiscordChannel> {
        match self.discord.list_dm_channels().await {
            Ok(channels) => channels,
            Err(e) => {
                tracing::error!("Failed to get DM channels: {}", e);
                Vec::new()
            }
        }
    }

    /// Text and announcement channels of a guild, as sources
    pub async fn guild_text_sources(&self, guild_id: &str) -> Vec<Source> {
        match self.discord.list_guild_channels(guild_id).await {
            Ok(channels) => channels
                .into_iter()
                .filter(DiscordChannel::is_text)
                .map(|c| Source::new(Container::Guild(guild_id.to_string()), c.id))
                .collect(),
            Err(e) => {
                tracing::error!("Failed to get channels for guild {}: {}", guild_id, e);
                Vec::new()
            }
        }
    }
}
