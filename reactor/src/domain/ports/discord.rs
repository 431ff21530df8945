//! Discord client port trait
//!
//! Defines the interface for the handful of Discord REST calls the reactor
//! needs, and the payload shapes it reads from them.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::entities::Emoji;
use crate::error::DiscordError;

/// Helper to deserialize null as default (empty vec, empty string)
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Discord user representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
}

/// Discord guild, as listed by `/users/@me/guilds`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordGuild {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Discord channel (guild channel or DM)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordChannel {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub recipients: Vec<DiscordUser>,
}

impl DiscordChannel {
    pub const GUILD_TEXT: u8 = 0;
    pub const GUILD_ANNOUNCEMENT: u8 = 5;

    /// Guild channel types that carry a message history
    pub fn is_text(&self) -> bool {
        matches!(self.kind, Self::GUILD_TEXT | Self::GUILD_ANNOUNCEMENT)
    }

    /// Comma-joined recipient usernames, for DM progress lines
    pub fn recipient_names(&self) -> String {
        if self.recipients.is_empty() {
            return "Unknown".to_string();
        }
        self.recipients
            .iter()
            .map(|r| {
                if r.username.is_empty() {
                    "Unknown"
                } else {
                    r.username.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Emoji object inside a reaction payload. Unicode emoji have no id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordEmoji {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A reaction on a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordReaction {
    pub emoji: DiscordEmoji,
    /// Whether the authenticated user applied it
    #[serde(default)]
    pub me: bool,
    #[serde(default)]
    pub count: u32,
}

/// Discord message representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordMessage {
    pub id: String,
    pub channel_id: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub mentions: Vec<DiscordUser>,
    /// `None` when the payload did not carry a reaction list
    #[serde(default)]
    pub reactions: Option<Vec<DiscordReaction>>,
}

/// Port for the Discord REST API
#[async_trait]
pub trait DiscordClient: Send + Sync {
    /// `GET /users/@me`
    async fn current_user(&self) -> Result<DiscordUser, DiscordError>;

    /// `GET /users/@me/guilds`
    async fn list_guilds(&self) -> Result<Vec<DiscordGuild>, DiscordError>;

    /// `GET /guilds/{id}/channels`
    async fn list_guild_channels(
        &self,
        guild_id: &str,
    ) -> Result<Vec<DiscordChannel>, DiscordError>;

    /// `GET /users/@me/channels`
    async fn list_dm_channels(&self) -> Result<Vec<DiscordChannel>, DiscordError>;

    /// `GET /channels/{id}/messages?limit=N`, most recent first
    async fn channel_messages(
        &self,
        channel_id: &str,
        limit: u8,
    ) -> Result<Vec<DiscordMessage>, DiscordError>;

    /// `GET /guilds/{id}/messages/search`, flattened to a plain list.
    /// A 403 surfaces as `DiscordError::Forbidden`.
    async fn search_guild_messages(
        &self,
        guild_id: &str,
        content: &str,
    ) -> Result<Vec<DiscordMessage>, DiscordError>;

    /// `GET /channels/{id}/messages/{id}`
    async fn get_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<DiscordMessage, DiscordError>;

    /// `PUT /channels/{id}/messages/{id}/reactions/{emoji}/@me`.
    /// A 429 surfaces as `DiscordError::RateLimited`.
    async fn add_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &Emoji,
    ) -> Result<(), DiscordError>;
}
