//! Mock implementations of port traits
//!
//! In-memory stand-ins for Discord and the clock. They record every call so
//! tests can assert on the exact requests and pauses a run produced.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::entities::{seconds, DelayBounds, Emoji};
use crate::domain::ports::{
    DiscordChannel, DiscordClient, DiscordEmoji, DiscordGuild, DiscordMessage, DiscordReaction,
    DiscordUser, Pacer,
};
use crate::error::DiscordError;

// ============================================================================
// Mock Discord client
// ============================================================================

/// Canned failure for a mocked call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockFailure {
    Forbidden,
    Unauthorized,
    RateLimited(f64),
    Status(u16),
}

impl MockFailure {
    fn into_error(self) -> DiscordError {
        match self {
            MockFailure::Forbidden => DiscordError::Forbidden,
            MockFailure::Unauthorized => DiscordError::Unauthorized,
            MockFailure::RateLimited(retry_after) => DiscordError::RateLimited { retry_after },
            MockFailure::Status(status) => DiscordError::Api {
                status,
                message: "mock failure".to_string(),
            },
        }
    }
}

#[derive(Default)]
pub struct MockDiscordClient {
    user: Arc<RwLock<Option<DiscordUser>>>,
    guilds: Arc<RwLock<Vec<DiscordGuild>>>,
    guilds_failure: Arc<RwLock<Option<MockFailure>>>,
    guild_channels: Arc<RwLock<HashMap<String, Vec<DiscordChannel>>>>,
    dm_channels: Arc<RwLock<Vec<DiscordChannel>>>,
    /// Channel id -> messages, most recent first
    channels: Arc<RwLock<HashMap<String, Vec<DiscordMessage>>>>,
    channel_failures: Arc<RwLock<HashMap<String, MockFailure>>>,
    search_results: Arc<RwLock<HashMap<String, Result<Vec<DiscordMessage>, MockFailure>>>>,
    /// Emoji display form -> failure returned on every PUT of that emoji
    reaction_failures: Arc<RwLock<HashMap<String, MockFailure>>>,
    /// Every request path, in call order
    pub calls: Arc<RwLock<Vec<String>>>,
    /// Every reaction PUT as (channel, message, emoji), in call order
    pub reactions_put: Arc<RwLock<Vec<(String, String, Emoji)>>>,
}

impl MockDiscordClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate as this user
    pub fn with_user(self, id: &str, username: &str) -> Self {
        *self.user.write().unwrap() = Some(DiscordUser {
            id: id.to_string(),
            username: username.to_string(),
            discriminator: Some("0".to_string()),
        });
        self
    }

    pub fn with_guild(self, id: &str, name: &str) -> Self {
        self.guilds.write().unwrap().push(DiscordGuild {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_guilds_failure(self, failure: MockFailure) -> Self {
        *self.guilds_failure.write().unwrap() = Some(failure);
        self
    }

    pub fn with_guild_channel(self, guild_id: &str, channel: DiscordChannel) -> Self {
        self.guild_channels
            .write()
            .unwrap()
            .entry(guild_id.to_string())
            .or_default()
            .push(channel);
        self
    }

    pub fn with_dm_channel(self, channel: DiscordChannel) -> Self {
        self.dm_channels.write().unwrap().push(channel);
        self
    }

    /// Store a message in its channel (appended, so insert newest first)
    pub fn with_message(self, message: DiscordMessage) -> Self {
        self.channels
            .write()
            .unwrap()
            .entry(message.channel_id.clone())
            .or_default()
            .push(message);
        self
    }

    pub fn with_channel_failure(self, channel_id: &str, failure: MockFailure) -> Self {
        self.channel_failures
            .write()
            .unwrap()
            .insert(channel_id.to_string(), failure);
        self
    }

    pub fn with_search_results(self, guild_id: &str, messages: Vec<DiscordMessage>) -> Self {
        self.search_results
            .write()
            .unwrap()
            .insert(guild_id.to_string(), Ok(messages));
        self
    }

    pub fn with_search_failure(self, guild_id: &str, failure: MockFailure) -> Self {
        self.search_results
            .write()
            .unwrap()
            .insert(guild_id.to_string(), Err(failure));
        self
    }

    pub fn with_reaction_failure(self, emoji: &str, failure: MockFailure) -> Self {
        self.reaction_failures
            .write()
            .unwrap()
            .insert(emoji.to_string(), failure);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn reactions_put(&self) -> Vec<(String, String, Emoji)> {
        self.reactions_put.read().unwrap().clone()
    }

    /// Emojis PUT so far, in display form
    pub fn emojis_put(&self) -> Vec<String> {
        self.reactions_put
            .read()
            .unwrap()
            .iter()
            .map(|(_, _, e)| e.to_string())
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.write().unwrap().push(call);
    }

    /// Mark `emoji` as reacted-by-me on the stored message
    fn apply_reaction(&self, channel_id: &str, message_id: &str, emoji: &Emoji) {
        let mut channels = self.channels.write().unwrap();
        let Some(message) = channels
            .get_mut(channel_id)
            .and_then(|msgs| msgs.iter_mut().find(|m| m.id == message_id))
        else {
            return;
        };

        let reactions = message.reactions.get_or_insert_with(Vec::new);
        if let Some(existing) = reactions.iter_mut().find(|r| emoji.matches(&r.emoji)) {
            if !existing.me {
                existing.me = true;
                existing.count += 1;
            }
        } else {
            let payload = match emoji {
                Emoji::Unicode(glyph) => DiscordEmoji {
                    id: None,
                    name: Some(glyph.clone()),
                },
                Emoji::Custom { name, id, .. } => DiscordEmoji {
                    id: Some(id.clone()),
                    name: Some(name.clone()),
                },
            };
            reactions.push(DiscordReaction {
                emoji: payload,
                me: true,
                count: 1,
            });
        }
    }
}

#[async_trait]
impl DiscordClient for MockDiscordClient {
    async fn current_user(&self) -> Result<DiscordUser, DiscordError> {
        self.record("GET /users/@me".to_string());
        self.user
            .read()
            .unwrap()
            .clone()
            .ok_or(DiscordError::Unauthorized)
    }

    async fn list_guilds(&self) -> Result<Vec<DiscordGuild>, DiscordError> {
        self.record("GET /users/@me/guilds".to_string());
        if let Some(failure) = *self.guilds_failure.read().unwrap() {
            return Err(failure.into_error());
        }
        Ok(self.guilds.read().unwrap().clone())
    }

    async fn list_guild_channels(
        &self,
        guild_id: &str,
    ) -> Result<Vec<DiscordChannel>, DiscordError> {
        self.record(format!("GET /guilds/{}/channels", guild_id));
        Ok(self
            .guild_channels
            .read()
            .unwrap()
            .get(guild_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_dm_channels(&self) -> Result<Vec<DiscordChannel>, DiscordError> {
        self.record("GET /users/@me/channels".to_string());
        Ok(self.dm_channels.read().unwrap().clone())
    }

    async fn channel_messages(
        &self,
        channel_id: &str,
        limit: u8,
    ) -> Result<Vec<DiscordMessage>, DiscordError> {
        self.record(format!("GET /channels/{}/messages?limit={}", channel_id, limit));
        if let Some(failure) = self.channel_failures.read().unwrap().get(channel_id) {
            return Err(failure.into_error());
        }
        Ok(self
            .channels
            .read()
            .unwrap()
            .get(channel_id)
            .map(|msgs| msgs.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn search_guild_messages(
        &self,
        guild_id: &str,
        content: &str,
    ) -> Result<Vec<DiscordMessage>, DiscordError> {
        self.record(format!(
            "GET /guilds/{}/messages/search?content={}",
            guild_id, content
        ));
        match self.search_results.read().unwrap().get(guild_id) {
            Some(Ok(messages)) => Ok(messages.clone()),
            Some(Err(failure)) => Err(failure.into_error()),
            None => Ok(Vec::new()),
        }
    }

    async fn get_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<DiscordMessage, DiscordError> {
        self.record(format!("GET /channels/{}/messages/{}", channel_id, message_id));
        if let Some(failure) = self.channel_failures.read().unwrap().get(channel_id) {
            return Err(failure.into_error());
        }
        self.channels
            .read()
            .unwrap()
            .get(channel_id)
            .and_then(|msgs| msgs.iter().find(|m| m.id == message_id))
            .cloned()
            .ok_or(DiscordError::Api {
                status: 404,
                message: "Unknown Message".to_string(),
            })
    }

    async fn add_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &Emoji,
    ) -> Result<(), DiscordError> {
        self.record(format!(
            "PUT /channels/{}/messages/{}/reactions/{}/@me",
            channel_id,
            message_id,
            emoji.path_segment()
        ));
        self.reactions_put.write().unwrap().push((
            channel_id.to_string(),
            message_id.to_string(),
            emoji.clone(),
        ));

        if let Some(failure) = self.reaction_failures.read().unwrap().get(&emoji.to_string()) {
            return Err(failure.into_error());
        }
        self.apply_reaction(channel_id, message_id, emoji);
        Ok(())
    }
}

// ============================================================================
// Recording pacer
// ============================================================================

/// Never sleeps. Records every pause and returns a fixed point inside the
/// jitter bounds.
pub struct RecordingPacer {
    /// Where in `[min, max]` jitter lands, 0.0 to 1.0
    fraction: f64,
    pub pauses: Arc<RwLock<Vec<Duration>>>,
    pub jitters: Arc<RwLock<Vec<DelayBounds>>>,
}

impl Default for RecordingPacer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl RecordingPacer {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction,
            pauses: Arc::new(RwLock::new(Vec::new())),
            jitters: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.read().unwrap().clone()
    }

    pub fn jitter_count(&self) -> usize {
        self.jitters.read().unwrap().len()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, duration: Duration) {
        self.pauses.write().unwrap().push(duration);
    }

    fn jitter(&self, bounds: DelayBounds) -> Duration {
        self.jitters.write().unwrap().push(bounds);
        seconds(bounds.min() + (bounds.max() - bounds.min()) * self.fraction)
    }
}
