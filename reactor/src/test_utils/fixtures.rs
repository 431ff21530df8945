//! Test fixtures
//!
//! Factory functions for Discord payloads with sensible defaults.

use crate::domain::ports::{
    DiscordChannel, DiscordEmoji, DiscordMessage, DiscordReaction, DiscordUser,
};

/// Channel every fixture message lives in unless moved
pub const TEST_CHANNEL: &str = "100";

/// 2025-11-11, the date fixture messages are stamped with
pub const TEST_TIMESTAMP: &str = "2025-11-11T10:00:00.000000+00:00";

pub fn test_user(id: &str, username: &str) -> DiscordUser {
    DiscordUser {
        id: id.to_string(),
        username: username.to_string(),
        discriminator: Some("0".to_string()),
    }
}

/// A message in `TEST_CHANNEL` with an empty (but present) reaction list
pub fn test_message(id: &str, content: &str) -> DiscordMessage {
    DiscordMessage {
        id: id.to_string(),
        channel_id: TEST_CHANNEL.to_string(),
        content: content.to_string(),
        timestamp: Some(TEST_TIMESTAMP.to_string()),
        mentions: Vec::new(),
        reactions: Some(Vec::new()),
    }
}

/// A message in a specific channel
pub fn test_message_in(channel_id: &str, id: &str, content: &str) -> DiscordMessage {
    DiscordMessage {
        channel_id: channel_id.to_string(),
        ..test_message(id, content)
    }
}

/// A unicode reaction
pub fn test_reaction(glyph: &str, me: bool) -> DiscordReaction {
    DiscordReaction {
        emoji: DiscordEmoji {
            id: None,
            name: Some(glyph.to_string()),
        },
        me,
        count: 1,
    }
}

pub fn test_text_channel(id: &str, name: &str) -> DiscordChannel {
    DiscordChannel {
        id: id.to_string(),
        kind: DiscordChannel::GUILD_TEXT,
        name: Some(name.to_string()),
        recipients: Vec::new(),
    }
}

pub fn test_voice_channel(id: &str) -> DiscordChannel {
    DiscordChannel {
        id: id.to_string(),
        kind: 2,
        name: Some("voice".to_string()),
        recipients: Vec::new(),
    }
}

pub fn test_dm_channel(id: &str, recipient: &str) -> DiscordChannel {
    DiscordChannel {
        id: id.to_string(),
        kind: 1,
        name: None,
        recipients: vec![test_user("900", recipient)],
    }
}
