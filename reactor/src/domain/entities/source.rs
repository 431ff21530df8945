//! Message sources: a (container, channel) pair

use std::fmt;

use crate::error::LinkError;

const WEB_BASE: &str = "https://discord.com/channels";
const DM_SENTINEL: &str = "@me";

/// Parent of a channel: a guild, or the direct-message namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    Guild(String),
    DirectMessages,
}

impl Container {
    pub fn as_str(&self) -> &str {
        match self {
            Container::Guild(id) => id,
            Container::DirectMessages => DM_SENTINEL,
        }
    }
}

impl From<&str> for Container {
    fn from(s: &str) -> Self {
        if s == DM_SENTINEL {
            Container::DirectMessages
        } else {
            Container::Guild(s.to_string())
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A channel to scan for messages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    pub container: Container,
    pub channel_id: String,
}

impl Source {
    pub fn new(container: Container, channel_id: impl Into<String>) -> Self {
        Self {
            container,
            channel_id: channel_id.into(),
        }
    }

    pub fn direct(channel_id: impl Into<String>) -> Self {
        Self::new(Container::DirectMessages, channel_id)
    }

    /// Parse a link shaped `.../channels/{container}/{channel}[/...][?...]`
    pub fn parse_link(link: &str) -> Result<Self, LinkError> {
        let link = link.trim();
        let without_query = link.split(['?', '#']).next().unwrap_or(link);
        let parts: Vec<&str> = without_query.split('/').collect();

        let idx = parts
            .iter()
            .position(|p| *p == "channels")
            .ok_or(LinkError::MissingChannelsSegment)?;

        match (parts.get(idx + 1), parts.get(idx + 2)) {
            (Some(container), Some(channel)) if !container.is_empty() && !channel.is_empty() => {
                Ok(Self::new(Container::from(*container), *channel))
            }
            _ => Err(LinkError::MissingIds),
        }
    }

    /// Web link to a message in this source
    pub fn message_link(&self, message_id: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            WEB_BASE, self.container, self.channel_id, message_id
        )
    }
}
