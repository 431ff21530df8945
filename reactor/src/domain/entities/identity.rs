//! The authenticated identity

use crate::domain::ports::DiscordUser;

/// Who the token belongs to. Created once per run, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
}

impl Identity {
    /// `username#discriminator`, or just the username for accounts on the
    /// new naming scheme (discriminator "0" or absent)
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() && d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }
}

impl From<DiscordUser> for Identity {
    fn from(user: DiscordUser) -> Self {
        Identity {
            id: user.id,
            username: user.username,
            discriminator: user.discriminator,
        }
    }
}
