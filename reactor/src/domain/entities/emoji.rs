//! Emoji identity and the configured reaction set

use std::fmt;
use std::str::FromStr;

use crate::domain::ports::DiscordEmoji;

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Names handed out positionally to configured reactions
const REACTION_NAMES: [&str; 8] = [
    "heart",
    "rainbow_heart",
    "rocket",
    "star",
    "fire",
    "sparkles",
    "tada",
    "balloon",
];

/// Default reaction set when none is configured
pub const DEFAULT_REACTION_EMOJIS: [&str; 3] = ["❤️", "💖", "🚀"];

/// An emoji as Discord identifies it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emoji {
    /// A unicode glyph such as "🚀"
    Unicode(String),
    /// A guild emoji, identified by its snowflake id
    Custom {
        name: String,
        id: String,
        animated: bool,
    },
}

impl Emoji {
    /// Path segment for the reactions endpoint, already url-encoded
    pub fn path_segment(&self) -> String {
        match self {
            Emoji::Unicode(glyph) => urlencoding::encode(glyph).into_owned(),
            Emoji::Custom { name, id, .. } => {
                urlencoding::encode(&format!("{}:{}", name, id)).into_owned()
            }
        }
    }

    /// Whether an emoji object from a reaction payload refers to this emoji
    pub fn matches(&self, other: &DiscordEmoji) -> bool {
        match self {
            Emoji::Unicode(glyph) => {
                other.id.is_none()
                    && other
                        .name
                        .as_deref()
                        .is_some_and(|name| strip_variation(name) == strip_variation(glyph))
            }
            Emoji::Custom { id, .. } => other.id.as_deref() == Some(id.as_str()),
        }
    }
}

fn strip_variation(s: &str) -> String {
    s.chars().filter(|c| *c != VARIATION_SELECTOR).collect()
}

impl FromStr for Emoji {
    type Err = String;

    /// Parses `<:name:id>`, `<a:name:id>` and `name:id` as custom emoji,
    /// anything else as a unicode glyph.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty emoji".to_string());
        }

        let (inner, wrapped) = match s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            Some(inner) => (inner, true),
            None => (s, false),
        };

        let parts: Vec<&str> = inner.split(':').collect();
        let custom = match parts.as_slice() {
            ["a", name, id] if wrapped => Some((*name, *id, true)),
            ["", name, id] if wrapped => Some((*name, *id, false)),
            [name, id] if !wrapped => Some((*name, *id, false)),
            _ => None,
        };

        match custom {
            Some((name, id, animated))
                if !name.is_empty() && !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) =>
            {
                Ok(Emoji::Custom {
                    name: name.to_string(),
                    id: id.to_string(),
                    animated,
                })
            }
            Some(_) => Err(format!("malformed custom emoji: {}", s)),
            None if wrapped => Err(format!("malformed custom emoji: {}", s)),
            None => Ok(Emoji::Unicode(s.to_string())),
        }
    }
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Emoji::Unicode(glyph) => write!(f, "{}", glyph),
            Emoji::Custom {
                name,
                id,
                animated: true,
            } => write!(f, "<a:{}:{}>", name, id),
            Emoji::Custom { name, id, .. } => write!(f, "<:{}:{}>", name, id),
        }
    }
}

/// One configured reaction: a display name and the emoji to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedReaction {
    pub name: String,
    pub emoji: Emoji,
}

/// Ordered set of reactions to apply to every match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSpec {
    reactions: Vec<NamedReaction>,
}

impl ReactionSpec {
    /// Name the emojis positionally: heart, rainbow_heart, ... then emoji_N
    pub fn from_emojis(emojis: Vec<Emoji>) -> Self {
        let reactions = emojis
            .into_iter()
            .enumerate()
            .map(|(i, emoji)| NamedReaction {
                name: REACTION_NAMES
                    .get(i)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("emoji_{}", i + 1)),
                emoji,
            })
            .collect();
        Self { reactions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedReaction> {
        self.reactions.iter()
    }
}

impl Default for ReactionSpec {
    fn default() -> Self {
        Self::from_emojis(
            DEFAULT_REACTION_EMOJIS
                .iter()
                .map(|glyph| Emoji::Unicode(glyph.to_string()))
                .collect(),
        )
    }
}
