//! Domain ports (traits)
//!
//! Port traits define interfaces that the application layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod discord;
pub mod pacer;

pub use discord::{
    DiscordChannel, DiscordClient, DiscordEmoji, DiscordGuild, DiscordMessage, DiscordReaction,
    DiscordUser,
};
pub use pacer::Pacer;
