//! Domain entities
//!
//! Transient, in-memory values. Nothing here is persisted between runs.

pub mod delay;
pub mod emoji;
pub mod filter;
pub mod identity;
pub mod source;

pub use delay::{seconds, DelayBounds, DEFAULT_DELAY_MAX, DEFAULT_DELAY_MIN};
pub use emoji::{Emoji, NamedReaction, ReactionSpec};
pub use filter::{DateCheck, MatchFilter, DEFAULT_KEYWORD, DEFAULT_TARGET_NAME};
pub use identity::Identity;
pub use source::{Container, Source};
