//! Adapters (implementations of port traits)

pub mod discord;
pub mod pacer;

pub use discord::DiscordClientImpl;
pub use pacer::TokioPacer;
