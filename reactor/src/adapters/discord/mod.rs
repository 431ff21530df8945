//! Discord REST adapter

mod client;

pub use client::{DiscordClientImpl, DEFAULT_API_URL};
