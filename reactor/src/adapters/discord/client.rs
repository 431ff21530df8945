//! Discord REST client implementation

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::domain::entities::Emoji;
use crate::domain::ports::{DiscordChannel, DiscordClient, DiscordGuild, DiscordMessage, DiscordUser};
use crate::error::DiscordError;

pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

/// Wait suggested when a 429 body carries no `retry_after`
pub const DEFAULT_RETRY_AFTER: f64 = 2.0;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Implementation of the Discord REST client
pub struct DiscordClientImpl {
    http: Client,
    base_url: String,
}

impl DiscordClientImpl {
    /// The token is sent verbatim in the `Authorization` header
    pub fn new(base_url: &str, token: &str) -> Result<Self, DiscordError> {
        let mut auth = HeaderValue::from_str(token).map_err(|_| DiscordError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, DiscordError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| DiscordError::Deserialization(e.to_string()))
        } else {
            Err(Self::error_for(status, response).await)
        }
    }

    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<(), DiscordError> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_for(status, response).await)
        }
    }

    async fn error_for(status: StatusCode, response: reqwest::Response) -> DiscordError {
        let message = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED => DiscordError::Unauthorized,
            StatusCode::FORBIDDEN => DiscordError::Forbidden,
            StatusCode::TOO_MANY_REQUESTS => DiscordError::RateLimited {
                retry_after: parse_retry_after(&message),
            },
            _ => DiscordError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[derive(Deserialize)]
struct RateLimitBody {
    retry_after: Option<f64>,
}

/// `retry_after` seconds from a 429 body, or the default when absent
fn parse_retry_after(body: &str) -> f64 {
    serde_json::from_str::<RateLimitBody>(body)
        .ok()
        .and_then(|b| b.retry_after)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

/// Search results come back as groups of messages (the hit plus context),
/// though single messages also appear.
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    messages: Vec<SearchHit>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchHit {
    Group(Vec<DiscordMessage>),
    Single(DiscordMessage),
}

impl SearchResponse {
    fn into_messages(self) -> Vec<DiscordMessage> {
        self.messages
            .into_iter()
            .flat_map(|hit| match hit {
                SearchHit::Group(group) => group,
                SearchHit::Single(message) => vec![message],
            })
            .collect()
    }
}

#[async_trait]
impl DiscordClient for DiscordClientImpl {
    async fn current_user(&self) -> Result<DiscordUser, DiscordError> {
        let resp = self.http.get(self.api_url("/users/@me")).send().await?;

        self.handle_response(resp).await
    }

    async fn list_guilds(&self) -> Result<Vec<DiscordGuild>, DiscordError> {
        let resp = self
            .http
            .get(self.api_url("/users/@me/guilds"))
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn list_guild_channels(
        &self,
        guild_id: &str,
    ) -> Result<Vec<DiscordChannel>, DiscordError> {
        let resp = self
            .http
            .get(self.api_url(&format!("/guilds/{}/channels", guild_id)))
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn list_dm_channels(&self) -> Result<Vec<DiscordChannel>, DiscordError> {
        let resp = self
            .http
            .get(self.api_url("/users/@me/channels"))
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn channel_messages(
        &self,
        channel_id: &str,
        limit: u8,
    ) -> Result<Vec<DiscordMessage>, DiscordError> {
        let resp = self
            .http
            .get(self.api_url(&format!("/channels/{}/messages", channel_id)))
            .query(&[("limit", limit)])
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn search_guild_messages(
        &self,
        guild_id: &str,
        content: &str,
    ) -> Result<Vec<DiscordMessage>, DiscordError> {
        let resp = self
            .http
            .get(self.api_url(&format!("/guilds/{}/messages/search", guild_id)))
            .query(&[("content", content), ("include_nsfw", "true")])
            .send()
            .await?;

        let results: SearchResponse = self.handle_response(resp).await?;
        Ok(results.into_messages())
    }

    async fn get_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> Result<DiscordMessage, DiscordError> {
        let resp = self
            .http
            .get(self.api_url(&format!(
                "/channels/{}/messages/{}",
                channel_id, message_id
            )))
            .send()
            .await?;

        self.handle_response(resp).await
    }

    async fn add_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &Emoji,
    ) -> Result<(), DiscordError> {
        let resp = self
            .http
            .put(self.api_url(&format!(
                "/channels/{}/messages/{}/reactions/{}/@me",
                channel_id,
                message_id,
                emoji.path_segment()
            )))
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }
}
