//! Reaction reconciler
//!
//! Works out which configured reactions the authenticated user has not yet
//! applied to a message and applies only those, one at a time with a random
//! pause after each attempt.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{seconds, DelayBounds, NamedReaction, ReactionSpec, Source};
use crate::domain::ports::{DiscordClient, DiscordMessage, DiscordReaction, Pacer};
use crate::error::DiscordError;

/// Result of one "add my reaction" call
#[derive(Debug, Clone, PartialEq)]
pub enum ReactionOutcome {
    Added,
    /// Waited the server-suggested interval; not retried this run
    RateLimited { waited: Duration },
    Failed(String),
}

/// What reconciliation did to one message
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileReport {
    /// The message could not be re-fetched to read its reactions
    Unavailable,
    /// Every configured reaction was already applied by us
    AlreadyComplete,
    Applied {
        /// Names already present before this pass
        already: Vec<String>,
        /// Each missing reaction, in configured order
        attempts: Vec<(String, ReactionOutcome)>,
    },
}

impl ReconcileReport {
    pub fn added(&self) -> usize {
        match self {
            ReconcileReport::Applied { attempts, .. } => attempts
                .iter()
                .filter(|(_, o)| *o == ReactionOutcome::Added)
                .count(),
            _ => 0,
        }
    }

    pub fn not_added(&self) -> usize {
        match self {
            ReconcileReport::Applied { attempts, .. } => attempts.len() - self.added(),
            _ => 0,
        }
    }
}

pub struct ReactionReconciler<DC, P>
where
    DC: DiscordClient,
    P: Pacer,
{
    discord: Arc<DC>,
    pacer: Arc<P>,
    reactions: ReactionSpec,
    delay: DelayBounds,
}

impl<DC, P> ReactionReconciler<DC, P>
where
    DC: DiscordClient,
    P: Pacer,
{
    pub fn new(discord: Arc<DC>, pacer: Arc<P>, reactions: ReactionSpec, delay: DelayBounds) -> Self {
        Self {
            discord,
            pacer,
            reactions,
            delay,
        }
    }

    /// For each configured reaction, whether we already applied it
    pub fn presence<'a>(&'a self, message: &DiscordMessage) -> Vec<(&'a NamedReaction, bool)> {
        let existing: &[DiscordReaction] = message.reactions.as_deref().unwrap_or_default();
        self.reactions
            .iter()
            .map(|wanted| {
                let present = existing
                    .iter()
                    .any(|r| r.me && wanted.emoji.matches(&r.emoji));
                (wanted, present)
            })
            .collect()
    }

    pub async fn reconcile(&self, source: &Source, message: &DiscordMessage) -> ReconcileReport {
        tracing::info!("Processing: {}", source.message_link(&message.id));

        let fetched;
        let message = if message.reactions.is_some() {
            message
        } else {
            match self.discord.get_message(&source.channel_id, &message.id).await {
                Ok(m) => {
                    fetched = m;
                    &fetched
                }
                Err(e) => {
                    tracing::error!("Could not retrieve message {}: {}", message.id, e);
                    return ReconcileReport::Unavailable;
                }
            }
        };

        let presence = self.presence(message);
        if presence.iter().all(|(_, present)| *present) {
            tracing::info!("Already reacted with all emojis - skipping");
            return ReconcileReport::AlreadyComplete;
        }

        let already: Vec<String> = presence
            .iter()
            .filter(|(_, present)| *present)
            .map(|(r, _)| r.name.clone())
            .collect();
        if !already.is_empty() {
            tracing::info!("Already have: {}", already.join(", "));
        }

        let mut attempts = Vec::new();
        for (wanted, _) in presence.into_iter().filter(|(_, present)| !*present) {
            let outcome = self.apply(source, &message.id, wanted).await;
            attempts.push((wanted.name.clone(), outcome));

            self.pacer.pause(self.pacer.jitter(self.delay)).await;
        }

        let report = ReconcileReport::Applied { already, attempts };
        if report.added() == 0 {
            tracing::warn!("No new reactions added");
        }
        report
    }

    async fn apply(
        &self,
        source: &Source,
        message_id: &str,
        wanted: &NamedReaction,
    ) -> ReactionOutcome {
        match self
            .discord
            .add_reaction(&source.channel_id, message_id, &wanted.emoji)
            .await
        {
            Ok(()) => {
                tracing::info!("Added {} {}", wanted.name, wanted.emoji);
                ReactionOutcome::Added
            }
            Err(DiscordError::RateLimited { retry_after }) => {
                tracing::warn!("Rate limited, waiting {}s...", retry_after);
                let waited = seconds(retry_after);
                self.pacer.pause(waited).await;
                tracing::warn!("Failed to add {} {}", wanted.name, wanted.emoji);
                ReactionOutcome::RateLimited { waited }
            }
            Err(e) => {
                tracing::error!("Failed to add {} {}: {}", wanted.name, wanted.emoji, e);
                ReactionOutcome::Failed(e.to_string())
            }
        }
    }
}
