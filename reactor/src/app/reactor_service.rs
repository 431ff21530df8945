//! Reactor service
//!
//! Drives one run: authenticate, enumerate sources, match messages and
//! reconcile reactions, strictly one step at a time.

use std::sync::Arc;

use crate::app::enumerator::{parse_links, SourceEnumerator};
use crate::app::matcher::{GuildSearch, Match, MessageMatcher};
use crate::app::reconciler::{ReactionReconciler, ReconcileReport};
use crate::config::Config;
use crate::domain::entities::{Container, Identity, MatchFilter, Source};
use crate::domain::ports::{DiscordClient, DiscordGuild, Pacer};
use crate::error::AppError;

/// Totals for one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub sources_scanned: usize,
    pub matches: usize,
    pub already_complete: usize,
    pub unavailable: usize,
    pub reactions_added: usize,
    pub reactions_not_added: usize,
    pub invalid_links: usize,
}

impl RunSummary {
    fn record(&mut self, report: &ReconcileReport) {
        self.matches += 1;
        match report {
            ReconcileReport::Unavailable => self.unavailable += 1,
            ReconcileReport::AlreadyComplete => self.already_complete += 1,
            ReconcileReport::Applied { .. } => {
                self.reactions_added += report.added();
                self.reactions_not_added += report.not_added();
            }
        }
    }
}

pub struct ReactorService<DC, P>
where
    DC: DiscordClient,
    P: Pacer,
{
    discord: Arc<DC>,
    pacer: Arc<P>,
    enumerator: SourceEnumerator<DC>,
    matcher: MessageMatcher<DC, P>,
    reconciler: ReactionReconciler<DC, P>,
    config: Config,
}

impl<DC, P> ReactorService<DC, P>
where
    DC: DiscordClient,
    P: Pacer,
{
    pub fn new(discord: Arc<DC>, pacer: Arc<P>, config: Config) -> Self {
        Self {
            enumerator: SourceEnumerator::new(discord.clone()),
            matcher: MessageMatcher::new(discord.clone(), pacer.clone(), config.source_delay),
            reconciler: ReactionReconciler::new(
                discord.clone(),
                pacer.clone(),
                config.reactions.clone(),
                config.reaction_delay,
            ),
            discord,
            pacer,
            config,
        }
    }

    /// Resolve who the token belongs to. Failure is fatal and not retried.
    pub async fn authenticate(&self) -> Result<Identity, AppError> {
        let user = self
            .discord
            .current_user()
            .await
            .map_err(|e| AppError::Authentication(e.to_string()))?;
        let identity = Identity::from(user);

        tracing::info!("Logged in as: {}", identity.tag());
        tracing::info!("Your user ID: {}", identity.id);
        Ok(identity)
    }

    pub async fn run(&self) -> Result<RunSummary, AppError> {
        tracing::info!("Discord Birthday Message Reactor");
        tracing::warn!(
            "Automating a user account violates Discord's Terms of Service. Use at your own risk."
        );

        let identity = self.authenticate().await?;
        let filter = MatchFilter::new(
            self.config.keywords.clone(),
            self.config.date_filter,
            identity.id.clone(),
            self.config.target_name.clone(),
        );

        let mut summary = RunSummary::default();
        if self.config.has_channel_links() {
            self.run_explicit(&filter, &mut summary).await;
        } else {
            tracing::info!("No specific channels provided. Searching all accessible channels...");
            self.run_discovery(&filter, &mut summary).await;
        }

        tracing::info!(
            sources = summary.sources_scanned,
            matches = summary.matches,
            added = summary.reactions_added,
            not_added = summary.reactions_not_added,
            already_complete = summary.already_complete,
            unavailable = summary.unavailable,
            invalid_links = summary.invalid_links,
            "Completed!"
        );
        Ok(summary)
    }

    async fn run_explicit(&self, filter: &MatchFilter, summary: &mut RunSummary) {
        let links = &self.config.channel_links;
        tracing::info!("Processing {} specific channel(s)", links.len());
        if let Some(date) = filter.target_date() {
            tracing::info!("Date filter: {}", date);
        }
        tracing::info!("Keywords: {}", filter.keywords().join(", "));

        let parsed = parse_links(links);
        summary.invalid_links = parsed.invalid.len();

        for source in &parsed.sources {
            tracing::info!("Searching in channel: {}", source.channel_id);
            self.scan_source(source, filter, summary).await;
            self.pause_between_sources().await;
        }
    }

    async fn run_discovery(&self, filter: &MatchFilter, summary: &mut RunSummary) {
        let guilds = self.enumerator.guilds().await;
        tracing::info!("Found {} guild(s)", guilds.len());

        for guild in &guilds {
            self.process_guild(guild, filter, summary).await;
            self.pause_between_sources().await;
        }

        tracing::info!("Searching in DM channels...");
        for channel in self.enumerator.dm_channels().await {
            tracing::info!("Searching DM with: {}", channel.recipient_names());
            self.scan_source(&Source::direct(channel.id), filter, summary)
                .await;
        }
    }

    async fn process_guild(
        &self,
        guild: &DiscordGuild,
        filter: &MatchFilter,
        summary: &mut RunSummary,
    ) {
        tracing::info!("Searching in guild: {}", guild.name);
        summary.sources_scanned += 1;

        match self.matcher.search_guild(&guild.id, filter).await {
            GuildSearch::Forbidden if self.config.guild_channel_fallback => {
                tracing::info!("Falling back to scanning text channels one by one");
                for source in self.enumerator.guild_text_sources(&guild.id).await {
                    tracing::info!("Searching in channel: {}", source.channel_id);
                    self.scan_source(&source, filter, summary).await;
                }
            }
            search => {
                let container = Container::Guild(guild.id.clone());
                let source_of =
                    |m: &Match| Source::new(container.clone(), m.message.channel_id.clone());
                self.reconcile_all(search.matches(), source_of, summary)
                    .await;
            }
        }
    }

    async fn scan_source(&self, source: &Source, filter: &MatchFilter, summary: &mut RunSummary) {
        summary.sources_scanned += 1;
        let matches = self.matcher.scan_channel(&source.channel_id, filter).await;
        self.reconcile_all(matches, |_| source.clone(), summary).await;
    }

    async fn reconcile_all<F>(&self, matches: Vec<Match>, source_of: F, summary: &mut RunSummary)
    where
        F: Fn(&Match) -> Source,
    {
        if matches.is_empty() {
            tracing::info!("No matching messages found");
            return;
        }

        tracing::info!("Found {} matching message(s)", matches.len());
        for m in &matches {
            tracing::debug!("Message {} matched keyword '{}'", m.message.id, m.keyword);
            let report = self.reconciler.reconcile(&source_of(m), &m.message).await;
            summary.record(&report);
        }
    }

    async fn pause_between_sources(&self) {
        self.pacer.pause(self.config.source_delay).await;
    }
}
