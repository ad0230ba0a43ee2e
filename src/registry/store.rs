//! Stream registry implementation
//!
//! The central registry that manages all named sessions and routes
//! producer lines and chat to subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};

use crate::chat::{pseudonym, ChatMessage};
use crate::limiter::RateLimiter;
use crate::moderation::{ActivityEntry, ActivityLog, BanSet};
use crate::presence::{ConnId, PresenceTracker};
use crate::stats::{StatsAggregator, StatsSnapshot};

use super::config::{RegistryConfig, MAX_NAME_LEN, MIN_NAME_LEN};
use super::entry::{SessionSummary, Snapshot, StreamEntry};
use super::error::RegistryError;
use super::event::{Line, LineKind, SendOutcome, StreamEvent};
use super::token::StreamToken;

/// A live subscription: the snapshot to render first, then the event
/// receiver to drain
pub struct Subscription {
    /// Stream name subscribed to
    pub name: String,
    /// The subscribing connection
    pub conn_id: ConnId,
    /// History captured atomically with receiver registration
    pub snapshot: Snapshot,
    /// Live event stream; a receiver that falls `broadcast_capacity`
    /// behind observes `Lagged` and should resubscribe or disconnect
    pub events: broadcast::Receiver<StreamEvent>,
}

/// Read-only answer to a stream query; absent names get the default
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamInfo {
    /// Whether the stream is live
    pub active: bool,
    /// Current viewer count
    pub viewer_count: usize,
    /// Wall-clock creation time, `None` for never-seen names
    pub started_at: Option<DateTime<Utc>>,
}

/// Central registry for all named stream sessions
///
/// Thread-safe via `RwLock`; the outer map lock is only written during
/// session creation. Every check-then-act sequence (token-then-append,
/// capacity-then-join, snapshot-then-subscribe) runs under one entry
/// write lock. Lock order is map lock, then entry lock, then sync leaf
/// mutex, never reversed.
pub struct StreamRegistry {
    /// Map of stream name to session entry
    streams: RwLock<HashMap<String, Arc<RwLock<StreamEntry>>>>,

    /// Fixed-window counters for every rate tier
    limiter: RateLimiter,

    /// Viewer membership and conn-to-stream binding
    presence: PresenceTracker,

    /// Banned names; overlays all other state
    bans: BanSet,

    /// Day-scoped and all-time counters
    stats: StatsAggregator,

    /// Newest-first admin activity log
    activity: ActivityLog,

    /// Configuration
    config: RegistryConfig,
}

impl StreamRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
            limiter: RateLimiter::new(),
            presence: PresenceTracker::new(),
            bans: BanSet::new(),
            stats: StatsAggregator::new(),
            activity: ActivityLog::new(config.activity_log_capacity),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create-or-append: the ingest operation
    ///
    /// The first send for an unclaimed (valid, unbanned) name creates
    /// the session and returns [`SendOutcome::Created`] with its fresh
    /// token; the claiming send's text is not appended. Later sends
    /// must present the token and append a line. `origin` identifies
    /// the caller for the per-origin creation limit (typically the
    /// client IP).
    pub async fn send(
        &self,
        name: &str,
        token: Option<&str>,
        text: &str,
        kind: &str,
        origin: &str,
    ) -> Result<SendOutcome, RegistryError> {
        validate_name(name)?;
        let kind =
            LineKind::parse(kind).ok_or_else(|| RegistryError::InvalidKind(kind.to_string()))?;
        if self.bans.contains(name) {
            return Err(RegistryError::Banned(name.to_string()));
        }
        if text.trim().is_empty() || text.chars().count() > self.config.max_line_len {
            return Err(RegistryError::InvalidText);
        }

        let existing = self.streams.read().await.get(name).cloned();
        let entry_arc = match existing {
            Some(arc) => arc,
            None => {
                let mut streams = self.streams.write().await;

                // Re-check under the write lock: a concurrent first-send
                // may have created the session already. The loser falls
                // through to the append path and fails token auth.
                if let Some(arc) = streams.get(name) {
                    arc.clone()
                } else {
                    if !self.limiter.check("create", origin, self.config.create_limit) {
                        return Err(RegistryError::RateLimited);
                    }

                    let entry = StreamEntry::new(&self.config);
                    let token = entry.token.clone();
                    streams.insert(name.to_string(), Arc::new(RwLock::new(entry)));

                    self.stats.on_stream_created();
                    self.activity.record(format!("stream {} started", name));
                    tracing::info!(stream = %name, "Stream created");

                    return Ok(SendOutcome::Created { token });
                }
            }
        };

        let mut entry = entry_arc.write().await;

        if !entry.token.matches(token.unwrap_or("")) {
            return Err(RegistryError::TokenMismatch);
        }
        if !self.limiter.check("send", name, self.config.send_limit) {
            return Err(RegistryError::RateLimited);
        }

        let line = Line {
            at: Utc::now(),
            text: sanitize(text),
            kind,
        };

        let was_offline = !entry.active;
        entry.active = true;
        entry.append(line.clone());
        self.stats.on_message();

        if was_offline {
            self.activity.record(format!("stream {} resumed", name));
            tracing::info!(stream = %name, "Stream reactivated");
        }

        entry.publish(StreamEvent::Line(line));
        Ok(SendOutcome::Accepted)
    }

    /// Atomically replace a session's token
    ///
    /// Fails with `TokenMismatch` unless `old` is the current token,
    /// or `UnknownStream` for never-seen names. The old token is
    /// invalid the moment this returns.
    pub async fn rotate_token(&self, name: &str, old: &str) -> Result<StreamToken, RegistryError> {
        let entry_arc = self
            .streams
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownStream(name.to_string()))?;

        let mut entry = entry_arc.write().await;
        if !entry.token.matches(old) {
            return Err(RegistryError::TokenMismatch);
        }

        entry.token = StreamToken::generate();
        tracing::info!(stream = %name, "Token rotated");
        Ok(entry.token.clone())
    }

    /// Read-only stream query; never errors
    pub async fn info(&self, name: &str) -> StreamInfo {
        let entry_arc = self.streams.read().await.get(name).cloned();
        match entry_arc {
            Some(arc) => {
                let entry = arc.read().await;
                StreamInfo {
                    active: entry.active,
                    viewer_count: self.presence.count(name),
                    started_at: Some(entry.started_at),
                }
            }
            None => StreamInfo::default(),
        }
    }

    /// Per-origin connection-attempt limit, for the transport layer to
    /// consult before accepting a new connection
    pub fn check_connection(&self, origin: &str) -> Result<(), RegistryError> {
        if self.limiter.check("connect", origin, self.config.connect_limit) {
            Ok(())
        } else {
            Err(RegistryError::RateLimited)
        }
    }

    /// Subscribe a connection to a stream
    ///
    /// Delivers a snapshot captured atomically with receiver
    /// registration: no event published after the snapshot can be
    /// missed. A connection watches at most one stream; subscribing to
    /// a new one implicitly leaves the previous one and rebroadcasts
    /// its viewer count there.
    pub async fn subscribe(
        &self,
        name: &str,
        conn_id: ConnId,
    ) -> Result<Subscription, RegistryError> {
        validate_name(name)?;
        if self.bans.contains(name) {
            return Err(RegistryError::Banned(name.to_string()));
        }

        let (entry_arc, prev_arc) = {
            let streams = self.streams.read().await;
            let entry_arc = streams
                .get(name)
                .cloned()
                .ok_or_else(|| RegistryError::UnknownStream(name.to_string()))?;
            let prev_arc = self
                .presence
                .current(conn_id)
                .filter(|prev| prev.as_str() != name)
                .and_then(|prev| streams.get(&prev).cloned());
            (entry_arc, prev_arc)
        };

        // Implicit leave, done before locking the target entry so the
        // two entry locks are never held together
        if self.presence.current(conn_id).as_deref() != Some(name) {
            if let Some((prev_name, count)) = self.presence.leave(conn_id) {
                if let Some(arc) = prev_arc {
                    let prev_entry = arc.write().await;
                    prev_entry.publish(StreamEvent::ViewerCount(count));
                }
                tracing::debug!(stream = %prev_name, viewers = count, "Viewer switched away");
            }
        }

        let mut entry = entry_arc.write().await;

        let count = self
            .presence
            .join(name, conn_id, self.config.max_viewers)
            .ok_or_else(|| RegistryError::Capacity(name.to_string()))?;

        if count > entry.peak_viewers {
            entry.peak_viewers = count;
        }
        self.stats.record_concurrent(self.presence.total());

        let snapshot = entry.snapshot(count);
        let events = entry.subscribe();
        entry.publish(StreamEvent::ViewerCount(count));

        tracing::info!(stream = %name, viewers = count, "Viewer joined");

        Ok(Subscription {
            name: name.to_string(),
            conn_id,
            snapshot,
            events,
        })
    }

    /// Drop a connection's membership, wherever it is
    ///
    /// Idempotent; rebroadcasts the stream's new viewer count. Safe to
    /// call concurrently with fresh joins for the same stream.
    pub async fn disconnect(&self, conn_id: ConnId) {
        if let Some((name, count)) = self.presence.leave(conn_id) {
            let entry_arc = self.streams.read().await.get(&name).cloned();
            if let Some(arc) = entry_arc {
                let entry = arc.write().await;
                entry.publish(StreamEvent::ViewerCount(count));
            }
            tracing::debug!(stream = %name, viewers = count, "Viewer left");
        }
    }

    /// Post a chat message tied to the connection's current
    /// subscription
    pub async fn send_chat(
        &self,
        name: &str,
        conn_id: ConnId,
        text: &str,
    ) -> Result<(), RegistryError> {
        let entry_arc = self
            .streams
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownStream(name.to_string()))?;

        if self.presence.current(conn_id).as_deref() != Some(name) {
            return Err(RegistryError::NotSubscribed(name.to_string()));
        }

        let mut entry = entry_arc.write().await;

        if !entry.active {
            return Err(RegistryError::StreamOffline(name.to_string()));
        }
        if !self
            .limiter
            .check("chat", &conn_id.to_string(), self.config.chat_cooldown)
        {
            return Err(RegistryError::RateLimited);
        }

        let text: String = sanitize(text)
            .chars()
            .take(self.config.max_chat_len)
            .collect();
        if text.is_empty() {
            return Err(RegistryError::InvalidText);
        }

        let message = ChatMessage {
            pseudonym: pseudonym(conn_id),
            text,
            at: Utc::now(),
        };

        entry.chat.push(message.clone());
        entry.publish(StreamEvent::Chat(message));
        Ok(())
    }

    /// Ban a name: forces the stream offline and rejects its sends and
    /// joins until unbanned
    ///
    /// Returns false if the name was already banned. The caller is
    /// responsible for the privilege check.
    pub async fn ban(&self, name: &str) -> bool {
        let newly = self.bans.insert(name);

        if let Some(arc) = self.streams.read().await.get(name).cloned() {
            let mut entry = arc.write().await;
            if entry.active {
                entry.active = false;
                entry.publish(StreamEvent::Offline);
                tracing::warn!(stream = %name, "Stream forced offline by ban");
            }
        }

        if newly {
            self.activity.record(format!("stream {} banned", name));
        }
        newly
    }

    /// Lift a ban; does not reactivate the stream
    pub fn unban(&self, name: &str) -> bool {
        let removed = self.bans.remove(name);
        if removed {
            self.activity.record(format!("stream {} unbanned", name));
            tracing::info!(stream = %name, "Stream unbanned");
        }
        removed
    }

    /// Force a stream offline, independent of ban state
    ///
    /// A later authenticated send reactivates it. The caller is
    /// responsible for the privilege check.
    pub async fn end_stream(&self, name: &str) -> Result<(), RegistryError> {
        let entry_arc = self
            .streams
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownStream(name.to_string()))?;

        let mut entry = entry_arc.write().await;
        if entry.active {
            entry.active = false;
            entry.publish(StreamEvent::Offline);
            self.activity.record(format!("stream {} ended by admin", name));
            tracing::info!(stream = %name, "Stream ended by admin");
        }
        Ok(())
    }

    /// Take every active session past the inactivity timeout offline
    ///
    /// Idempotent per tick: already-offline sessions are skipped, so
    /// each timeout publishes exactly one `Offline`. A contended entry
    /// is skipped and caught on the next tick.
    pub async fn timeout_sweep(&self) {
        let streams = self.streams.read().await;

        for (name, entry_arc) in streams.iter() {
            if let Ok(mut entry) = entry_arc.try_write() {
                if entry.active && entry.last_activity.elapsed() > self.config.inactivity_timeout {
                    entry.active = false;
                    entry.publish(StreamEvent::Offline);
                    self.activity.record(format!("stream {} timed out", name));
                    tracing::info!(stream = %name, "Stream timed out");
                }
            }
        }
    }

    /// One full maintenance tick: inactivity sweep, rate-window purge,
    /// and the calendar-day stats roll
    pub async fn sweep_tick(&self) {
        self.timeout_sweep().await;
        self.limiter.purge_expired();
        if self.stats.roll_day_if_needed(Utc::now().date_naive()) {
            tracing::info!("Daily stats reset");
        }
    }

    /// Spawn the background sweep task
    ///
    /// Ticks every `sweep_interval`; a tick that overruns its interval
    /// is skipped rather than overlapped. Returns a handle that can be
    /// used to abort the task.
    pub fn spawn_sweep_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        let interval = registry.config.sweep_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                registry.sweep_tick().await;
            }
        })
    }

    /// Admin view: every session with its stats, sorted by name
    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        let streams = self.streams.read().await;
        let mut summaries = Vec::with_capacity(streams.len());

        for (name, entry_arc) in streams.iter() {
            let entry = entry_arc.read().await;
            summaries.push(SessionSummary {
                name: name.clone(),
                active: entry.active,
                banned: self.bans.contains(name),
                viewer_count: self.presence.count(name),
                peak_viewers: entry.peak_viewers,
                total_messages: entry.total_messages,
                started_at: entry.started_at,
                idle: entry.last_activity.elapsed(),
            });
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Admin view: banned names
    pub fn banned_names(&self) -> Vec<String> {
        self.bans.list()
    }

    /// Admin view: recent activity, newest first
    pub fn activity(&self) -> Vec<ActivityEntry> {
        self.activity.recent()
    }

    /// Current global counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Total number of sessions ever created this process
    pub async fn stream_count(&self) -> usize {
        self.streams.read().await.len()
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    let valid = (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}

/// Strip control characters (newline and tab survive) and surrounding
/// whitespace
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}
