//! Message pipeline -- the per-message rewrite decision flow: opt-out
//! gate, rewrite engine, fix counter, reply.

use linkfix_core::{
    message::IncomingMessage,
    rewrite::{self, RewriteOutcome},
    rules::RuleSet,
};
use linkfix_store::Store;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the gateway should do with a processed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Say nothing.
    NoReply,
    /// Send this text back to the sender.
    Reply(String),
    /// Processing failed; send this user-safe explanation back.
    Error(String),
}

/// Stateless per-message coordinator. Holds only shared immutable rules
/// and a handle to the store; safe to clone into any number of tasks.
#[derive(Clone)]
pub struct Pipeline {
    rules: Arc<RuleSet>,
    store: Store,
    reply_prefix: String,
}

impl Pipeline {
    pub fn new(rules: Arc<RuleSet>, store: Store, reply_prefix: String) -> Self {
        Self {
            rules,
            store,
            reply_prefix,
        }
    }

    /// Decide how to react to an inbound message.
    ///
    /// Bot authors and opted-out authors never get automatic replies. A
    /// store failure aborts this one message: the preference must be
    /// known, never guessed.
    pub async fn handle(&self, incoming: &IncomingMessage) -> Action {
        if incoming.is_bot {
            return Action::NoReply;
        }

        let opted_out = match self.store.is_opted_out(&incoming.sender_id).await {
            Ok(v) => v,
            Err(e) => {
                warn!("opt-out lookup failed for {}: {e}", incoming.sender_id);
                return Action::Error(
                    "Sorry, I couldn't check your preferences just now. Please try again."
                        .to_string(),
                );
            }
        };

        if opted_out {
            debug!("{} has opted out, skipping", incoming.sender_id);
            return Action::NoReply;
        }

        match rewrite::evaluate(&self.rules, &incoming.text) {
            RewriteOutcome::NoMatch | RewriteOutcome::AlreadyFixed => Action::NoReply,
            RewriteOutcome::Fixed { platform, text } => {
                self.count_fix(&platform).await;
                Action::Reply(format!("{}\n{text}", self.reply_prefix))
            }
        }
    }

    /// Explicit fix-for-me request. Always proceeds, regardless of the
    /// sender's opt-out preference, and explains non-fixes instead of
    /// staying silent.
    pub async fn handle_explicit(&self, text: &str) -> Action {
        match rewrite::evaluate(&self.rules, text) {
            RewriteOutcome::NoMatch => {
                Action::Reply("That doesn't look like a supported link.".to_string())
            }
            RewriteOutcome::AlreadyFixed => {
                Action::Reply("That link is already using an embed-friendly domain.".to_string())
            }
            RewriteOutcome::Fixed { platform, text } => {
                self.count_fix(&platform).await;
                Action::Reply(text)
            }
        }
    }

    /// Best-effort counter bump. Counting is telemetry; a failure must
    /// never block a reply the engine already decided on.
    async fn count_fix(&self, platform: &str) {
        match self.store.increment_fix_count(platform).await {
            Ok(count) => info!("fixed a {platform} link (total: {count})"),
            Err(e) => warn!("failed to count {platform} fix: {e}"),
        }
    }
}
