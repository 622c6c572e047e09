//! Gateway -- the event loop connecting channels to the message pipeline.
//!
//! One task per in-flight message; the only shared mutable state lives in
//! the store, which handles its own concurrency.

mod pipeline;
mod updater;

pub use pipeline::{Action, Pipeline};

use crate::commands;
use linkfix_core::{
    config::{ReplyConfig, UpdaterConfig},
    message::{IncomingMessage, OutgoingMessage},
    rules::RuleSet,
    traits::Channel,
};
use linkfix_store::Store;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The central gateway that routes messages between channels and the
/// pipeline.
pub struct Gateway {
    channels: HashMap<String, Arc<dyn Channel>>,
    store: Store,
    rules: Arc<RuleSet>,
    pipeline: Pipeline,
    updater_config: UpdaterConfig,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        channels: HashMap<String, Arc<dyn Channel>>,
        store: Store,
        rules: Arc<RuleSet>,
        reply_config: ReplyConfig,
        updater_config: UpdaterConfig,
    ) -> Self {
        let pipeline = Pipeline::new(rules.clone(), store.clone(), reply_config.prefix);
        Self {
            channels,
            store,
            rules,
            pipeline,
            updater_config,
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "linkfix gateway running | channels: {} | rules: {}",
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
            self.rules.rules().len(),
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        // Spawn the self-update check loop.
        let upd_handle = if self.updater_config.enabled {
            let upd_config = self.updater_config.clone();
            Some(tokio::spawn(async move {
                updater::update_loop(upd_config).await;
            }))
        } else {
            None
        };

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                Some(incoming) = rx.recv() => {
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.process(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        // Graceful shutdown.
        if let Some(handle) = upd_handle {
            handle.abort();
        }
        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }
        info!("Shutdown complete.");
        Ok(())
    }

    /// Process a single incoming message: slash commands first, then the
    /// automatic fixing pipeline.
    async fn process(&self, incoming: IncomingMessage) {
        // Bots (this one included) never trigger replies.
        if incoming.is_bot {
            debug!(
                "[{}] ignoring bot message from {}",
                incoming.channel, incoming.sender_id
            );
            return;
        }

        if let Some(cmd) = commands::Command::parse(&incoming.text) {
            let ctx = commands::CommandContext {
                store: &self.store,
                rules: &self.rules,
                pipeline: &self.pipeline,
                sender_id: &incoming.sender_id,
                text: &incoming.text,
            };
            let response = commands::handle(cmd, &ctx).await;
            self.send_text(&incoming, &response).await;
            return;
        }

        match self.pipeline.handle(&incoming).await {
            Action::NoReply => {}
            Action::Reply(text) => self.send_text(&incoming, &text).await,
            Action::Error(reason) => self.send_text(&incoming, &reason).await,
        }
    }

    /// Send a plain text message back to the sender.
    async fn send_text(&self, incoming: &IncomingMessage, text: &str) {
        let msg = OutgoingMessage {
            text: text.to_string(),
            reply_target: incoming.reply_target.clone(),
        };

        if let Some(channel) = self.channels.get(&incoming.channel) {
            if let Err(e) = channel.send(msg).await {
                error!("failed to send message: {e}");
            }
        }
    }
}
