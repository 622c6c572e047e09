//! Built-in slash commands -- instant responses, handled before the
//! automatic fixing path.

mod prefs;

#[cfg(test)]
mod tests;

use crate::gateway::{Action, Pipeline};
use linkfix_core::rules::RuleSet;
use linkfix_store::Store;

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub store: &'a Store,
    pub rules: &'a RuleSet,
    pub pipeline: &'a Pipeline,
    pub sender_id: &'a str,
    pub text: &'a str,
}

/// Known bot commands.
pub enum Command {
    Fix,
    Prefs,
    Stats,
    Help,
}

impl Command {
    /// Parse a command from message text. Returns `None` for anything
    /// that is not a known `/` command; plain messages flow on to the
    /// automatic path.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/fix@linkfix_bot" -> "/fix").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/fix" => Some(Self::Fix),
            "/prefs" => Some(Self::Prefs),
            "/stats" => Some(Self::Stats),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Handle a command and return the response text.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> String {
    match cmd {
        Command::Fix => handle_fix(ctx).await,
        Command::Prefs => prefs::handle_prefs(ctx).await,
        Command::Stats => prefs::handle_stats(ctx.store).await,
        Command::Help => handle_help(),
    }
}

/// Handle /fix -- explicit fix-for-me, bypasses the opt-out preference.
async fn handle_fix(ctx: &CommandContext<'_>) -> String {
    let arg = ctx
        .text
        .split_whitespace()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    if arg.is_empty() {
        return "Usage: /fix <link>".to_string();
    }

    match ctx.pipeline.handle_explicit(&arg).await {
        Action::Reply(text) | Action::Error(text) => text,
        Action::NoReply => String::new(),
    }
}

fn handle_help() -> String {
    "Commands:\n\
     /fix <link> - rewrite a social media link to an embed-friendly domain\n\
     /prefs - show your automatic fixing preference and fix counts\n\
     /prefs on|off - resume or stop automatic fixing for your messages\n\
     /stats - per-platform fix counts\n\
     /help - this message\n\n\
     Or just post a link: supported domains are fixed automatically."
        .to_string()
}
