//! Preference panel and statistics: /prefs and /stats.

use super::CommandContext;
use linkfix_core::error::LinkfixError;
use linkfix_store::Store;
use tracing::error;

pub(super) const GENERIC_ERROR: &str = "Sorry, something went wrong processing your request.";

/// Data behind the preference panel. Rendering stays plain text here;
/// richer platform surfaces can format the same fields their own way.
pub struct PrefsPanel {
    pub auto_fix_enabled: bool,
    pub counts: Vec<(String, i64)>,
    pub active_redirects: Vec<(Vec<String>, String)>,
}

impl PrefsPanel {
    pub fn render(&self) -> String {
        let mut out = String::from("Automatic link fixing: ");
        out.push_str(if self.auto_fix_enabled { "ON" } else { "OFF" });

        out.push_str("\n\nActive redirects:");
        for (domains, target) in &self.active_redirects {
            out.push_str(&format!("\n  {} -> {target}", domains.join(", ")));
        }

        out.push_str("\n\nLinks fixed so far:");
        if self.counts.is_empty() {
            out.push_str("\n  none yet");
        }
        for (platform, count) in &self.counts {
            out.push_str(&format!("\n  {platform}: {count}"));
        }

        out.push_str("\n\nUse /prefs off to stop automatic fixing, /prefs on to resume.");
        out
    }
}

pub(super) async fn handle_prefs(ctx: &CommandContext<'_>) -> String {
    let arg = ctx.text.split_whitespace().nth(1).unwrap_or("");

    match arg {
        "off" => match ctx.store.set_opted_out(ctx.sender_id, true).await {
            Ok(true) => "You have opted out of automatic link fixing. \
                         /fix still works on demand."
                .to_string(),
            Ok(false) => "You were already opted out of automatic link fixing.".to_string(),
            Err(e) => {
                error!("opt-out failed for {}: {e}", ctx.sender_id);
                GENERIC_ERROR.to_string()
            }
        },
        "on" => match ctx.store.set_opted_out(ctx.sender_id, false).await {
            Ok(true) => "Automatic link fixing is back on for you.".to_string(),
            Ok(false) => "Automatic link fixing was already on for you.".to_string(),
            Err(e) => {
                error!("opt-in failed for {}: {e}", ctx.sender_id);
                GENERIC_ERROR.to_string()
            }
        },
        "" => match build_panel(ctx).await {
            Ok(panel) => panel.render(),
            Err(e) => {
                error!("prefs panel failed for {}: {e}", ctx.sender_id);
                GENERIC_ERROR.to_string()
            }
        },
        other => format!("Unknown option '{other}'. Use /prefs, /prefs on, or /prefs off."),
    }
}

async fn build_panel(ctx: &CommandContext<'_>) -> Result<PrefsPanel, LinkfixError> {
    let opted_out = ctx.store.is_opted_out(ctx.sender_id).await?;
    let counts = ctx.store.all_fix_counts().await?;
    Ok(PrefsPanel {
        auto_fix_enabled: !opted_out,
        counts,
        active_redirects: ctx.rules.active_redirects(),
    })
}

pub(super) async fn handle_stats(store: &Store) -> String {
    match store.all_fix_counts().await {
        Ok(counts) if counts.is_empty() => "No links fixed yet.".to_string(),
        Ok(counts) => {
            let mut out = String::from("Links fixed so far:");
            for (platform, count) in &counts {
                out.push_str(&format!("\n  {platform}: {count}"));
            }
            out
        }
        Err(e) => {
            error!("stats query failed: {e}");
            GENERIC_ERROR.to_string()
        }
    }
}
