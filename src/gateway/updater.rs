//! Self-update checks -- periodically pulls new code from the upstream
//! git remote. A tick that finds a previous check still running is a
//! no-op, never a queued retry, so long checks cannot stack up.

use linkfix_core::config::UpdaterConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Background loop: run an update check on the configured interval.
pub(super) async fn update_loop(config: UpdaterConfig) {
    let in_flight = Arc::new(AtomicBool::new(false));

    tokio::time::sleep(Duration::from_secs(config.initial_delay_secs)).await;
    info!(
        "update checker running (every {} minutes)",
        config.interval_minutes
    );

    // Clamp to at least one minute; a zero period is not a valid interval.
    let mut ticker =
        tokio::time::interval(Duration::from_secs(config.interval_minutes.max(1) * 60));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        // Only one check in flight at a time.
        if in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("update check still running, skipping this tick");
            continue;
        }

        let flag = in_flight.clone();
        let repo_dir = config.repo_dir.clone();
        tokio::spawn(async move {
            if let Err(e) = check_for_updates(&repo_dir).await {
                warn!("update check failed: {e}");
            }
            flag.store(false, Ordering::SeqCst);
        });
    }
}

/// Fetch the upstream remote and fast-forward when behind. The new code
/// only takes effect on the next restart; we never restart ourselves.
async fn check_for_updates(repo_dir: &str) -> anyhow::Result<()> {
    let inside = Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(repo_dir)
        .output()
        .await?;
    if !inside.status.success() {
        debug!("{repo_dir} is not a git checkout, skipping update check");
        return Ok(());
    }

    let fetch = Command::new("git")
        .args(["fetch", "--quiet"])
        .current_dir(repo_dir)
        .output()
        .await?;
    if !fetch.status.success() {
        anyhow::bail!(
            "git fetch failed: {}",
            String::from_utf8_lossy(&fetch.stderr).trim()
        );
    }

    let behind = Command::new("git")
        .args(["rev-list", "--count", "HEAD..@{u}"])
        .current_dir(repo_dir)
        .output()
        .await?;
    if !behind.status.success() {
        // No upstream configured; nothing to track.
        debug!("no upstream to compare against, skipping update check");
        return Ok(());
    }

    let commits: u64 = String::from_utf8_lossy(&behind.stdout)
        .trim()
        .parse()
        .unwrap_or(0);
    if commits == 0 {
        debug!("no updates found");
        return Ok(());
    }

    info!("update available ({commits} commits behind), pulling...");
    let pull = Command::new("git")
        .args(["pull", "--ff-only", "--quiet"])
        .current_dir(repo_dir)
        .output()
        .await?;
    if !pull.status.success() {
        anyhow::bail!(
            "git pull failed: {}",
            String::from_utf8_lossy(&pull.stderr).trim()
        );
    }

    info!("update pulled; restart the bot to apply it");
    Ok(())
}
