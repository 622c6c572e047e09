use super::*;
use crate::gateway::Pipeline;
use linkfix_core::config::{RuleConfig, StoreConfig};
use linkfix_core::rules::RuleSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary on-disk store, unique per call.
async fn test_store() -> Store {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "__linkfix_cmd_test_{}_{}__",
        std::process::id(),
        id
    ));
    let _ = std::fs::create_dir_all(&dir);
    let db_path = dir.join("test.db").to_string_lossy().to_string();
    let _ = std::fs::remove_file(&db_path);
    Store::new(&StoreConfig { db_path }).await.unwrap()
}

fn test_rules() -> Arc<RuleSet> {
    Arc::new(
        RuleSet::load(&[RuleConfig {
            match_domains: vec!["twitter.com".to_string(), "x.com".to_string()],
            alternative_domains: vec!["vxtwitter.com".to_string()],
            replace_with: "vxtwitter.com".to_string(),
            platform: Some("twitter".to_string()),
        }])
        .unwrap(),
    )
}

/// Run a command line as `sender` against a fresh store and rule set.
async fn run_command(store: &Store, rules: &Arc<RuleSet>, sender: &str, text: &str) -> String {
    let pipeline = Pipeline::new(rules.clone(), store.clone(), "Fixed that for you".to_string());
    let cmd = Command::parse(text).expect("should parse as a command");
    let ctx = CommandContext {
        store,
        rules,
        pipeline: &pipeline,
        sender_id: sender,
        text,
    };
    handle(cmd, &ctx).await
}

#[test]
fn test_parse_all_commands() {
    assert!(matches!(Command::parse("/fix https://x.com/a"), Some(Command::Fix)));
    assert!(matches!(Command::parse("/prefs"), Some(Command::Prefs)));
    assert!(matches!(Command::parse("/prefs off"), Some(Command::Prefs)));
    assert!(matches!(Command::parse("/stats"), Some(Command::Stats)));
    assert!(matches!(Command::parse("/help"), Some(Command::Help)));
}

#[test]
fn test_parse_with_botname_suffix() {
    assert!(matches!(
        Command::parse("/fix@linkfix_bot https://x.com/a"),
        Some(Command::Fix)
    ));
    assert!(matches!(Command::parse("/prefs@linkfix_bot"), Some(Command::Prefs)));
}

#[test]
fn test_parse_unknown_and_plain_text() {
    assert!(Command::parse("/unknown").is_none());
    assert!(Command::parse("hello there").is_none());
    assert!(Command::parse("").is_none());
    assert!(Command::parse("https://twitter.com/foo").is_none());
}

#[tokio::test]
async fn test_fix_requires_an_argument() {
    let store = test_store().await;
    let rules = test_rules();
    let out = run_command(&store, &rules, "u1", "/fix").await;
    assert_eq!(out, "Usage: /fix <link>");
}

#[tokio::test]
async fn test_fix_works_for_opted_out_user() {
    let store = test_store().await;
    let rules = test_rules();
    store.set_opted_out("u1", true).await.unwrap();

    let out = run_command(&store, &rules, "u1", "/fix https://twitter.com/foo").await;
    assert_eq!(out, "https://vxtwitter.com/foo");
    assert_eq!(store.fix_count("twitter").await.unwrap(), 1);
}

#[tokio::test]
async fn test_fix_reports_unsupported_links() {
    let store = test_store().await;
    let rules = test_rules();
    let out = run_command(&store, &rules, "u1", "/fix https://example.com/a").await;
    assert_eq!(out, "That doesn't look like a supported link.");
}

#[tokio::test]
async fn test_prefs_toggle_reports_state_changes() {
    let store = test_store().await;
    let rules = test_rules();

    let out = run_command(&store, &rules, "u1", "/prefs off").await;
    assert!(out.contains("opted out"));
    assert!(store.is_opted_out("u1").await.unwrap());

    let out = run_command(&store, &rules, "u1", "/prefs off").await;
    assert!(out.contains("already opted out"), "idempotent toggle: {out}");

    let out = run_command(&store, &rules, "u1", "/prefs on").await;
    assert!(out.contains("back on"));
    assert!(!store.is_opted_out("u1").await.unwrap());

    let out = run_command(&store, &rules, "u1", "/prefs on").await;
    assert!(out.contains("already on"), "idempotent toggle: {out}");
}

#[tokio::test]
async fn test_prefs_panel_shows_state_and_redirects() {
    let store = test_store().await;
    let rules = test_rules();
    store.seed_platforms(&rules.platforms()).await.unwrap();

    let out = run_command(&store, &rules, "u1", "/prefs").await;
    assert!(out.contains("Automatic link fixing: ON"));
    assert!(out.contains("twitter.com, x.com -> vxtwitter.com"));
    assert!(out.contains("twitter: 0"));

    store.set_opted_out("u1", true).await.unwrap();
    let out = run_command(&store, &rules, "u1", "/prefs").await;
    assert!(out.contains("Automatic link fixing: OFF"));
}

#[tokio::test]
async fn test_prefs_rejects_unknown_option() {
    let store = test_store().await;
    let rules = test_rules();
    let out = run_command(&store, &rules, "u1", "/prefs sideways").await;
    assert!(out.contains("Unknown option 'sideways'"));
}

#[tokio::test]
async fn test_stats_lists_counts() {
    let store = test_store().await;
    let rules = test_rules();
    store.increment_fix_count("twitter").await.unwrap();
    store.increment_fix_count("twitter").await.unwrap();

    let out = run_command(&store, &rules, "u1", "/stats").await;
    assert!(out.contains("twitter: 2"));
}

#[tokio::test]
async fn test_stats_with_no_counts() {
    let store = test_store().await;
    let rules = test_rules();
    let out = run_command(&store, &rules, "u1", "/stats").await;
    assert_eq!(out, "No links fixed yet.");
}

#[tokio::test]
async fn test_help_mentions_every_command() {
    let store = test_store().await;
    let rules = test_rules();
    let out = run_command(&store, &rules, "u1", "/help").await;
    for cmd in ["/fix", "/prefs", "/stats", "/help"] {
        assert!(out.contains(cmd), "help should mention {cmd}");
    }
}
