//! Default value functions used by serde for config deserialization.

use super::RuleConfig;

pub fn default_name() -> String {
    "linkfix".to_string()
}

pub fn default_data_dir() -> String {
    "~/.linkfix".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_reply_prefix() -> String {
    "Fixed that for you".to_string()
}

pub fn default_db_path() -> String {
    "~/.linkfix/data/linkfix.db".to_string()
}

pub fn default_update_interval() -> u64 {
    60
}

pub fn default_repo_dir() -> String {
    ".".to_string()
}

pub fn default_initial_delay() -> u64 {
    10
}

/// Built-in rules used when the config file carries none.
pub fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig {
            match_domains: vec!["twitter.com".to_string(), "x.com".to_string()],
            alternative_domains: vec!["vxtwitter.com".to_string(), "fxtwitter.com".to_string()],
            replace_with: "vxtwitter.com".to_string(),
            platform: Some("twitter".to_string()),
        },
        RuleConfig {
            match_domains: vec!["instagram.com".to_string()],
            alternative_domains: vec!["ddinstagram.com".to_string()],
            replace_with: "ddinstagram.com".to_string(),
            platform: Some("instagram".to_string()),
        },
    ]
}
