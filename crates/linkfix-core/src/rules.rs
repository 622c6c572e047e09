//! Rewrite rules: configured domain redirects, validated and compiled once
//! at startup and immutable afterwards.

use crate::config::RuleConfig;
use crate::error::LinkfixError;
use regex::Regex;
use std::collections::HashSet;

/// Texts without one of these shapes never match any rule: a scheme prefix
/// or a `www.` lead-in followed by a domain-like fragment.
const URL_TOKEN_PATTERN: &str = r"(?i)(?:https?://|www\.)[a-z0-9][a-z0-9.-]*\.[a-z]{2,}";

/// A single compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    /// Domains that trigger this rule.
    pub match_domains: Vec<String>,
    /// Domains whose presence marks the text as already fixed.
    pub alternative_domains: Vec<String>,
    /// Canonical replacement domain.
    pub replace_with: String,
    /// Label used for per-platform counting.
    pub platform: String,
    /// Case-insensitive alternation over `match_domains`, dots escaped.
    pub(crate) matcher: Regex,
    /// Case-insensitive alternation over `alternative_domains`.
    pub(crate) fixed_marker: Regex,
}

/// Ordered set of rewrite rules. Evaluation is first-match-wins, so rule
/// order in the config file is the only precedence mechanism.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) rules: Vec<RewriteRule>,
    /// Pre-filter applied once per text, before any rule is considered.
    pub(crate) url_token: Regex,
}

impl RuleSet {
    /// Validate raw rule records and compile them into a `RuleSet`.
    ///
    /// Any violation is an error for the whole set; a misconfigured rule
    /// file must never partially load.
    pub fn load(raw: &[RuleConfig]) -> Result<Self, LinkfixError> {
        let url_token = Regex::new(URL_TOKEN_PATTERN)
            .map_err(|e| LinkfixError::Validation(format!("url pre-filter: {e}")))?;

        let mut rules = Vec::with_capacity(raw.len());
        let mut owned_domains: HashSet<String> = HashSet::new();

        for (i, rule) in raw.iter().enumerate() {
            let n = i + 1;

            if rule.match_domains.is_empty() {
                return Err(LinkfixError::Validation(format!(
                    "rule {n}: match_domains must not be empty"
                )));
            }
            if rule.replace_with.trim().is_empty() {
                return Err(LinkfixError::Validation(format!(
                    "rule {n}: replace_with must not be empty"
                )));
            }

            let match_lower: Vec<String> =
                rule.match_domains.iter().map(|d| d.to_lowercase()).collect();

            // Each domain belongs to exactly one rule; ambiguous ownership
            // would make evaluation order silently load-bearing.
            for domain in &match_lower {
                if !owned_domains.insert(domain.clone()) {
                    return Err(LinkfixError::Validation(format!(
                        "rule {n}: domain '{domain}' is already claimed by an earlier rule"
                    )));
                }
            }

            if match_lower.contains(&rule.replace_with.to_lowercase()) {
                return Err(LinkfixError::Validation(format!(
                    "rule {n}: replace_with '{}' is also a match domain; \
                     the rule would flag its own output",
                    rule.replace_with
                )));
            }

            // An empty alternative set means "just the replacement domain".
            let alternative_domains = if rule.alternative_domains.is_empty() {
                vec![rule.replace_with.clone()]
            } else {
                rule.alternative_domains.clone()
            };

            for alt in &alternative_domains {
                if match_lower.contains(&alt.to_lowercase()) {
                    return Err(LinkfixError::Validation(format!(
                        "rule {n}: '{alt}' appears in both match_domains and alternative_domains"
                    )));
                }
            }

            let matcher = compile_alternation(&rule.match_domains)
                .map_err(|e| LinkfixError::Validation(format!("rule {n}: {e}")))?;
            let fixed_marker = compile_alternation(&alternative_domains)
                .map_err(|e| LinkfixError::Validation(format!("rule {n}: {e}")))?;

            let platform = match &rule.platform {
                Some(tag) => tag.to_lowercase(),
                None => derive_platform(&rule.match_domains[0]),
            };

            rules.push(RewriteRule {
                match_domains: rule.match_domains.clone(),
                alternative_domains,
                replace_with: rule.replace_with.clone(),
                platform,
                matcher,
                fixed_marker,
            });
        }

        Ok(Self { rules, url_token })
    }

    /// The compiled rules, in evaluation order.
    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Platform tags in rule order, deduplicated.
    pub fn platforms(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rules
            .iter()
            .filter(|r| seen.insert(r.platform.clone()))
            .map(|r| r.platform.clone())
            .collect()
    }

    /// (match domains, replacement) pairs for the status surface.
    pub fn active_redirects(&self) -> Vec<(Vec<String>, String)> {
        self.rules
            .iter()
            .map(|r| (r.match_domains.clone(), r.replace_with.clone()))
            .collect()
    }
}

/// Case-insensitive alternation of escaped domain literals, so a dot only
/// matches a dot.
fn compile_alternation(domains: &[String]) -> Result<Regex, regex::Error> {
    let pattern = format!(
        "(?i){}",
        domains
            .iter()
            .map(|d| regex::escape(d))
            .collect::<Vec<_>>()
            .join("|")
    );
    Regex::new(&pattern)
}

/// Fallback platform tag: the first label of the domain
/// ("twitter.com" becomes "twitter").
fn derive_platform(domain: &str) -> String {
    domain
        .split('.')
        .next()
        .unwrap_or(domain)
        .to_lowercase()
}
