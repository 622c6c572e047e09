//! The rewrite engine: a pure decision function over a rule set and a
//! piece of text. No I/O, no side effects, safe to call from any task.

use crate::rules::RuleSet;
use regex::NoExpand;

/// Outcome of evaluating a text against a rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// No rule's match domains appear in the text (or the text carries no
    /// URL-shaped token at all).
    NoMatch,
    /// The first applicable rule found its alternative domains already
    /// present; the text must be left alone.
    AlreadyFixed,
    /// The first applicable rule rewrote the text.
    Fixed {
        /// The winning rule's platform tag, for counting.
        platform: String,
        /// Input text with every occurrence of the rule's match domains
        /// replaced.
        text: String,
    },
}

/// Evaluate `text` against `rules`.
///
/// Rules are tried in configuration order and only the first rule whose
/// match domains appear in the text fires; if that rule also finds its
/// alternative domains in the text, no rule fires at all. Matching is
/// case-insensitive and replacement covers every occurrence of every
/// match domain of the winning rule.
pub fn evaluate(rules: &RuleSet, text: &str) -> RewriteOutcome {
    // Plain-text mentions of a domain with no link intent never match.
    if !rules.url_token.is_match(text) {
        return RewriteOutcome::NoMatch;
    }

    for rule in &rules.rules {
        if !rule.matcher.is_match(text) {
            continue;
        }
        if rule.fixed_marker.is_match(text) {
            return RewriteOutcome::AlreadyFixed;
        }
        let rewritten = rule
            .matcher
            .replace_all(text, NoExpand(rule.replace_with.as_str()))
            .into_owned();
        return RewriteOutcome::Fixed {
            platform: rule.platform.clone(),
            text: rewritten,
        };
    }

    RewriteOutcome::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;

    fn twitter_rule() -> RuleConfig {
        RuleConfig {
            match_domains: vec!["twitter.com".to_string(), "x.com".to_string()],
            alternative_domains: vec!["vxtwitter.com".to_string()],
            replace_with: "vxtwitter.com".to_string(),
            platform: Some("twitter".to_string()),
        }
    }

    fn test_rules() -> RuleSet {
        RuleSet::load(&[twitter_rule()]).unwrap()
    }

    #[test]
    fn test_fixes_a_link() {
        let outcome = evaluate(
            &test_rules(),
            "check this out https://twitter.com/foo/status/123",
        );
        assert_eq!(
            outcome,
            RewriteOutcome::Fixed {
                platform: "twitter".to_string(),
                text: "check this out https://vxtwitter.com/foo/status/123".to_string(),
            }
        );
    }

    #[test]
    fn test_no_match_without_configured_domain() {
        let outcome = evaluate(&test_rules(), "look at https://example.com/page");
        assert_eq!(outcome, RewriteOutcome::NoMatch);
    }

    #[test]
    fn test_domain_mention_without_url_token_is_ignored() {
        // "twitter.com" appears, but nothing in the text looks like a link.
        let outcome = evaluate(&test_rules(), "twitter.com has been down all day");
        assert_eq!(outcome, RewriteOutcome::NoMatch);
    }

    #[test]
    fn test_www_counts_as_url_token() {
        let outcome = evaluate(&test_rules(), "see www.twitter.com/foo");
        assert!(matches!(outcome, RewriteOutcome::Fixed { .. }));
    }

    #[test]
    fn test_already_fixed_text_is_left_alone() {
        let outcome = evaluate(&test_rules(), "https://vxtwitter.com/foo/status/123");
        assert_eq!(outcome, RewriteOutcome::AlreadyFixed);
    }

    #[test]
    fn test_idempotence() {
        let rules = test_rules();
        let fixed = match evaluate(&rules, "https://x.com/foo") {
            RewriteOutcome::Fixed { text, .. } => text,
            other => panic!("expected Fixed, got {other:?}"),
        };
        // Re-running the engine on its own output never fixes again.
        let again = evaluate(&rules, &fixed);
        assert!(
            matches!(again, RewriteOutcome::AlreadyFixed | RewriteOutcome::NoMatch),
            "got {again:?}"
        );
    }

    #[test]
    fn test_case_insensitive_matching() {
        let outcome = evaluate(&test_rules(), "https://TWITTER.Com/foo");
        assert_eq!(
            outcome,
            RewriteOutcome::Fixed {
                platform: "twitter".to_string(),
                text: "https://vxtwitter.com/foo".to_string(),
            }
        );
    }

    #[test]
    fn test_replacement_is_global_across_domains() {
        let outcome = evaluate(
            &test_rules(),
            "https://twitter.com/a and https://x.com/b and https://twitter.com/c",
        );
        assert_eq!(
            outcome,
            RewriteOutcome::Fixed {
                platform: "twitter".to_string(),
                text: "https://vxtwitter.com/a and https://vxtwitter.com/b \
                       and https://vxtwitter.com/c"
                    .to_string(),
            }
        );
    }

    #[test]
    fn test_escaped_dot_does_not_wildcard() {
        // "twitterXcom" must not match an unescaped "twitter.com" pattern.
        let outcome = evaluate(&test_rules(), "https://twitterxcom.net/foo");
        assert_eq!(outcome, RewriteOutcome::NoMatch);
    }

    #[test]
    fn test_first_match_wins_over_later_rules() {
        // Both rules can match "https://x.com/..." text containing both
        // domains; the first configured rule owns the outcome.
        let rules = RuleSet::load(&[
            RuleConfig {
                match_domains: vec!["twitter.com".to_string()],
                alternative_domains: vec!["vxtwitter.com".to_string()],
                replace_with: "vxtwitter.com".to_string(),
                platform: Some("twitter".to_string()),
            },
            RuleConfig {
                match_domains: vec!["x.com".to_string()],
                alternative_domains: vec!["fixupx.com".to_string()],
                replace_with: "fixupx.com".to_string(),
                platform: Some("x".to_string()),
            },
        ])
        .unwrap();

        let outcome = evaluate(&rules, "https://twitter.com/a https://x.com/b");
        match outcome {
            RewriteOutcome::Fixed { platform, text } => {
                assert_eq!(platform, "twitter", "first rule in order wins");
                // Only the winning rule's domains are replaced.
                assert_eq!(text, "https://vxtwitter.com/a https://x.com/b");
            }
            other => panic!("expected Fixed, got {other:?}"),
        }
    }

    #[test]
    fn test_pure_and_deterministic() {
        let rules = test_rules();
        let text = "https://twitter.com/foo";
        assert_eq!(evaluate(&rules, text), evaluate(&rules, text));
    }
}
