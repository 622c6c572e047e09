mod commands;
mod gateway;

use clap::{Parser, Subcommand};
use linkfix_channels::telegram::TelegramChannel;
use linkfix_core::{config, rewrite, rules::RuleSet, traits::Channel};
use linkfix_store::Store;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "linkfix",
    version,
    about = "linkfix -- rewrites social media links to embed-friendly domains"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Check configuration, channel, and store health.
    Status,
    /// Run the rewrite engine on a piece of text and print the result.
    Fix {
        /// Text containing the link to fix.
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Start => {
            let cfg = config::load(&cli.config)?;

            // A misconfigured rule set must never reach message time.
            let rules = Arc::new(RuleSet::load(&cfg.rules)?);

            // Build channels.
            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();

            if let Some(ref tg) = cfg.channel.telegram {
                if tg.enabled {
                    if tg.bot_token.is_empty() {
                        anyhow::bail!(
                            "Telegram is enabled but bot_token is empty. Set it in config.toml."
                        );
                    }
                    let channel = TelegramChannel::new(tg.clone());
                    channels.insert("telegram".to_string(), Arc::new(channel));
                }
            }

            if channels.is_empty() {
                anyhow::bail!("No channels enabled. Enable at least one channel in config.toml.");
            }

            // Build the store and seed a zero row per known platform.
            let store = Store::new(&cfg.store).await?;
            store.seed_platforms(&rules.platforms()).await?;

            println!("linkfix -- starting...");
            let gw = Arc::new(gateway::Gateway::new(
                channels,
                store,
                rules,
                cfg.reply.clone(),
                cfg.updater.clone(),
            ));
            gw.run().await?;
        }
        Commands::Status => {
            let cfg = config::load(&cli.config)?;
            println!("linkfix -- status\n");
            println!("Config: {}", cli.config);

            match RuleSet::load(&cfg.rules) {
                Ok(rules) => {
                    println!("Rules: {} loaded", rules.rules().len());
                    for (domains, target) in rules.active_redirects() {
                        println!("  {} -> {target}", domains.join(", "));
                    }
                }
                Err(e) => println!("Rules: INVALID ({e})"),
            }
            println!();

            match &cfg.channel.telegram {
                Some(tg) if tg.enabled && !tg.bot_token.is_empty() => {
                    println!("  telegram: configured")
                }
                Some(tg) if tg.enabled => println!("  telegram: enabled but missing bot_token"),
                Some(_) => println!("  telegram: disabled"),
                None => println!("  telegram: not configured"),
            }

            match Store::new(&cfg.store).await {
                Ok(store) => {
                    println!("  store: ok ({})", config::shellexpand(&cfg.store.db_path));
                    for (platform, count) in store.all_fix_counts().await? {
                        println!("    {platform}: {count} links fixed");
                    }
                }
                Err(e) => println!("  store: unavailable ({e})"),
            }
        }
        Commands::Fix { text } => {
            if text.is_empty() {
                anyhow::bail!("no text provided. Usage: linkfix fix <text containing a link>");
            }

            let cfg = config::load(&cli.config)?;
            let rules = RuleSet::load(&cfg.rules)?;

            match rewrite::evaluate(&rules, &text.join(" ")) {
                rewrite::RewriteOutcome::Fixed { text, .. } => println!("{text}"),
                rewrite::RewriteOutcome::AlreadyFixed => {
                    println!("That link is already using an embed-friendly domain.")
                }
                rewrite::RewriteOutcome::NoMatch => println!("No supported link found."),
            }
        }
    }

    Ok(())
}
