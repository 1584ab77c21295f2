pub mod commands;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::domain::{Priority, SourceType};
use crate::plugins::PluginSettings;

#[derive(Parser)]
#[command(name = "rillet")]
#[command(about = "Command-line client for a feed and download manager", long_about = None)]
pub struct Cli {
    /// Server address (overrides the config file)
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// Username for HTTP Basic auth
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Password for HTTP Basic auth
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage subscriptions
    Subscriptions {
        #[command(subcommand)]
        action: SubscriptionAction,
    },
    /// Read and organise articles
    Articles {
        #[command(subcommand)]
        action: ArticleAction,
    },
    /// Manage downloads
    Downloads {
        #[command(subcommand)]
        action: DownloadAction,
    },
    /// Show or change server settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// List the plugins available on the server
    Plugins,
    /// Run a built-in extraction plugin locally
    Extract {
        #[command(subcommand)]
        action: ExtractAction,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionAction {
    /// List all subscriptions
    List,
    /// Show one subscription
    Show { id: i64 },
    /// Add a subscription
    Add {
        /// Feed URL, file path, command or plugin id
        source: String,

        /// Source type: url, file, command or plugin
        #[arg(short = 't', long, default_value = "url")]
        source_type: SourceType,

        /// Download enclosures automatically
        #[arg(short, long)]
        download_enclosures: bool,
    },
    /// Remove a subscription
    Remove { id: i64 },
    /// Update one subscription, or all of them
    Update { id: Option<i64> },
    /// Cancel the running update
    Cancel,
    /// Show the update status
    Status,
    /// Follow the running update until it finishes
    Watch {
        /// Poll interval (e.g., "3s", "1m")
        #[arg(short, long)]
        interval: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ArticleAction {
    /// List articles of a subscription, newest first
    List {
        subscription: i64,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Page size; 0 fetches everything
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Only show unread articles
        #[arg(long)]
        unread: bool,
    },
    /// Show one article
    Show { id: i64 },
    /// Mark an article read
    Read { id: i64 },
    /// Mark an article unread
    Unread { id: i64 },
    /// Mark an article as favourite
    Favourite { id: i64 },
    /// Remove the favourite mark
    Unfavourite { id: i64 },
    /// Delete an article
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum DownloadAction {
    /// List transfers
    List,
    /// Queue a download
    Add {
        url: String,

        /// Subscription the download belongs to
        #[arg(short, long)]
        subscription: Option<i64>,
    },
    /// Start one transfer, or all of them
    Start { id: Option<String> },
    /// Pause one transfer, or all of them
    Pause { id: Option<String> },
    /// Start a stopped transfer or pause a running one
    Toggle { id: String },
    /// Cancel a transfer
    Cancel { id: String },
    /// Set transfer priority (high, normal, low)
    Priority { id: String, priority: Priority },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print all settings
    Get,
    /// Change settings given as key=value
    Set {
        #[arg(required = true, value_parser = PluginSettings::parse_pair)]
        pairs: Vec<(String, Value)>,
    },
}

#[derive(Subcommand)]
pub enum ExtractAction {
    /// Produce a feed document
    Feed {
        plugin: String,

        /// Plugin setting as key=value
        #[arg(short = 's', long = "setting", value_parser = PluginSettings::parse_pair)]
        settings: Vec<(String, Value)>,
    },
    /// Extract an article ("auto" picks the plugin by URL)
    Article {
        plugin: String,
        url: String,

        #[arg(short = 's', long = "setting", value_parser = PluginSettings::parse_pair)]
        settings: Vec<(String, Value)>,
    },
    /// Resolve a downloadable enclosure ("auto" picks the plugin by URL)
    Enclosure {
        plugin: String,
        url: String,

        #[arg(short = 's', long = "setting", value_parser = PluginSettings::parse_pair)]
        settings: Vec<(String, Value)>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract_with_settings() {
        let cli = Cli::try_parse_from([
            "rillet", "extract", "feed", "dailymotion", "-s", "query=cats", "-s", "type=search",
        ])
        .unwrap();

        match cli.command {
            Commands::Extract {
                action: ExtractAction::Feed { plugin, settings },
            } => {
                assert_eq!(plugin, "dailymotion");
                assert_eq!(settings[0], ("query".to_string(), Value::from("cats")));
                assert_eq!(settings.len(), 2);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_parse_global_credentials() {
        let cli = Cli::try_parse_from([
            "rillet", "downloads", "priority", "abc", "high", "--username", "me", "--password", "pw",
        ])
        .unwrap();

        assert_eq!(cli.username.as_deref(), Some("me"));
        assert!(matches!(
            cli.command,
            Commands::Downloads {
                action: DownloadAction::Priority { priority: Priority::High, .. }
            }
        ));
    }

    #[test]
    fn test_rejects_bad_priority() {
        assert!(Cli::try_parse_from(["rillet", "downloads", "priority", "abc", "urgent"]).is_err());
    }

    #[test]
    fn test_subscription_add_source_type() {
        let cli = Cli::try_parse_from(["rillet", "subscriptions", "add", "wordpress", "-t", "plugin"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Subscriptions {
                action: SubscriptionAction::Add { source_type: SourceType::Plugin, .. }
            }
        ));
    }
}
