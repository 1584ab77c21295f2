use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rillet::app::AppContext;
use rillet::cli::{
    commands, ArticleAction, Cli, Commands, DownloadAction, ExtractAction, SettingsAction,
    SubscriptionAction,
};
use rillet::config::Config;
use rillet::plugins::Operation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?.with_overrides(cli.address, cli.username, cli.password);
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Subscriptions { action } => match action {
            SubscriptionAction::List => commands::list_subscriptions(&ctx).await?,
            SubscriptionAction::Show { id } => commands::show_subscription(&ctx, id).await?,
            SubscriptionAction::Add {
                source,
                source_type,
                download_enclosures,
            } => {
                commands::add_subscription(&ctx, &source, source_type, download_enclosures).await?
            }
            SubscriptionAction::Remove { id } => commands::remove_subscription(&ctx, id).await?,
            SubscriptionAction::Update { id } => commands::update_subscriptions(&ctx, id).await?,
            SubscriptionAction::Cancel => commands::cancel_update(&ctx).await?,
            SubscriptionAction::Status => commands::update_status(&ctx).await?,
            SubscriptionAction::Watch { interval } => {
                commands::watch_update(&ctx, interval.as_deref()).await?
            }
        },
        Commands::Articles { action } => match action {
            ArticleAction::List {
                subscription,
                offset,
                limit,
                unread,
            } => commands::list_articles(&ctx, subscription, offset, limit, unread).await?,
            ArticleAction::Show { id } => commands::show_article(&ctx, id).await?,
            ArticleAction::Read { id } => commands::mark_article(&ctx, id, Some(true), None).await?,
            ArticleAction::Unread { id } => {
                commands::mark_article(&ctx, id, Some(false), None).await?
            }
            ArticleAction::Favourite { id } => {
                commands::mark_article(&ctx, id, None, Some(true)).await?
            }
            ArticleAction::Unfavourite { id } => {
                commands::mark_article(&ctx, id, None, Some(false)).await?
            }
            ArticleAction::Delete { id } => commands::delete_article(&ctx, id).await?,
        },
        Commands::Downloads { action } => match action {
            DownloadAction::List => commands::list_downloads(&ctx).await?,
            DownloadAction::Add { url, subscription } => {
                commands::add_download(&ctx, &url, subscription).await?
            }
            DownloadAction::Start { id } => commands::start_downloads(&ctx, id.as_deref()).await?,
            DownloadAction::Pause { id } => commands::pause_downloads(&ctx, id.as_deref()).await?,
            DownloadAction::Toggle { id } => commands::toggle_download(&ctx, &id).await?,
            DownloadAction::Cancel { id } => commands::cancel_download(&ctx, &id).await?,
            DownloadAction::Priority { id, priority } => {
                commands::set_priority(&ctx, &id, priority).await?
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::Get => commands::show_settings(&ctx).await?,
            SettingsAction::Set { pairs } => commands::set_settings(&ctx, pairs).await?,
        },
        Commands::Plugins => commands::list_plugins(&ctx).await?,
        Commands::Extract { action } => match action {
            ExtractAction::Feed { plugin, settings } => {
                commands::extract(&ctx, &plugin, Operation::Feed, settings).await?
            }
            ExtractAction::Article {
                plugin,
                url,
                settings,
            } => commands::extract(&ctx, &plugin, Operation::Article(url), settings).await?,
            ExtractAction::Enclosure {
                plugin,
                url,
                settings,
            } => commands::extract(&ctx, &plugin, Operation::Enclosure(url), settings).await?,
        },
    }

    Ok(())
}
