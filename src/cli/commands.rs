use std::sync::atomic::Ordering;

use serde_json::Value;
use tracing::debug;

use crate::app::{AppContext, Result, RilletError};
use crate::domain::{Article, Priority, SourceType, Subscription, Transfer, UpdateStatus};
use crate::plugins::{Extraction, ExtractionPlugin, Operation, PluginEvent, PluginSettings};
use crate::session::{parse_interval, DownloadsView, ReaderSession, UpdateMonitor};

fn print_subscription(subscription: &Subscription) {
    println!(
        "[{}] {} ({} unread)\n  {}",
        subscription.id,
        subscription.display_title(),
        subscription.unread_articles,
        subscription.source_text()
    );
}

fn print_status(status: &UpdateStatus) {
    if status.status_text.is_empty() {
        println!("{:?} ({}%)", status.status, status.progress);
    } else {
        println!("{:?}: {} ({}%)", status.status, status.status_text, status.progress);
    }
}

fn print_transfer(transfer: &Transfer) {
    println!(
        "[{}] {:?} {:>3}% {:?} {}",
        transfer.id, transfer.status, transfer.progress, transfer.priority, transfer.file_name
    );
}

pub async fn list_subscriptions(ctx: &AppContext) -> Result<()> {
    let subscriptions = ctx.api.get_subscriptions(0, 0).await?;

    if subscriptions.is_empty() {
        println!("No subscriptions");
        return Ok(());
    }

    for subscription in &subscriptions {
        print_subscription(subscription);
    }
    Ok(())
}

pub async fn show_subscription(ctx: &AppContext, id: i64) -> Result<()> {
    let subscription = ctx.api.get_subscription(id).await?;
    print_subscription(&subscription);

    if !subscription.description.is_empty() {
        println!("  {}", subscription.description);
    }
    if let Some(updated) = subscription.last_updated_at() {
        println!("  Last updated: {}", updated.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

pub async fn add_subscription(
    ctx: &AppContext,
    source: &str,
    source_type: SourceType,
    download_enclosures: bool,
) -> Result<()> {
    let created = ctx
        .api
        .add_subscription(source, source_type, download_enclosures)
        .await?;

    match created.and_then(|v| serde_json::from_value::<Subscription>(v).ok()) {
        Some(subscription) => println!("Added subscription {}", subscription.id),
        None => println!("Added subscription: {}", source),
    }
    Ok(())
}

pub async fn remove_subscription(ctx: &AppContext, id: i64) -> Result<()> {
    ctx.api.delete_subscription(id).await?;
    println!("Removed subscription {}", id);
    Ok(())
}

pub async fn update_subscriptions(ctx: &AppContext, id: Option<i64>) -> Result<()> {
    match id {
        Some(id) => ctx.api.update_subscription(id).await?,
        None => ctx.api.update_subscriptions().await?,
    }
    println!("Update started");
    Ok(())
}

pub async fn cancel_update(ctx: &AppContext) -> Result<()> {
    ctx.api.cancel_subscription_update().await?;
    println!("Update cancelled");
    Ok(())
}

pub async fn update_status(ctx: &AppContext) -> Result<()> {
    let status = ctx.api.get_subscription_update_status().await?;
    print_status(&status);
    Ok(())
}

pub async fn watch_update(ctx: &AppContext, interval: Option<&str>) -> Result<()> {
    let monitor = match interval {
        Some(interval) => {
            let secs = parse_interval(interval).map_err(RilletError::Config)?;
            UpdateMonitor::with_interval(ctx.api.clone(), std::time::Duration::from_secs(secs.max(1)))
        }
        None => ctx.update_monitor(),
    };

    // Ctrl-C stops polling after the current tick.
    let running = monitor.running_flag();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            running.store(false, Ordering::SeqCst);
        }
    });

    let last = monitor.run(print_status).await;
    interrupt.abort();

    let last = last?;
    if !last.is_updating() {
        println!("Update no longer running");
    }
    Ok(())
}

pub async fn list_articles(
    ctx: &AppContext,
    subscription_id: i64,
    offset: usize,
    limit: usize,
    unread_only: bool,
) -> Result<()> {
    let articles = ctx.api.get_articles(subscription_id, offset, limit).await?;
    let articles: Vec<&Article> = articles
        .iter()
        .filter(|a| !unread_only || !a.read)
        .collect();

    if articles.is_empty() {
        println!("No articles");
        return Ok(());
    }

    for article in articles {
        let read_marker = if article.read { " " } else { "●" };
        let favourite = if article.favourite { "★" } else { " " };
        let date = article.date.as_deref().unwrap_or("").get(..10).unwrap_or("          ");
        println!(
            "{}{} [{}] {} {}",
            read_marker,
            favourite,
            article.id,
            date,
            article.display_title()
        );
    }
    Ok(())
}

pub async fn show_article(ctx: &AppContext, id: i64) -> Result<()> {
    let article = ctx.api.get_article(id).await?;

    println!("{}", article.display_title());
    if !article.author.is_empty() {
        println!("By {}", article.author);
    }
    if let Some(date) = &article.date {
        println!("{}", date);
    }
    if !article.url.is_empty() {
        println!("{}", article.url);
    }
    for enclosure in &article.enclosures {
        println!("Enclosure: {} ({})", enclosure.url, enclosure.mime_type);
    }
    println!();
    println!("{}", html_escape::decode_html_entities(&article.body));
    Ok(())
}

/// Marks go through a [`ReaderSession`] so the article is checked first.
pub async fn mark_article(ctx: &AppContext, id: i64, read: Option<bool>, favourite: Option<bool>) -> Result<()> {
    let article = ctx.api.get_article(id).await?;
    let mut session = ReaderSession::new(ctx.api.clone());
    session.articles = vec![article];

    if let Some(read) = read {
        session.mark_article_read(id, read).await?;
        println!("Article {} marked {}", id, if read { "read" } else { "unread" });
    }
    if let Some(favourite) = favourite {
        session.mark_article_favourite(id, favourite).await?;
        println!(
            "Article {} {}",
            id,
            if favourite { "marked as favourite" } else { "no longer favourite" }
        );
    }
    Ok(())
}

pub async fn delete_article(ctx: &AppContext, id: i64) -> Result<()> {
    ctx.api.delete_article(id).await?;
    println!("Deleted article {}", id);
    Ok(())
}

pub async fn list_downloads(ctx: &AppContext) -> Result<()> {
    let mut view = DownloadsView::new(ctx.api.clone());
    view.reload().await?;

    if view.transfers.is_empty() {
        println!("No downloads");
        return Ok(());
    }

    for transfer in &view.transfers {
        print_transfer(transfer);
    }
    Ok(())
}

pub async fn add_download(ctx: &AppContext, url: &str, subscription: Option<i64>) -> Result<()> {
    if let Some(plugin) = ctx.registry.for_enclosure(url) {
        debug!("{} is handled by plugin {}", url, plugin.descriptor().id);
    }

    ctx.api.add_download(url, subscription).await?;
    println!("Queued download: {}", url);
    Ok(())
}

pub async fn start_downloads(ctx: &AppContext, id: Option<&str>) -> Result<()> {
    match id {
        Some(id) => ctx.api.start_download(id).await?,
        None => ctx.api.start_downloads().await?,
    }
    println!("Started");
    Ok(())
}

pub async fn pause_downloads(ctx: &AppContext, id: Option<&str>) -> Result<()> {
    match id {
        Some(id) => ctx.api.pause_download(id).await?,
        None => ctx.api.pause_downloads().await?,
    }
    println!("Paused");
    Ok(())
}

pub async fn toggle_download(ctx: &AppContext, id: &str) -> Result<()> {
    let mut view = DownloadsView::new(ctx.api.clone());
    view.reload().await?;

    match view.toggle(id).await? {
        Some(action) => {
            println!("{:?}: {}", action, id);
            if let Some(transfer) = view.get(id) {
                print_transfer(transfer);
            }
        }
        None => println!("No such download: {}", id),
    }
    Ok(())
}

pub async fn cancel_download(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.api.cancel_download(id).await?;
    println!("Cancelled download {}", id);
    Ok(())
}

pub async fn set_priority(ctx: &AppContext, id: &str, priority: Priority) -> Result<()> {
    ctx.api.set_download_priority(id, priority).await?;
    println!("Priority of {} set to {:?}", id, priority);
    Ok(())
}

pub async fn show_settings(ctx: &AppContext) -> Result<()> {
    let settings = ctx.api.get_settings().await?;

    for (key, value) in &settings {
        match value {
            Value::String(s) => println!("{} = {}", key, s),
            other => println!("{} = {}", key, other),
        }
    }
    Ok(())
}

/// Settings are replaced wholesale, so merge into the current set first.
pub async fn set_settings(ctx: &AppContext, pairs: Vec<(String, Value)>) -> Result<()> {
    let mut settings = ctx.api.get_settings().await?;
    for (key, value) in pairs {
        settings.insert(key, value);
    }

    ctx.api.set_settings(&settings).await?;
    println!("Settings saved");
    Ok(())
}

pub async fn list_plugins(ctx: &AppContext) -> Result<()> {
    let plugins = ctx.api.get_plugins().await?;

    if plugins.is_empty() {
        println!("No plugins");
        return Ok(());
    }

    for plugin in plugins {
        println!("{} ({}): {}", plugin.display_name, plugin.id, plugin.capability_summary());
    }
    Ok(())
}

fn resolve_plugin<'a>(
    ctx: &'a AppContext,
    id: &str,
    operation: &Operation,
) -> Result<&'a std::sync::Arc<dyn ExtractionPlugin>> {
    let found = match (id, operation) {
        ("auto", Operation::Enclosure(url)) => ctx.registry.for_enclosure(url),
        ("auto", Operation::Article(url)) => ctx.registry.for_article(url),
        _ => ctx.registry.get(id),
    };
    found.ok_or_else(|| RilletError::PluginNotFound(id.to_string()))
}

/// Run one plugin request locally. Ctrl-C cancels it.
pub async fn extract(
    ctx: &AppContext,
    plugin_id: &str,
    operation: Operation,
    pairs: Vec<(String, Value)>,
) -> Result<()> {
    let plugin_id = resolve_plugin(ctx, plugin_id, &operation)?.descriptor().id;
    let (instance, mut events) = ctx.registry.instance(plugin_id, ctx.page_fetcher.clone())?;

    let mut settings = PluginSettings::new();
    for (key, value) in pairs {
        settings.set(&key, value);
    }
    let settings = settings.merged_over(&ctx.config.plugin_settings(plugin_id));

    debug!("Running {} {:?}", plugin_id, operation);
    instance.start(operation, settings);

    let event = tokio::select! {
        event = events.recv() => event,
        _ = tokio::signal::ctrl_c() => {
            instance.cancel();
            println!("Cancelled");
            return Ok(());
        }
    };

    match event {
        Some(PluginEvent::Finished(Extraction::Feed(feed))) => {
            match feed.parse() {
                Ok(preview) => {
                    if let Some(title) = preview.title {
                        eprintln!("Feed: {} ({} entries)", title, preview.entries.len());
                    }
                }
                Err(e) => eprintln!("Warning: {}", e),
            }
            println!("{}", feed.as_str());
        }
        Some(PluginEvent::Finished(Extraction::Article(article))) => {
            println!("{}\n{}\n\n{}", article.title, article.url, article.body);
        }
        Some(PluginEvent::Finished(Extraction::Enclosure(enclosure))) => {
            println!("File name: {}", enclosure.file_name);
            println!("{} {}", enclosure.request.method, enclosure.request.url);
            for (name, value) in &enclosure.request.headers {
                println!("  {}: {}", name, value);
            }
        }
        Some(PluginEvent::Error(e)) => return Err(e.into()),
        None => return Err(RilletError::Other("Plugin stopped without a result".to_string())),
    }

    Ok(())
}
