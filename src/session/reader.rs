use tracing::debug;

use crate::api::ApiClient;
use crate::app::Result;
use crate::domain::{Article, Subscription};

pub const ARTICLE_PAGE_SIZE: usize = 20;

/// Subscription and article lists with the current selection in each.
///
/// Every mutating call goes to the server first; local state changes only
/// once the server accepted the change.
pub struct ReaderSession {
    api: ApiClient,
    pub subscriptions: Vec<Subscription>,
    pub articles: Vec<Article>,
    pub subscription_index: Option<usize>,
    pub article_index: Option<usize>,
    page_size: usize,
}

impl ReaderSession {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            subscriptions: Vec::new(),
            articles: Vec::new(),
            subscription_index: None,
            article_index: None,
            page_size: ARTICLE_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn selected_subscription(&self) -> Option<&Subscription> {
        self.subscription_index.and_then(|i| self.subscriptions.get(i))
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.article_index.and_then(|i| self.articles.get(i))
    }

    /// Refetch all subscriptions, keeping the selection if it still exists.
    pub async fn reload_subscriptions(&mut self) -> Result<()> {
        let subscriptions = self.api.get_subscriptions(0, 0).await?;
        let selected_id = self.selected_subscription().map(|s| s.id);

        self.subscriptions = subscriptions;
        self.subscription_index =
            selected_id.and_then(|id| self.subscriptions.iter().position(|s| s.id == id));

        if self.subscription_index.is_none() {
            self.articles.clear();
            self.article_index = None;
        }

        debug!("Loaded {} subscriptions", self.subscriptions.len());
        Ok(())
    }

    /// Select a subscription and load its first page of articles.
    pub async fn select_subscription(&mut self, index: usize) -> Result<()> {
        let Some(subscription) = self.subscriptions.get(index) else {
            return Ok(());
        };

        let articles = self.api.get_articles(subscription.id, 0, self.page_size).await?;

        self.subscription_index = Some(index);
        self.articles = articles;
        self.article_index = None;
        Ok(())
    }

    /// Append the next page of articles. Returns how many were added.
    pub async fn load_more_articles(&mut self) -> Result<usize> {
        let Some(subscription) = self.selected_subscription() else {
            return Ok(0);
        };

        let page = self
            .api
            .get_articles(subscription.id, self.articles.len(), self.page_size)
            .await?;
        let count = page.len();
        self.articles.extend(page);
        Ok(count)
    }

    pub fn select_article(&mut self, index: usize) -> Option<&Article> {
        if index < self.articles.len() {
            self.article_index = Some(index);
        }
        self.selected_article()
    }

    pub async fn mark_article_read(&mut self, article_id: i64, read: bool) -> Result<()> {
        self.api.mark_article_read(article_id, read).await?;

        let Some(article) = self.articles.iter_mut().find(|a| a.id == article_id) else {
            return Ok(());
        };
        if article.read == read {
            return Ok(());
        }

        article.read = read;
        let subscription_id = article.subscription_id;
        self.adjust_unread(subscription_id, if read { -1 } else { 1 });
        Ok(())
    }

    pub async fn mark_article_favourite(&mut self, article_id: i64, favourite: bool) -> Result<()> {
        self.api.mark_article_favourite(article_id, favourite).await?;

        if let Some(article) = self.articles.iter_mut().find(|a| a.id == article_id) {
            article.favourite = favourite;
        }
        Ok(())
    }

    pub async fn delete_article(&mut self, article_id: i64) -> Result<()> {
        self.api.delete_article(article_id).await?;

        let Some(position) = self.articles.iter().position(|a| a.id == article_id) else {
            return Ok(());
        };
        let removed = self.articles.remove(position);
        if !removed.read {
            self.adjust_unread(removed.subscription_id, -1);
        }

        self.article_index = match self.article_index {
            Some(i) if i == position => None,
            Some(i) if i > position => Some(i - 1),
            other => other,
        };
        Ok(())
    }

    /// Select the first unread article after the current one.
    pub fn next_unread_article(&mut self) -> Option<&Article> {
        let start = self.article_index.map_or(0, |i| i + 1);
        let index = self
            .articles
            .iter()
            .skip(start)
            .position(|a| !a.read)
            .map(|offset| start + offset)?;

        self.article_index = Some(index);
        self.articles.get(index)
    }

    fn adjust_unread(&mut self, subscription_id: i64, delta: i64) {
        if let Some(subscription) = self
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription_id)
        {
            subscription.unread_articles = (subscription.unread_articles + delta).max(0);
        }
    }
}
