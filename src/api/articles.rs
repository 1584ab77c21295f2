use serde_json::json;

use crate::api::{decode, decode_list, paged_query, ApiClient, ARTICLES_PATH};
use crate::app::Result;
use crate::domain::Article;

impl ApiClient {
    /// Articles of one subscription, newest first.
    pub async fn get_articles(&self, subscription_id: i64, offset: usize, limit: usize) -> Result<Vec<Article>> {
        let path = paged_query(
            format!(
                "{}?sort=date&sortDescending=true&subscriptionId={}",
                ARTICLES_PATH, subscription_id
            ),
            offset,
            limit,
        );
        decode_list(self.transport.get(&path).await?)
    }

    pub async fn get_article(&self, id: i64) -> Result<Article> {
        let path = format!("{}/{}", ARTICLES_PATH, id);
        decode(self.transport.get(&path).await?, &path)
    }

    pub async fn mark_article_read(&self, id: i64, read: bool) -> Result<()> {
        let path = format!("{}/{}", ARTICLES_PATH, id);
        self.transport.put(&path, &json!({ "read": read })).await?;
        Ok(())
    }

    pub async fn mark_article_favourite(&self, id: i64, favourite: bool) -> Result<()> {
        let path = format!("{}/{}", ARTICLES_PATH, id);
        self.transport
            .put(&path, &json!({ "favourite": favourite }))
            .await?;
        Ok(())
    }

    pub async fn delete_article(&self, id: i64) -> Result<()> {
        let path = format!("{}/{}", ARTICLES_PATH, id);
        self.transport.delete(&path).await?;
        Ok(())
    }
}
