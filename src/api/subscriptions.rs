use serde_json::{json, Value};

use crate::api::{decode, decode_list, paged_query, ApiClient, SUBSCRIPTIONS_PATH};
use crate::app::Result;
use crate::domain::{SourceType, Subscription, UpdateStatus};

impl ApiClient {
    pub async fn get_subscriptions(&self, offset: usize, limit: usize) -> Result<Vec<Subscription>> {
        let path = paged_query(SUBSCRIPTIONS_PATH.to_string(), offset, limit);
        decode_list(self.transport.get(&path).await?)
    }

    pub async fn get_subscription(&self, id: i64) -> Result<Subscription> {
        let path = format!("{}/{}", SUBSCRIPTIONS_PATH, id);
        decode(self.transport.get(&path).await?, &path)
    }

    /// Returns the created subscription when the server echoes it back.
    pub async fn add_subscription(
        &self,
        source: &str,
        source_type: SourceType,
        download_enclosures: bool,
    ) -> Result<Option<Value>> {
        let body = json!({
            "source": source,
            "sourceType": source_type,
            "downloadEnclosures": download_enclosures,
        });
        self.transport.post(SUBSCRIPTIONS_PATH, &body).await
    }

    pub async fn set_subscription_properties(&self, id: i64, properties: &Value) -> Result<()> {
        let path = format!("{}/{}", SUBSCRIPTIONS_PATH, id);
        self.transport.put(&path, properties).await?;
        Ok(())
    }

    pub async fn delete_subscription(&self, id: i64) -> Result<()> {
        let path = format!("{}/{}", SUBSCRIPTIONS_PATH, id);
        self.transport.delete(&path).await?;
        Ok(())
    }

    pub async fn update_subscription(&self, id: i64) -> Result<()> {
        let path = format!("{}/update?id={}", SUBSCRIPTIONS_PATH, id);
        self.transport.get(&path).await?;
        Ok(())
    }

    pub async fn update_subscriptions(&self) -> Result<()> {
        let path = format!("{}/update", SUBSCRIPTIONS_PATH);
        self.transport.get(&path).await?;
        Ok(())
    }

    pub async fn cancel_subscription_update(&self) -> Result<()> {
        let path = format!("{}/cancel", SUBSCRIPTIONS_PATH);
        self.transport.get(&path).await?;
        Ok(())
    }

    pub async fn get_subscription_update_status(&self) -> Result<UpdateStatus> {
        let path = format!("{}/status", SUBSCRIPTIONS_PATH);
        decode(self.transport.get(&path).await?, &path)
    }
}
