use serde_json::{json, Value};

use crate::api::{decode, decode_list, paged_query, ApiClient, TRANSFERS_PATH};
use crate::app::Result;
use crate::domain::{Priority, Transfer};

impl ApiClient {
    pub async fn add_download(&self, url: &str, subscription_id: Option<i64>) -> Result<()> {
        let body = json!({
            "url": url,
            "subscriptionId": subscription_id.unwrap_or(-1),
        });
        self.transport.post(TRANSFERS_PATH, &body).await?;
        Ok(())
    }

    pub async fn get_downloads(&self, offset: usize, limit: usize) -> Result<Vec<Transfer>> {
        let path = paged_query(TRANSFERS_PATH.to_string(), offset, limit);
        decode_list(self.transport.get(&path).await?)
    }

    pub async fn get_download(&self, id: &str) -> Result<Transfer> {
        let path = format!("{}/{}", TRANSFERS_PATH, id);
        decode(self.transport.get(&path).await?, &path)
    }

    pub async fn start_download(&self, id: &str) -> Result<()> {
        self.transfer_command("start", Some(id)).await
    }

    pub async fn start_downloads(&self) -> Result<()> {
        self.transfer_command("start", None).await
    }

    pub async fn pause_download(&self, id: &str) -> Result<()> {
        self.transfer_command("pause", Some(id)).await
    }

    pub async fn pause_downloads(&self) -> Result<()> {
        self.transfer_command("pause", None).await
    }

    pub async fn cancel_download(&self, id: &str) -> Result<()> {
        self.transfer_command("cancel", Some(id)).await
    }

    pub async fn set_download_properties(&self, id: &str, properties: &Value) -> Result<()> {
        let path = format!("{}/{}", TRANSFERS_PATH, id);
        self.transport.put(&path, properties).await?;
        Ok(())
    }

    pub async fn set_download_priority(&self, id: &str, priority: Priority) -> Result<()> {
        self.set_download_properties(id, &json!({ "priority": priority }))
            .await
    }

    async fn transfer_command(&self, command: &str, id: Option<&str>) -> Result<()> {
        let path = match id {
            Some(id) => format!("{}/{}?id={}", TRANSFERS_PATH, command, id),
            None => format!("{}/{}", TRANSFERS_PATH, command),
        };
        self.transport.get(&path).await?;
        Ok(())
    }
}
