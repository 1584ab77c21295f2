use tracing::debug;

use crate::api::ApiClient;
use crate::app::Result;
use crate::domain::{Priority, Transfer, TransferAction};

/// The transfer list as last fetched from the server.
pub struct DownloadsView {
    api: ApiClient,
    pub transfers: Vec<Transfer>,
}

impl DownloadsView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            transfers: Vec::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Transfer> {
        self.transfers.iter().find(|t| t.id == id)
    }

    pub async fn reload(&mut self) -> Result<()> {
        self.transfers = self.api.get_downloads(0, 0).await?;
        debug!("Loaded {} transfers", self.transfers.len());
        Ok(())
    }

    /// Queue `url` and refresh the list so the new transfer shows up.
    pub async fn add(&mut self, url: &str, subscription_id: Option<i64>) -> Result<()> {
        self.api.add_download(url, subscription_id).await?;
        self.reload().await
    }

    /// Pause a running transfer or start a stopped one. Returns the action
    /// taken, or `None` when the transfer is not in the list.
    pub async fn toggle(&mut self, id: &str) -> Result<Option<TransferAction>> {
        let Some(action) = self.get(id).map(Transfer::next_action) else {
            return Ok(None);
        };

        match action {
            TransferAction::Start => self.api.start_download(id).await?,
            TransferAction::Pause => self.api.pause_download(id).await?,
        }

        self.refresh(id).await?;
        Ok(Some(action))
    }

    pub async fn cancel(&mut self, id: &str) -> Result<()> {
        self.api.cancel_download(id).await?;
        self.transfers.retain(|t| t.id != id);
        Ok(())
    }

    pub async fn set_priority(&mut self, id: &str, priority: Priority) -> Result<()> {
        self.api.set_download_priority(id, priority).await?;

        if let Some(transfer) = self.transfers.iter_mut().find(|t| t.id == id) {
            transfer.priority = priority;
        }
        Ok(())
    }

    pub async fn start_all(&mut self) -> Result<()> {
        self.api.start_downloads().await?;
        self.reload().await
    }

    pub async fn pause_all(&mut self) -> Result<()> {
        self.api.pause_downloads().await?;
        self.reload().await
    }

    /// Replace one entry with the server's current copy.
    async fn refresh(&mut self, id: &str) -> Result<()> {
        let transfer = self.api.get_download(id).await?;

        if let Some(slot) = self.transfers.iter_mut().find(|t| t.id == id) {
            *slot = transfer;
        }
        Ok(())
    }
}
