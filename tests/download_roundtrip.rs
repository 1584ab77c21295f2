//! Round trips through the API client against an in-memory backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use rillet::api::ApiClient;
use rillet::app::{Result, RilletError};
use rillet::domain::{TransferAction, TransferStatus};
use rillet::session::DownloadsView;
use rillet::transport::{Transport, Verb};

/// Keeps transfers in memory and answers the `/transfers` resource.
#[derive(Default)]
struct FakeServer {
    transfers: Mutex<Vec<Value>>,
}

impl FakeServer {
    fn set_status(&self, id: &str, status: i64) {
        for transfer in self.transfers.lock().unwrap().iter_mut() {
            if transfer["id"] == id {
                transfer["status"] = json!(status);
            }
        }
    }
}

#[async_trait]
impl Transport for FakeServer {
    async fn request(&self, verb: Verb, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        let (resource, query) = path.split_once('?').unwrap_or((path, ""));
        let id = query.strip_prefix("id=");

        match (verb, resource) {
            (Verb::Post, "/transfers") => {
                let body = body.cloned().unwrap_or_default();
                let mut transfers = self.transfers.lock().unwrap();
                let id = format!("t{}", transfers.len() + 1);
                transfers.push(json!({
                    "id": id,
                    "url": body["url"],
                    "fileName": body["url"].as_str().unwrap_or("").rsplit('/').next(),
                    "priority": 1,
                    "status": 4,
                }));
                Ok(None)
            }
            (Verb::Get, "/transfers") => Ok(Some(Value::Array(self.transfers.lock().unwrap().clone()))),
            (Verb::Get, "/transfers/start") => {
                self.set_status(id.unwrap_or_default(), 4);
                Ok(None)
            }
            (Verb::Get, "/transfers/pause") => {
                self.set_status(id.unwrap_or_default(), 0);
                Ok(None)
            }
            (Verb::Get, single) => {
                let id = single.trim_start_matches("/transfers/");
                self.transfers
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|t| t["id"] == id)
                    .cloned()
                    .map(|t| Ok(Some(t)))
                    .unwrap_or_else(|| Err(RilletError::Status {
                        status: 404,
                        body: Some(json!({"error": "Transfer not found"})),
                    }))
            }
            _ => Err(RilletError::Status { status: 405, body: None }),
        }
    }
}

#[tokio::test]
async fn test_added_download_is_listed() {
    let server = Arc::new(FakeServer::default());
    let api = ApiClient::new(server.clone());

    api.add_download("https://example.com/podcast/episode-1.mp3", Some(5))
        .await
        .unwrap();
    let transfers = api.get_downloads(0, 0).await.unwrap();

    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].url, "https://example.com/podcast/episode-1.mp3");
    assert_eq!(transfers[0].file_name, "episode-1.mp3");
    assert_eq!(transfers[0].status, TransferStatus::Queued);
}

#[tokio::test]
async fn test_downloads_view_toggle_round_trip() {
    let server = Arc::new(FakeServer::default());
    let mut view = DownloadsView::new(ApiClient::new(server.clone()));

    view.add("https://example.com/a.mp4", None).await.unwrap();
    assert_eq!(view.transfers.len(), 1);

    let id = view.transfers[0].id.clone();
    assert_eq!(view.toggle(&id).await.unwrap(), Some(TransferAction::Pause));
    assert_eq!(view.get(&id).unwrap().status, TransferStatus::Paused);

    assert_eq!(view.toggle(&id).await.unwrap(), Some(TransferAction::Start));
    assert_eq!(view.get(&id).unwrap().status, TransferStatus::Queued);
}
