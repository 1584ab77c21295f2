use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::plugins::{
    Capability, Extraction, ExtractionError, ExtractionPlugin, PageFetcher, PluginDescriptor,
    PluginSettings,
};

/// One plugin operation with its target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Feed,
    Article(String),
    Enclosure(String),
}

impl Operation {
    pub fn capability(&self) -> Capability {
        match self {
            Operation::Feed => Capability::Feeds,
            Operation::Article(_) => Capability::Articles,
            Operation::Enclosure(_) => Capability::Enclosures,
        }
    }
}

/// Outcome signal of a request. At most one is sent per request.
#[derive(Debug)]
pub enum PluginEvent {
    Finished(Extraction),
    Error(ExtractionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Requesting,
    Completed,
    Failed,
    Cancelled,
}

struct Slot {
    /// Bumped whenever the tracked request is cancelled or replaced, so a
    /// stale task can tell it must stay silent.
    generation: u64,
    status: RequestStatus,
    task: Option<JoinHandle<()>>,
}

/// A plugin bound to a fetcher, tracking at most one in-flight request.
///
/// Starting a request while another is outstanding aborts the previous one;
/// it emits nothing. Requests are spawned on the current tokio runtime.
pub struct PluginInstance {
    plugin: Arc<dyn ExtractionPlugin>,
    fetcher: Arc<dyn PageFetcher>,
    events: mpsc::UnboundedSender<PluginEvent>,
    slot: Arc<Mutex<Slot>>,
}

impl PluginInstance {
    pub fn new(
        plugin: Arc<dyn ExtractionPlugin>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> (Self, mpsc::UnboundedReceiver<PluginEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let instance = Self {
            plugin,
            fetcher,
            events: tx,
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                status: RequestStatus::Idle,
                task: None,
            })),
        };
        (instance, rx)
    }

    pub fn descriptor(&self) -> &PluginDescriptor {
        self.plugin.descriptor()
    }

    pub fn status(&self) -> RequestStatus {
        lock(&self.slot).status
    }

    pub fn get_feed(&self, settings: PluginSettings) -> bool {
        self.start(Operation::Feed, settings)
    }

    pub fn get_article(&self, url: &str, settings: PluginSettings) -> bool {
        self.start(Operation::Article(url.to_string()), settings)
    }

    pub fn get_enclosure(&self, url: &str, settings: PluginSettings) -> bool {
        self.start(Operation::Enclosure(url.to_string()), settings)
    }

    /// Start `operation`, replacing any request still in flight.
    ///
    /// Returns `false` when the plugin does not declare the capability; an
    /// error event is sent immediately in that case.
    pub fn start(&self, operation: Operation, settings: PluginSettings) -> bool {
        let descriptor = self.plugin.descriptor();
        let capability = operation.capability();
        let mut slot = lock(&self.slot);

        if let Some(previous) = slot.task.take() {
            debug!("{}: replacing in-flight request", descriptor.id);
            previous.abort();
        }
        slot.generation += 1;

        if !descriptor.supports(capability) {
            slot.status = RequestStatus::Failed;
            self.emit(PluginEvent::Error(self.plugin.unsupported(capability)));
            return false;
        }

        let settings = settings.with_schema_defaults(descriptor.settings_for(capability));
        let generation = slot.generation;
        let plugin = self.plugin.clone();
        let fetcher = self.fetcher.clone();
        let events = self.events.clone();
        let shared = self.slot.clone();

        debug!("{}: starting {:?}", descriptor.id, operation);
        slot.status = RequestStatus::Requesting;
        slot.task = Some(tokio::spawn(async move {
            let outcome = run(plugin.as_ref(), fetcher.as_ref(), &operation, &settings).await;

            let mut slot = lock(&shared);
            if slot.generation != generation {
                return;
            }
            slot.task = None;

            let event = match outcome {
                Ok(result) => {
                    info!("{}: {:?} finished", plugin.descriptor().id, operation);
                    slot.status = RequestStatus::Completed;
                    PluginEvent::Finished(result)
                }
                Err(e) => {
                    warn!("{}: {:?} failed: {}", plugin.descriptor().id, operation, e);
                    slot.status = RequestStatus::Failed;
                    PluginEvent::Error(e)
                }
            };

            if events.send(event).is_err() {
                warn!("{}: event receiver dropped", plugin.descriptor().id);
            }
        }));

        true
    }

    /// Abort the in-flight request. No event is sent for it afterwards.
    ///
    /// Returns `false` when nothing was in flight.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);

        match slot.task.take() {
            Some(task) => {
                task.abort();
                slot.generation += 1;
                slot.status = RequestStatus::Cancelled;
                debug!("{}: request cancelled", self.plugin.descriptor().id);
                true
            }
            None => false,
        }
    }

    fn emit(&self, event: PluginEvent) {
        if self.events.send(event).is_err() {
            warn!("{}: event receiver dropped", self.plugin.descriptor().id);
        }
    }
}

impl Drop for PluginInstance {
    fn drop(&mut self) {
        let mut slot = lock(&self.slot);
        if let Some(task) = slot.task.take() {
            task.abort();
            slot.generation += 1;
            slot.status = RequestStatus::Cancelled;
        }
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run(
    plugin: &dyn ExtractionPlugin,
    fetcher: &dyn PageFetcher,
    operation: &Operation,
    settings: &PluginSettings,
) -> Result<Extraction, ExtractionError> {
    match operation {
        Operation::Feed => plugin
            .fetch_feed(fetcher, settings)
            .await
            .map(Extraction::Feed),
        Operation::Article(url) => plugin
            .fetch_article(fetcher, url, settings)
            .await
            .map(Extraction::Article),
        Operation::Enclosure(url) => plugin
            .fetch_enclosure(fetcher, url, settings)
            .await
            .map(Extraction::Enclosure),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::plugins::{
        EnclosureResult, FeedDocument, MediaRequest, PageRequest, PluginDescriptor,
    };

    /// Serves a fixed body, optionally holding every request until released.
    struct GatedFetcher {
        body: String,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl GatedFetcher {
        fn open(body: &str) -> Self {
            Self {
                body: body.to_string(),
                gate: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn gated(body: &str, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::open(body)
            }
        }
    }

    #[async_trait]
    impl PageFetcher for GatedFetcher {
        async fn fetch_text(&self, _request: &PageRequest) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(self.body.clone())
        }
    }

    /// Echoes the page body as the enclosure file name; feeds need `query`.
    struct EchoPlugin {
        descriptor: PluginDescriptor,
    }

    impl EchoPlugin {
        fn new() -> Self {
            let mut descriptor = PluginDescriptor::new("echo", "Echo");
            descriptor.capabilities.feeds = true;
            descriptor.capabilities.enclosures = true;
            Self { descriptor }
        }
    }

    #[async_trait]
    impl ExtractionPlugin for EchoPlugin {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.descriptor
        }

        async fn fetch_feed(
            &self,
            fetcher: &dyn PageFetcher,
            settings: &PluginSettings,
        ) -> Result<FeedDocument, ExtractionError> {
            let query = settings
                .text("query")
                .ok_or(ExtractionError::MissingSetting("query"))?;
            let body = fetcher.fetch_text(&PageRequest::get(query)).await?;
            Ok(FeedDocument(body))
        }

        async fn fetch_enclosure(
            &self,
            fetcher: &dyn PageFetcher,
            url: &str,
            _settings: &PluginSettings,
        ) -> Result<EnclosureResult, ExtractionError> {
            let body = fetcher.fetch_text(&PageRequest::get(url)).await?;
            Ok(EnclosureResult::new(body, MediaRequest::get(url)))
        }
    }

    fn instance(fetcher: Arc<GatedFetcher>) -> (PluginInstance, mpsc::UnboundedReceiver<PluginEvent>) {
        PluginInstance::new(Arc::new(EchoPlugin::new()), fetcher)
    }

    #[tokio::test]
    async fn test_request_completes_with_one_event() {
        let fetcher = Arc::new(GatedFetcher::open("clip.mp4"));
        let (plugin, mut events) = instance(fetcher.clone());

        assert_eq!(plugin.status(), RequestStatus::Idle);
        assert!(plugin.get_enclosure("https://example.com/v/1", PluginSettings::new()));

        match events.recv().await {
            Some(PluginEvent::Finished(Extraction::Enclosure(result))) => {
                assert_eq!(result.file_name, "clip.mp4");
                assert_eq!(result.request.url, "https://example.com/v/1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(plugin.status(), RequestStatus::Completed);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_missing_query_fails_without_network() {
        let fetcher = Arc::new(GatedFetcher::open("<rss/>"));
        let (plugin, mut events) = instance(fetcher.clone());

        plugin.get_feed(PluginSettings::new());

        match events.recv().await {
            Some(PluginEvent::Error(ExtractionError::MissingSetting("query"))) => {}
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(plugin.status(), RequestStatus::Failed);
    }

    #[tokio::test]
    async fn test_cancel_suppresses_all_signals() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(GatedFetcher::gated("late.mp4", gate.clone()));
        let (plugin, mut events) = instance(fetcher.clone());

        plugin.get_enclosure("https://example.com/v/1", PluginSettings::new());
        tokio::task::yield_now().await;

        assert!(plugin.cancel());
        assert_eq!(plugin.status(), RequestStatus::Cancelled);
        gate.notify_waiters();
        tokio::task::yield_now().await;

        assert!(!plugin.cancel());
        drop(plugin);
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_dropped_instance_silences_its_request() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(GatedFetcher::gated("late.mp4", gate.clone()));
        let (plugin, mut events) = instance(fetcher.clone());

        plugin.get_enclosure("https://example.com/v/1", PluginSettings::new());
        while fetcher.calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }

        let slot = plugin.slot.clone();
        let generation = lock(&slot).generation;
        drop(plugin);

        assert_eq!(lock(&slot).generation, generation + 1);
        assert!(lock(&slot).task.is_none());
        gate.notify_waiters();
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_new_request_replaces_outstanding_one() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(GatedFetcher::gated("page", gate.clone()));
        let (plugin, mut events) = instance(fetcher.clone());

        plugin.get_enclosure("https://example.com/v/first", PluginSettings::new());
        while fetcher.calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }
        plugin.get_enclosure("https://example.com/v/second", PluginSettings::new());

        // Wait until the second request is parked on the gate, then release.
        while fetcher.calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        gate.notify_waiters();

        match events.recv().await {
            Some(PluginEvent::Finished(Extraction::Enclosure(result))) => {
                assert_eq!(result.request.url, "https://example.com/v/second");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        drop(plugin);
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_capability_rejected_immediately() {
        let fetcher = Arc::new(GatedFetcher::open(""));
        let (plugin, mut events) = instance(fetcher.clone());

        assert!(!plugin.get_article("https://example.com/a", PluginSettings::new()));

        match events.try_recv() {
            Ok(PluginEvent::Error(ExtractionError::Unsupported { capability, .. })) => {
                assert_eq!(capability, Capability::Articles);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }
}
