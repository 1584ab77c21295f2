pub mod article;
pub mod plugin;
pub mod status;
pub mod subscription;
pub mod transfer;

pub use article::{Article, Enclosure};
pub use plugin::PluginInfo;
pub use status::{UpdateState, UpdateStatus};
pub use subscription::{SourceType, Subscription};
pub use transfer::{Priority, Transfer, TransferAction, TransferStatus};

/// Server settings: a flat map replaced wholesale on write.
pub type Settings = serde_json::Map<String, serde_json::Value>;
