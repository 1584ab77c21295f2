use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Priority {
    High,
    Normal,
    Low,
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        match value {
            0 => Priority::High,
            2 => Priority::Low,
            _ => Priority::Normal,
        }
    }
}

impl From<Priority> for i64 {
    fn from(value: Priority) -> Self {
        match value {
            Priority::High => 0,
            Priority::Normal => 1,
            Priority::Low => 2,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            other => Err(format!("Unknown priority: {}. Use high, normal or low", other)),
        }
    }
}

/// Transfer status as reported by the server.
///
/// The numeric order matters: everything above `Completed` is a running
/// transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TransferStatus {
    Paused,
    Canceled,
    Failed,
    Completed,
    Queued,
    Connecting,
    Downloading,
    Uploading,
    Unknown,
}

impl From<i64> for TransferStatus {
    fn from(value: i64) -> Self {
        match value {
            0 => TransferStatus::Paused,
            1 => TransferStatus::Canceled,
            2 => TransferStatus::Failed,
            3 => TransferStatus::Completed,
            4 => TransferStatus::Queued,
            5 => TransferStatus::Connecting,
            6 => TransferStatus::Downloading,
            7 => TransferStatus::Uploading,
            _ => TransferStatus::Unknown,
        }
    }
}

impl From<TransferStatus> for i64 {
    fn from(value: TransferStatus) -> Self {
        match value {
            TransferStatus::Paused => 0,
            TransferStatus::Canceled => 1,
            TransferStatus::Failed => 2,
            TransferStatus::Completed => 3,
            TransferStatus::Queued => 4,
            TransferStatus::Connecting => 5,
            TransferStatus::Downloading => 6,
            TransferStatus::Uploading => 7,
            TransferStatus::Unknown => 8,
        }
    }
}

impl TransferStatus {
    /// Anything past `Completed` counts as active, including unrecognised codes.
    pub fn is_running(self) -> bool {
        self > TransferStatus::Completed
    }
}

/// The one valid toggle action for a transfer in its current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferAction {
    Start,
    Pause,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub file_name: String,
    pub priority: Priority,
    pub status: TransferStatus,
    #[serde(default)]
    pub bytes_transferred: i64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub status_string: String,
    #[serde(default)]
    pub priority_string: String,
    #[serde(default)]
    pub error_string: String,
    #[serde(default)]
    pub download_path: String,
}

impl Transfer {
    pub fn next_action(&self) -> TransferAction {
        if self.status.is_running() {
            TransferAction::Pause
        } else {
            TransferAction::Start
        }
    }
}
