use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum UpdateState {
    Idle,
    Active,
    Canceled,
    Finished,
    Error,
}

impl From<i64> for UpdateState {
    fn from(value: i64) -> Self {
        match value {
            1 => UpdateState::Active,
            2 => UpdateState::Canceled,
            3 => UpdateState::Finished,
            4 => UpdateState::Error,
            _ => UpdateState::Idle,
        }
    }
}

impl From<UpdateState> for i64 {
    fn from(value: UpdateState) -> Self {
        match value {
            UpdateState::Idle => 0,
            UpdateState::Active => 1,
            UpdateState::Canceled => 2,
            UpdateState::Finished => 3,
            UpdateState::Error => 4,
        }
    }
}

/// Progress of a server-side subscription update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    pub status: UpdateState,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub active_subscription: Option<i64>,
    #[serde(default)]
    pub progress: i64,
}

impl UpdateStatus {
    pub fn is_updating(&self) -> bool {
        self.status == UpdateState::Active
    }
}

impl Default for UpdateStatus {
    fn default() -> Self {
        Self {
            status: UpdateState::Idle,
            status_text: String::new(),
            active_subscription: None,
            progress: 0,
        }
    }
}
