use crate::{ChatMessage, CoreError, UserProgress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Portable export of everything the learner owns.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub progress: UserProgress,
    #[serde(default)]
    pub chat: Vec<ChatMessage>,
}

impl Snapshot {
    pub fn new(progress: UserProgress, chat: Vec<ChatMessage>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exported_at: Utc::now(),
            progress,
            chat,
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(|_| CoreError::Storage("serialize"))
    }

    /// Parses and validates an exported snapshot; progress comes back normalized.
    pub fn from_json(s: &str) -> Result<Self, CoreError> {
        let snap: Snapshot =
            serde_json::from_str(s).map_err(|_| CoreError::Invalid("not a DeutschPro snapshot"))?;
        if snap.version == 0 || snap.version > SNAPSHOT_VERSION {
            return Err(CoreError::Invalid("unsupported snapshot version"));
        }
        Ok(Self {
            progress: snap.progress.normalized(),
            ..snap
        })
    }
}
