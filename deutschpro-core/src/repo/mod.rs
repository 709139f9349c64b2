use crate::{ChatMessage, CoreError, ProgressAction, UserProgress};
use async_trait::async_trait;

pub mod memory;

#[async_trait]
pub trait ProgressStore: Send + Sync {
    // Progress
    async fn load_progress(&self) -> Result<UserProgress, CoreError>;
    /// Applies the action to the stored state as one step and persists it.
    async fn dispatch(&self, action: ProgressAction) -> Result<UserProgress, CoreError>;
    async fn replace_progress(&self, progress: UserProgress) -> Result<(), CoreError>;

    // Tutor chat
    async fn load_chat(&self) -> Result<Vec<ChatMessage>, CoreError>;
    async fn save_chat(&self, history: &[ChatMessage]) -> Result<(), CoreError>;
}
