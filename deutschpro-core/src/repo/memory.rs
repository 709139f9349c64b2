use crate::{progress, ChatMessage, CoreError, ProgressAction, UserProgress};
use async_trait::async_trait;
use parking_lot::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    progress: RwLock<UserProgress>,
    chat: RwLock<Vec<ChatMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: UserProgress) -> Self {
        Self {
            progress: RwLock::new(progress.normalized()),
            chat: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl crate::repo::ProgressStore for MemoryStore {
    async fn load_progress(&self) -> Result<UserProgress, CoreError> {
        Ok(self.progress.read().clone())
    }

    async fn dispatch(&self, action: ProgressAction) -> Result<UserProgress, CoreError> {
        let mut p = self.progress.write();
        let next = progress::apply_action(&p, action)?;
        *p = next.clone();
        Ok(next)
    }

    async fn replace_progress(&self, progress: UserProgress) -> Result<(), CoreError> {
        *self.progress.write() = progress.normalized();
        Ok(())
    }

    async fn load_chat(&self) -> Result<Vec<ChatMessage>, CoreError> {
        Ok(self.chat.read().clone())
    }

    async fn save_chat(&self, history: &[ChatMessage]) -> Result<(), CoreError> {
        *self.chat.write() = history.to_vec();
        Ok(())
    }
}
