use crate::backend::{ChunkRequest, GenerativeBackend};
use crate::repair::parse_array_lenient;
use crate::{CoreError, GeneratedItem, Level, VocabItem};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::Duration;

pub const CHUNK_SIZE: usize = 8;
pub const MAX_LOOPS: usize = 25;
pub const EXCLUSION_WINDOW: usize = 100;
pub const MAX_BATCH: usize = 100;

#[derive(Clone, Debug)]
pub struct BatchPolicy {
    pub chunk_size: usize,
    pub max_loops: usize,
    pub exclusion_window: usize,
    pub max_batch: usize,
    /// Pause after a chunk that produced nothing usable.
    pub cooldown: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            max_loops: MAX_LOOPS,
            exclusion_window: EXCLUSION_WINDOW,
            max_batch: MAX_BATCH,
            cooldown: Duration::from_millis(400),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BatchOutcome {
    pub items: Vec<VocabItem>,
    pub loops: usize,
    pub failed_calls: usize,
}

/// Running exclusion set: ordered for the prompt window, hashed for lookups.
struct Exclusions {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl Exclusions {
    fn new(seed: &[String]) -> Self {
        let mut ex = Self {
            ordered: Vec::with_capacity(seed.len()),
            seen: HashSet::with_capacity(seed.len()),
        };
        for w in seed {
            ex.push(w);
        }
        ex
    }

    fn push(&mut self, word: &str) {
        let key = word.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        if self.seen.insert(key) {
            self.ordered.push(word.trim().to_string());
        }
    }

    fn contains(&self, word: &str) -> bool {
        self.seen.contains(&word.trim().to_lowercase())
    }

    fn recent(&self, window: usize) -> &[String] {
        let start = self.ordered.len().saturating_sub(window);
        &self.ordered[start..]
    }
}

/// Fetches up to `count` unique items for `level`, skipping `exclude`.
///
/// Short results are not an error. Only a run in which every backend call
/// failed returns `Err`.
pub async fn fetch_quiz_batch(
    backend: &dyn GenerativeBackend,
    level: Level,
    count: usize,
    exclude: &[String],
    policy: &BatchPolicy,
) -> Result<BatchOutcome, CoreError> {
    let target = count.min(policy.max_batch);
    let mut items: Vec<VocabItem> = Vec::with_capacity(target);
    let mut exclusions = Exclusions::new(exclude);
    let mut loops = 0usize;
    let mut failed_calls = 0usize;
    let mut last_error: Option<CoreError> = None;

    while items.len() < target && loops < policy.max_loops {
        loops += 1;
        let remaining = target - items.len();
        let request = ChunkRequest {
            level,
            count: remaining.min(policy.chunk_size.max(1)),
            exclude: exclusions.recent(policy.exclusion_window),
        };
        debug!("chunk {loops}: requesting {} {level} items", request.count);

        let raw = match backend.generate_chunk(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("chunk {loops} failed: {e}");
                failed_calls += 1;
                last_error = Some(e);
                cool_down(policy).await;
                continue;
            }
        };

        let mut accepted = 0usize;
        for value in parse_array_lenient(&raw) {
            let generated = match serde_json::from_value::<GeneratedItem>(value) {
                Ok(g) => g,
                Err(e) => {
                    debug!("dropping malformed element: {e}");
                    continue;
                }
            };
            let Some(item) = generated.into_item(Some(level)) else {
                continue;
            };
            if exclusions.contains(&item.word) {
                continue;
            }
            exclusions.push(&item.word);
            items.push(item);
            accepted += 1;
        }

        if accepted == 0 {
            debug!("chunk {loops} produced no new items");
            cool_down(policy).await;
        }
    }

    if items.is_empty() && failed_calls == loops && loops > 0 {
        let e = last_error.unwrap_or_else(|| CoreError::Backend("generation unavailable".into()));
        return Err(e);
    }

    items.truncate(target);
    info!(
        "batch for {level}: {}/{target} items in {loops} call(s), {failed_calls} failed",
        items.len()
    );
    Ok(BatchOutcome {
        items,
        loops,
        failed_calls,
    })
}

async fn cool_down(policy: &BatchPolicy) {
    if !policy.cooldown.is_zero() {
        tokio::time::sleep(policy.cooldown).await;
    }
}
