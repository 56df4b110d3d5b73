//! Access facade over the OKR document.
//!
//! [`OkrStore`] is the only thing the HTTP layer and the CLI talk to. Every call goes back
//! to the file so hand edits are always visible; parsing is skipped when the content hash
//! matches the cached document.
//!
//! # Locking
//! - `load_objectives` holds the shared lock while reading, so it never overlaps a write.
//! - `increment_key_result` holds the exclusive lock for the whole
//!   read → parse → mutate → persist cycle.

mod cache;
mod persist;

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::error::{OkrError, OkrResult, Stage};
use crate::markdown::{parse_document, replace_current, ParsedDocument};
use crate::models::{KeyResultUpdate, MutationOutcome, Objective, ObjectiveRef};
use crate::mutation;

pub use cache::content_digest;
use cache::CachedDocument;
pub use persist::write_atomic;

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Budget for one load or one read-modify-write cycle.
    pub operation_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

/// Budget tracker for a single store operation.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn check(&self, stage: Stage) -> OkrResult<()> {
        if self.started.elapsed() >= self.budget {
            return Err(OkrError::Timeout {
                stage,
                budget: self.budget,
            });
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct OkrStore {
    path: PathBuf,
    config: StoreConfig,
    cache: Arc<RwLock<Option<CachedDocument>>>,
}

impl OkrStore {
    /// Open the document at `path`, creating an empty one (and its directory) if needed.
    pub fn open(path: impl Into<PathBuf>, config: StoreConfig) -> OkrResult<Self> {
        let path = path.into();

        if !path.exists() {
            let persist_err = |source| OkrError::Persist {
                path: path.clone(),
                source,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(persist_err)?;
            }
            write_atomic(&path, "", &Deadline::start(config.operation_timeout))?;
            tracing::info!("Created empty OKR document at {}", path.display());
        }

        Ok(Self {
            path,
            config,
            cache: Arc::new(RwLock::new(None)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current objectives in document order.
    pub fn load_objectives(&self) -> OkrResult<Vec<Objective>> {
        let deadline = Deadline::start(self.config.operation_timeout);

        {
            let cache = self.cache.read().expect("document lock poisoned");
            let source = self.read_source()?;
            if let Some(hit) = cache.as_ref().filter(|c| c.matches(&source)) {
                tracing::debug!(path = %self.path.display(), "document unchanged, using cached parse");
                return Ok(hit.parsed.objectives.clone());
            }
        }

        let mut cache = self.cache.write().expect("document lock poisoned");
        let source = self.read_source()?;
        let parsed = self.refresh(&mut cache, &source)?;
        deadline.check(Stage::Parse)?;
        Ok(parsed.objectives.clone())
    }

    /// Add one to a key result's `current` and write the change back to the document.
    ///
    /// Only the digits of that value change on disk. A key result at its target is
    /// reported as [`MutationOutcome::AlreadyComplete`] and nothing is written.
    pub fn increment_key_result(
        &self,
        objective: &ObjectiveRef,
        key_result_id: &str,
    ) -> OkrResult<KeyResultUpdate> {
        let deadline = Deadline::start(self.config.operation_timeout);
        let mut cache = self.cache.write().expect("document lock poisoned");

        let source = self.read_source()?;
        let parsed = self.refresh(&mut cache, &source)?;
        deadline.check(Stage::Parse)?;

        let mut objectives = parsed.objectives.clone();
        let change = match mutation::increment(&mut objectives, objective, key_result_id) {
            Ok(change) => change,
            Err(e) => {
                tracing::warn!("Increment rejected: {}", e);
                return Err(e);
            }
        };

        let update = KeyResultUpdate {
            key_result: change.key_result.clone(),
            outcome: change.outcome,
        };
        if change.outcome == MutationOutcome::AlreadyComplete {
            tracing::debug!(
                objective = %objective,
                key_result = %update.key_result.id,
                "key result already complete, nothing to write"
            );
            return Ok(update);
        }

        let span = parsed
            .source_map
            .key_result(change.objective_index, change.key_result_index)
            .expect("source map covers every parsed key result");
        let updated = replace_current(&source, span, change.key_result.current);

        if let Err(e) = write_atomic(&self.path, &updated, &deadline) {
            tracing::error!("Failed to persist increment: {}", e);
            return Err(e);
        }
        // Spans shift when the value gains a digit, so the next call re-parses.
        *cache = None;

        tracing::info!(
            objective = %objective,
            key_result = %update.key_result.id,
            current = update.key_result.current,
            target = update.key_result.target,
            "key result incremented"
        );
        Ok(update)
    }

    fn read_source(&self) -> OkrResult<String> {
        std::fs::read_to_string(&self.path).map_err(|source| OkrError::Read {
            path: self.path.clone(),
            source,
        })
    }

    /// Parse `source` unless the cache already holds it. Caller must hold the write lock.
    fn refresh(
        &self,
        cache: &mut Option<CachedDocument>,
        source: &str,
    ) -> OkrResult<Arc<ParsedDocument>> {
        if let Some(hit) = cache.as_ref().filter(|c| c.matches(source)) {
            return Ok(Arc::clone(&hit.parsed));
        }

        match parse_document(source) {
            Ok(parsed) => {
                tracing::debug!(
                    path = %self.path.display(),
                    objectives = parsed.objectives.len(),
                    "parsed OKR document"
                );
                let entry = CachedDocument::new(source, parsed);
                let parsed = Arc::clone(&entry.parsed);
                *cache = Some(entry);
                Ok(parsed)
            }
            Err(e) => {
                *cache = None;
                tracing::warn!("OKR document is invalid: {}", e);
                Err(e.into())
            }
        }
    }
}
