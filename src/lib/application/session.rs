use super::errors::SessionError;
use super::tooling::ToolCatalog;
use crate::types::ChatMessage;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Fixed at initialization.
    pub tools: ToolCatalog,
    pub history: Vec<ChatMessage>,
}

impl Session {
    pub fn new(id: impl Into<String>, tools: ToolCatalog) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            tools,
            history: Vec::new(),
        }
    }
}

/// Exclusive access to one session. Holding the guard for a whole turn is
/// what serializes turns on the same session.
pub type SessionHandle = Arc<Mutex<Session>>;

type SessionSlot = Arc<OnceCell<SessionHandle>>;

/// Process-wide registry of live sessions.
///
/// Sessions live until the process exits; there is no eviction.
#[derive(Default)]
pub struct SessionStore {
    slots: StdMutex<HashMap<String, SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, SessionSlot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lookup(&self, session_id: &str) -> Option<SessionHandle> {
        self.lock_slots()
            .get(session_id)
            .and_then(|slot| slot.get().cloned())
    }

    pub fn require(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        self.lookup(session_id)
            .ok_or_else(|| SessionError::NotFound {
                session_id: session_id.to_string(),
            })
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.lookup(session_id).is_some()
    }

    /// Number of fully initialized sessions.
    pub fn len(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the session for `session_id`, running `init` to create it if
    /// absent. Concurrent callers with the same id share one initialization;
    /// the flag is `true` only for the caller whose `init` produced the
    /// session. A failed `init` stores nothing.
    pub async fn get_or_create<F, Fut>(
        &self,
        session_id: &str,
        init: F,
    ) -> Result<(SessionHandle, bool), SessionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Session, SessionError>>,
    {
        let slot = {
            let mut slots = self.lock_slots();
            Arc::clone(slots.entry(session_id.to_string()).or_default())
        };

        let mut created = false;
        let created_flag = &mut created;
        let outcome = slot
            .get_or_try_init(move || async move {
                let session = init().await?;
                *created_flag = true;
                Ok::<_, SessionError>(Arc::new(Mutex::new(session)))
            })
            .await
            .cloned();

        match outcome {
            Ok(handle) => {
                if created {
                    debug!(session_id, "Session stored");
                }
                Ok((handle, created))
            }
            Err(err) => {
                let mut slots = self.lock_slots();
                let abandoned = slots.get(session_id).is_some_and(|existing| {
                    Arc::ptr_eq(existing, &slot)
                        && !existing.initialized()
                        && Arc::strong_count(&slot) == 2
                });
                if abandoned {
                    slots.remove(session_id);
                }
                Err(err)
            }
        }
    }
}
