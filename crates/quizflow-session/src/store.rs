use crate::session::ConversationSession;
use quizflow_core::{QuizflowError, QuizflowResult, SessionError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Keyed session store with per-key optimistic concurrency.
///
/// `update` is a compare-and-swap on the session's version counter: the
/// caller passes back the session as loaded (plus its mutations) and the
/// store accepts it only if the stored version still matches, bumping the
/// version on success. Two writers racing from the same snapshot therefore
/// resolve to exactly one success and one [`SessionError::Conflict`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetches the session for `user_id`, if one exists.
    async fn get(&self, user_id: &str) -> QuizflowResult<Option<ConversationSession>>;

    /// Stores `session` unconditionally, replacing any prior session for
    /// the same user. Used by `start`, which always overwrites.
    async fn create(&self, session: &ConversationSession) -> QuizflowResult<()>;

    /// Stores `session` only if the stored version still equals
    /// `session.version`; the stored copy gets `session.version + 1`.
    /// Fails with [`SessionError::Conflict`] otherwise.
    async fn update(&self, session: &ConversationSession) -> QuizflowResult<()>;

    /// Removes the session for `user_id`. Removing a missing session is
    /// not an error.
    async fn delete(&self, user_id: &str) -> QuizflowResult<()>;
}

/// In-memory session store.
///
/// The single map lock serializes all per-key access, which is all the
/// atomicity the CAS protocol needs. Suitable for a single-instance
/// deployment and for tests.
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, ConversationSession>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: &str) -> QuizflowResult<Option<ConversationSession>> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(user_id).cloned())
    }

    async fn create(&self, session: &ConversationSession) -> QuizflowResult<()> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.user_id.clone(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &ConversationSession) -> QuizflowResult<()> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(&session.user_id) {
            Some(stored) if stored.version != session.version => {
                Err(QuizflowError::Session(SessionError::Conflict))
            }
            _ => {
                let mut next = session.clone();
                next.version += 1;
                sessions.insert(next.user_id.clone(), next);
                Ok(())
            }
        }
    }

    async fn delete(&self, user_id: &str) -> QuizflowResult<()> {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(user_id);
        Ok(())
    }
}

/// File-based session store (one JSON file per user). Survives restarts
/// without an external cache; good enough for single-instance deployments.
pub struct FileSessionStore {
    dir: PathBuf,
    // Serializes every file access: read-check-write cycles keep `update`
    // atomic per key, and readers never observe a half-written file.
    io_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Creates the store, creating `dir` if needed.
    pub async fn new(dir: PathBuf) -> QuizflowResult<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            io_lock: Mutex::new(()),
        })
    }

    // Platform user ids are hex-encoded so arbitrary ids stay path-safe.
    fn session_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hex::encode(user_id)))
    }

    async fn read_session(&self, user_id: &str) -> QuizflowResult<Option<ConversationSession>> {
        let path = self.session_path(user_id);
        if !path.exists() {
            return Ok(None);
        }
        let data = tokio::fs::read_to_string(path).await?;
        let session: ConversationSession = serde_json::from_str(&data)?;
        Ok(Some(session))
    }

    async fn write_session(&self, session: &ConversationSession) -> QuizflowResult<()> {
        let path = self.session_path(&session.user_id);
        let json = serde_json::to_string_pretty(session)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, user_id: &str) -> QuizflowResult<Option<ConversationSession>> {
        let _guard = self.io_lock.lock().await;
        self.read_session(user_id).await
    }

    async fn create(&self, session: &ConversationSession) -> QuizflowResult<()> {
        let _guard = self.io_lock.lock().await;
        self.write_session(session).await
    }

    async fn update(&self, session: &ConversationSession) -> QuizflowResult<()> {
        let _guard = self.io_lock.lock().await;
        if let Some(stored) = self.read_session(&session.user_id).await? {
            if stored.version != session.version {
                return Err(QuizflowError::Session(SessionError::Conflict));
            }
        }
        let mut next = session.clone();
        next.version += 1;
        self.write_session(&next).await
    }

    async fn delete(&self, user_id: &str) -> QuizflowResult<()> {
        let _guard = self.io_lock.lock().await;
        let path = self.session_path(user_id);
        if path.exists() {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }
}
