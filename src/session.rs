use crate::controller::RootController;
use lru::LruCache;
use parking_lot::Mutex;
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use std::num::NonZeroUsize;
use std::sync::Arc;

pub const DEFAULT_MAX_SESSIONS: usize = 4096;
const SESSION_ID_LEN: usize = 24;

/// One browser session's controller. Never hold the lock across an await.
pub type SharedController = Arc<Mutex<RootController>>;

/// Bounded map of live browser sessions; the least recently used session is
/// evicted once capacity is reached.
pub struct SessionStore {
    sessions: Mutex<LruCache<String, SharedController>>,
}

/// Result of resolving a request's session cookie.
pub struct SessionHandle {
    pub id: String,
    pub controller: SharedController,
    /// The session did not exist and its controller has not been mounted.
    pub fresh: bool,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up `id`, or starts a new session when it is missing or evicted.
    pub fn resolve(&self, id: Option<&str>) -> SessionHandle {
        let mut sessions = self.sessions.lock();
        if let Some(id) = id {
            if let Some(controller) = sessions.get(id) {
                return SessionHandle {
                    id: id.to_string(),
                    controller: controller.clone(),
                    fresh: false,
                };
            }
        }
        let id = generate_session_id();
        let controller = Arc::new(Mutex::new(RootController::new()));
        sessions.put(id.clone(), controller.clone());
        SessionHandle {
            id,
            controller,
            fresh: true,
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

pub fn generate_session_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
