use std::collections::HashMap;
use std::sync::Arc;

use artbuddy_core::model::VisionModel;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::handle::SessionHandle;
use super::settings::SessionSettings;

/// Live sessions by id.
///
/// Holds handles only; each session's state stays inside its own actor.
pub struct SessionDirectory {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    settings: SessionSettings,
    model: Arc<dyn VisionModel>,
}

impl SessionDirectory {
    pub fn new(settings: SessionSettings, model: Arc<dyn VisionModel>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            settings,
            model,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Reattaches to `requested` if it is still live, otherwise starts a
    /// new session under a fresh id.
    pub async fn open(&self, requested: Option<&str>) -> SessionHandle {
        if let Some(id) = requested {
            if let Some(handle) = self.get(id).await {
                tracing::info!(session_id = id, "[Directory] Reattached to session");
                return handle;
            }
            tracing::info!(session_id = id, "[Directory] Unknown or closed session, starting new");
        }

        let id = Uuid::new_v4().to_string();
        let handle = SessionHandle::spawn(id.clone(), self.settings.clone(), self.model.clone());

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| !existing.is_closed());
        sessions.insert(id, handle.clone());
        tracing::info!(
            session_id = handle.id(),
            live_sessions = sessions.len(),
            "[Directory] Session created"
        );
        handle
    }

    /// Gets a live session by id.
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    /// Forgets a session. The actor stops once the last handle is dropped.
    pub async fn remove(&self, session_id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id)
    }

    /// Number of sessions whose actor is still running.
    pub async fn live_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().filter(|handle| !handle.is_closed()).count()
    }
}
