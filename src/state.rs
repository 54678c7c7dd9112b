use crate::config::AppConfig;
use crate::llm::{Completer, GroqClient};
use crate::sessions::SessionStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub completer: Arc<dyn Completer>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let completer = Arc::new(GroqClient::new(config.llm.clone())?) as Arc<dyn Completer>;
        Ok(Self::from_parts(Arc::new(config), completer))
    }

    pub fn from_parts(config: Arc<AppConfig>, completer: Arc<dyn Completer>) -> Self {
        let sessions = SessionStore::new(config.session_idle_ttl());
        Self {
            config,
            completer,
            sessions,
        }
    }

    /// Same config and sessions, different completion backend.
    #[cfg(test)]
    pub fn with_completer(&self, completer: Arc<dyn Completer>) -> Self {
        Self {
            config: self.config.clone(),
            completer,
            sessions: self.sessions.clone(),
        }
    }

    #[cfg(test)]
    pub fn fake(completer: Arc<dyn Completer>) -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "GROQ_API_KEY" => Some("test".into()),
            "GROQ_BASE_URL" => Some("http://fake.local".into()),
            _ => None,
        })
        .expect("fake config ok");
        Self::from_parts(Arc::new(config), completer)
    }
}
