use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use time::{macros::format_description, Duration, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NutritionLogEntry {
    pub item: String,
    pub time: String,
}

impl NutritionLogEntry {
    pub fn new(item: impl Into<String>, at: OffsetDateTime) -> Self {
        let stamp = at
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
            .unwrap_or_else(|_| at.to_string());
        Self {
            item: item.into(),
            time: stamp,
        }
    }
}

impl fmt::Display for NutritionLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "• {} — {}", self.item, self.time)
    }
}

/// Append-only; entries are never edited or removed while the session lives.
#[derive(Debug)]
struct SessionLog {
    entries: Vec<NutritionLogEntry>,
    last_seen: OffsetDateTime,
}

impl SessionLog {
    fn new(now: OffsetDateTime) -> Self {
        Self {
            entries: Vec::new(),
            last_seen: now,
        }
    }
}

/// In-memory sessions keyed by id. Each session owns its own log and is dropped
/// once it has been idle for longer than `idle_ttl`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SessionLog>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: std::time::Duration) -> Self {
        Self {
            inner: Arc::default(),
            idle_ttl: Duration::try_from(idle_ttl).unwrap_or(Duration::MAX),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionLog>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn create(&self) -> Uuid {
        self.create_at(OffsetDateTime::now_utc())
    }

    fn create_at(&self, now: OffsetDateTime) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.lock();
        Self::sweep(&mut sessions, now, self.idle_ttl);
        sessions.insert(id, SessionLog::new(now));
        id
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.touch(id).is_some()
    }

    /// Snapshot of the session's log, `None` if the session is unknown.
    pub fn log(&self, id: Uuid) -> Option<Vec<NutritionLogEntry>> {
        self.touch(id)
    }

    fn touch(&self, id: Uuid) -> Option<Vec<NutritionLogEntry>> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id)?;
        session.last_seen = OffsetDateTime::now_utc();
        Some(session.entries.clone())
    }

    /// Appends a lookup stamped with the current wall-clock time and returns the
    /// updated log.
    pub fn record_lookup(&self, id: Uuid, item: &str) -> Option<Vec<NutritionLogEntry>> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id)?;
        // Stamped under the lock so insertion order matches time order.
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        session.entries.push(NutritionLogEntry::new(item, now));
        session.last_seen = OffsetDateTime::now_utc();
        Some(session.entries.clone())
    }

    pub fn end(&self, id: Uuid) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Drops every session idle for longer than the TTL; returns how many went.
    pub fn evict_idle(&self) -> usize {
        Self::sweep(&mut self.lock(), OffsetDateTime::now_utc(), self.idle_ttl)
    }

    fn sweep(
        sessions: &mut HashMap<Uuid, SessionLog>,
        now: OffsetDateTime,
        idle_ttl: Duration,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_seen <= idle_ttl);
        before - sessions.len()
    }

    /// Periodically evicts idle sessions for as long as the runtime lives.
    pub fn spawn_sweeper(&self, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every.max(std::time::Duration::from_secs(1)));
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle();
                if evicted > 0 {
                    info!(evicted, active = store.len(), "idle sessions evicted");
                }
            }
        })
    }
}
