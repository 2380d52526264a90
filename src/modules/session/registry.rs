use super::controller::CatalogSession;
use std::collections::HashMap;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A registered session plus its bookkeeping.
#[derive(Clone)]
pub struct SessionHandle {
    pub id: Uuid,
    pub created_at: OffsetDateTime,
    pub session: Arc<CatalogSession>,
}

struct Entry {
    handle: SessionHandle,
    last_seen: OffsetDateTime,
}

/// Live sessions keyed by id. Nothing here is persisted.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: CatalogSession) -> SessionHandle {
        let now = OffsetDateTime::now_utc();
        let handle = SessionHandle {
            id: Uuid::new_v4(),
            created_at: now,
            session: Arc::new(session),
        };

        self.inner.write().await.insert(
            handle.id,
            Entry {
                handle: handle.clone(),
                last_seen: now,
            },
        );
        handle
    }

    /// Returns the session and marks it as recently used.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.inner.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = OffsetDateTime::now_utc();
        Some(entry.handle.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Drops sessions not touched within `idle`. Returns how many went.
    pub async fn sweep(&self, idle: Duration, now: OffsetDateTime) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_seen <= idle);
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::fixture::StaticCatalog;

    fn session() -> CatalogSession {
        CatalogSession::new(Arc::new(StaticCatalog::new(vec![])), "Trending 2025 movies")
    }

    #[tokio::test]
    async fn insert_get_remove() {
        let registry = SessionRegistry::new();
        let handle = registry.insert(session()).await;

        let found = registry.get(handle.id).await.expect("session registered");
        assert!(Arc::ptr_eq(&found.session, &handle.session));

        assert!(registry.remove(handle.id).await);
        assert!(!registry.remove(handle.id).await);
        assert!(registry.get(handle.id).await.is_none());
    }

    #[tokio::test]
    async fn sweep_drops_only_idle_sessions() {
        let registry = SessionRegistry::new();
        let stale = registry.insert(session()).await;
        let fresh = registry.insert(session()).await;

        let later = OffsetDateTime::now_utc() + Duration::minutes(45);
        {
            let mut sessions = registry.inner.write().await;
            sessions.get_mut(&fresh.id).unwrap().last_seen = later;
        }

        let removed = registry.sweep(Duration::minutes(30), later).await;

        assert_eq!(removed, 1);
        assert!(registry.get(stale.id).await.is_none());
        assert!(registry.get(fresh.id).await.is_some());
        assert_eq!(registry.len().await, 1);
    }
}
