use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::db::OrmConn;

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub cart_locks: CartLocks,
}

impl AppState {
    pub fn new(orm: OrmConn) -> Self {
        Self {
            orm,
            cart_locks: CartLocks::new(),
        }
    }
}

/// Per-cart single-writer locks.
///
/// A connected cart can be mutated by several users' requests at once, and every
/// mutation is a load-modify-store sequence against the database. Holding the
/// cart's lock for the whole sequence prevents lost updates. Keys are cart ids;
/// before a user has a cart record, the user id serves as the key.
#[derive(Clone, Default)]
pub struct CartLocks {
    inner: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl CartLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .inner
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
