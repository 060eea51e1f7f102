//! Bounded connection pool with an explicit lifecycle.
//!
//! # Responsibility
//! - Hold a fixed set of bootstrapped file-backed connections.
//! - Hand out exclusive connection guards, blocking up to an acquire ceiling.
//! - Drain connections on shutdown and refuse further acquisitions.
//!
//! # Invariants
//! - A checked-out connection is owned by exactly one caller until dropped.
//! - Connections failing the validation probe are discarded, never handed out.
//! - After `shutdown`, returned connections are dropped instead of re-pooled.

use super::{open_db, DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

const VALIDATION_SQL: &str = "SELECT 1;";

/// Pool sizing and borrow behavior.
///
/// Defaults mirror the reference deployment: five connections, a two second
/// acquire ceiling, and a validation probe on every borrow.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of connections opened up front. The pool never grows.
    pub size: usize,
    /// Maximum time `acquire` blocks waiting for an idle connection.
    pub acquire_timeout: Duration,
    /// Run `SELECT 1` before handing a connection out.
    pub validate_on_acquire: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: 5,
            acquire_timeout: Duration::from_secs(2),
            validate_on_acquire: true,
        }
    }
}

struct PoolState {
    idle: Vec<Connection>,
    closed: bool,
}

struct PoolShared {
    state: Mutex<PoolState>,
    idle_available: Condvar,
}

/// Process-wide connection pool over one SQLite database file.
///
/// Initialize once at process start, pass by clone/reference into transaction
/// providers, and call [`ConnectionPool::shutdown`] when draining the process.
pub struct ConnectionPool {
    shared: Arc<PoolShared>,
    config: PoolConfig,
}

impl ConnectionPool {
    /// Opens `config.size` bootstrapped connections against `path`.
    ///
    /// Fails fast when any single open or migration fails.
    pub fn open(path: impl AsRef<Path>, config: PoolConfig) -> DbResult<Self> {
        let path = path.as_ref();
        let mut idle = Vec::with_capacity(config.size);
        for _ in 0..config.size {
            idle.push(open_db(path)?);
        }

        info!(
            "event=pool_open module=db status=ok size={} acquire_timeout_ms={}",
            config.size,
            config.acquire_timeout.as_millis()
        );

        Ok(Self {
            shared: Arc::new(PoolShared {
                state: Mutex::new(PoolState { idle, closed: false }),
                idle_available: Condvar::new(),
            }),
            config,
        })
    }

    /// Borrows one connection, blocking until one is idle or the configured
    /// acquire ceiling elapses.
    ///
    /// # Errors
    /// - `DbError::PoolClosed` after `shutdown`.
    /// - `DbError::AcquireTimeout` when the ceiling elapses while exhausted.
    pub fn acquire(&self) -> DbResult<PooledConnection> {
        let deadline = Instant::now() + self.config.acquire_timeout;
        let mut state = lock_state(&self.shared);

        loop {
            if state.closed {
                return Err(DbError::PoolClosed);
            }

            while let Some(conn) = state.idle.pop() {
                if !self.config.validate_on_acquire || probe(&conn) {
                    return Ok(PooledConnection {
                        conn: Some(conn),
                        shared: Arc::clone(&self.shared),
                    });
                }
                warn!("event=pool_validate module=db status=error action=discard");
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(DbError::AcquireTimeout {
                    waited: self.config.acquire_timeout,
                });
            }

            let (next, _timeout) = self
                .shared
                .idle_available
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            state = next;
        }
    }

    /// Drains idle connections and wakes all waiters.
    ///
    /// Connections still checked out are discarded when their guards drop.
    pub fn shutdown(&self) {
        let drained;
        {
            let mut state = lock_state(&self.shared);
            state.closed = true;
            drained = state.idle.len();
            state.idle.clear();
        }
        self.shared.idle_available.notify_all();
        info!("event=pool_shutdown module=db status=ok drained={drained}");
    }
}

/// Exclusive guard over one pooled connection.
///
/// Dereferences to [`rusqlite::Connection`]; returning to the pool happens on
/// drop.
pub struct PooledConnection {
    conn: Option<Connection>,
    shared: Arc<PoolShared>,
}

impl std::fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledConnection")
            .field("conn", &self.conn)
            .finish_non_exhaustive()
    }
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
            .as_ref()
            .expect("pooled connection present until drop")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn
            .as_mut()
            .expect("pooled connection present until drop")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            let mut state = lock_state(&self.shared);
            if state.closed {
                return;
            }
            state.idle.push(conn);
            drop(state);
            self.shared.idle_available.notify_one();
        }
    }
}

fn lock_state(shared: &PoolShared) -> MutexGuard<'_, PoolState> {
    shared.state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn probe(conn: &Connection) -> bool {
    conn.query_row(VALIDATION_SQL, [], |row| row.get::<_, i64>(0))
        .is_ok()
}
