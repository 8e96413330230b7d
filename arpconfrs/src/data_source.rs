//! Pooled connection sources built on demand from bound parameters.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};

use deadpool::managed::{self, Metrics, RecycleError, RecycleResult};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::config::PoolConfig;
use crate::driver::{ConnectRequest, Driver, DriverConnection, DriverRegistry};
use crate::error::{ConnectorError, Result};
use crate::secret::SensitiveString;

/// Whether new physical connections keep the driver's commit behavior or get
/// autocommit forced on or off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    #[default]
    DriverSpecified,
    ForceAutoCommit,
    ForceManualCommit,
}

/// Plain values copied out of a source configuration when the factory is
/// bound. Later edits to the configuration do not reach existing factories.
#[derive(Debug, Clone)]
pub struct DataSourceSpec {
    pub driver: String,
    pub address: String,
    pub username: String,
    pub password: SensitiveString,
    pub properties: Option<HashMap<String, String>>,
    pub commit_mode: CommitMode,
    pub max_idle_conns: u32,
    pub idle_time_sec: u32,
    pub pool: PoolConfig,
}

impl DataSourceSpec {
    /// Age after which an idle connection is dropped; `None` when
    /// `idle_time_sec` is zero.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_time_sec > 0).then(|| Duration::from_secs(u64::from(self.idle_time_sec)))
    }

    fn connect_request(&self) -> ConnectRequest<'_> {
        ConnectRequest {
            address: &self.address,
            username: &self.username,
            password: &self.password,
            properties: self.properties.as_ref(),
        }
    }
}

/// A physical connection together with the moment it last went back to the
/// pool. Idle age is measured from here, never from checkout.
pub struct IdleTracked {
    conn: Box<dyn DriverConnection>,
    idle_since: Instant,
}

impl IdleTracked {
    fn new(conn: Box<dyn DriverConnection>) -> Self {
        Self {
            conn,
            idle_since: Instant::now(),
        }
    }

    fn idle_for(&self) -> Duration {
        self.idle_since.elapsed()
    }
}

pub struct ConnectionManager {
    driver: Arc<dyn Driver>,
    spec: Arc<DataSourceSpec>,
}

impl managed::Manager for ConnectionManager {
    type Type = IdleTracked;
    type Error = ConnectorError;

    async fn create(&self) -> Result<IdleTracked> {
        let mut conn = self.driver.connect(self.spec.connect_request()).await?;
        match self.spec.commit_mode {
            CommitMode::DriverSpecified => {}
            CommitMode::ForceAutoCommit => conn.set_auto_commit(true).await?,
            CommitMode::ForceManualCommit => conn.set_auto_commit(false).await?,
        }
        tracing::debug!(address = %self.spec.address, "opened physical connection");
        Ok(IdleTracked::new(conn))
    }

    async fn recycle(
        &self,
        tracked: &mut IdleTracked,
        _metrics: &Metrics,
    ) -> RecycleResult<ConnectorError> {
        if let Some(limit) = self.spec.idle_timeout() {
            if tracked.idle_for() >= limit {
                return Err(RecycleError::Message("idle time exceeded".into()));
            }
        }
        if !tracked.conn.is_valid().await {
            return Err(RecycleError::Message("connection no longer valid".into()));
        }
        Ok(())
    }
}

pub type Pool = managed::Pool<ConnectionManager>;

fn pool_error(err: managed::PoolError<ConnectorError>) -> ConnectorError {
    match err {
        managed::PoolError::Backend(e) => e,
        other => ConnectorError::Connection(other.to_string()),
    }
}

/// Drop idle connections past their idle time, then trim what is left down
/// to `max_idle_conns`. Returns how many were removed.
fn evict_idle(pool: &Pool, spec: &DataSourceSpec) -> usize {
    let idle_timeout = spec.idle_timeout();
    let max_idle = spec.max_idle_conns as usize;
    let mut kept = 0usize;
    let result = pool.retain(|tracked, _| {
        let expired = idle_timeout.is_some_and(|limit| tracked.idle_for() >= limit);
        if expired || kept >= max_idle {
            return false;
        }
        kept += 1;
        true
    });
    let removed = result.removed.len();
    if removed > 0 {
        tracing::debug!(removed, retained = result.retained, "evicted idle connections");
    }
    removed
}

/// Periodic sweep for connections that sit idle past their time. Needs a
/// Tokio runtime; without one nothing is spawned.
fn spawn_evictor(pool: Pool, spec: Arc<DataSourceSpec>) -> Option<JoinHandle<()>> {
    let every = Duration::from_secs(spec.pool.eviction_interval_secs);
    if every.is_zero() {
        return None;
    }
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        tracing::warn!(
            address = %spec.address,
            "no tokio runtime, idle sweeper not started"
        );
        return None;
    };
    Some(runtime.spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if pool.is_closed() {
                break;
            }
            evict_idle(&pool, &spec);
        }
    }))
}

/// Runs the idle trim after the connection is back in the pool.
struct IdleTrim {
    pool: Pool,
    spec: Arc<DataSourceSpec>,
}

impl Drop for IdleTrim {
    fn drop(&mut self) {
        evict_idle(&self.pool, &self.spec);
    }
}

/// A checked-out connection. Dropping it marks the connection idle, hands it
/// back to the pool and trims the idle set to `max_idle_conns`.
pub struct PooledConnection {
    // Field order matters: `object` must return to the pool before `trim` runs.
    object: managed::Object<ConnectionManager>,
    trim: IdleTrim,
}

impl Deref for PooledConnection {
    type Target = dyn DriverConnection;

    fn deref(&self) -> &Self::Target {
        &*self.object.conn
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.object.conn
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        self.object.idle_since = Instant::now();
    }
}

impl std::fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledConnection")
            .field("address", &self.trim.spec.address)
            .finish()
    }
}

/// Caller-owned pool of physical connections. Closed on drop.
pub struct PooledDataSource {
    pool: Pool,
    spec: Arc<DataSourceSpec>,
    evictor: Option<JoinHandle<()>>,
}

impl PooledDataSource {
    pub async fn get(&self) -> Result<PooledConnection> {
        let object = self.pool.get().await.map_err(pool_error)?;
        Ok(PooledConnection {
            object,
            trim: IdleTrim {
                pool: self.pool.clone(),
                spec: self.spec.clone(),
            },
        })
    }

    pub fn status(&self) -> managed::Status {
        self.pool.status()
    }

    pub fn evict_idle(&self) -> usize {
        evict_idle(&self.pool, &self.spec)
    }

    pub fn address(&self) -> &str {
        &self.spec.address
    }

    pub fn close(&self) {
        if let Some(evictor) = &self.evictor {
            evictor.abort();
        }
        self.pool.close();
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

impl Drop for PooledDataSource {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for PooledDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledDataSource")
            .field("address", &self.spec.address)
            .field("status", &self.pool.status())
            .finish()
    }
}

/// Deferred constructor for [`PooledDataSource`]s.
///
/// Holds only the bound spec, never the pools it produced; every call builds
/// an independent pool.
#[derive(Clone)]
pub struct DataSourceFactory {
    spec: Arc<DataSourceSpec>,
    drivers: Arc<DriverRegistry>,
}

impl DataSourceFactory {
    pub fn new(spec: DataSourceSpec, drivers: Arc<DriverRegistry>) -> Self {
        Self {
            spec: Arc::new(spec),
            drivers,
        }
    }

    pub fn spec(&self) -> &DataSourceSpec {
        &self.spec
    }

    /// Build a fresh pool and open one connection through it so that bad
    /// credentials or an unreachable host fail here rather than on first
    /// query. No retries.
    ///
    /// The background idle sweeper only starts when called inside a Tokio
    /// runtime. Without it, idle connections are still trimmed as they are
    /// returned and aged out on checkout.
    pub async fn new_data_source(&self) -> Result<PooledDataSource> {
        let spec = self.spec.clone();
        let driver = self.drivers.get(&spec.driver).ok_or_else(|| {
            ConnectorError::Connection(format!("no driver registered as {}", spec.driver))
        })?;

        let manager = ConnectionManager {
            driver,
            spec: spec.clone(),
        };
        let pool = Pool::builder(manager)
            .max_size(spec.pool.size.max(1))
            .build()
            .map_err(|e| ConnectorError::Connection(format!("build pool: {e}")))?;

        match pool.get().await {
            Ok(probe) => {
                drop(probe);
                evict_idle(&pool, &spec);
            }
            Err(e) => {
                let err = pool_error(e);
                tracing::error!(
                    driver = %spec.driver,
                    address = %spec.address,
                    error = %err,
                    "failed to establish connection"
                );
                pool.close();
                return Err(err);
            }
        }

        tracing::info!(
            driver = %spec.driver,
            address = %spec.address,
            max_size = spec.pool.size,
            max_idle = spec.max_idle_conns,
            idle_time_sec = spec.idle_time_sec,
            "connection pool created"
        );

        let evictor = spawn_evictor(pool.clone(), spec.clone());
        Ok(PooledDataSource {
            pool,
            spec,
            evictor,
        })
    }
}

impl std::fmt::Debug for DataSourceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceFactory")
            .field("spec", &self.spec)
            .finish()
    }
}
