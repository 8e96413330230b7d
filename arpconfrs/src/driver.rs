//! Seam to the physical database driver.
//!
//! Drivers are registered under an identity string; a source names the
//! identity it needs and the data source factory looks it up when a pool is
//! built.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::error::Result;
use crate::secret::SensitiveString;

/// Everything a driver needs to open one physical connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectRequest<'a> {
    pub address: &'a str,
    pub username: &'a str,
    pub password: &'a SensitiveString,
    pub properties: Option<&'a HashMap<String, String>>,
}

#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a physical connection. Authentication and network failures are
    /// reported as [`crate::ConnectorError::Connection`].
    async fn connect(&self, request: ConnectRequest<'_>) -> Result<Box<dyn DriverConnection>>;
}

#[async_trait]
pub trait DriverConnection: Send {
    async fn set_auto_commit(&mut self, enabled: bool) -> Result<()>;

    /// Cheap liveness probe used before handing a pooled connection out again.
    async fn is_valid(&mut self) -> bool;
}

static GLOBAL_DRIVERS: Lazy<Arc<DriverRegistry>> = Lazy::new(|| Arc::new(DriverRegistry::new()));

#[derive(Default)]
pub struct DriverRegistry {
    drivers: RwLock<HashMap<String, Arc<dyn Driver>>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> Arc<DriverRegistry> {
        GLOBAL_DRIVERS.clone()
    }

    pub fn register(&self, identity: impl Into<String>, driver: Arc<dyn Driver>) {
        let identity = identity.into();
        tracing::debug!(driver = %identity, "registering driver");
        self.drivers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(identity, driver);
    }

    pub fn get(&self, identity: &str) -> Option<Arc<dyn Driver>> {
        self.drivers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(identity)
            .cloned()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.get(identity).is_some()
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let drivers = self.drivers.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<&String> = drivers.keys().collect();
        names.sort();
        f.debug_struct("DriverRegistry").field("drivers", &names).finish()
    }
}
