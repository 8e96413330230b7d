// Shared fixtures: an in-memory driver and ready-made parameter sets.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use arpconf::driver::{ConnectRequest, Driver, DriverConnection, DriverRegistry};
use arpconf::{ConnectionParameters, ConnectorError, PoolConfig, SourceConfig, DB2_V11};

#[derive(Default)]
struct Shared {
    connects: AtomicUsize,
    rejected: AtomicUsize,
    broken: AtomicBool,
    auto_commit: Mutex<Vec<bool>>,
    addresses: Mutex<Vec<String>>,
    usernames: Mutex<Vec<String>>,
    properties: Mutex<Vec<Option<HashMap<String, String>>>>,
}

/// Accepts connections whose password matches `password`.
#[derive(Clone)]
pub struct FakeDriver {
    password: String,
    shared: Arc<Shared>,
}

impl FakeDriver {
    pub fn accepting(password: &str) -> Self {
        Self {
            password: password.to_string(),
            shared: Arc::new(Shared::default()),
        }
    }

    pub fn connects(&self) -> usize {
        self.shared.connects.load(Ordering::SeqCst)
    }

    pub fn rejected(&self) -> usize {
        self.shared.rejected.load(Ordering::SeqCst)
    }

    /// Make every open connection report itself invalid.
    pub fn break_connections(&self) {
        self.shared.broken.store(true, Ordering::SeqCst);
    }

    pub fn auto_commit_calls(&self) -> Vec<bool> {
        self.shared.auto_commit.lock().unwrap().clone()
    }

    pub fn addresses(&self) -> Vec<String> {
        self.shared.addresses.lock().unwrap().clone()
    }

    pub fn usernames(&self) -> Vec<String> {
        self.shared.usernames.lock().unwrap().clone()
    }

    pub fn properties(&self) -> Vec<Option<HashMap<String, String>>> {
        self.shared.properties.lock().unwrap().clone()
    }

    /// Registry holding only this driver, under the DB2 identity.
    pub fn registry(&self) -> Arc<DriverRegistry> {
        let drivers = Arc::new(DriverRegistry::new());
        drivers.register(DB2_V11.driver, Arc::new(self.clone()));
        drivers
    }
}

#[async_trait::async_trait]
impl Driver for FakeDriver {
    async fn connect(
        &self,
        request: ConnectRequest<'_>,
    ) -> arpconf::Result<Box<dyn DriverConnection>> {
        if request.password.expose_secret() != self.password {
            self.shared.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(ConnectorError::Connection(format!(
                "authentication failed for {}",
                request.username
            )));
        }
        self.shared.connects.fetch_add(1, Ordering::SeqCst);
        self.shared
            .addresses
            .lock()
            .unwrap()
            .push(request.address.to_string());
        self.shared
            .usernames
            .lock()
            .unwrap()
            .push(request.username.to_string());
        self.shared
            .properties
            .lock()
            .unwrap()
            .push(request.properties.cloned());
        Ok(Box::new(FakeConnection {
            shared: self.shared.clone(),
        }))
    }
}

struct FakeConnection {
    shared: Arc<Shared>,
}

#[async_trait::async_trait]
impl DriverConnection for FakeConnection {
    async fn set_auto_commit(&mut self, enabled: bool) -> arpconf::Result<()> {
        self.shared.auto_commit.lock().unwrap().push(enabled);
        Ok(())
    }

    async fn is_valid(&mut self) -> bool {
        !self.shared.broken.load(Ordering::SeqCst)
    }
}

pub fn sales_params() -> ConnectionParameters {
    ConnectionParameters::new("db.example.com", "50000", "SALES", "u", "p")
}

/// Pool settings without the background sweeper so tests control eviction.
pub fn quiet_pool(size: usize) -> PoolConfig {
    PoolConfig {
        size,
        eviction_interval_secs: 0,
    }
}

pub fn sales_source(driver: &FakeDriver) -> SourceConfig {
    SourceConfig::db2_v11(sales_params())
        .with_driver_registry(driver.registry())
        .with_pool_config(quiet_pool(4))
}
