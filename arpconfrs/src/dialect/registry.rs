//! Load-once cache of dialects keyed by variant.
//!
//! Parsing a definition is comparatively expensive and the result never
//! changes, so each variant's dialect is built at most once per registry and
//! handed out by `Arc`. The process normally shares [`DialectRegistry::global`];
//! tests build their own registry to start from a clean slate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use once_cell::sync::{Lazy, OnceCell};

use super::{ArpDefinition, Dialect};
use crate::error::DialectLoadError;

type LoadResult = std::result::Result<Arc<dyn Dialect>, DialectLoadError>;
type Slot = Arc<OnceCell<LoadResult>>;

static GLOBAL_REGISTRY: Lazy<Arc<DialectRegistry>> =
    Lazy::new(|| Arc::new(DialectRegistry::builtin()));

/// Definitions compiled into the binary, addressed by resource path.
pub fn builtin_definition(path: &str) -> Option<&'static str> {
    match path {
        "arp/implementation/db2v11-arp.yaml" => Some(include_str!(
            "../../resources/arp/implementation/db2v11-arp.yaml"
        )),
        _ => None,
    }
}

/// Read and parse a definition file, then wrap it with `construct`. Uncached.
pub fn load_dialect<F>(path: impl AsRef<Path>, construct: F) -> LoadResult
where
    F: FnOnce(ArpDefinition) -> Arc<dyn Dialect>,
{
    let path = path.as_ref();
    let yaml = std::fs::read_to_string(path).map_err(|e| DialectLoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_and_construct(&path.display().to_string(), &yaml, construct)
}

fn parse_and_construct<F>(path: &str, yaml: &str, construct: F) -> LoadResult
where
    F: FnOnce(ArpDefinition) -> Arc<dyn Dialect>,
{
    let definition = ArpDefinition::from_yaml(yaml).map_err(|e| DialectLoadError {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(construct(definition))
}

#[derive(Debug, Default)]
pub struct DialectRegistry {
    /// When set, definitions are read from this directory instead of the
    /// built-in resources.
    root: Option<PathBuf>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl DialectRegistry {
    /// Registry that resolves definitions from the built-in resources.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Registry that resolves definitions relative to `root` on disk.
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: Some(root.as_ref().to_path_buf()),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> Arc<DialectRegistry> {
        GLOBAL_REGISTRY.clone()
    }

    /// Return the cached dialect for `key`, loading it on first use.
    ///
    /// Exactly one caller runs `construct` even under concurrent first
    /// access; the rest block until it finishes and then share its result.
    /// A failed load is cached as well, so a broken definition stays broken
    /// for the lifetime of the registry.
    pub fn get_or_load<F>(&self, key: &str, path: &str, construct: F) -> LoadResult
    where
        F: FnOnce(ArpDefinition) -> Arc<dyn Dialect>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(key.to_string()).or_default().clone()
        };
        slot.get_or_init(|| {
            let start = Instant::now();
            let result = self.load(path, construct);
            match &result {
                Ok(dialect) => tracing::info!(
                    variant = key,
                    path,
                    dialect = dialect.name(),
                    ms = start.elapsed().as_millis(),
                    "loaded dialect definition"
                ),
                Err(e) => tracing::error!(variant = key, path, error = %e, "dialect unavailable"),
            }
            result
        })
        .clone()
    }

    /// Load without touching the cache.
    pub fn load<F>(&self, path: &str, construct: F) -> LoadResult
    where
        F: FnOnce(ArpDefinition) -> Arc<dyn Dialect>,
    {
        match &self.root {
            Some(root) => load_dialect(root.join(path), construct),
            None => {
                let yaml = builtin_definition(path).ok_or_else(|| DialectLoadError {
                    path: path.to_string(),
                    reason: "no built-in definition with this name".to_string(),
                })?;
                parse_and_construct(path, yaml, construct)
            }
        }
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(key).is_some_and(|slot| slot.get().is_some())
    }
}
