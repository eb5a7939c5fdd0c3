use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::classmap::{ClassMap, Location};
use crate::error::{Error, Result};
use crate::host::{LoaderHook, ResolverId, SourceHost};
use crate::persist;

/// Name→location registry with an on-demand load trigger.
///
/// Handles are cheap clones over shared state, so the same table can serve
/// direct callers and a resolver registered in a [`LoaderHook`] at once.
#[derive(Debug, Default, Clone)]
pub struct LookupTable {
    inner: Arc<Mutex<TableState>>,
}

#[derive(Debug, Default)]
struct TableState {
    mappings: ClassMap,
    // Names this table has already loaded successfully. Stands in for the
    // process symbol table of a dynamic runtime, so it survives mapping
    // deletes: an already-loaded symbol stays loaded.
    resolved: HashSet<String>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table over an already-computed classmap.
    pub fn from_classmap(map: ClassMap) -> Self {
        let table = Self::new();
        table.replace_all(map);
        table
    }

    fn state(&self) -> MutexGuard<'_, TableState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inserts a mapping, failing with [`Error::DuplicateKey`] when `name`
    /// is already present. Use [`Self::set`] to overwrite.
    pub fn add(&self, name: impl Into<String>, location: impl Into<Location>) -> Result<()> {
        let name = name.into();
        let mut state = self.state();
        if state.mappings.contains_key(&name) {
            return Err(Error::DuplicateKey(name));
        }
        state.mappings.insert(name, location.into());
        Ok(())
    }

    /// Inserts or overwrites a mapping unconditionally.
    pub fn set(&self, name: impl Into<String>, location: impl Into<Location>) {
        self.state().mappings.insert(name.into(), location.into());
    }

    pub fn get(&self, name: &str) -> Result<Location> {
        self.state()
            .mappings
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Removes a mapping. Removing an absent name is a no-op.
    pub fn delete(&self, name: &str) {
        self.state().mappings.remove(name);
    }

    pub fn delete_all(&self) {
        self.state().mappings.clear();
    }

    /// Replaces every mapping with `map`. Previous entries are discarded,
    /// not merged.
    pub fn replace_all(&self, map: ClassMap) {
        self.state().mappings = map;
    }

    pub fn len(&self) -> usize {
        self.state().mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().mappings.is_empty()
    }

    /// Snapshot of the current mappings.
    pub fn classmap(&self) -> ClassMap {
        self.state().mappings.clone()
    }

    /// Loads the file(s) mapped to `name` into `host` and reports whether
    /// the symbol is defined afterwards.
    ///
    /// A name already defined — in the host, or loaded earlier through this
    /// table — short-circuits to `true` without touching the filesystem. A
    /// name with no mapping is a caller error and fails with
    /// [`Error::NotFound`]. Ambiguous entries are tried in encounter order
    /// until the symbol appears; a candidate whose include fails is logged
    /// and skipped.
    pub fn resolve(&self, name: &str, host: &mut dyn SourceHost) -> Result<bool> {
        {
            let mut state = self.state();
            if state.resolved.contains(name) {
                return Ok(true);
            }
            if host.is_defined(name) {
                state.resolved.insert(name.to_string());
                return Ok(true);
            }
        }

        let location = self.get(name)?;
        let mut defined = false;
        for path in location.paths() {
            if let Err(err) = host.include(path) {
                debug!(name, path = %path.display(), %err, "include failed, trying next candidate");
                continue;
            }
            if host.is_defined(name) {
                defined = true;
                break;
            }
        }

        if defined {
            self.state().resolved.insert(name.to_string());
        }
        Ok(defined)
    }

    /// Replaces the mappings with the classmap persisted at `source`.
    pub fn restore_from(&self, source: &Path) -> Result<()> {
        let map = persist::read_classmap(source)?;
        debug!(source = %source.display(), entries = map.len(), "classmap restored");
        self.replace_all(map);
        Ok(())
    }

    /// Persists the current mappings to `destination`. The write is atomic
    /// with respect to concurrent readers.
    pub fn persist_to(&self, destination: &Path) -> Result<()> {
        let map = self.classmap();
        persist::write_classmap(destination, &map)?;
        debug!(destination = %destination.display(), entries = map.len(), "classmap persisted");
        Ok(())
    }

    /// Installs a resolver over this table into `hook`; `host` supplies the
    /// symbol space the resolver loads into. Returns the id to hand to
    /// [`Self::unregister_as_loader`]. At the hook boundary every outcome
    /// collapses to found-or-not, so an unmapped name answers `false`.
    pub fn register_as_loader(
        &self,
        hook: &mut dyn LoaderHook,
        host: Arc<Mutex<dyn SourceHost + Send>>,
    ) -> ResolverId {
        let table = self.clone();
        hook.register(Box::new(move |name| {
            let mut host = host.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            table.resolve(name, &mut *host).unwrap_or(false)
        }))
    }

    /// Removes a resolver installed with [`Self::register_as_loader`].
    /// Unregistering twice is a no-op.
    pub fn unregister_as_loader(&self, hook: &mut dyn LoaderHook, id: ResolverId) {
        hook.unregister(id);
    }
}
