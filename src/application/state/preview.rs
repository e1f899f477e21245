//! Displayable previews of binary images and the portrait cache built on them
//!
//! A [`PreviewHandle`] is the client's equivalent of an object URL: it keeps
//! the bytes registered in a [`PreviewStore`] for as long as it lives, and
//! releases them when dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::domain::value_objects::PreviewId;

type Registry = HashMap<PreviewId, Arc<Vec<u8>>>;

/// Registry of live previews
#[derive(Debug, Clone, Default)]
pub struct PreviewStore {
    inner: Arc<Mutex<Registry>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `bytes` and hand back the handle that owns the registration
    pub fn acquire(&self, bytes: Vec<u8>) -> PreviewHandle {
        let id = PreviewId::new();
        self.registry().insert(id, Arc::new(bytes));
        PreviewHandle {
            id,
            registry: self.inner.clone(),
        }
    }

    pub fn get(&self, id: PreviewId) -> Option<Arc<Vec<u8>>> {
        self.registry().get(&id).cloned()
    }

    /// Number of previews not yet released
    pub fn live(&self) -> usize {
        self.registry().len()
    }
}

/// Owner of one registered preview
#[derive(Debug)]
pub struct PreviewHandle {
    id: PreviewId,
    registry: Arc<Mutex<Registry>>,
}

impl PreviewHandle {
    pub fn id(&self) -> PreviewId {
        self.id
    }

    pub fn url(&self) -> String {
        format!("preview://{}", self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registry.remove(&self.id);
    }
}

/// A portrait held both as a displayable handle and as base64 for saving.
///
/// The two are only ever set and cleared together.
#[derive(Debug)]
pub struct PortraitCache {
    store: PreviewStore,
    current: Option<(PreviewHandle, String)>,
}

impl PortraitCache {
    pub fn new(store: PreviewStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Replace the portrait with freshly generated bytes
    pub fn replace(&mut self, bytes: Vec<u8>) {
        // Release the previous handle before acquiring the next one.
        self.current = None;
        let encoded = STANDARD.encode(&bytes);
        let handle = self.store.acquire(bytes);
        self.current = Some((handle, encoded));
    }

    /// Replace the portrait with one read back from the library
    pub fn load_encoded(&mut self, encoded: &str) -> Result<(), base64::DecodeError> {
        self.current = None;
        let bytes = STANDARD.decode(encoded.trim())?;
        let handle = self.store.acquire(bytes);
        self.current = Some((handle, encoded.trim().to_string()));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_present(&self) -> bool {
        self.current.is_some()
    }

    pub fn url(&self) -> Option<String> {
        self.current.as_ref().map(|(handle, _)| handle.url())
    }

    pub fn encoded(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, encoded)| encoded.as_str())
    }

    pub fn bytes(&self) -> Option<Arc<Vec<u8>>> {
        self.current
            .as_ref()
            .and_then(|(handle, _)| self.store.get(handle.id()))
    }
}
