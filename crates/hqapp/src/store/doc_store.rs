use super::backend::StorageBackend;
use super::DocumentStore;
use crate::error::{HqError, Result};
use crate::model::{Document, DocumentKind};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct DocStore<B: StorageBackend> {
    backend: Arc<B>,
    locks: Mutex<HashMap<DocumentKind, Arc<Mutex<()>>>>,
}

impl<B: StorageBackend> DocStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self::with_shared_backend(Arc::new(backend))
    }

    pub fn with_shared_backend(backend: Arc<B>) -> Self {
        Self {
            backend,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn shared_backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    fn lock_for(&self, kind: DocumentKind) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().entry(kind).or_default())
    }

    fn load_raw(&self, kind: DocumentKind) -> Option<String> {
        match self.backend.read(&kind.file_path()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(document = %kind, error = %e, "document unreadable, using default");
                None
            }
        }
    }

    fn load<D: Document>(&self) -> D {
        let Some(raw) = self.load_raw(D::KIND) else {
            return D::default_document();
        };
        match serde_json::from_str::<D>(&raw) {
            Ok(doc) => doc.normalized(),
            Err(e) => {
                warn!(document = %D::KIND, error = %e, "document unparsable, using default");
                D::default_document()
            }
        }
    }

    // Strict counterpart of `load` for read-modify-write.
    fn load_for_update<D: Document>(&self) -> Result<D> {
        let Some(raw) = self.backend.read(&D::KIND.file_path())? else {
            return Ok(D::default_document());
        };
        match serde_json::from_str::<D>(&raw) {
            Ok(doc) => Ok(doc.normalized()),
            Err(e) => {
                warn!(document = %D::KIND, error = %e, "refusing to overwrite unparsable document");
                Err(HqError::Store(format!(
                    "{} cannot be parsed ({}); fix or remove it before changing it",
                    D::KIND.file_path().display(),
                    e
                )))
            }
        }
    }

    fn persist<D: Document>(&self, mut doc: D) -> Result<D> {
        doc.set_last_modified(Utc::now());
        let content = serde_json::to_string_pretty(&doc)?;
        self.backend.write(&D::KIND.file_path(), &content)?;
        debug!(document = %D::KIND, bytes = content.len(), "document written");
        Ok(doc)
    }
}

impl<B: StorageBackend> DocumentStore for DocStore<B> {
    fn read<D: Document>(&self) -> D {
        self.load()
    }

    fn write<D: Document>(&self, doc: D) -> Result<D> {
        let lock = self.lock_for(D::KIND);
        let _guard = lock.lock();
        self.persist(doc)
    }

    fn update<D, F>(&self, apply: F) -> Result<D>
    where
        D: Document,
        F: FnOnce(D) -> D,
    {
        let lock = self.lock_for(D::KIND);
        let _guard = lock.lock();
        let current = self.load_for_update::<D>()?;
        self.persist(apply(current))
    }

    fn read_value(&self, kind: DocumentKind) -> Result<Value> {
        match self.load_raw(kind).and_then(|raw| kind.normalize_value(&raw)) {
            Some(value) => Ok(value),
            None => kind.default_value(),
        }
    }
}
