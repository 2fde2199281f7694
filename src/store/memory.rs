use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{CollectionPath, Document, DocumentPath, DocumentStore, DocumentWatch};

#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<CollectionPath, DashMap<Uuid, Arc<watch::Sender<Option<Document>>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, path: &DocumentPath) -> Arc<watch::Sender<Option<Document>>> {
        let collection = self
            .collections
            .entry(path.collection.clone())
            .or_default();
        collection
            .entry(path.id)
            .or_insert_with(|| Arc::new(watch::channel(None).0))
            .clone()
    }

    fn current(&self, path: &DocumentPath) -> Option<Document> {
        self.collections
            .get(&path.collection)
            .and_then(|collection| {
                collection
                    .get(&path.id)
                    .map(|slot| slot.borrow().clone())
            })
            .flatten()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(
        &self,
        collection: &CollectionPath,
        document: Document,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let slot = self.slot(&collection.doc(id));
        slot.send_replace(Some(document));
        Ok(id)
    }

    async fn get(&self, path: &DocumentPath) -> Result<Document, StoreError> {
        self.current(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn update(&self, path: &DocumentPath, patch: Document) -> Result<(), StoreError> {
        if self.current(path).is_none() {
            return Err(StoreError::NotFound(path.to_string()));
        }

        let slot = self.slot(path);
        slot.send_modify(|value| {
            if let Some(document) = value.as_mut() {
                for (field, new_value) in patch {
                    document.insert(field, new_value);
                }
            }
        });
        Ok(())
    }

    fn watch(&self, path: &DocumentPath) -> DocumentWatch {
        DocumentWatch::from_receiver(self.slot(path).subscribe())
    }
}
