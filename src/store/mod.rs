use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::Stream;
use uuid::Uuid;

use crate::error::StoreError;

pub mod memory;

pub type Document = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn user_orders(app_id: &str, user_id: Uuid) -> Self {
        Self(format!("artifacts/{app_id}/users/{user_id}/orders"))
    }

    pub fn doc(&self, id: Uuid) -> DocumentPath {
        DocumentPath {
            collection: self.clone(),
            id,
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    pub collection: CollectionPath,
    pub id: Uuid,
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

pub struct DocumentWatch {
    inner: WatchStream<Option<Document>>,
}

impl DocumentWatch {
    pub fn from_receiver(receiver: watch::Receiver<Option<Document>>) -> Self {
        Self {
            inner: WatchStream::new(receiver),
        }
    }
}

impl Stream for DocumentWatch {
    type Item = Option<Document>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn create(
        &self,
        collection: &CollectionPath,
        document: Document,
    ) -> Result<Uuid, StoreError>;

    async fn get(&self, path: &DocumentPath) -> Result<Document, StoreError>;

    async fn update(&self, path: &DocumentPath, patch: Document) -> Result<(), StoreError>;

    fn watch(&self, path: &DocumentPath) -> DocumentWatch;
}
