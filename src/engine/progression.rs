use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use crate::models::order::{Order, OrderStatus};
use crate::observability::metrics::Metrics;
use crate::store::{Document, DocumentPath, DocumentStore};

pub const ADVANCEMENT_DELAY: Duration = Duration::from_secs(10);

pub struct StatusProgression {
    store: Arc<dyn DocumentStore>,
    path: DocumentPath,
    metrics: Metrics,
    pending: Option<PendingAdvance>,
}

struct PendingAdvance {
    from: OrderStatus,
    timer: JoinHandle<()>,
}

impl StatusProgression {
    pub fn new(store: Arc<dyn DocumentStore>, path: DocumentPath, metrics: Metrics) -> Self {
        Self {
            store,
            path,
            metrics,
            pending: None,
        }
    }

    pub fn observe(&mut self, order: &Order) {
        if let Some(pending) = &self.pending {
            if pending.from == order.status {
                return;
            }
        }
        self.cancel();

        let Some(next) = order.status.next() else {
            debug!(order_id = %order.id, "order delivered; progression complete");
            return;
        };

        let store = Arc::clone(&self.store);
        let path = self.path.clone();
        let metrics = self.metrics.clone();
        let order_id = order.id;
        let timer = tokio::spawn(async move {
            sleep(ADVANCEMENT_DELAY).await;

            metrics
                .status_advances_total
                .with_label_values(&[next.as_str()])
                .inc();

            let mut patch = Document::new();
            patch.insert(
                "status".to_string(),
                Value::String(next.as_str().to_string()),
            );

            match store.update(&path, patch).await {
                Ok(()) => info!(order_id = %order_id, status = %next, "order status advanced"),
                Err(err) => {
                    metrics.status_advance_failures_total.inc();
                    error!(
                        order_id = %order_id,
                        status = %next,
                        error = %err,
                        "failed to advance order status"
                    );
                }
            }
        });

        self.pending = Some(PendingAdvance {
            from: order.status,
            timer,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.timer.abort();
        }
    }
}

impl Drop for StatusProgression {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::time::advance;
    use uuid::Uuid;

    use crate::error::StoreError;
    use crate::models::cart::Cart;
    use crate::models::order::{OrderItem, PaymentMethod};
    use crate::store::memory::MemoryStore;
    use crate::store::{CollectionPath, DocumentWatch};

    fn sample_order(status: OrderStatus) -> Order {
        let cart = Cart::priced(
            vec![OrderItem {
                id: 1,
                name: "Veg Biryani".to_string(),
                bistro_name: "Barman's Bistro".to_string(),
                unit_price: 250.0,
                quantity: 1,
            }],
            50.0,
            40.0,
        );
        let mut order = Order::place(cart, "42 Residency Road", PaymentMethod::Upi, Uuid::new_v4());
        order.status = status;
        order
    }

    async fn stored(store: &MemoryStore, order: &mut Order) -> DocumentPath {
        let collection = CollectionPath::user_orders("test-app", order.owner_id);
        let id = store
            .create(&collection, order.to_document().unwrap())
            .await
            .unwrap();
        order.id = id;
        collection.doc(id)
    }

    async fn status_at(store: &MemoryStore, path: &DocumentPath) -> String {
        let document = store.get(path).await.unwrap();
        document["status"].as_str().unwrap().to_string()
    }

    async fn settle() {
        sleep(Duration::from_millis(1)).await;
    }

    struct CountingStore {
        inner: Arc<MemoryStore>,
        updates: AtomicUsize,
    }

    impl CountingStore {
        fn wrapping(inner: Arc<MemoryStore>) -> Arc<Self> {
            Arc::new(Self {
                inner,
                updates: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn create(
            &self,
            collection: &CollectionPath,
            document: Document,
        ) -> Result<Uuid, StoreError> {
            self.inner.create(collection, document).await
        }

        async fn get(&self, path: &DocumentPath) -> Result<Document, StoreError> {
            self.inner.get(path).await
        }

        async fn update(&self, path: &DocumentPath, patch: Document) -> Result<(), StoreError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update(path, patch).await
        }

        fn watch(&self, path: &DocumentPath) -> DocumentWatch {
            self.inner.watch(path)
        }
    }

    struct UpdateFailsStore {
        inner: Arc<MemoryStore>,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for UpdateFailsStore {
        async fn create(
            &self,
            collection: &CollectionPath,
            document: Document,
        ) -> Result<Uuid, StoreError> {
            self.inner.create(collection, document).await
        }

        async fn get(&self, path: &DocumentPath) -> Result<Document, StoreError> {
            self.inner.get(path).await
        }

        async fn update(&self, _path: &DocumentPath, _patch: Document) -> Result<(), StoreError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Unavailable("simulated outage".to_string()))
        }

        fn watch(&self, path: &DocumentPath) -> DocumentWatch {
            self.inner.watch(path)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn advances_exactly_once_after_the_delay() {
        let store = Arc::new(MemoryStore::new());
        let mut order = sample_order(OrderStatus::OrderPlaced);
        let path = stored(&store, &mut order).await;

        let mut progression = StatusProgression::new(store.clone(), path.clone(), Metrics::new());
        progression.observe(&order);
        settle().await;

        advance(Duration::from_secs(9)).await;
        settle().await;
        assert_eq!(status_at(&store, &path).await, "Order Placed");

        advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(status_at(&store, &path).await, "Preparing");

        advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(status_at(&store, &path).await, "Preparing");
    }

    #[tokio::test(start_paused = true)]
    async fn reobserving_the_same_status_schedules_nothing_new() {
        let memory = Arc::new(MemoryStore::new());
        let store = CountingStore::wrapping(memory.clone());
        let mut order = sample_order(OrderStatus::OrderPlaced);
        let path = stored(&memory, &mut order).await;

        let mut progression = StatusProgression::new(store.clone(), path.clone(), Metrics::new());
        for _ in 0..5 {
            progression.observe(&order);
            settle().await;
            advance(Duration::from_secs(1)).await;
        }

        advance(Duration::from_secs(10)).await;
        settle().await;

        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
        assert_eq!(status_at(&memory, &path).await, "Preparing");
    }

    #[tokio::test(start_paused = true)]
    async fn a_status_change_cancels_the_stale_timer() {
        let memory = Arc::new(MemoryStore::new());
        let store = CountingStore::wrapping(memory.clone());
        let mut order = sample_order(OrderStatus::OrderPlaced);
        let path = stored(&memory, &mut order).await;

        let mut progression = StatusProgression::new(store.clone(), path.clone(), Metrics::new());
        progression.observe(&order);
        settle().await;

        advance(Duration::from_secs(5)).await;
        let mut patch = Document::new();
        patch.insert(
            "status".to_string(),
            Value::String(OrderStatus::Preparing.as_str().to_string()),
        );
        memory.update(&path, patch).await.unwrap();
        order.status = OrderStatus::Preparing;
        progression.observe(&order);
        settle().await;

        advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);

        advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
        assert_eq!(status_at(&memory, &path).await, "Picked by Delivery Partner");
    }

    #[tokio::test(start_paused = true)]
    async fn delivered_orders_are_left_alone() {
        let memory = Arc::new(MemoryStore::new());
        let store = CountingStore::wrapping(memory.clone());
        let mut order = sample_order(OrderStatus::Delivered);
        let path = stored(&memory, &mut order).await;

        let mut progression = StatusProgression::new(store.clone(), path.clone(), Metrics::new());
        progression.observe(&order);

        advance(Duration::from_secs(60)).await;
        settle().await;

        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
        assert_eq!(status_at(&memory, &path).await, "Delivered");
    }

    #[tokio::test(start_paused = true)]
    async fn a_failed_write_stalls_quietly() {
        let memory = Arc::new(MemoryStore::new());
        let store = Arc::new(UpdateFailsStore {
            inner: memory.clone(),
            attempts: AtomicUsize::new(0),
        });
        let mut order = sample_order(OrderStatus::OrderPlaced);
        let path = stored(&memory, &mut order).await;

        let metrics = Metrics::new();
        let mut progression = StatusProgression::new(store.clone(), path.clone(), metrics.clone());
        progression.observe(&order);
        settle().await;

        advance(Duration::from_secs(10)).await;
        settle().await;

        assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.status_advance_failures_total.get(), 1);
        assert_eq!(status_at(&memory, &path).await, "Order Placed");

        progression.observe(&order);
        advance(Duration::from_secs(20)).await;
        settle().await;
        assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_progression_cancels_the_pending_write() {
        let store = Arc::new(MemoryStore::new());
        let mut order = sample_order(OrderStatus::OrderPlaced);
        let path = stored(&store, &mut order).await;

        let mut progression = StatusProgression::new(store.clone(), path.clone(), Metrics::new());
        progression.observe(&order);
        settle().await;

        advance(Duration::from_secs(5)).await;
        drop(progression);

        advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(status_at(&store, &path).await, "Order Placed");
    }
}
