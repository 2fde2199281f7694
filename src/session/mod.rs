use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::engine::animator::AgentAnimator;
use crate::engine::progression::StatusProgression;
use crate::error::{SessionError, StoreError};
use crate::geo::{GeoPoint, Route};
use crate::identity::IdentityProvider;
use crate::models::cart::Cart;
use crate::models::order::{Order, PaymentMethod};
use crate::observability::metrics::Metrics;
use crate::store::{CollectionPath, DocumentPath, DocumentStore};

pub mod checkout;
pub mod timeline;
pub mod track;

use self::timeline::TimelineView;
use self::track::TrackView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Checkout,
    Status,
    Track,
}

pub struct Session {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn IdentityProvider>,
    metrics: Metrics,
    app_id: String,
    route: Route,
    screen: Screen,
    user_id: Option<Uuid>,
    animator: AgentAnimator,
    order_tx: watch::Sender<Option<Order>>,
    fault_tx: watch::Sender<Option<SessionError>>,
    follower: Option<JoinHandle<()>>,
}

impl Session {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn IdentityProvider>,
        metrics: Metrics,
        app_id: String,
    ) -> Self {
        let route = Route::default();
        let animator = AgentAnimator::new(route, metrics.clone());

        Self {
            store,
            auth,
            metrics,
            app_id,
            route,
            screen: Screen::Checkout,
            user_id: None,
            animator,
            order_tx: watch::channel(None).0,
            fault_tx: watch::channel(None).0,
            follower: None,
        }
    }

    pub async fn bootstrap(&mut self) -> Result<Uuid, SessionError> {
        let current = match self.auth.current_user().await {
            Ok(current) => current,
            Err(err) => return Err(self.block(SessionError::Auth(err.to_string()))),
        };

        let user_id = match current {
            Some(user_id) => user_id,
            None => match self.auth.sign_in_anonymously().await {
                Ok(user_id) => user_id,
                Err(err) => return Err(self.block(SessionError::Auth(err.to_string()))),
            },
        };

        self.user_id = Some(user_id);
        info!(user_id = %user_id, "session ready");
        Ok(user_id)
    }

    pub async fn place_order(
        &mut self,
        cart: Cart,
        delivery_address: &str,
        payment_method: PaymentMethod,
    ) -> Result<Uuid, SessionError> {
        if let Some(fault) = self.error() {
            return Err(fault);
        }
        let user_id = self.user_id.ok_or(SessionError::NotSignedIn)?;

        let order = Order::place(cart, delivery_address, payment_method, user_id);
        let document = order
            .to_document()
            .map_err(|err| SessionError::OrderRejected(err.to_string()))?;

        let collection = CollectionPath::user_orders(&self.app_id, user_id);
        let order_id = match self.store.create(&collection, document).await {
            Ok(order_id) => order_id,
            Err(err) => {
                warn!(error = %err, "order placement failed");
                return Err(SessionError::OrderRejected(err.to_string()));
            }
        };

        self.metrics.orders_placed_total.inc();
        info!(order_id = %order_id, total = order.total, "order placed");

        self.follow(collection.doc(order_id));
        self.screen = Screen::Status;
        Ok(order_id)
    }

    pub fn track_order(&mut self) {
        if self.error().is_none() && self.order().is_some() {
            self.screen = Screen::Track;
        }
    }

    pub fn back_to_status(&mut self) {
        if self.error().is_none() && self.order().is_some() {
            self.screen = Screen::Status;
        }
    }

    pub fn go_home(&mut self) {
        if let Some(follower) = self.follower.take() {
            follower.abort();
        }
        self.animator.sync(None);
        self.order_tx.send_replace(None);
        self.fault_tx.send_replace(None);
        self.screen = Screen::Checkout;
        info!("session back at checkout");
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn order(&self) -> Option<Order> {
        self.order_tx.borrow().clone()
    }

    pub fn orders(&self) -> watch::Receiver<Option<Order>> {
        self.order_tx.subscribe()
    }

    pub fn agent_position(&self) -> Option<GeoPoint> {
        self.animator.current_position()
    }

    pub fn agent_positions(&self) -> watch::Receiver<Option<GeoPoint>> {
        self.animator.positions()
    }

    pub fn error(&self) -> Option<SessionError> {
        self.fault_tx.borrow().clone()
    }

    pub fn errors(&self) -> watch::Receiver<Option<SessionError>> {
        self.fault_tx.subscribe()
    }

    pub fn timeline(&self) -> Option<TimelineView> {
        self.order().map(|order| timeline::timeline(&order))
    }

    pub fn track_view(&self) -> Option<TrackView> {
        self.order()
            .map(|_| track::track_view(&self.route, self.agent_position()))
    }

    fn block(&self, error: SessionError) -> SessionError {
        error!(error = %error, "session blocked");
        self.fault_tx.send_replace(Some(error.clone()));
        error
    }

    fn follow(&mut self, path: DocumentPath) {
        if let Some(follower) = self.follower.take() {
            follower.abort();
        }

        let store = Arc::clone(&self.store);
        let animator = self.animator.clone();
        let order_tx = self.order_tx.clone();
        let fault_tx = self.fault_tx.clone();
        let metrics = self.metrics.clone();

        self.follower = Some(tokio::spawn(async move {
            let mut snapshots = store.watch(&path);
            let mut progression =
                StatusProgression::new(Arc::clone(&store), path.clone(), metrics);

            while let Some(snapshot) = snapshots.next().await {
                let decoded = match snapshot {
                    Some(document) => Order::from_document(path.id, document),
                    None => Err(StoreError::NotFound(path.to_string())),
                };

                match decoded {
                    Ok(order) => {
                        debug!(order_id = %order.id, status = %order.status, "order snapshot");
                        progression.observe(&order);
                        animator.sync(Some(&order));
                        order_tx.send_replace(Some(order));
                    }
                    Err(err) => {
                        error!(order_id = %path.id, error = %err, "order can no longer be followed");
                        fault_tx.send_replace(Some(SessionError::OrderLost(err.to_string())));
                        animator.sync(None);
                        order_tx.send_replace(None);
                        break;
                    }
                }
            }

            debug!(order_id = %path.id, "order feed closed");
        }));
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(follower) = self.follower.take() {
            follower.abort();
        }
    }
}
