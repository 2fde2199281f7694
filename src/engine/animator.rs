use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant};
use tracing::{debug, info};

use crate::geo::{self, GeoPoint, Route};
use crate::models::order::{Order, OrderStatus};
use crate::observability::metrics::Metrics;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct AgentAnimator {
    route: Route,
    metrics: Metrics,
    state: Arc<Mutex<AnimatorState>>,
    position_tx: watch::Sender<Option<GeoPoint>>,
}

struct AnimatorState {
    ticker: Option<JoinHandle<()>>,
    retained: Option<GeoPoint>,
    generation: u64,
}

impl Drop for AnimatorState {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl AgentAnimator {
    pub fn new(route: Route, metrics: Metrics) -> Self {
        let (position_tx, _) = watch::channel(None);
        Self {
            route,
            metrics,
            state: Arc::new(Mutex::new(AnimatorState {
                ticker: None,
                retained: None,
                generation: 0,
            })),
            position_tx,
        }
    }

    pub fn sync(&self, order: Option<&Order>) {
        let mut state = self.state.lock().expect("animator state lock");

        if order.is_some_and(|order| order.status.is_animatable()) {
            if state.ticker.is_some() {
                return;
            }
            let position = state.retained.unwrap_or(self.route.origin);
            state.retained = Some(position);
            self.position_tx.send_replace(Some(position));
            state.generation = state.generation.wrapping_add(1);
            state.ticker = Some(self.spawn_ticker(state.generation));
            self.metrics.agent_en_route.set(1);
            info!(
                lat = position.lat,
                lng = position.lng,
                "delivery agent animation started"
            );
            return;
        }

        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
            state.generation = state.generation.wrapping_add(1);
            self.metrics.agent_en_route.set(0);
            debug!("delivery agent animation stopped");
        }

        let order_gone = match order {
            None => true,
            Some(order) => order.status == OrderStatus::Delivered,
        };
        if order_gone {
            state.retained = None;
            if self.position_tx.borrow().is_some() {
                self.position_tx.send_replace(None);
                debug!("delivery agent marker cleared");
            }
        }
    }

    pub fn current_position(&self) -> Option<GeoPoint> {
        *self.position_tx.borrow()
    }

    pub fn positions(&self) -> watch::Receiver<Option<GeoPoint>> {
        self.position_tx.subscribe()
    }

    pub fn is_animating(&self) -> bool {
        self.state
            .lock()
            .expect("animator state lock")
            .ticker
            .is_some()
    }

    fn spawn_ticker(&self, generation: u64) -> JoinHandle<()> {
        let shared = Arc::downgrade(&self.state);
        let position_tx = self.position_tx.clone();
        let route = self.route;
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
            loop {
                ticks.tick().await;

                let Some(shared) = shared.upgrade() else {
                    return;
                };
                let mut state = shared.lock().expect("animator state lock");
                if state.generation != generation {
                    return;
                }

                let current = state.retained.unwrap_or(route.origin);
                let step = geo::advance(current, &route);
                let position = step.position();
                state.retained = Some(position);
                position_tx.send_replace(Some(position));
                metrics.animation_ticks_total.inc();

                if step.is_arrived() {
                    state.ticker = None;
                    metrics.agent_en_route.set(0);
                    info!(
                        lat = position.lat,
                        lng = position.lng,
                        "delivery agent arrived at the drop-off"
                    );
                    return;
                }
            }
        })
    }
}
