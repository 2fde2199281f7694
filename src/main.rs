mod config;
mod engine;
mod error;
mod geo;
mod identity;
mod models;
mod observability;
mod session;
mod store;

use std::sync::Arc;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::identity::AnonymousAuth;
use crate::models::order::{OrderStatus, PaymentMethod};
use crate::observability::metrics::Metrics;
use crate::session::{checkout, Screen, Session};
use crate::store::memory::MemoryStore;
use crate::store::DocumentStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), error::SessionError> {
    let config = config::Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let metrics = Metrics::new();
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let auth = Arc::new(AnonymousAuth::new());
    let mut session = Session::new(store, auth, metrics.clone(), config.app_id.clone());

    session.bootstrap().await?;

    let cart = checkout::sample_cart();
    info!(
        items = cart.items.len(),
        total = cart.total,
        "checking out the sample cart"
    );
    session
        .place_order(cart, checkout::DEFAULT_ADDRESS, PaymentMethod::Upi)
        .await?;

    let mut orders = session.orders();
    let mut positions = session.agent_positions();
    let mut faults = session.errors();
    let mut last_status = None;

    loop {
        tokio::select! {
            changed = orders.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(order) = orders.borrow_and_update().clone() else {
                    continue;
                };
                if last_status == Some(order.status) {
                    continue;
                }
                last_status = Some(order.status);
                info!(
                    order = %order.short_ref(),
                    status = %order.status,
                    detail = order.status.description(),
                    "order update"
                );

                if order.status.is_animatable() && session.screen() != Screen::Track {
                    session.track_order();
                    if let Some(view) = session.track_view() {
                        info!(markers = view.markers.len(), "tracking the delivery on the map");
                    }
                }
                if order.status == OrderStatus::Delivered {
                    session.back_to_status();
                    break;
                }
            }
            changed = positions.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(position) = *positions.borrow_and_update() {
                    debug!(lat = position.lat, lng = position.lng, "delivery agent moved");
                }
            }
            changed = faults.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(fault) = faults.borrow_and_update().clone() {
                    warn!(error = %fault, "session fault");
                    break;
                }
            }
        }
    }

    if let Some(view) = session.timeline() {
        info!(order = %view.order_ref, total = view.total, "order delivered");
    }

    match metrics.encode() {
        Ok(report) => info!("final metrics\n{report}"),
        Err(err) => warn!(error = %err, "failed to encode metrics"),
    }

    Ok(())
}
