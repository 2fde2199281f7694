use serde::Serialize;

use crate::models::order::{Order, OrderItem, OrderStatus, PaymentMethod};

pub const DELIVERY_ESTIMATE: &str = "25-35 min";

#[derive(Debug, Clone, Serialize)]
pub struct TimelineStep {
    pub status: OrderStatus,
    pub description: &'static str,
    pub reached: bool,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineView {
    pub order_ref: String,
    pub total: f64,
    pub delivery_estimate: &'static str,
    pub delivery_address: String,
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    pub steps: Vec<TimelineStep>,
}

pub fn timeline(order: &Order) -> TimelineView {
    let current = order.status.sequence_index();
    let steps = OrderStatus::SEQUENCE
        .into_iter()
        .enumerate()
        .map(|(index, status)| TimelineStep {
            status,
            description: status.description(),
            reached: index <= current,
            current: index == current,
        })
        .collect();

    TimelineView {
        order_ref: order.short_ref(),
        total: order.total,
        delivery_estimate: DELIVERY_ESTIMATE,
        delivery_address: order.delivery_address.clone(),
        items: order.items.clone(),
        payment_method: order.payment_method,
        steps,
    }
}
