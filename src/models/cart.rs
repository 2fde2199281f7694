use serde::{Deserialize, Serialize};

use crate::models::order::OrderItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
}

impl Cart {
    pub fn priced(items: Vec<OrderItem>, delivery_fee: f64, tax: f64) -> Self {
        let subtotal: f64 = items
            .iter()
            .map(|item| item.unit_price * f64::from(item.quantity))
            .sum();

        Self {
            subtotal,
            delivery_fee,
            tax,
            total: subtotal + delivery_fee + tax,
            items,
        }
    }
}
