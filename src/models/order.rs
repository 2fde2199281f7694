use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::cart::Cart;
use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Order Placed")]
    OrderPlaced,
    Preparing,
    #[serde(rename = "Picked by Delivery Partner")]
    PickedByDeliveryPartner,
    #[serde(rename = "On the Way")]
    OnTheWay,
    Delivered,
}

impl OrderStatus {
    pub const SEQUENCE: [OrderStatus; 5] = [
        OrderStatus::OrderPlaced,
        OrderStatus::Preparing,
        OrderStatus::PickedByDeliveryPartner,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
    ];

    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::OrderPlaced => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::PickedByDeliveryPartner),
            OrderStatus::PickedByDeliveryPartner => Some(OrderStatus::OnTheWay),
            OrderStatus::OnTheWay => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::OrderPlaced => "Order Placed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::PickedByDeliveryPartner => "Picked by Delivery Partner",
            OrderStatus::OnTheWay => "On the Way",
            OrderStatus::Delivered => "Delivered",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OrderStatus::OrderPlaced => "Your order has been placed successfully",
            OrderStatus::Preparing => "The restaurant is preparing your delicious meal",
            OrderStatus::PickedByDeliveryPartner => "Your order has been picked up",
            OrderStatus::OnTheWay => "Your order is being delivered to you",
            OrderStatus::Delivered => "Enjoy your meal!",
        }
    }

    pub fn sequence_index(self) -> usize {
        match self {
            OrderStatus::OrderPlaced => 0,
            OrderStatus::Preparing => 1,
            OrderStatus::PickedByDeliveryPartner => 2,
            OrderStatus::OnTheWay => 3,
            OrderStatus::Delivered => 4,
        }
    }

    pub fn is_animatable(self) -> bool {
        matches!(
            self,
            OrderStatus::PickedByDeliveryPartner | OrderStatus::OnTheWay
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "COD")]
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Upi => f.write_str("UPI"),
            PaymentMethod::CashOnDelivery => f.write_str("COD"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: u32,
    pub name: String,
    pub bistro_name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip)]
    pub id: Uuid,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
}

impl Order {
    pub fn place(
        cart: Cart,
        delivery_address: impl Into<String>,
        payment_method: PaymentMethod,
        owner_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            items: cart.items,
            subtotal: cart.subtotal,
            delivery_fee: cart.delivery_fee,
            tax: cart.tax,
            total: cart.total,
            delivery_address: delivery_address.into(),
            payment_method,
            status: OrderStatus::OrderPlaced,
            created_at: Utc::now(),
            owner_id,
        }
    }

    pub fn short_ref(&self) -> String {
        let id = self.id.simple().to_string();
        format!("#{}", &id[..8])
    }

    pub fn to_document(&self) -> Result<Document, StoreError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => Err(StoreError::InvalidDocument(
                "order did not serialize to an object".to_string(),
            )),
            Err(err) => Err(StoreError::InvalidDocument(err.to_string())),
        }
    }

    pub fn from_document(id: Uuid, document: Document) -> Result<Self, StoreError> {
        let mut order: Order = serde_json::from_value(Value::Object(document))
            .map_err(|err| StoreError::InvalidDocument(err.to_string()))?;
        order.id = id;
        Ok(order)
    }
}
