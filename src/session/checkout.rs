use crate::models::cart::Cart;
use crate::models::order::OrderItem;

pub const DEFAULT_ADDRESS: &str = "123 MG Road, Bangalore, Karnataka 560001";

pub fn sample_cart() -> Cart {
    Cart::priced(
        vec![
            OrderItem {
                id: 1,
                name: "Hakka Noodles".to_string(),
                bistro_name: "Barman's Bistro".to_string(),
                unit_price: 220.0,
                quantity: 1,
            },
            OrderItem {
                id: 2,
                name: "Chicken Fried Rice".to_string(),
                bistro_name: "Barman's Bistro".to_string(),
                unit_price: 280.0,
                quantity: 1,
            },
        ],
        50.0,
        40.0,
    )
}
