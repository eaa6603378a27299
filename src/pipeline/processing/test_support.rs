use crate::domain::{LineItem, OrderStatus, RawOrder};
use crate::pipeline::processing::derive::round2;

/// Line item priced the way the storefront export prices it
pub fn item(category: &str, quantity: u32, unit_price: f64, discount_percentage: f64) -> LineItem {
    let unit_discount = round2(unit_price * discount_percentage / 100.0);
    LineItem {
        product_id: format!("{}-001", category.to_uppercase()),
        product_name: format!("{} product", category),
        category: category.to_string(),
        quantity,
        unit_price,
        discount_percentage,
        discount_amount: round2(unit_discount * f64::from(quantity)),
        subtotal: round2((unit_price - unit_discount) * f64::from(quantity)),
    }
}

/// A consistent two-line order placed on Saturday 2025-03-15 at 14:30 UTC
pub fn sample_order(order_id: &str) -> RawOrder {
    let items = vec![
        item("Smartphones", 1, 1199.99, 0.0),
        item("Shoes", 2, 129.99, 10.0),
    ];
    let subtotal: f64 = items.iter().map(|i| i.subtotal).sum();
    let total_discount: f64 = items.iter().map(|i| i.discount_amount).sum();
    let tax_amount = round2(subtotal * 0.2);

    RawOrder {
        order_id: order_id.to_string(),
        order_date: "2025-03-15T14:30:00Z".to_string(),
        customer_id: "CUST-12345678".to_string(),
        customer_email: "customer12345678@gmail.com".to_string(),
        customer_city: "Toulouse".to_string(),
        num_items: items.len() as u32,
        total_quantity: items.iter().map(|i| i.quantity).sum(),
        items,
        subtotal,
        total_discount,
        shipping_cost: 0.0,
        tax_rate: 0.2,
        tax_amount,
        total_amount: round2(subtotal + tax_amount),
        payment_method: "credit_card".to_string(),
        status: OrderStatus::Pending,
        created_at: "2025-03-15T14:30:05Z".to_string(),
    }
}
