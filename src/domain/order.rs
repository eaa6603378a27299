use serde::{Deserialize, Serialize};

/// Lifecycle status of an order as reported by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product line within an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount_percentage: f64,
    /// Discount for the whole line (per-unit discount times quantity)
    pub discount_amount: f64,
    pub subtotal: f64,
}

/// An unenriched order record as produced by the storefront export.
///
/// `order_id`, `items`, `subtotal` and `total_amount` fall back to empty values
/// when missing so the validator can report them instead of the line being
/// dropped as malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    #[serde(default)]
    pub order_id: String,
    pub order_date: String,
    pub customer_id: String,
    pub customer_email: String,
    pub customer_city: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub num_items: u32,
    pub total_quantity: u32,
    #[serde(default)]
    pub subtotal: f64,
    pub total_discount: f64,
    pub shipping_cost: f64,
    #[serde(default)]
    pub tax_rate: f64,
    pub tax_amount: f64,
    #[serde(default)]
    pub total_amount: f64,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: String,
}
