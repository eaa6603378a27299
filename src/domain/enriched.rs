use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::order::{LineItem, OrderStatus};

/// Value tier of an order, derived from its total amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderValueClass {
    Premium,
    HighValue,
    MediumValue,
    LowValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSegment {
    Vip,
    Regular,
    Occasional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPriority {
    Urgent,
    Normal,
    Standard,
}

/// Estimated profitability of an order's lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitAnalysis {
    pub estimated_cost: f64,
    pub revenue: f64,
    pub profit: f64,
    pub margin_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountPattern {
    pub uses_discounts: bool,
    pub num_discounted_items: usize,
    pub avg_discount_percentage: f64,
    /// Savings across every line of the order, discounted or not
    pub total_savings: f64,
}

/// Per-category aggregate within one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMix {
    pub count: usize,
    pub quantity: u32,
    pub revenue: f64,
}

/// Lower-cased category name to its aggregate
pub type ProductMix = BTreeMap<String, CategoryMix>;

/// An analytics-ready order: the raw fields plus every derived metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    pub order_id: String,
    pub order_date: String,
    pub customer_id: String,
    pub customer_email: String,
    pub customer_city: String,
    pub status: OrderStatus,
    pub payment_method: String,
    pub items: Vec<LineItem>,
    pub num_items: u32,
    pub total_quantity: u32,
    pub subtotal: f64,
    pub total_discount: f64,
    pub shipping_cost: f64,
    pub tax_amount: f64,
    pub total_amount: f64,

    pub order_value_class: OrderValueClass,
    pub customer_segment: CustomerSegment,
    pub delivery_priority: DeliveryPriority,
    pub profit_analysis: ProfitAnalysis,
    pub discount_pattern: DiscountPattern,
    pub product_mix: ProductMix,
    pub average_item_value: f64,
    pub discount_rate: f64,
    pub tax_rate_applied: f64,
    pub order_hour: u32,
    pub order_day_of_week: String,
    pub is_weekend_order: bool,
    pub processed_at: String,
    pub processor_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifications_serialize_as_snake_case() {
        assert_eq!(serde_json::to_string(&OrderValueClass::HighValue).unwrap(), "\"high_value\"");
        assert_eq!(serde_json::to_string(&CustomerSegment::Vip).unwrap(), "\"vip\"");
        assert_eq!(serde_json::to_string(&DeliveryPriority::Standard).unwrap(), "\"standard\"");
    }
}
