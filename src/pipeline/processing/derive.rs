//! Metric derivers.
//!
//! Each function computes one analytic facet of an order from its raw fields
//! and nothing else, so they can run in any order. Business thresholds come in
//! through the config structs rather than globals.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Timelike, Weekday};
use thiserror::Error;

use crate::config::{PriorityRules, SegmentRules, ValueTiers};
use crate::domain::{
    CategoryMix, CustomerSegment, DeliveryPriority, DiscountPattern, LineItem, OrderValueClass,
    ProductMix, ProfitAnalysis, RawOrder,
};

/// Round to cents on the exact binary value, ties to even.
///
/// Scaling by 100 first can land a value just below a half cent on an exact
/// tie, so the decimal formatter does the rounding instead.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

pub fn classify_order_value(total_amount: f64, tiers: &ValueTiers) -> OrderValueClass {
    if total_amount >= tiers.premium {
        OrderValueClass::Premium
    } else if total_amount >= tiers.high_value {
        OrderValueClass::HighValue
    } else if total_amount >= tiers.medium_value {
        OrderValueClass::MediumValue
    } else {
        OrderValueClass::LowValue
    }
}

pub fn classify_customer_segment(
    total_quantity: u32,
    total_amount: f64,
    rules: &SegmentRules,
) -> CustomerSegment {
    if total_quantity >= rules.bulk_quantity || total_amount >= rules.vip_amount {
        CustomerSegment::Vip
    } else if total_amount >= rules.regular_amount {
        CustomerSegment::Regular
    } else {
        CustomerSegment::Occasional
    }
}

/// Profit estimate assuming goods cost `cost_ratio` of their list price
pub fn calculate_profit_margin(items: &[LineItem], cost_ratio: f64) -> ProfitAnalysis {
    let total_cost: f64 = items
        .iter()
        .map(|i| i.unit_price * cost_ratio * f64::from(i.quantity))
        .sum();
    let total_revenue: f64 = items.iter().map(|i| i.subtotal).sum();
    let profit = total_revenue - total_cost;
    let margin_percentage = if total_revenue > 0.0 {
        profit / total_revenue * 100.0
    } else {
        0.0
    };

    ProfitAnalysis {
        estimated_cost: round2(total_cost),
        revenue: round2(total_revenue),
        profit: round2(profit),
        margin_percentage: round2(margin_percentage),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("quantity overflow in category '{0}'")]
pub struct QuantityOverflow(pub String);

pub fn analyze_product_mix(items: &[LineItem]) -> Result<ProductMix, QuantityOverflow> {
    let mut categories: BTreeMap<String, CategoryMix> = BTreeMap::new();

    for item in items {
        let entry = categories
            .entry(item.category.to_lowercase())
            .or_insert(CategoryMix {
                count: 0,
                quantity: 0,
                revenue: 0.0,
            });
        entry.count += 1;
        entry.quantity = entry
            .quantity
            .checked_add(item.quantity)
            .ok_or_else(|| QuantityOverflow(item.category.to_lowercase()))?;
        entry.revenue += item.subtotal;
    }

    for mix in categories.values_mut() {
        mix.revenue = round2(mix.revenue);
    }

    Ok(categories)
}

/// Discount usage for an order. `total_savings` sums every line's
/// `discount_amount`, not only the discounted lines.
pub fn detect_discount_pattern(items: &[LineItem]) -> DiscountPattern {
    let discounted: Vec<&LineItem> = items.iter().filter(|i| i.discount_percentage > 0.0).collect();
    if discounted.is_empty() {
        return DiscountPattern {
            uses_discounts: false,
            num_discounted_items: 0,
            avg_discount_percentage: 0.0,
            total_savings: 0.0,
        };
    }

    let avg_discount = discounted.iter().map(|i| i.discount_percentage).sum::<f64>()
        / discounted.len() as f64;
    let total_savings: f64 = items.iter().map(|i| i.discount_amount).sum();

    DiscountPattern {
        uses_discounts: true,
        num_discounted_items: discounted.len(),
        avg_discount_percentage: round2(avg_discount),
        total_savings: round2(total_savings),
    }
}

/// Additive delivery score: order value, city and status each add points
pub fn delivery_score(order: &RawOrder, rules: &PriorityRules) -> u32 {
    let mut score = 0;
    if order.total_amount >= rules.high_value_amount {
        score += rules.high_value_points;
    }
    if rules.major_cities.iter().any(|c| c == &order.customer_city) {
        score += rules.major_city_points;
    }
    if rules.expedited_statuses.contains(&order.status) {
        score += rules.status_points;
    }
    score
}

pub fn calculate_delivery_priority(order: &RawOrder, rules: &PriorityRules) -> DeliveryPriority {
    let score = delivery_score(order, rules);
    if score >= rules.urgent_score {
        DeliveryPriority::Urgent
    } else if score >= rules.normal_score {
        DeliveryPriority::Normal
    } else {
        DeliveryPriority::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable order date '{0}'")]
pub struct OrderDateError(pub String);

/// Calendar facets of the order timestamp, in the timestamp's own offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalFacets {
    pub hour: u32,
    pub day_of_week: &'static str,
    pub is_weekend: bool,
}

/// Parse an ISO-8601 timestamp. `Z` and numeric offsets are honoured; a
/// timestamp without offset is read as UTC.
pub fn parse_order_date(raw: &str) -> Result<DateTime<FixedOffset>, OrderDateError> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    Err(OrderDateError(raw.to_string()))
}

pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn temporal_facets(order_date: &str) -> Result<TemporalFacets, OrderDateError> {
    let dt = parse_order_date(order_date)?;
    let weekday = dt.weekday();
    Ok(TemporalFacets {
        hour: dt.hour(),
        day_of_week: day_name(weekday),
        is_weekend: weekday.num_days_from_monday() >= 5,
    })
}

/// `None` when the order declares zero items
pub fn average_item_value(subtotal: f64, num_items: u32) -> Option<f64> {
    if num_items == 0 {
        return None;
    }
    Some(round2(subtotal / f64::from(num_items)))
}

pub fn discount_rate(total_discount: f64, subtotal: f64) -> f64 {
    if subtotal > 0.0 {
        round2(total_discount / subtotal * 100.0)
    } else {
        0.0
    }
}
