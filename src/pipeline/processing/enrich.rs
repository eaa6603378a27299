use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EnrichmentConfig;
use crate::domain::{EnrichedOrder, RawOrder};
use crate::pipeline::processing::derive::{self, OrderDateError, QuantityOverflow};
use crate::pipeline::processing::validate::{DefaultOrderValidator, OrderValidator, ValidationReport};

/// Why an order produced no enriched record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnrichmentError {
    #[error("validation failed: {}", .0.summary())]
    Validation(ValidationReport),
    #[error(transparent)]
    InvalidOrderDate(#[from] OrderDateError),
    #[error("order declares zero items")]
    ZeroItemCount,
    #[error(transparent)]
    QuantityOverflow(#[from] QuantityOverflow),
}

/// Counts for one enrichment run, reported back to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub total_input: usize,
    pub enriched: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Surviving orders, in input order
    pub enriched: Vec<EnrichedOrder>,
    pub stats: BatchStats,
}

/// Turns one validated raw order into an analytics-ready record
pub trait Enricher {
    fn enrich(&self, order: &RawOrder, processed_at: DateTime<Utc>) -> Result<EnrichedOrder, EnrichmentError>;
}

/// Enricher running the integrity checks followed by every metric deriver
pub struct DefaultEnricher {
    pub config: EnrichmentConfig,
    validator: DefaultOrderValidator,
}

impl Default for DefaultEnricher {
    fn default() -> Self {
        Self::with_config(EnrichmentConfig::default())
    }
}

impl DefaultEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EnrichmentConfig) -> Self {
        let validator = DefaultOrderValidator::from_config(&config);
        Self { config, validator }
    }

    /// Enrich a batch, stamping every record with the current time
    pub fn enrich_batch(&self, orders: &[RawOrder]) -> BatchOutcome {
        self.enrich_batch_at(orders, Utc::now())
    }

    /// Enrich a batch in input order. Rejected orders are logged and counted;
    /// they never abort the batch.
    pub fn enrich_batch_at(&self, orders: &[RawOrder], processed_at: DateTime<Utc>) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            enriched: Vec::with_capacity(orders.len()),
            stats: BatchStats {
                total_input: orders.len(),
                ..Default::default()
            },
        };

        for order in orders {
            match self.enrich(order, processed_at) {
                Ok(enriched) => {
                    debug!(order_id = %enriched.order_id, "Order enriched");
                    outcome.enriched.push(enriched);
                }
                Err(e) => {
                    let order_id = if order.order_id.is_empty() { "<none>" } else { order.order_id.as_str() };
                    warn!(order_id = %order_id, error = %e, "Invalid order rejected");
                    outcome.stats.rejected += 1;
                }
            }
        }

        outcome.stats.enriched = outcome.enriched.len();
        outcome
    }
}

impl Enricher for DefaultEnricher {
    fn enrich(&self, order: &RawOrder, processed_at: DateTime<Utc>) -> Result<EnrichedOrder, EnrichmentError> {
        let report = self.validator.validate(order);
        if !report.is_valid() {
            return Err(EnrichmentError::Validation(report));
        }

        let temporal = derive::temporal_facets(&order.order_date)?;
        let average_item_value =
            derive::average_item_value(order.subtotal, order.num_items).ok_or(EnrichmentError::ZeroItemCount)?;
        let product_mix = derive::analyze_product_mix(&order.items)?;

        Ok(EnrichedOrder {
            order_id: order.order_id.clone(),
            order_date: order.order_date.clone(),
            customer_id: order.customer_id.clone(),
            customer_email: order.customer_email.clone(),
            customer_city: order.customer_city.clone(),
            status: order.status,
            payment_method: order.payment_method.clone(),
            items: order.items.clone(),
            num_items: order.num_items,
            total_quantity: order.total_quantity,
            subtotal: order.subtotal,
            total_discount: order.total_discount,
            shipping_cost: order.shipping_cost,
            tax_amount: order.tax_amount,
            total_amount: order.total_amount,

            order_value_class: derive::classify_order_value(order.total_amount, &self.config.value_tiers),
            customer_segment: derive::classify_customer_segment(
                order.total_quantity,
                order.total_amount,
                &self.config.segments,
            ),
            delivery_priority: derive::calculate_delivery_priority(order, &self.config.priority),
            profit_analysis: derive::calculate_profit_margin(&order.items, self.config.cost_ratio),
            discount_pattern: derive::detect_discount_pattern(&order.items),
            product_mix,
            average_item_value,
            discount_rate: derive::discount_rate(order.total_discount, order.subtotal),
            tax_rate_applied: order.tax_rate,
            order_hour: temporal.hour,
            order_day_of_week: temporal.day_of_week.to_string(),
            is_weekend_order: temporal.is_weekend,
            processed_at: format_processed_at(processed_at),
            processor_version: self.config.processor_version.clone(),
        })
    }
}

/// UTC timestamp with a `Z` suffix; sub-second digits only when non-zero
fn format_processed_at(processed_at: DateTime<Utc>) -> String {
    let format = if processed_at.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    processed_at.to_rfc3339_opts(format, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerSegment, DeliveryPriority, OrderStatus, OrderValueClass};
    use crate::pipeline::processing::test_support::sample_order;
    use crate::pipeline::processing::validate::ValidationError;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 16, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_enrich_valid_order() {
        let enricher = DefaultEnricher::new();
        let enriched = enricher.enrich(&sample_order("ORD-1"), fixed_time()).unwrap();

        assert_eq!(enriched.order_id, "ORD-1");
        assert_eq!(enriched.order_value_class, OrderValueClass::Premium);
        assert_eq!(enriched.customer_segment, CustomerSegment::Vip);
        // 3 points for value, Toulouse and pending add nothing
        assert_eq!(enriched.delivery_priority, DeliveryPriority::Normal);
        assert_eq!(enriched.profit_analysis.revenue, 1433.97);
        assert_eq!(enriched.profit_analysis.estimated_cost, 875.98);
        assert!(enriched.discount_pattern.uses_discounts);
        assert_eq!(enriched.discount_pattern.total_savings, 26.0);
        assert_eq!(enriched.product_mix.len(), 2);
        assert_eq!(enriched.product_mix["shoes"].quantity, 2);
        assert_eq!(enriched.discount_rate, 1.81);
        assert_eq!(enriched.tax_rate_applied, 0.2);
        assert_eq!(enriched.order_hour, 14);
        assert_eq!(enriched.order_day_of_week, "Saturday");
        assert!(enriched.is_weekend_order);
        assert_eq!(enriched.processed_at, "2025-03-16T09:00:00Z");
        assert_eq!(enriched.processor_version, "2.0");
    }

    #[test]
    fn test_enrichment_is_idempotent_apart_from_timestamp() {
        let enricher = DefaultEnricher::new();
        let order = sample_order("ORD-1");

        let first = enricher.enrich(&order, fixed_time()).unwrap();
        let mut second = enricher.enrich(&order, Utc::now()).unwrap();
        assert_ne!(first.processed_at, second.processed_at);

        second.processed_at = first.processed_at.clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_order_reports_validation_errors() {
        let mut order = sample_order("ORD-1");
        order.subtotal += 5.0;

        let err = DefaultEnricher::new().enrich(&order, fixed_time()).unwrap_err();
        match err {
            EnrichmentError::Validation(report) => {
                assert_eq!(report.errors, vec![ValidationError::InconsistentSubtotal]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_derivation_failures_are_errors_not_panics() {
        let enricher = DefaultEnricher::new();

        let mut bad_date = sample_order("ORD-1");
        bad_date.order_date = "not-a-date".to_string();
        assert!(matches!(
            enricher.enrich(&bad_date, fixed_time()),
            Err(EnrichmentError::InvalidOrderDate(_))
        ));

        let mut zero_items = sample_order("ORD-2");
        zero_items.num_items = 0;
        assert_eq!(
            enricher.enrich(&zero_items, fixed_time()),
            Err(EnrichmentError::ZeroItemCount)
        );
    }

    #[test]
    fn test_batch_keeps_order_and_counts_rejections() {
        let mut second = sample_order("ORD-2");
        second.subtotal -= 5.0;
        let orders = vec![sample_order("ORD-1"), second, sample_order("ORD-3")];

        let outcome = DefaultEnricher::new().enrich_batch_at(&orders, fixed_time());

        let ids: Vec<&str> = outcome.enriched.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["ORD-1", "ORD-3"]);
        assert_eq!(
            outcome.stats,
            BatchStats {
                total_input: 3,
                enriched: 2,
                rejected: 1,
            }
        );
    }

    #[test]
    fn test_bad_date_does_not_abort_batch() {
        let mut broken = sample_order("ORD-2");
        broken.order_date = "2025-13-45".to_string();
        let orders = vec![broken, sample_order("ORD-3")];

        let outcome = DefaultEnricher::new().enrich_batch(&orders);
        assert_eq!(outcome.enriched.len(), 1);
        assert_eq!(outcome.stats.rejected, 1);
    }

    #[test]
    fn test_quantity_overflow_is_rejected_not_fatal() {
        let mut bulk = sample_order("ORD-2");
        for line in bulk.items.iter_mut() {
            line.category = "Shoes".to_string();
            line.quantity = 3_000_000_000;
        }
        let orders = vec![sample_order("ORD-1"), bulk, sample_order("ORD-3")];

        let outcome = DefaultEnricher::new().enrich_batch_at(&orders, fixed_time());

        let ids: Vec<&str> = outcome.enriched.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["ORD-1", "ORD-3"]);
        assert_eq!(outcome.stats.enriched, 2);
        assert_eq!(outcome.stats.rejected, 1);
    }

    #[test]
    fn test_processed_at_keeps_microseconds_when_present() {
        let with_micros = fixed_time() + chrono::Duration::microseconds(250);
        assert_eq!(format_processed_at(with_micros), "2025-03-16T09:00:00.000250Z");
        assert_eq!(format_processed_at(fixed_time()), "2025-03-16T09:00:00Z");
    }

    #[test]
    fn test_empty_batch() {
        let outcome = DefaultEnricher::new().enrich_batch(&[]);
        assert!(outcome.enriched.is_empty());
        assert_eq!(outcome.stats, BatchStats::default());
    }

    #[test]
    fn test_config_drives_derivers() {
        let mut config = EnrichmentConfig::default();
        config.priority.major_cities.push("Toulouse".to_string());
        config.processor_version = "2.1-test".to_string();
        let enricher = DefaultEnricher::with_config(config);

        let mut order = sample_order("ORD-1");
        order.status = OrderStatus::Pending;
        let enriched = enricher.enrich(&order, fixed_time()).unwrap();

        assert_eq!(enriched.delivery_priority, DeliveryPriority::Urgent);
        assert_eq!(enriched.processor_version, "2.1-test");
    }
}
