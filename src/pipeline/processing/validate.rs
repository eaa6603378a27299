use serde::Serialize;
use thiserror::Error;

use crate::config::EnrichmentConfig;
use crate::domain::RawOrder;

/// A structural or arithmetic defect that keeps an order out of enrichment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("invalid total amount")]
    InvalidTotalAmount,
    #[error("missing order id")]
    MissingOrderId,
    #[error("no items")]
    NoItems,
    #[error("inconsistent subtotal")]
    InconsistentSubtotal,
}

/// Outcome of validating one order. Every failed check is listed, in check order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages joined for log output
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Gate in front of the metric derivers
pub trait OrderValidator {
    fn validate(&self, order: &RawOrder) -> ValidationReport;
}

/// Validator applying the integrity checks with a configurable subtotal tolerance
#[derive(Debug, Clone)]
pub struct DefaultOrderValidator {
    pub subtotal_tolerance: f64,
}

impl Default for DefaultOrderValidator {
    fn default() -> Self {
        Self {
            subtotal_tolerance: 0.01,
        }
    }
}

impl DefaultOrderValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self {
            subtotal_tolerance: config.subtotal_tolerance,
        }
    }
}

impl OrderValidator for DefaultOrderValidator {
    fn validate(&self, order: &RawOrder) -> ValidationReport {
        let mut errors = Vec::new();

        // NaN fails this comparison too
        if !(order.total_amount > 0.0) {
            errors.push(ValidationError::InvalidTotalAmount);
        }
        if order.order_id.trim().is_empty() {
            errors.push(ValidationError::MissingOrderId);
        }
        if order.items.is_empty() {
            errors.push(ValidationError::NoItems);
        } else {
            let recomputed: f64 = order.items.iter().map(|i| i.subtotal).sum();
            if (recomputed - order.subtotal).abs() > self.subtotal_tolerance {
                errors.push(ValidationError::InconsistentSubtotal);
            }
        }

        ValidationReport { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::test_support::{item, sample_order};

    #[test]
    fn test_consistent_order_passes() {
        let report = DefaultOrderValidator::new().validate(&sample_order("ORD-1"));
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_non_positive_total_is_reported_alone() {
        let mut order = sample_order("ORD-1");
        order.total_amount = 0.0;

        let report = DefaultOrderValidator::new().validate(&order);
        assert_eq!(report.errors, vec![ValidationError::InvalidTotalAmount]);

        order.total_amount = -12.5;
        let report = DefaultOrderValidator::new().validate(&order);
        assert_eq!(report.errors, vec![ValidationError::InvalidTotalAmount]);
    }

    #[test]
    fn test_blank_order_id_is_reported_alone() {
        let mut order = sample_order("");
        let report = DefaultOrderValidator::new().validate(&order);
        assert_eq!(report.errors, vec![ValidationError::MissingOrderId]);

        order.order_id = "   ".to_string();
        let report = DefaultOrderValidator::new().validate(&order);
        assert_eq!(report.errors, vec![ValidationError::MissingOrderId]);
    }

    #[test]
    fn test_empty_items_do_not_trigger_subtotal_check() {
        let mut order = sample_order("ORD-1");
        order.items.clear();

        let report = DefaultOrderValidator::new().validate(&order);
        assert_eq!(report.errors, vec![ValidationError::NoItems]);
    }

    #[test]
    fn test_subtotal_tolerance_is_inclusive() {
        let mut order = sample_order("ORD-1");
        order.subtotal += 0.005;
        assert!(DefaultOrderValidator::new().validate(&order).is_valid());

        order.subtotal += 5.0;
        let report = DefaultOrderValidator::new().validate(&order);
        assert_eq!(report.errors, vec![ValidationError::InconsistentSubtotal]);
    }

    #[test]
    fn test_all_violations_are_reported_in_order() {
        let mut order = sample_order("");
        order.total_amount = 0.0;
        order.items = vec![item("Shoes", 1, 50.0, 0.0)];
        order.subtotal = 10.0;

        let report = DefaultOrderValidator::new().validate(&order);
        assert_eq!(
            report.errors,
            vec![
                ValidationError::InvalidTotalAmount,
                ValidationError::MissingOrderId,
                ValidationError::InconsistentSubtotal,
            ]
        );
        assert_eq!(report.summary(), "invalid total amount, missing order id, inconsistent subtotal");
    }

    #[test]
    fn test_tolerance_comes_from_config() {
        let config = EnrichmentConfig {
            subtotal_tolerance: 1.0,
            ..Default::default()
        };
        let mut order = sample_order("ORD-1");
        order.subtotal += 0.5;

        assert!(DefaultOrderValidator::from_config(&config).validate(&order).is_valid());
    }
}
