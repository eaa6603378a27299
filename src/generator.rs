//! Synthetic storefront orders for exercising the enrichment pipeline.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::constants::MAJOR_CITIES;
use crate::domain::{LineItem, OrderStatus, RawOrder};
use crate::pipeline::processing::derive::round2;

#[derive(Debug, Clone, Copy)]
pub struct Product {
    pub product_id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub category: &'static str,
}

pub const CATALOG: [Product; 6] = [
    Product { product_id: "ELEC001", name: "iPhone 15 Pro", price: 1199.99, category: "Smartphones" },
    Product { product_id: "ELEC002", name: "Samsung Galaxy S24", price: 999.99, category: "Smartphones" },
    Product { product_id: "ELEC003", name: "MacBook Air M3", price: 1499.99, category: "Laptops" },
    Product { product_id: "ELEC004", name: "Dell XPS 15", price: 1299.99, category: "Laptops" },
    Product { product_id: "CLOT001", name: "Nike Air Max Sneakers", price: 129.99, category: "Shoes" },
    Product { product_id: "CLOT002", name: "Adidas Running Shoes", price: 119.99, category: "Shoes" },
];

pub const CITIES: [&str; 5] = ["Paris", "Lyon", "Marseille", "Toulouse", "Nice"];

const STATUS_WEIGHTS: [(OrderStatus, u32); 5] = [
    (OrderStatus::Pending, 15),
    (OrderStatus::Confirmed, 40),
    (OrderStatus::Shipped, 25),
    (OrderStatus::Delivered, 15),
    (OrderStatus::Cancelled, 5),
];

const PAYMENT_WEIGHTS: [(&str, u32); 3] = [("credit_card", 70), ("paypal", 20), ("apple_pay", 10)];
const ITEM_COUNT_WEIGHTS: [(usize, u32); 3] = [(1, 50), (2, 30), (3, 20)];
const QUANTITY_WEIGHTS: [(u32, u32); 2] = [(1, 80), (2, 20)];
const DISCOUNT_CHOICES: [f64; 3] = [0.0, 5.0, 10.0];
const DISCOUNT_PROBABILITY: f64 = 0.2;
const EMAIL_DOMAINS: [&str; 2] = ["gmail.com", "yahoo.fr"];
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const DIGITS: &[u8] = b"0123456789";
const MAX_AGE_DAYS: i64 = 7;

/// Summary of a generated batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub average_order_value: f64,
}

impl GenerationStats {
    pub fn from_orders(orders: &[RawOrder]) -> Self {
        let total_revenue: f64 = orders.iter().map(|o| o.total_amount).sum();
        let average_order_value = if orders.is_empty() {
            0.0
        } else {
            round2(total_revenue / orders.len() as f64)
        };
        Self {
            total_orders: orders.len(),
            total_revenue: round2(total_revenue),
            average_order_value,
        }
    }
}

pub struct OrderGenerator<R: Rng = StdRng> {
    rng: R,
    config: GeneratorConfig,
}

impl OrderGenerator<StdRng> {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic generator for reproducible batches
    pub fn seeded(config: GeneratorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> OrderGenerator<R> {
    pub fn with_rng(config: GeneratorConfig, rng: R) -> Self {
        Self { rng, config }
    }

    pub fn generate_batch(&mut self, count: usize, now: DateTime<Utc>) -> Vec<RawOrder> {
        (0..count).map(|_| self.generate_order(now)).collect()
    }

    pub fn generate_order(&mut self, now: DateTime<Utc>) -> RawOrder {
        let customer_id = self.customer_id();
        let items = self.select_items();

        let subtotal: f64 = items.iter().map(|i| i.subtotal).sum();
        let total_discount: f64 = items.iter().map(|i| i.discount_amount).sum();
        let city = *CITIES.choose(&mut self.rng).unwrap_or(&CITIES[0]);
        let shipping_cost = self.shipping_cost(subtotal, city);
        let tax_rate = self.config.tax_rate;
        let tax_amount = round2((subtotal + shipping_cost) * tax_rate);
        let total_amount = round2(subtotal + shipping_cost + tax_amount);

        let order_time = now - Duration::days(self.rng.gen_range(0..=MAX_AGE_DAYS));

        RawOrder {
            order_id: self.order_id(now),
            order_date: order_time.to_rfc3339_opts(SecondsFormat::Micros, false),
            customer_email: self.email(&customer_id),
            customer_id,
            customer_city: city.to_string(),
            num_items: items.len() as u32,
            total_quantity: items.iter().map(|i| i.quantity).sum(),
            items,
            subtotal,
            total_discount,
            shipping_cost,
            tax_rate,
            tax_amount,
            total_amount,
            payment_method: weighted(&mut self.rng, &PAYMENT_WEIGHTS).to_string(),
            status: weighted(&mut self.rng, &STATUS_WEIGHTS),
            created_at: now.to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }

    fn select_items(&mut self) -> Vec<LineItem> {
        let count = weighted(&mut self.rng, &ITEM_COUNT_WEIGHTS);
        let products: Vec<Product> = CATALOG.choose_multiple(&mut self.rng, count).copied().collect();

        products
            .into_iter()
            .map(|product| {
                let quantity = weighted(&mut self.rng, &QUANTITY_WEIGHTS);
                let discount_percentage = if self.rng.gen_bool(DISCOUNT_PROBABILITY) {
                    *DISCOUNT_CHOICES.choose(&mut self.rng).unwrap_or(&0.0)
                } else {
                    0.0
                };
                price_line(&product, quantity, discount_percentage)
            })
            .collect()
    }

    fn shipping_cost(&self, subtotal: f64, city: &str) -> f64 {
        if subtotal >= self.config.free_shipping_threshold {
            0.0
        } else if MAJOR_CITIES.contains(&city) {
            self.config.major_city_shipping
        } else {
            self.config.standard_shipping
        }
    }

    fn order_id(&mut self, now: DateTime<Utc>) -> String {
        format!("ORD-{}-{}", now.format("%Y%m%d"), self.random_string(ID_ALPHABET, 8))
    }

    fn customer_id(&mut self) -> String {
        format!("CUST-{}", self.random_string(DIGITS, 8))
    }

    fn email(&mut self, customer_id: &str) -> String {
        let digits = customer_id.trim_start_matches("CUST-");
        let domain = EMAIL_DOMAINS.choose(&mut self.rng).unwrap_or(&EMAIL_DOMAINS[0]);
        format!("customer{}@{}", digits, domain)
    }

    fn random_string(&mut self, alphabet: &[u8], len: usize) -> String {
        (0..len)
            .map(|_| alphabet[self.rng.gen_range(0..alphabet.len())] as char)
            .collect()
    }
}

/// Price one catalog line. The per-unit discount is rounded before it is
/// multiplied out, matching how the storefront bills.
pub fn price_line(product: &Product, quantity: u32, discount_percentage: f64) -> LineItem {
    let unit_discount = round2(product.price * (discount_percentage / 100.0));
    LineItem {
        product_id: product.product_id.to_string(),
        product_name: product.name.to_string(),
        category: product.category.to_string(),
        quantity,
        unit_price: product.price,
        discount_percentage,
        discount_amount: round2(unit_discount * f64::from(quantity)),
        subtotal: round2((product.price - unit_discount) * f64::from(quantity)),
    }
}

fn weighted<R: Rng, T: Copy>(rng: &mut R, choices: &[(T, u32)]) -> T {
    match WeightedIndex::new(choices.iter().map(|(_, w)| *w)) {
        Ok(dist) => choices[dist.sample(rng)].0,
        Err(_) => choices[0].0,
    }
}
