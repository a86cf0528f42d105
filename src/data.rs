//! Synthetic customer generation and the fixed sample dataset

use crate::error::{RfmError, RfmResult};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeInclusive};

/// Raw RFM values for a single customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Sequential identifier, `CUST_001` onwards
    pub id: String,
    /// Days since last purchase
    pub recency: u32,
    /// Number of purchases
    pub frequency: u32,
    /// Total spend
    pub monetary: f64,
}

impl CustomerRecord {
    pub fn new(id: impl Into<String>, recency: u32, frequency: u32, monetary: f64) -> Self {
        Self {
            id: id.into(),
            recency,
            frequency,
            monetary,
        }
    }
}

/// Value ranges and cohort shares used by the generator
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub recency: RangeInclusive<u32>,
    pub frequency: RangeInclusive<u32>,
    pub monetary: Range<f64>,
    /// Share of draws overwritten with VIP values
    pub vip_ratio: f64,
    pub vip_frequency: RangeInclusive<u32>,
    pub vip_monetary: Range<f64>,
    /// Share of draws overwritten with inactive values
    pub inactive_ratio: f64,
    pub inactive_recency: RangeInclusive<u32>,
    pub inactive_frequency: RangeInclusive<u32>,
    pub inactive_monetary: Range<f64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            recency: 1..=365,
            frequency: 1..=50,
            monetary: 10.0..10_000.0,
            vip_ratio: 0.05,
            vip_frequency: 30..=50,
            vip_monetary: 5_000.0..10_000.0,
            inactive_ratio: 0.10,
            inactive_recency: 300..=400,
            inactive_frequency: 1..=5,
            inactive_monetary: 10.0..510.0,
        }
    }
}

impl GeneratorConfig {
    /// Check that every range can be sampled and every ratio is usable
    pub fn validate(&self) -> RfmResult<()> {
        let counts = [
            ("recency", &self.recency),
            ("frequency", &self.frequency),
            ("vip_frequency", &self.vip_frequency),
            ("inactive_recency", &self.inactive_recency),
            ("inactive_frequency", &self.inactive_frequency),
        ];
        for (name, range) in counts {
            if range.is_empty() {
                return Err(invalid_config(name, format!("{range:?} is empty")));
            }
        }

        let amounts = [
            ("monetary", &self.monetary),
            ("vip_monetary", &self.vip_monetary),
            ("inactive_monetary", &self.inactive_monetary),
        ];
        for (name, range) in amounts {
            if !range.start.is_finite() || !range.end.is_finite() || range.is_empty() {
                return Err(invalid_config(
                    name,
                    format!("{range:?} is not a finite, non-empty range"),
                ));
            }
        }

        let ratios = [
            ("vip_ratio", self.vip_ratio),
            ("inactive_ratio", self.inactive_ratio),
        ];
        for (name, ratio) in ratios {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(invalid_config(name, format!("{ratio} must be finite and >= 0")));
            }
        }
        Ok(())
    }
}

fn invalid_config(field: &'static str, reason: String) -> RfmError {
    RfmError::InvalidConfig { field, reason }
}

/// Format the identifier for the 1-based position `n`
pub fn customer_id(n: usize) -> String {
    format!("CUST_{n:03}")
}

/// Generate `count` customers with the default configuration
pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> RfmResult<Vec<CustomerRecord>> {
    generate_with(&GeneratorConfig::default(), count, rng)
}

/// Generate `count` customers from a fixed seed
pub fn generate_seeded(count: usize, seed: u64) -> RfmResult<Vec<CustomerRecord>> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    generate(count, &mut rng)
}

/// Generate `count` customers and inject the VIP and inactive cohorts
///
/// Cohort members are chosen by independent random draws, so the same
/// index can be hit more than once and the number of distinct customers
/// affected may be lower than the configured share.
pub fn generate_with<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    count: usize,
    rng: &mut R,
) -> RfmResult<Vec<CustomerRecord>> {
    if count == 0 {
        return Err(RfmError::InvalidCount(count));
    }
    config.validate()?;

    let mut customers: Vec<CustomerRecord> = (0..count)
        .map(|i| CustomerRecord {
            id: customer_id(i + 1),
            recency: rng.gen_range(config.recency.clone()),
            frequency: rng.gen_range(config.frequency.clone()),
            monetary: rng.gen_range(config.monetary.clone()),
        })
        .collect();

    let vip_draws = cohort_draws(count, config.vip_ratio);
    for _ in 0..vip_draws {
        let idx = rng.gen_range(0..count);
        let customer = &mut customers[idx];
        customer.frequency = rng.gen_range(config.vip_frequency.clone());
        customer.monetary = rng.gen_range(config.vip_monetary.clone());
    }

    let inactive_draws = cohort_draws(count, config.inactive_ratio);
    for _ in 0..inactive_draws {
        let idx = rng.gen_range(0..count);
        let customer = &mut customers[idx];
        customer.recency = rng.gen_range(config.inactive_recency.clone());
        customer.frequency = rng.gen_range(config.inactive_frequency.clone());
        customer.monetary = rng.gen_range(config.inactive_monetary.clone());
    }

    log::debug!(
        "Generated {} customers ({} VIP draws, {} inactive draws)",
        count,
        vip_draws,
        inactive_draws
    );

    Ok(customers)
}

/// Number of overwrite draws for a cohort share, rounded up
fn cohort_draws(count: usize, ratio: f64) -> usize {
    (count as f64 * ratio).ceil() as usize
}

/// The fixed 20-customer dataset used for demos and regression checks
pub fn sample_dataset() -> Vec<CustomerRecord> {
    const ROWS: [(u32, u32, f64); 20] = [
        (5, 42, 8_750.00),
        (12, 35, 6_420.50),
        (30, 18, 2_310.75),
        (45, 8, 980.20),
        (2, 50, 9_900.00),
        (120, 3, 150.00),
        (300, 1, 25.40),
        (18, 22, 3_120.00),
        (60, 12, 1_450.90),
        (7, 40, 7_800.10),
        (250, 2, 60.00),
        (90, 6, 540.35),
        (15, 28, 4_200.00),
        (200, 4, 310.80),
        (33, 15, 1_890.00),
        (3, 46, 9_150.25),
        (365, 1, 12.99),
        (75, 10, 1_100.00),
        (25, 20, 2_675.60),
        (150, 5, 420.00),
    ];

    ROWS.iter()
        .enumerate()
        .map(|(i, &(recency, frequency, monetary))| {
            CustomerRecord::new(customer_id(i + 1), recency, frequency, monetary)
        })
        .collect()
}
