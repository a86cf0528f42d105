//! Percentile-based RFM scoring and threshold filtering

use crate::data::CustomerRecord;
use crate::error::{RfmError, RfmResult};
use serde::{Deserialize, Serialize};

/// Lowest score on each axis
pub const MIN_SCORE: u8 = 1;
/// Highest score on each axis
pub const MAX_SCORE: u8 = 5;

/// Upper percentile bound for scores 1 through 4; anything above is a 5
const SCORE_BOUNDS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

/// A customer's 1-5 scores relative to the dataset it was scored with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCustomer {
    pub id: String,
    pub recency_score: u8,
    pub frequency_score: u8,
    pub monetary_score: u8,
    /// Grid column, always the frequency score
    pub x: u8,
    /// Grid row, always the monetary score
    pub y: u8,
}

impl ScoredCustomer {
    pub fn new(id: impl Into<String>, recency: u8, frequency: u8, monetary: u8) -> Self {
        Self {
            id: id.into(),
            recency_score: recency,
            frequency_score: frequency,
            monetary_score: monetary,
            x: frequency,
            y: monetary,
        }
    }
}

/// Minimum score per dimension; values outside 1..=5 apply literally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub recency: u8,
    pub frequency: u8,
    pub monetary: u8,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            recency: MIN_SCORE,
            frequency: MIN_SCORE,
            monetary: MIN_SCORE,
        }
    }
}

impl FilterCriteria {
    pub fn new(recency: u8, frequency: u8, monetary: u8) -> Self {
        Self {
            recency,
            frequency,
            monetary,
        }
    }

    pub fn matches(&self, customer: &ScoredCustomer) -> bool {
        customer.recency_score >= self.recency
            && customer.frequency_score >= self.frequency
            && customer.monetary_score >= self.monetary
    }
}

/// Sorted values of one dimension, used to rank members of that dimension
#[derive(Debug, Clone)]
pub struct PercentileRanker {
    sorted: Vec<f64>,
}

impl PercentileRanker {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    /// Rank of `value` as `i / (n - 1)`, where `i` is the first sorted
    /// position holding a value `>= value`.
    ///
    /// Ties take the position of their first occurrence. A value above
    /// every member ranks 1.0.
    pub fn percentile(&self, value: f64) -> f64 {
        let idx = self.sorted.partition_point(|v| *v < value);
        if idx == 0 {
            0.0
        } else if idx == self.sorted.len() {
            1.0
        } else {
            idx as f64 / (self.sorted.len() - 1) as f64
        }
    }

    pub fn score(&self, value: f64) -> u8 {
        percentile_to_score(self.percentile(value))
    }
}

/// Map a percentile in [0, 1] to a score in 1..=5
pub fn percentile_to_score(percentile: f64) -> u8 {
    SCORE_BOUNDS
        .iter()
        .position(|bound| percentile <= *bound)
        .map_or(MAX_SCORE, |i| i as u8 + MIN_SCORE)
}

/// Score every customer against the full dataset, preserving order
///
/// Recency is inverted so the most recent buyers score 5.
pub fn score(records: &[CustomerRecord]) -> RfmResult<Vec<ScoredCustomer>> {
    if records.is_empty() {
        return Err(RfmError::EmptyDataset);
    }

    let recency = PercentileRanker::new(records.iter().map(|r| f64::from(r.recency)));
    let frequency = PercentileRanker::new(records.iter().map(|r| f64::from(r.frequency)));
    let monetary = PercentileRanker::new(records.iter().map(|r| r.monetary));

    let scored: Vec<ScoredCustomer> = records
        .iter()
        .map(|r| {
            ScoredCustomer::new(
                r.id.clone(),
                MAX_SCORE + 1 - recency.score(f64::from(r.recency)),
                frequency.score(f64::from(r.frequency)),
                monetary.score(r.monetary),
            )
        })
        .collect();

    log::debug!("Scored {} customers", scored.len());
    Ok(scored)
}

/// Keep the customers that meet every threshold in `criteria`
pub fn filter(scores: &[ScoredCustomer], criteria: &FilterCriteria) -> Vec<ScoredCustomer> {
    scores
        .iter()
        .filter(|c| criteria.matches(c))
        .cloned()
        .collect()
}
