//! Reduction of analyst rating records into a [`RatingSummary`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{RatingRecord, RatingSummary, RatingsError};

/// Which records take part in the summary and how they weigh on the average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationPolicy {
    /// Every record with a usable price target.
    #[default]
    AllPriced,
    /// Only records whose analyst has a positive average return.
    PositiveReturn,
    /// Every priced record counts toward the bounds and the denominator, but
    /// only positive-return analysts add their target to the total.
    PositiveReturnWeighted,
}

impl AggregationPolicy {
    fn includes(&self, record: &RatingRecord) -> bool {
        match self {
            AggregationPolicy::PositiveReturn => record.has_positive_return(),
            AggregationPolicy::AllPriced | AggregationPolicy::PositiveReturnWeighted => true,
        }
    }

    fn weight(&self, record: &RatingRecord) -> f64 {
        match self {
            AggregationPolicy::PositiveReturnWeighted if !record.has_positive_return() => 0.0,
            _ => 1.0,
        }
    }
}

impl FromStr for AggregationPolicy {
    type Err = RatingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "all-priced" => Ok(AggregationPolicy::AllPriced),
            "positive-return" => Ok(AggregationPolicy::PositiveReturn),
            "positive-return-weighted" => Ok(AggregationPolicy::PositiveReturnWeighted),
            other => Err(RatingsError::InvalidEnvironment(format!(
                "unknown aggregation policy: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationPolicy::AllPriced => "all",
            AggregationPolicy::PositiveReturn => "positive-return",
            AggregationPolicy::PositiveReturnWeighted => "positive-return-weighted",
        };
        f.write_str(name)
    }
}

/// Computes highest, lowest and average price targets under a fixed policy.
///
/// Holds no state besides the policy, so one instance can be shared by any
/// number of concurrent requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingAggregator {
    policy: AggregationPolicy,
}

impl RatingAggregator {
    pub fn new(policy: AggregationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Records with a usable price target that the policy admits.
    fn eligible<'a>(
        &'a self,
        records: &'a [RatingRecord],
    ) -> impl Iterator<Item = (&'a RatingRecord, f64)> + 'a {
        records
            .iter()
            .filter_map(|record| record.target_value().map(|value| (record, value)))
            .filter(move |(record, _)| self.policy.includes(record))
    }

    /// One pass over `records`. Records without a usable price target are
    /// skipped; an empty selection yields an average of 0 and no bounds.
    pub fn summarize(&self, records: &[RatingRecord]) -> RatingSummary {
        tracing::debug!(
            policy = %self.policy,
            records = records.len(),
            "retrieving low, high, and average value of the ratings"
        );

        let mut lowest: Option<f64> = None;
        let mut highest: Option<f64> = None;
        let mut total = 0.0;
        let mut count = 0u32;

        for (record, value) in self.eligible(records) {
            lowest = Some(lowest.map_or(value, |l| l.min(value)));
            highest = Some(highest.map_or(value, |h| h.max(value)));
            total += self.policy.weight(record) * value;
            count += 1;
        }

        let denominator = f64::from(if count == 0 { 1 } else { count });
        let mut average = total / denominator;
        if !average.is_finite() {
            // The total overflowed; scale each contribution first.
            average = self
                .eligible(records)
                .map(|(record, value)| self.policy.weight(record) * (value / denominator))
                .sum();
        }

        RatingSummary {
            average: round_cents(average),
            highest,
            lowest,
        }
    }
}

/// Rounds the exact binary value to two decimal places, midpoint away from
/// zero, so `1.005` (stored just below the midpoint) becomes `1.0`.
pub fn round_cents(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
