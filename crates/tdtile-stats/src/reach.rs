//! Reach rates of discrete outcomes.
//!
//! For every observed value `v`, [`ReachRates`] reports the share of samples equal to `v` and the
//! share of samples at least `v`. Applied to the largest tile rank of each episode this gives the
//! familiar "reached 2048 in 62% of games" table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Share of samples equal to, and at least, one value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachRate {
    pub value: u32,
    pub count: usize,
    pub exact: f64,
    pub at_least: f64,
}

/// Reach rates for every value that occurs in a sample, in ascending order of value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReachRates {
    rates: Vec<ReachRate>,
}

impl ReachRates {
    /// Counts `values` and computes their exact and cumulative shares.
    ///
    /// An empty sample yields no rates.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut counts = BTreeMap::<u32, usize>::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }
        let total = counts.values().sum::<usize>();
        let mut remaining = total;
        let rates = counts
            .into_iter()
            .map(|(value, count)| {
                let rate = ReachRate {
                    value,
                    count,
                    exact: count as f64 / total as f64,
                    at_least: remaining as f64 / total as f64,
                };
                remaining -= count;
                rate
            })
            .collect();
        Self { rates }
    }

    #[must_use]
    pub fn rates(&self) -> &[ReachRate] {
        &self.rates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Share of samples that reached at least `value`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn at_least(&self, value: u32) -> f64 {
        let total = self.rates.iter().map(|r| r.count).sum::<usize>();
        if total == 0 {
            return 0.0;
        }
        let reached = self
            .rates
            .iter()
            .filter(|r| r.value >= value)
            .map(|r| r.count)
            .sum::<usize>();
        reached as f64 / total as f64
    }
}
