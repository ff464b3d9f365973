//! Statistical summaries for training and evaluation runs.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics (min, max, mean, median, standard deviation)
//! - [`reach`]: Reach rates of discrete outcomes such as the largest tile of each episode
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use tdtile_stats::descriptive::DescriptiveStats;
//!
//! let scores = [1200.0, 800.0, 2000.0];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.max, 2000.0);
//! ```
//!
//! ## Computing reach rates
//!
//! ```
//! use tdtile_stats::reach::ReachRates;
//!
//! let max_ranks = [10, 11, 11, 9];
//! let rates = ReachRates::new(max_ranks);
//! assert_eq!(rates.at_least(11), 0.5);
//! ```

pub mod descriptive;
pub mod reach;
