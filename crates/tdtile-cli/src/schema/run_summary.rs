use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tdtile_training::report::BlockSummary;

/// JSON document written at the end of `train` and `evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub block: usize,
    /// Player arguments as given on the command line.
    pub play: String,
    /// Environment arguments as given on the command line.
    pub evil: String,
    pub blocks: Vec<BlockSummary>,
}
