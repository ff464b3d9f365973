//! Per-block training summaries.

use serde::{Deserialize, Serialize};
use tdtile_stats::{descriptive::DescriptiveStats, reach::ReachRates};

use crate::session::EpisodeRecord;

/// Statistics of a block of consecutive episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    /// 1-based number of the last episode in the block.
    pub last_episode: usize,
    pub episodes: usize,
    /// Episode scores; `None` for an empty block.
    pub score: Option<DescriptiveStats>,
    /// Reach rates of the largest tile value of each episode.
    pub max_tile: ReachRates,
    pub moves: usize,
    /// Player moves per second of wall-clock time.
    pub moves_per_sec: f64,
}

impl BlockSummary {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_records(last_episode: usize, records: &[EpisodeRecord]) -> Self {
        let moves = records.iter().map(EpisodeRecord::moves).sum::<usize>();
        let elapsed = records.iter().map(|r| r.duration.as_secs_f64()).sum::<f64>();
        let moves_per_sec = if elapsed > 0.0 {
            moves as f64 / elapsed
        } else {
            0.0
        };
        Self {
            last_episode,
            episodes: records.len(),
            score: DescriptiveStats::new(records.iter().map(|r| r.score() as f64)),
            max_tile: ReachRates::new(records.iter().map(EpisodeRecord::max_tile)),
            moves,
            moves_per_sec,
        }
    }

    /// Logs the block at info level, one event per reached tile value.
    pub fn log(&self) {
        let (mean, max) = self.score.map_or((0.0, 0.0), |s| (s.mean, s.max));
        tracing::info!(
            episode = self.last_episode,
            mean_score = format_args!("{mean:.1}"),
            max_score = max,
            moves_per_sec = format_args!("{:.0}", self.moves_per_sec),
            "block finished"
        );
        for rate in self.max_tile.rates() {
            tracing::info!(
                tile = rate.value,
                reached = format_args!("{:.1}%", rate.at_least * 100.0),
                exact = format_args!("{:.1}%", rate.exact * 100.0),
                "max tile reach"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tdtile_engine::{Board, GameStats};

    use super::*;

    fn record(score_merges: &[u32], max_rank: u8, millis: u64) -> EpisodeRecord {
        let mut stats = GameStats::new();
        for reward in score_merges {
            stats.record_slide(*reward, &Board::EMPTY);
        }
        let mut board = Board::EMPTY;
        board.place(0, max_rank).unwrap();
        stats.observe(&board);
        EpisodeRecord {
            stats,
            duration: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_summary_of_block() {
        let records = [
            record(&[4, 8], 3, 500),
            record(&[4, 4, 4, 8, 16], 4, 1000),
            record(&[4], 2, 500),
        ];
        let summary = BlockSummary::from_records(30, &records);
        assert_eq!(summary.last_episode, 30);
        assert_eq!(summary.episodes, 3);
        assert_eq!(summary.moves, 8);
        assert_eq!(summary.moves_per_sec, 4.0);

        let score = summary.score.unwrap();
        assert_eq!(score.min, 4.0);
        assert_eq!(score.max, 36.0);
        assert_eq!(score.median, 12.0);

        assert_eq!(summary.max_tile.at_least(8), 2.0 / 3.0);
        assert_eq!(summary.max_tile.at_least(16), 1.0 / 3.0);
        let tiles: Vec<_> = summary.max_tile.rates().iter().map(|r| r.value).collect();
        assert_eq!(tiles, [4, 8, 16]);
    }

    #[test]
    fn test_empty_block() {
        let summary = BlockSummary::from_records(0, &[]);
        assert_eq!(summary.episodes, 0);
        assert!(summary.score.is_none());
        assert!(summary.max_tile.is_empty());
        assert_eq!(summary.moves_per_sec, 0.0);
        summary.log();
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = BlockSummary::from_records(1, &[record(&[4], 2, 10)]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["last_episode"], 1);
        assert_eq!(json["score"]["max"], 4.0);
        assert_eq!(json["max_tile"][0]["value"], 4);
        assert_eq!(json["max_tile"][0]["at_least"], 1.0);
    }
}
