//! TD(0) learning over afterstates.
//!
//! During an episode the player records one [`EpisodeStep`] per slide. When the episode ends,
//! [`EpisodeTrainer::close`] walks the steps backwards and moves the value of every afterstate
//! towards the reward of the following slide plus the value of the following afterstate:
//!
//! ```text
//! last step:       δ = α · (0 − V(after[N−1]))
//! i = N−2 … 0:     δ = α · (reward[i+1] + V(after[i+1]) − V(after[i]))
//! ```
//!
//! Each `δ` is added to the one entry every table has for `after[i]`. All `V` terms are taken
//! from the weights as they stood when the close began.

use tdtile_engine::{Board, Direction};
use tdtile_evaluator::{
    action_selector::MoveSelection,
    tuple_network::TupleNetwork,
    tuple_pattern::FeatureIndices,
};

/// Learning rate used when none is configured.
pub const DEFAULT_ALPHA: f32 = 0.0025;

// Typical episode length of a trained player; only used to pre-size the step buffer.
const EXPECTED_EPISODE_LEN: usize = 20_000;

/// One slide of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeStep {
    pub direction: Direction,
    /// Board right after the slide.
    pub after: Board,
    /// Reward of the slide that produced `after`.
    pub reward: u32,
}

impl From<MoveSelection> for EpisodeStep {
    fn from(selection: MoveSelection) -> Self {
        Self {
            direction: selection.direction(),
            after: *selection.after(),
            reward: selection.reward(),
        }
    }
}

/// Magnitudes of the TD errors applied by one close.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TdUpdateStats {
    pub steps: usize,
    pub mean_abs_error: f32,
    pub max_abs_error: f32,
}

/// Records an episode and trains a network on it.
#[derive(Debug, Clone)]
pub struct EpisodeTrainer {
    alpha: f32,
    steps: Vec<EpisodeStep>,
}

impl EpisodeTrainer {
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            steps: vec![],
        }
    }

    #[must_use]
    pub fn steps(&self) -> &[EpisodeStep] {
        &self.steps
    }

    /// Starts a new episode, dropping any steps left from the previous one.
    pub fn open(&mut self) {
        self.steps.clear();
        self.steps.reserve(EXPECTED_EPISODE_LEN);
    }

    pub fn record(&mut self, step: EpisodeStep) {
        self.steps.push(step);
    }

    /// Ends the episode without learning from it.
    pub fn discard(&mut self) {
        self.steps.clear();
    }

    /// Applies the TD(0) backward pass to `network` and ends the episode.
    ///
    /// With no recorded step this does nothing and returns zeroed statistics.
    pub fn close(&mut self, network: &mut TupleNetwork) -> TdUpdateStats {
        let Some(last) = self.steps.len().checked_sub(1) else {
            return TdUpdateStats::default();
        };

        let features = self
            .steps
            .iter()
            .map(|step| network.features(&step.after))
            .collect::<Vec<FeatureIndices>>();
        let values = features
            .iter()
            .map(|features| network.value_of(features))
            .collect::<Vec<f32>>();

        let mut errors = ErrorSummary::default();

        let error = 0.0 - values[last];
        network.update(&features[last], self.alpha * error);
        errors.push(error);

        for i in (0..last).rev() {
            #[expect(clippy::cast_precision_loss)]
            let reward = self.steps[i + 1].reward as f32;
            let error = reward + values[i + 1] - values[i];
            network.update(&features[i], self.alpha * error);
            errors.push(error);
        }

        self.steps.clear();
        errors.finish()
    }
}

#[derive(Debug, Default)]
struct ErrorSummary {
    count: usize,
    abs_sum: f64,
    abs_max: f32,
}

impl ErrorSummary {
    fn push(&mut self, error: f32) {
        self.count += 1;
        self.abs_sum += f64::from(error.abs());
        self.abs_max = self.abs_max.max(error.abs());
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn finish(self) -> TdUpdateStats {
        TdUpdateStats {
            steps: self.count,
            mean_abs_error: (self.abs_sum / self.count as f64) as f32,
            max_abs_error: self.abs_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use tdtile_engine::CELL_COUNT;
    use tdtile_evaluator::tuple_pattern::TUPLE_COUNT;

    use super::*;

    const ALPHA: f32 = 0.1;

    fn step(after: Board, reward: u32) -> EpisodeStep {
        EpisodeStep {
            direction: Direction::Left,
            after,
            reward,
        }
    }

    fn entries(network: &TupleNetwork, board: &Board) -> Vec<f32> {
        let features = network.features(board);
        (0..TUPLE_COUNT)
            .map(|table| network.weights().get(table, features[table]))
            .collect()
    }

    #[test]
    fn test_two_step_episode() {
        // Every pattern sees six 1s on `b` and six 2s on `c`, so the boards share no entry.
        let b = Board::from_ranks([1; CELL_COUNT]);
        let c = Board::from_ranks([2; CELL_COUNT]);
        let mut network = TupleNetwork::new(3);
        let fb = network.features(&b);
        let fc = network.features(&c);
        network.update(&fb, 0.5);
        network.update(&fc, 0.25);
        assert_eq!(network.value(&b), 16.0);
        assert_eq!(network.value(&c), 8.0);

        let mut trainer = EpisodeTrainer::new(ALPHA);
        trainer.open();
        trainer.record(step(b, 100));
        trainer.record(step(c, 4));
        let stats = trainer.close(&mut network);

        let expected_c = 0.25 + ALPHA * (0.0 - 8.0);
        let expected_b = 0.5 + ALPHA * (4.0 + 8.0 - 16.0);
        assert_eq!(entries(&network, &c), vec![expected_c; TUPLE_COUNT]);
        assert_eq!(entries(&network, &b), vec![expected_b; TUPLE_COUNT]);

        assert_eq!(stats.steps, 2);
        assert_eq!(stats.max_abs_error, 8.0);
        assert_eq!(stats.mean_abs_error, 6.0);
        assert!(trainer.steps().is_empty());
    }

    #[test]
    fn test_values_are_taken_before_any_update() {
        let b = Board::from_ranks([1; CELL_COUNT]);
        let mut network = TupleNetwork::new(3);
        let fb = network.features(&b);
        network.update(&fb, 0.5);

        let mut trainer = EpisodeTrainer::new(ALPHA);
        trainer.open();
        trainer.record(step(b, 0));
        trainer.record(step(b, 4));
        trainer.close(&mut network);

        // The second delta still sees V(b) = 16 on both sides.
        let after_terminal = 0.5 + ALPHA * (0.0 - 16.0);
        let expected = after_terminal + ALPHA * (4.0 + 16.0 - 16.0);
        assert_eq!(entries(&network, &b), vec![expected; TUPLE_COUNT]);
    }

    #[test]
    fn test_single_step_moves_towards_zero() {
        let b = Board::from_ranks([2; CELL_COUNT]);
        let mut network = TupleNetwork::new(3);
        let fb = network.features(&b);
        network.update(&fb, 1.0);

        let mut trainer = EpisodeTrainer::new(0.5);
        trainer.open();
        trainer.record(step(b, 8));
        let stats = trainer.close(&mut network);

        assert_eq!(entries(&network, &b), vec![1.0 + 0.5 * (0.0 - 32.0); TUPLE_COUNT]);
        assert_eq!(stats.steps, 1);
        assert_eq!(stats.max_abs_error, 32.0);
    }

    #[test]
    fn test_zero_step_close_is_noop() {
        let mut network = TupleNetwork::new(3);
        let board = Board::from_ranks([1; CELL_COUNT]);
        let features = network.features(&board);
        network.update(&features, 0.75);
        let before = network.weights().clone();

        let mut trainer = EpisodeTrainer::new(ALPHA);
        trainer.open();
        let stats = trainer.close(&mut network);

        assert_eq!(stats, TdUpdateStats::default());
        assert_eq!(network.weights(), &before);
    }

    #[test]
    fn test_open_and_discard_drop_steps() {
        let mut trainer = EpisodeTrainer::new(ALPHA);
        trainer.record(step(Board::EMPTY, 2));
        trainer.open();
        assert!(trainer.steps().is_empty());

        trainer.record(step(Board::EMPTY, 2));
        trainer.discard();
        assert!(trainer.steps().is_empty());
    }

    #[test]
    fn test_step_from_selection() {
        use tdtile_evaluator::action_selector::ActionSelector;

        let network = TupleNetwork::new(3);
        let board = Board::from_rows([[1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let selection = ActionSelector::new(&network).select(&board).unwrap();
        let step = EpisodeStep::from(selection);
        assert_eq!(step.direction, Direction::Right);
        assert_eq!(step.reward, 4);
        assert_eq!(step.after.rank(0, 3), 2);
    }
}
