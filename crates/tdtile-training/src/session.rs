//! Playing episodes between a player and an environment.

use std::time::{Duration, Instant};

use tdtile_engine::{Action, Board, GameStats, IllegalActionError, tile_value};

use crate::{agent::Agent, report::BlockSummary};

/// Number of tiles the environment places before the player's first move.
pub const INITIAL_TILES: usize = 2;

/// Outcome of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub stats: GameStats,
    pub duration: Duration,
}

impl EpisodeRecord {
    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn moves(&self) -> usize {
        self.stats.moves()
    }

    /// Value of the largest tile of the episode (`0` if the board stayed empty).
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        tile_value(self.stats.max_rank())
    }
}

/// Plays one episode.
///
/// Both agents are opened, the environment places [`INITIAL_TILES`] tiles, and then the player
/// and the environment take turns until one of them has no action. Both agents are closed
/// before returning.
///
/// # Errors
///
/// Returns an error if an agent chooses an action the board rejects.
pub fn play_episode(
    player: &mut Agent,
    environment: &mut Agent,
) -> Result<EpisodeRecord, IllegalActionError> {
    let start = Instant::now();
    let mut board = Board::EMPTY;
    let mut stats = GameStats::new();

    player.open_episode();
    environment.open_episode();
    let played = play_turns(player, environment, &mut board, &mut stats);
    if let Some(td) = player.close_episode() {
        tracing::debug!(
            steps = td.steps,
            mean_abs_error = td.mean_abs_error,
            max_abs_error = td.max_abs_error,
            "td update"
        );
    }
    environment.close_episode();
    played?;

    Ok(EpisodeRecord {
        stats,
        duration: start.elapsed(),
    })
}

fn play_turns(
    player: &mut Agent,
    environment: &mut Agent,
    board: &mut Board,
    stats: &mut GameStats,
) -> Result<(), IllegalActionError> {
    for _ in 0..INITIAL_TILES {
        if let Some(action) = environment.take_action(board) {
            apply(action, board, stats)?;
        }
    }
    while let Some(action) = player.take_action(board) {
        apply(action, board, stats)?;
        let Some(action) = environment.take_action(board) else {
            break;
        };
        apply(action, board, stats)?;
    }
    Ok(())
}

fn apply(
    action: Action,
    board: &mut Board,
    stats: &mut GameStats,
) -> Result<(), IllegalActionError> {
    let reward = action.apply(board)?;
    match action {
        Action::Slide(_) => stats.record_slide(reward, board),
        Action::Place { .. } => stats.observe(board),
    }
    Ok(())
}

/// Plays `total` episodes, summarizing and logging every `block` of them.
///
/// A final partial block is summarized as well.
///
/// # Panics
///
/// Panics if `block` is zero.
pub fn play_episodes(
    player: &mut Agent,
    environment: &mut Agent,
    total: usize,
    block: usize,
) -> Result<Vec<BlockSummary>, IllegalActionError> {
    assert!(block > 0, "block size must be positive");
    let mut summaries = vec![];
    let mut records = Vec::with_capacity(block);
    for episode in 1..=total {
        records.push(play_episode(player, environment)?);
        if records.len() == block || episode == total {
            let summary = BlockSummary::from_records(episode, &records);
            summary.log();
            summaries.push(summary);
            records.clear();
        }
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents(seed: u64) -> (Agent, Agent) {
        let player = Agent::from_args("name=player", "ranks=4 alpha=0.01").unwrap();
        let environment = Agent::from_args("name=rndenv", &format!("seed={seed}")).unwrap();
        (player, environment)
    }

    #[test]
    fn test_episode_ends_on_terminal_board() {
        let (mut player, mut environment) = agents(7);
        let record = play_episode(&mut player, &mut environment).unwrap();
        assert!(record.moves() > 0);
        assert!(record.max_tile() >= 4);
        assert_eq!(record.score() % 2, 0);
        let weights = player.as_player().unwrap().network().weights();
        assert!(weights.tables().flatten().any(|w| *w != 0.0));
    }

    #[test]
    fn test_episode_is_reproducible_with_seed() {
        let (mut player1, mut environment1) = agents(11);
        let (mut player2, mut environment2) = agents(11);
        for _ in 0..3 {
            let a = play_episode(&mut player1, &mut environment1).unwrap();
            let b = play_episode(&mut player2, &mut environment2).unwrap();
            assert_eq!(a.stats, b.stats);
        }
    }

    #[test]
    fn test_passive_player_makes_no_move() {
        let mut player = Agent::Passive;
        let (_, mut environment) = agents(1);
        let record = play_episode(&mut player, &mut environment).unwrap();
        assert_eq!(record.moves(), 0);
        assert_eq!(record.score(), 0);
        assert!(record.stats.max_rank() >= 1);
    }

    #[test]
    fn test_passive_environment_ends_after_first_move() {
        let (mut player, _) = agents(0);
        let record = play_episode(&mut player, &mut Agent::Passive).unwrap();
        assert_eq!(record.moves(), 0);
        assert_eq!(record.max_tile(), 0);
    }

    #[test]
    fn test_blocks_cover_all_episodes() {
        let (mut player, mut environment) = agents(5);
        let summaries = play_episodes(&mut player, &mut environment, 5, 2).unwrap();
        let sizes: Vec<_> = summaries.iter().map(|s| (s.last_episode, s.episodes)).collect();
        assert_eq!(sizes, [(2, 2), (4, 2), (5, 1)]);
    }

    #[test]
    fn test_zero_episodes() {
        let (mut player, mut environment) = agents(5);
        let summaries = play_episodes(&mut player, &mut environment, 0, 10).unwrap();
        assert!(summaries.is_empty());
    }
}
