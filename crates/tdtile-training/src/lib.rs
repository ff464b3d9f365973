//! Self-play training of the n-tuple player with TD(0).
//!
//! This crate ties the engine and the evaluator together: agents play episodes against each
//! other, the player learns from every finished episode, and each block of episodes is
//! summarized in the log.
//!
//! # How Training Works
//!
//! 1. **Open** - Both agents start a new episode on an empty board
//! 2. **Play** - The environment places two tiles, then player and environment alternate. The
//!    player picks the slide maximizing `reward + value(afterstate)` and records it
//! 3. **Close** - When the player has no legal slide, the recorded afterstates are updated
//!    backwards with TD(0) (see [`td_learning`])
//! 4. **Report** - Every block of episodes is summarized (see [`report`])
//!
//! # Architecture
//!
//! ```text
//! play_episodes (session)
//!     ↓ alternates
//! Agent::Player (TdPlayer)          Agent::RandomEnvironment
//!     ↓ selects with                    ↓ places with
//! ActionSelector + TupleNetwork     TileSpawner
//!     ↓ trained by
//! EpisodeTrainer (td_learning)
//! ```
//!
//! Agents are configured with `key=value` strings (see [`config`]).
//!
//! # Example
//!
//! ```
//! use tdtile_training::{agent::Agent, session::play_episodes};
//!
//! let mut player = Agent::from_args("name=player", "ranks=4 alpha=0.01")?;
//! let mut environment = Agent::from_args("name=rndenv", "seed=1")?;
//! let summaries = play_episodes(&mut player, &mut environment, 4, 2)?;
//! assert_eq!(summaries.len(), 2);
//! player.finalize()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod agent;
pub mod config;
pub mod report;
pub mod session;
pub mod td_learning;
