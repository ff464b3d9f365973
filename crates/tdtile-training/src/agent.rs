//! The agents taking part in an episode.
//!
//! An episode is played between two agents: the player slides tiles and the environment places
//! new ones. Both are an [`Agent`], selected by the `name` key of their configuration:
//!
//! - `player` - [`TdPlayer`], a TD(0)-trained n-tuple player
//! - `rndenv` or `environment` - [`RandomEnvironment`], the standard random tile source
//! - anything else - a passive agent that never acts
//!
//! # Lifecycle
//!
//! ```text
//! from_config → (open_episode → take_action* → close_episode)* → finalize
//! ```
//!
//! [`Agent::finalize`] is called once after the last episode and writes the player's weights if
//! `save` is configured.

use std::path::PathBuf;

use tdtile_engine::{Action, Board, TileSpawner};
use tdtile_evaluator::{
    action_selector::ActionSelector,
    tuple_network::{LoadNetworkError, TupleNetwork},
    weight_store::WeightFileError,
};

use crate::{
    config::{AgentConfig, ConfigError},
    td_learning::{EpisodeTrainer, TdUpdateStats},
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AgentError {
    #[display("invalid agent configuration: {_0}")]
    Config(ConfigError),
    #[display("failed to load weights: {_0}")]
    Load(LoadNetworkError),
    #[display("failed to save weights: {_0}")]
    Save(WeightFileError),
}

#[derive(Debug, derive_more::IsVariant)]
pub enum Agent {
    Player(TdPlayer),
    RandomEnvironment(RandomEnvironment),
    Passive,
}

impl Agent {
    /// Parses a configuration string and builds the agent it names.
    pub fn from_args(defaults: &str, args: &str) -> Result<Self, AgentError> {
        Self::from_config(&AgentConfig::with_defaults(defaults, args)?)
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        tracing::info!(
            name = %config.name,
            seed = ?config.seed,
            alpha = config.alpha,
            load = ?config.load,
            save = ?config.save,
            ranks = ?config.ranks,
            extras = ?config.extras,
            "agent configuration"
        );
        let agent = match config.name.as_str() {
            "player" => Self::Player(TdPlayer::from_config(config)?),
            "rndenv" | "environment" => {
                Self::RandomEnvironment(RandomEnvironment::from_config(config))
            }
            _ => Self::Passive,
        };
        Ok(agent)
    }

    pub fn open_episode(&mut self) {
        if let Self::Player(player) = self {
            player.open_episode();
        }
    }

    /// Ends the episode, returning the TD statistics if the player learned from it.
    pub fn close_episode(&mut self) -> Option<TdUpdateStats> {
        match self {
            Self::Player(player) => player.close_episode(),
            Self::RandomEnvironment(_) | Self::Passive => None,
        }
    }

    /// Chooses the next action, or `None` if the agent cannot or will not act.
    pub fn take_action(&mut self, board: &Board) -> Option<Action> {
        match self {
            Self::Player(player) => player.take_action(board),
            Self::RandomEnvironment(environment) => environment.take_action(board),
            Self::Passive => None,
        }
    }

    #[must_use]
    pub fn as_player(&self) -> Option<&TdPlayer> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut TdPlayer> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Saves the player's weights if a `save` path is configured.
    pub fn finalize(self) -> Result<(), AgentError> {
        if let Self::Player(player) = self
            && let Some(path) = &player.save
        {
            player.network.save(path)?;
        }
        Ok(())
    }
}

/// Player choosing slides with an n-tuple network and training it with TD(0).
#[derive(Debug, Clone)]
pub struct TdPlayer {
    network: TupleNetwork,
    trainer: EpisodeTrainer,
    learning: bool,
    save: Option<PathBuf>,
}

impl TdPlayer {
    /// Creates a learning player without a save path.
    #[must_use]
    pub fn new(network: TupleNetwork, alpha: f32) -> Self {
        Self {
            network,
            trainer: EpisodeTrainer::new(alpha),
            learning: true,
            save: None,
        }
    }

    /// Loads the network from `load`, or allocates a zeroed one with the configured rank cap.
    pub fn from_config(config: &AgentConfig) -> Result<Self, LoadNetworkError> {
        let network = match &config.load {
            Some(path) => {
                let network = TupleNetwork::load(path)?;
                if let Some(ranks) = config.ranks
                    && ranks != network.rank_cap()
                {
                    tracing::warn!(
                        configured = ranks,
                        loaded = network.rank_cap(),
                        "ignoring `ranks`, the weight file defines the rank cap"
                    );
                }
                network
            }
            None => TupleNetwork::new(config.rank_cap()),
        };
        Ok(Self {
            save: config.save.clone(),
            ..Self::new(network, config.alpha)
        })
    }

    #[must_use]
    pub fn network(&self) -> &TupleNetwork {
        &self.network
    }

    #[must_use]
    pub fn is_learning(&self) -> bool {
        self.learning
    }

    /// Enables or disables training at the end of each episode.
    pub fn set_learning(&mut self, learning: bool) {
        self.learning = learning;
    }

    pub fn open_episode(&mut self) {
        self.trainer.open();
    }

    pub fn take_action(&mut self, board: &Board) -> Option<Action> {
        let selection = ActionSelector::new(&self.network).select(board)?;
        self.trainer.record(selection.into());
        Some(Action::Slide(selection.direction()))
    }

    pub fn close_episode(&mut self) -> Option<TdUpdateStats> {
        if self.learning {
            Some(self.trainer.close(&mut self.network))
        } else {
            self.trainer.discard();
            None
        }
    }
}

/// Environment placing random tiles.
#[derive(Debug, Clone)]
pub struct RandomEnvironment {
    spawner: TileSpawner,
}

impl RandomEnvironment {
    #[must_use]
    pub fn new(spawner: TileSpawner) -> Self {
        Self { spawner }
    }

    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        let spawner = config
            .seed
            .map_or_else(TileSpawner::new, TileSpawner::with_seed);
        Self::new(spawner)
    }

    pub fn take_action(&mut self, board: &Board) -> Option<Action> {
        self.spawner.next_placement(board)
    }
}
