//! Agent configuration strings.
//!
//! An agent is configured by a string of whitespace-separated `key=value` tokens, for example
//! `"name=player alpha=0.001 save=weights.bin"`. Tokens are applied left to right, so a later
//! token overrides an earlier one with the same key. The command line relies on this to put its
//! defaults in front of the user's arguments.
//!
//! | Key     | Value                                   | Default   |
//! |---------|-----------------------------------------|-----------|
//! | `name`  | agent kind (`player`, `rndenv`, ...)    | empty     |
//! | `seed`  | `u64` seed of the agent's random source | random    |
//! | `alpha` | `f32` learning rate                     | `0.0025`  |
//! | `load`  | weight file read at start-up            | none      |
//! | `save`  | weight file written by `finalize`       | none      |
//! | `ranks` | rank cap of a freshly allocated network | `16`      |
//!
//! Any other key is kept in [`AgentConfig::extras`] and otherwise ignored. An empty `load` or
//! `save` value clears the path.

use std::{
    collections::BTreeMap,
    num::{ParseFloatError, ParseIntError},
    path::PathBuf,
    str::FromStr,
};

use tdtile_evaluator::tuple_pattern::{DEFAULT_RANK_CAP, MAX_RANK_CAP};

use crate::td_learning::DEFAULT_ALPHA;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("expected `key=value`, found `{token}`")]
    MissingSeparator { token: String },
    #[display("invalid value `{value}` for `{key}`: {source}")]
    InvalidInteger {
        key: String,
        value: String,
        source: ParseIntError,
    },
    #[display("invalid value `{value}` for `{key}`: {source}")]
    InvalidFloat {
        key: String,
        value: String,
        source: ParseFloatError,
    },
    #[display("learning rate must be finite, found `{value}`")]
    NonFiniteAlpha { value: String },
    #[display("rank cap must be in 1..={}, found {value}", MAX_RANK_CAP)]
    RankCapOutOfRange { value: usize },
}

/// Parsed agent configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub seed: Option<u64>,
    pub alpha: f32,
    pub load: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub ranks: Option<usize>,
    pub extras: BTreeMap<String, String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            seed: None,
            alpha: DEFAULT_ALPHA,
            load: None,
            save: None,
            ranks: None,
            extras: BTreeMap::new(),
        }
    }
}

impl FromStr for AgentConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config = Self::default();
        config.apply(s)?;
        Ok(config)
    }
}

impl AgentConfig {
    /// Parses `args` on top of `defaults`.
    ///
    /// Equivalent to parsing `"{defaults} {args}"`.
    pub fn with_defaults(defaults: &str, args: &str) -> Result<Self, ConfigError> {
        let mut config = defaults.parse::<Self>()?;
        config.apply(args)?;
        Ok(config)
    }

    /// Applies the tokens of `s` in order.
    pub fn apply(&mut self, s: &str) -> Result<(), ConfigError> {
        for token in s.split_whitespace() {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| ConfigError::MissingSeparator {
                    token: token.to_owned(),
                })?;
            match key {
                "name" => value.clone_into(&mut self.name),
                "seed" => self.seed = Some(parse_int(key, value)?),
                "alpha" => {
                    let alpha: f32 = value.parse().map_err(|source| ConfigError::InvalidFloat {
                        key: key.to_owned(),
                        value: value.to_owned(),
                        source,
                    })?;
                    if !alpha.is_finite() {
                        return Err(ConfigError::NonFiniteAlpha {
                            value: value.to_owned(),
                        });
                    }
                    self.alpha = alpha;
                }
                "load" => self.load = path_value(value),
                "save" => self.save = path_value(value),
                "ranks" => {
                    let ranks = parse_int(key, value)?;
                    if !(1..=MAX_RANK_CAP).contains(&ranks) {
                        return Err(ConfigError::RankCapOutOfRange { value: ranks });
                    }
                    self.ranks = Some(ranks);
                }
                _ => {
                    self.extras.insert(key.to_owned(), value.to_owned());
                }
            }
        }
        Ok(())
    }

    /// Rank cap for a network that is not loaded from a file.
    #[must_use]
    pub fn rank_cap(&self) -> usize {
        self.ranks.unwrap_or(DEFAULT_RANK_CAP)
    }
}

fn parse_int<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParseIntError>,
{
    value.parse().map_err(|source| ConfigError::InvalidInteger {
        key: key.to_owned(),
        value: value.to_owned(),
        source,
    })
}

fn path_value(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}
